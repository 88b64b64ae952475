/// Popup UI for Storage Inspector

use std::cell::Cell;
use std::rc::Rc;

use log::{debug, error, info, warn};
use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::functional::UseReducerDispatcher;
use yew::prelude::*;

use crate::client::InspectTarget;
use crate::config::{CLEAR_ALL_PROMPT, NOTICE_DURATION_MS};
use crate::display::escape_html;
use crate::error::InspectorError;
use crate::host;
use crate::operations::{export_filename, stats_line};
use crate::snapshot::StorageSnapshot;
use crate::ui::components::{EmptyMessage, NoticeToast, StorageItem};
use crate::ui::state::{InspectorAction, InspectorState, Phase};

/// Dispatches into the controller until the popup is torn down
#[derive(Clone)]
struct Controller {
    dispatcher: UseReducerDispatcher<InspectorState>,
    open: Rc<Cell<bool>>,
}

impl Controller {
    fn dispatch(&self, action: InspectorAction) {
        if self.open.get() {
            self.dispatcher.dispatch(action);
        } else {
            debug!("Dropping {:?} after popup closed", action);
        }
    }

    fn notify(&self, message: impl Into<String>) {
        self.dispatch(InspectorAction::Notify(message.into()));
    }

    /// Resolve the active tab and pull a fresh snapshot from it
    fn load(&self) {
        let controller = self.clone();
        controller.dispatch(InspectorAction::LoadStarted);

        spawn_local(async move {
            match fetch_snapshot().await {
                Ok((target, snapshot)) => {
                    info!("Loaded {} items from {}", snapshot.len(), target.domain);
                    controller.dispatch(InspectorAction::Loaded { target, snapshot });
                }
                Err((target, e)) => {
                    error!("Error loading storage: {}", e);
                    controller.dispatch(InspectorAction::LoadFailed {
                        target,
                        message: e.to_string(),
                    });
                }
            }
        });
    }
}

async fn fetch_snapshot() -> Result<(InspectTarget, StorageSnapshot), (Option<InspectTarget>, InspectorError)> {
    let target = InspectTarget::active().await.map_err(|e| (None, e))?;

    if let Err(e) = target.inspect().await {
        warn!("Failed to record inspection of {}: {}", target.domain, e);
    }

    match target.get().await {
        Ok(snapshot) => Ok((target, snapshot)),
        Err(e) => Err((Some(target), e)),
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_reducer(InspectorState::default);
    let open = use_memo((), |_| Rc::new(Cell::new(true)));
    let controller = Controller {
        dispatcher: state.dispatcher(),
        open: (*open).clone(),
    };

    // Load on open; close the controller on teardown
    {
        let controller = controller.clone();
        use_effect_with((), move |_| {
            controller.load();
            move || {
                info!("Storage inspector closed");
                controller.open.set(false);
            }
        });
    }

    // Auto-dismiss the current notice
    {
        let controller = controller.clone();
        use_effect_with(state.notice.clone(), move |notice| {
            if let Some(notice) = notice.clone() {
                spawn_local(async move {
                    host::sleep(NOTICE_DURATION_MS).await;
                    controller.dispatch(InspectorAction::DismissNotice(notice.id));
                });
            }
            || ()
        });
    }

    let on_refresh = {
        let controller = controller.clone();
        Callback::from(move |_: MouseEvent| controller.load())
    };

    let on_clear_all = {
        let controller = controller.clone();
        let target = state.target.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(target) = target.clone() else {
                return;
            };
            if !host::confirm(CLEAR_ALL_PROMPT) {
                return;
            }

            controller.dispatch(InspectorAction::CancelEdit);
            let controller = controller.clone();
            spawn_local(async move {
                match target.clear().await {
                    Ok(()) => controller.dispatch(InspectorAction::Cleared),
                    Err(e) => {
                        error!("Error clearing storage: {}", e);
                        controller.notify("Error clearing local storage");
                    }
                }
            });
        })
    };

    let on_export = {
        let controller = controller.clone();
        let snapshot = state.snapshot.clone();
        let domain = state.domain().to_string();
        Callback::from(move |_: MouseEvent| {
            let result = snapshot
                .to_pretty_json()
                .map_err(InspectorError::from)
                .and_then(|json| host::download_json(&json, &export_filename(&domain, &host::now_iso())));

            match result {
                Ok(()) => controller.notify("Data exported successfully!"),
                Err(e) => {
                    error!("Export failed: {}", e);
                    controller.notify("Failed to export data");
                }
            }
        })
    };

    let on_search_input = {
        let controller = controller.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                controller.dispatch(InspectorAction::Search(input.value()));
            }
        })
    };

    let on_toggle_json = {
        let controller = controller.clone();
        Callback::from(move |key: String| controller.dispatch(InspectorAction::ToggleJson(key)))
    };

    let on_begin_edit = {
        let controller = controller.clone();
        Callback::from(move |key: String| controller.dispatch(InspectorAction::BeginEdit(key)))
    };

    let on_cancel_edit = {
        let controller = controller.clone();
        Callback::from(move |_: ()| controller.dispatch(InspectorAction::CancelEdit))
    };

    let on_commit_edit = {
        let controller = controller.clone();
        let target = state.target.clone();
        let editing = state.editing.clone();
        Callback::from(move |(key, value): (String, String)| {
            if editing.as_deref() != Some(key.as_str()) {
                return;
            }
            let Some(target) = target.clone() else {
                return;
            };

            let controller = controller.clone();
            spawn_local(async move {
                match target.set(&key, &value).await {
                    Ok(()) => controller.dispatch(InspectorAction::EditCommitted { key, value }),
                    Err(e) => {
                        error!("Error updating item {}: {}", key, e);
                        controller.dispatch(InspectorAction::EditFailed { key });
                    }
                }
            });
        })
    };

    let on_delete = {
        let controller = controller.clone();
        let target = state.target.clone();
        Callback::from(move |key: String| {
            let Some(target) = target.clone() else {
                return;
            };

            let controller = controller.clone();
            spawn_local(async move {
                match target.delete(&key).await {
                    Ok(()) => controller.dispatch(InspectorAction::ItemDeleted(key)),
                    Err(e) => {
                        error!("Error deleting item {}: {}", key, e);
                        controller.notify("Error deleting item");
                    }
                }
            });
        })
    };

    let on_copy_key = {
        let controller = controller.clone();
        Callback::from(move |key: String| {
            let controller = controller.clone();
            spawn_local(async move {
                match host::copy_to_clipboard(&key).await {
                    Ok(()) => controller.notify("Key copied to clipboard!"),
                    Err(e) => {
                        error!("Failed to copy key: {}", e);
                        controller.notify("Failed to copy key");
                    }
                }
            });
        })
    };

    let on_copy_value = {
        let controller = controller.clone();
        let snapshot = state.snapshot.clone();
        Callback::from(move |key: String| {
            let Some(value) = snapshot.get(&key).map(str::to_string) else {
                return;
            };

            let controller = controller.clone();
            spawn_local(async move {
                match host::copy_to_clipboard(&value).await {
                    Ok(()) => controller.notify("Value copied to clipboard!"),
                    Err(e) => {
                        error!("Failed to copy value: {}", e);
                        controller.notify("Failed to copy value");
                    }
                }
            });
        })
    };

    let visible = state.visible();
    let is_busy = state.phase == Phase::Loading;
    let has_target = state.target.is_some();

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{format!("Local Storage - {}", state.domain())}</h1>

            <div class="toolbar">
                <Button onclick={on_refresh} disabled={is_busy} variant={ButtonVariant::Secondary}>
                    {"Refresh"}
                </Button>
                <Button onclick={on_clear_all} disabled={is_busy || !has_target} variant={ButtonVariant::Danger}>
                    {"Clear All"}
                </Button>
                <Button onclick={on_export} disabled={is_busy || !has_target} variant={ButtonVariant::Secondary}>
                    {"Export"}
                </Button>
            </div>

            <div class="search-container">
                <input
                    type="text"
                    placeholder="Search keys or values..."
                    value={state.search.clone()}
                    oninput={on_search_input}
                    class="search-input"
                />
            </div>

            // Storage list
            {match &state.phase {
                Phase::Loading => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{"Loading local storage..."}</p>
                    </div>
                },
                Phase::Failed(err) => html! {
                    <>
                        <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                            {err.clone()}
                        </Alert>
                        <EmptyMessage message={state.empty_message()} />
                    </>
                },
                Phase::Loaded if visible.is_empty() => html! {
                    <EmptyMessage message={state.empty_message()} />
                },
                Phase::Loaded => html! {
                    <div class="storage-list">
                        {for visible.iter().map(|(key, value)| html! {
                            <StorageItem
                                key={key.to_string()}
                                item_key={key.to_string()}
                                markup={state.display_value(key).unwrap_or_default()}
                                raw_markup={escape_html(value)}
                                is_json={state.is_json(key)}
                                is_editing={state.is_editing(key)}
                                on_toggle_json={on_toggle_json.clone()}
                                on_begin_edit={on_begin_edit.clone()}
                                on_commit={on_commit_edit.clone()}
                                on_cancel={on_cancel_edit.clone()}
                                on_delete={on_delete.clone()}
                                on_copy_key={on_copy_key.clone()}
                                on_copy_value={on_copy_value.clone()}
                            />
                        })}
                    </div>
                },
            }}

            if let Some(notice) = &state.notice {
                <NoticeToast message={notice.message.clone()} />
            }

            <p class="footer-popup">
                {stats_line(&state.snapshot, state.domain())}
            </p>
        </div>
    }
}
