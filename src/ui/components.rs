/// Reusable UI components

use patternfly_yew::prelude::*;
use web_sys::HtmlTextAreaElement;
use yew::prelude::*;

use crate::display::unescape_html;

#[derive(Properties, PartialEq)]
pub struct StorageItemProps {
    pub item_key: String,
    /// Escaped markup for the value as currently displayed
    pub markup: String,
    /// Escaped markup of the raw value; the editor is seeded from it
    pub raw_markup: String,
    pub is_json: bool,
    pub is_editing: bool,
    pub on_toggle_json: Callback<String>,
    pub on_begin_edit: Callback<String>,
    pub on_commit: Callback<(String, String)>,
    pub on_cancel: Callback<()>,
    pub on_delete: Callback<String>,
    pub on_copy_key: Callback<String>,
    pub on_copy_value: Callback<String>,
}

#[function_component(StorageItem)]
pub fn storage_item(props: &StorageItemProps) -> Html {
    let key = props.item_key.clone();

    if props.is_editing {
        let on_commit = {
            let key = key.clone();
            props.on_commit.reform(move |value: String| (key.clone(), value))
        };

        return html! {
            <div class="storage-item editing">
                <div class="key">{format!("Key: {}", props.item_key)}</div>
                <ValueEditor
                    initial={unescape_html(&props.raw_markup)}
                    on_commit={on_commit}
                    on_cancel={props.on_cancel.clone()}
                />
            </div>
        };
    }

    let with_key = |cb: &Callback<String>| {
        let key = key.clone();
        cb.reform(move |_: MouseEvent| key.clone())
    };

    html! {
        <div class="storage-item">
            <div class="key">
                {format!("Key: {}", props.item_key)}
                <button class="json-toggle" onclick={with_key(&props.on_toggle_json)}>
                    {if props.is_json { "Raw" } else { "JSON" }}
                </button>
            </div>
            <div class="value" ondblclick={with_key(&props.on_begin_edit)}>
                {Html::from_html_unchecked(AttrValue::from(props.markup.clone()))}
            </div>
            <div class="actions">
                <Button onclick={with_key(&props.on_delete)} variant={ButtonVariant::Danger} size={ButtonSize::Small}>
                    {"Delete"}
                </Button>
                <Button onclick={with_key(&props.on_copy_value)} variant={ButtonVariant::Primary} size={ButtonSize::Small}>
                    {"Copy Value"}
                </Button>
                <Button onclick={with_key(&props.on_copy_key)} variant={ButtonVariant::Primary} size={ButtonSize::Small}>
                    {"Copy Key"}
                </Button>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ValueEditorProps {
    pub initial: String,
    pub on_commit: Callback<String>,
    pub on_cancel: Callback<()>,
}

/// Text editor for one value
///
/// Focuses itself on mount. Losing focus or Ctrl+Enter commits, Escape
/// cancels; only the first of these is reported.
#[function_component(ValueEditor)]
pub fn value_editor(props: &ValueEditorProps) -> Html {
    let textarea = use_node_ref();
    let settled = use_mut_ref(|| false);

    {
        let textarea = textarea.clone();
        use_effect_with((), move |_| {
            if let Some(el) = textarea.cast::<HtmlTextAreaElement>() {
                let _ = el.focus();
                el.select();
            }
            || ()
        });
    }

    let commit = {
        let textarea = textarea.clone();
        let settled = settled.clone();
        let on_commit = props.on_commit.clone();
        move || {
            if settled.replace(true) {
                return;
            }
            if let Some(el) = textarea.cast::<HtmlTextAreaElement>() {
                on_commit.emit(el.value());
            }
        }
    };

    let cancel = {
        let settled = settled.clone();
        let on_cancel = props.on_cancel.clone();
        move || {
            if !settled.replace(true) {
                on_cancel.emit(());
            }
        }
    };

    let onkeydown = {
        let commit = commit.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" && e.ctrl_key() {
                e.prevent_default();
                commit();
            } else if e.key() == "Escape" {
                e.prevent_default();
                cancel();
            }
        })
    };

    let onblur = Callback::from(move |_: FocusEvent| commit());

    html! {
        <div class="value-editor">
            <textarea
                ref={textarea}
                class="value-edit"
                value={props.initial.clone()}
                {onkeydown}
                {onblur}
            />
            <div class="edit-hint">{"Click outside to save • Ctrl+Enter to save • Escape to cancel"}</div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct NoticeToastProps {
    pub message: String,
}

#[function_component(NoticeToast)]
pub fn notice_toast(props: &NoticeToastProps) -> Html {
    html! {
        <div class="notice-toast" role="status">
            {&props.message}
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct EmptyMessageProps {
    pub message: String,
}

#[function_component(EmptyMessage)]
pub fn empty_message(props: &EmptyMessageProps) -> Html {
    html! {
        <div class="empty-state">
            <p>{&props.message}</p>
        </div>
    }
}
