/// Popup controller state: the storage mirror and everything the UI tracks about it
use crate::client::InspectTarget;
use crate::display::rendered_value;
use crate::operations::filter_snapshot;
use crate::snapshot::StorageSnapshot;
use std::collections::HashSet;
use std::rc::Rc;
use yew::functional::Reducible;

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Loading,
    Loaded,
    Failed(String),
}

/// A transient message; `id` distinguishes it from the notices before it
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: u32,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InspectorAction {
    /// A (re)load began; any edit in progress is abandoned
    LoadStarted,
    Loaded {
        target: InspectTarget,
        snapshot: StorageSnapshot,
    },
    LoadFailed {
        target: Option<InspectTarget>,
        message: String,
    },
    Search(String),
    ToggleJson(String),
    BeginEdit(String),
    CancelEdit,
    /// The page accepted a new value for `key`
    EditCommitted {
        key: String,
        value: String,
    },
    EditFailed {
        key: String,
    },
    ItemDeleted(String),
    Cleared,
    Notify(String),
    DismissNotice(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InspectorState {
    pub phase: Phase,
    pub target: Option<InspectTarget>,
    pub snapshot: StorageSnapshot,
    pub search: String,
    /// Keys currently shown as pretty-printed JSON
    pub json_keys: HashSet<String>,
    /// The single key in edit mode, if any
    pub editing: Option<String>,
    pub notice: Option<Notice>,
    next_notice_id: u32,
}

impl Default for InspectorState {
    fn default() -> Self {
        InspectorState {
            phase: Phase::Loading,
            target: None,
            snapshot: StorageSnapshot::new(),
            search: String::new(),
            json_keys: HashSet::new(),
            editing: None,
            notice: None,
            next_notice_id: 0,
        }
    }
}

impl InspectorState {
    pub fn domain(&self) -> &str {
        self.target.as_ref().map(|t| t.domain.as_str()).unwrap_or("")
    }

    pub fn is_json(&self, key: &str) -> bool {
        self.json_keys.contains(key)
    }

    pub fn is_editing(&self, key: &str) -> bool {
        self.editing.as_deref() == Some(key)
    }

    /// Entries matching the current search term, in storage order
    pub fn visible(&self) -> StorageSnapshot {
        filter_snapshot(&self.snapshot, &self.search)
    }

    /// Markup for a key's value under its current display mode
    pub fn display_value(&self, key: &str) -> Option<String> {
        self.snapshot
            .get(key)
            .map(|value| rendered_value(value, self.is_json(key)))
    }

    /// Message for an empty list
    pub fn empty_message(&self) -> &'static str {
        match self.phase {
            Phase::Failed(_) => "Error loading local storage data",
            _ if !self.search.is_empty() => "No items match your search",
            _ => "No local storage data found",
        }
    }

    fn notify(&mut self, message: impl Into<String>) {
        self.next_notice_id = self.next_notice_id.wrapping_add(1);
        self.notice = Some(Notice {
            id: self.next_notice_id,
            message: message.into(),
        });
    }

    /// Apply one action in place
    pub fn apply(&mut self, action: InspectorAction) {
        match action {
            InspectorAction::LoadStarted => {
                self.phase = Phase::Loading;
                self.editing = None;
            }
            InspectorAction::Loaded { target, snapshot } => {
                self.phase = Phase::Loaded;
                self.target = Some(target);
                self.snapshot = snapshot;
            }
            InspectorAction::LoadFailed { target, message } => {
                self.phase = Phase::Failed(message);
                if target.is_some() {
                    self.target = target;
                }
                self.snapshot = StorageSnapshot::new();
            }
            InspectorAction::Search(term) => {
                self.search = term;
                self.editing = None;
            }
            InspectorAction::ToggleJson(key) => {
                if !self.json_keys.remove(&key) {
                    self.json_keys.insert(key);
                }
            }
            InspectorAction::BeginEdit(key) => {
                if self.snapshot.contains_key(&key) {
                    self.editing = Some(key);
                }
            }
            InspectorAction::CancelEdit => {
                self.editing = None;
            }
            InspectorAction::EditCommitted { key, value } => {
                if self.is_editing(&key) {
                    self.editing = None;
                }
                self.notify(format!("Item \"{}\" updated successfully", key));
                self.snapshot.set(key, value);
            }
            InspectorAction::EditFailed { key } => {
                if self.is_editing(&key) {
                    self.editing = None;
                }
                self.notify("Error updating item");
            }
            InspectorAction::ItemDeleted(key) => {
                self.snapshot.remove(&key);
                self.json_keys.remove(&key);
                if self.is_editing(&key) {
                    self.editing = None;
                }
                self.notify(format!("Item \"{}\" deleted successfully", key));
            }
            InspectorAction::Cleared => {
                self.snapshot.clear();
                self.json_keys.clear();
                self.editing = None;
                self.notify("All local storage cleared successfully");
            }
            InspectorAction::Notify(message) => {
                self.notify(message);
            }
            InspectorAction::DismissNotice(id) => {
                if self.notice.as_ref().map(|n| n.id) == Some(id) {
                    self.notice = None;
                }
            }
        }
    }
}

impl Reducible for InspectorState {
    type Action = InspectorAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        Rc::new(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::unescape_html;

    fn target() -> InspectTarget {
        InspectTarget {
            tab_id: 7,
            domain: "example.com".to_string(),
        }
    }

    fn loaded(entries: &[(&str, &str)]) -> InspectorState {
        let mut state = InspectorState::default();
        state.apply(InspectorAction::Loaded {
            target: target(),
            snapshot: entries.iter().copied().collect(),
        });
        state
    }

    fn scenario() -> InspectorState {
        loaded(&[("a", "1"), ("b", "{\"x\":2}")])
    }

    #[test]
    fn test_starts_loading() {
        let state = InspectorState::default();
        assert_eq!(state.phase, Phase::Loading);
        assert!(state.snapshot.is_empty());
        assert_eq!(state.domain(), "");
    }

    #[test]
    fn test_loaded() {
        let state = scenario();
        assert_eq!(state.phase, Phase::Loaded);
        assert_eq!(state.domain(), "example.com");
        assert_eq!(state.snapshot.len(), 2);
    }

    #[test]
    fn test_load_failed_keeps_target_and_empties_mirror() {
        let mut state = scenario();
        state.apply(InspectorAction::LoadFailed {
            target: None,
            message: "Remote execution failed: no receiver".to_string(),
        });

        assert!(matches!(state.phase, Phase::Failed(_)));
        assert_eq!(state.domain(), "example.com");
        assert!(state.snapshot.is_empty());
        assert_eq!(state.empty_message(), "Error loading local storage data");
    }

    #[test]
    fn test_json_toggle_scenario() {
        let mut state = scenario();

        state.apply(InspectorAction::ToggleJson("b".to_string()));
        let shown = unescape_html(&state.display_value("b").unwrap());
        assert_eq!(shown, "{\n  \"x\": 2\n}");

        state.apply(InspectorAction::ToggleJson("a".to_string()));
        assert_eq!(unescape_html(&state.display_value("a").unwrap()), "1");
    }

    #[test]
    fn test_json_toggle_twice_restores_raw() {
        let mut state = scenario();
        let raw = state.display_value("b").unwrap();

        state.apply(InspectorAction::ToggleJson("b".to_string()));
        state.apply(InspectorAction::ToggleJson("b".to_string()));

        assert!(!state.is_json("b"));
        assert_eq!(state.display_value("b").unwrap(), raw);
    }

    #[test]
    fn test_edit_commit_scenario() {
        let mut state = scenario();

        state.apply(InspectorAction::BeginEdit("a".to_string()));
        assert!(state.is_editing("a"));

        state.apply(InspectorAction::EditCommitted {
            key: "a".to_string(),
            value: "hello".to_string(),
        });

        let expected: StorageSnapshot = [("a", "hello"), ("b", "{\"x\":2}")].into_iter().collect();
        assert_eq!(state.snapshot, expected);
        assert_eq!(state.editing, None);
        assert_eq!(
            state.notice.as_ref().map(|n| n.message.as_str()),
            Some("Item \"a\" updated successfully")
        );
    }

    #[test]
    fn test_edit_failure_leaves_mirror_unchanged() {
        let mut state = scenario();
        let before = state.snapshot.clone();

        state.apply(InspectorAction::BeginEdit("a".to_string()));
        state.apply(InspectorAction::EditFailed { key: "a".to_string() });

        assert_eq!(state.snapshot, before);
        assert_eq!(state.editing, None);
        assert_eq!(state.notice.as_ref().map(|n| n.message.as_str()), Some("Error updating item"));
    }

    #[test]
    fn test_only_one_edit_session() {
        let mut state = scenario();

        state.apply(InspectorAction::BeginEdit("a".to_string()));
        state.apply(InspectorAction::BeginEdit("b".to_string()));

        assert!(state.is_editing("b"));
        assert!(!state.is_editing("a"));
    }

    #[test]
    fn test_late_commit_does_not_close_newer_session() {
        let mut state = scenario();

        state.apply(InspectorAction::BeginEdit("a".to_string()));
        state.apply(InspectorAction::BeginEdit("b".to_string()));
        state.apply(InspectorAction::EditCommitted {
            key: "a".to_string(),
            value: "saved".to_string(),
        });

        assert_eq!(state.snapshot.get("a"), Some("saved"));
        assert!(state.is_editing("b"));
    }

    #[test]
    fn test_begin_edit_ignores_unknown_key() {
        let mut state = scenario();
        state.apply(InspectorAction::BeginEdit("missing".to_string()));
        assert_eq!(state.editing, None);
    }

    #[test]
    fn test_cancel_edit() {
        let mut state = scenario();
        state.apply(InspectorAction::BeginEdit("a".to_string()));
        state.apply(InspectorAction::CancelEdit);

        assert_eq!(state.editing, None);
        assert_eq!(state.snapshot.get("a"), Some("1"));
    }

    #[test]
    fn test_search_ends_edit_session() {
        let mut state = scenario();
        state.apply(InspectorAction::BeginEdit("a".to_string()));
        state.apply(InspectorAction::Search("X".to_string()));

        assert_eq!(state.editing, None);
        let visible: Vec<String> = state.visible().iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(visible, vec!["b"]);
    }

    #[test]
    fn test_empty_search_shows_everything() {
        let mut state = scenario();
        state.apply(InspectorAction::Search(String::new()));
        assert_eq!(state.visible(), state.snapshot);
    }

    #[test]
    fn test_empty_messages() {
        let mut state = loaded(&[]);
        assert_eq!(state.empty_message(), "No local storage data found");

        state.apply(InspectorAction::Search("zzz".to_string()));
        assert_eq!(state.empty_message(), "No items match your search");
    }

    #[test]
    fn test_refresh_abandons_edit() {
        let mut state = scenario();
        state.apply(InspectorAction::BeginEdit("a".to_string()));
        state.apply(InspectorAction::LoadStarted);

        assert_eq!(state.phase, Phase::Loading);
        assert_eq!(state.editing, None);
    }

    #[test]
    fn test_delete_scenario() {
        let mut state = scenario();
        state.apply(InspectorAction::ToggleJson("a".to_string()));
        state.apply(InspectorAction::ItemDeleted("a".to_string()));

        let expected: StorageSnapshot = [("b", "{\"x\":2}")].into_iter().collect();
        assert_eq!(state.snapshot, expected);
        assert!(!state.is_json("a"));
    }

    #[test]
    fn test_clear() {
        let mut state = scenario();
        state.apply(InspectorAction::ToggleJson("b".to_string()));
        state.apply(InspectorAction::BeginEdit("a".to_string()));
        state.apply(InspectorAction::Cleared);

        assert!(state.snapshot.is_empty());
        assert!(state.json_keys.is_empty());
        assert_eq!(state.editing, None);
    }

    #[test]
    fn test_dismiss_only_matching_notice() {
        let mut state = scenario();
        state.apply(InspectorAction::Notify("first".to_string()));
        let first = state.notice.as_ref().unwrap().id;
        state.apply(InspectorAction::Notify("second".to_string()));

        state.apply(InspectorAction::DismissNotice(first));
        assert_eq!(state.notice.as_ref().map(|n| n.message.as_str()), Some("second"));

        let second = state.notice.as_ref().unwrap().id;
        state.apply(InspectorAction::DismissNotice(second));
        assert_eq!(state.notice, None);
    }

    #[test]
    fn test_reduce_leaves_previous_state_untouched() {
        let state = Rc::new(scenario());
        let next = state.clone().reduce(InspectorAction::ItemDeleted("a".to_string()));

        assert_eq!(state.snapshot.len(), 2);
        assert_eq!(next.snapshot.len(), 1);
    }
}
