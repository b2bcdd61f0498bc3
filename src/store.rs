//! Pantry State Store
//!
//! One explicit state object, changed only through `reduce`. The filtered
//! table rows are derived from `(items, query)` on every read, never cached.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::models::{CommandError, PantryItem};

/// Add-item modal
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AddForm {
    pub open: bool,
    pub name: String,
    pub error: Option<String>,
}

/// Edit-quantity modal
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditForm {
    pub open: bool,
    pub name: String,
    pub quantity: String,
    pub error: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Banner shown above the table
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub text: String,
}

/// Whole UI state with field-level reactivity
#[derive(Clone, Debug, Default, PartialEq, Store)]
pub struct PantryState {
    /// Last successfully fetched items, in store order
    pub items: Vec<PantryItem>,
    /// Search box contents
    pub query: String,
    pub add_form: AddForm,
    pub edit_form: EditForm,
    pub settings_open: bool,
    pub notice: Option<Notice>,
    pub loading: bool,
    /// Trigger value of the newest fetch; older results are dropped
    load_seq: u32,
    next_notice_id: u64,
}

/// Everything that can change the state
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Loading(u32),
    Loaded { seq: u32, items: Vec<PantryItem> },
    /// Re-fetch failed: previous items stay on screen
    LoadFailed { seq: u32, error: CommandError },
    /// Backend could not open its store at startup
    StoreFailed(String),
    SetQuery(String),
    OpenAdd,
    CloseAdd,
    SetAddName(String),
    AddRejected(String),
    AddSubmitted,
    OpenEdit { name: String, count: Option<i64> },
    CloseEdit,
    SetEditName(String),
    SetEditQuantity(String),
    EditRejected(String),
    EditSubmitted,
    OpenSettings,
    CloseSettings,
    MutationFailed(CommandError),
    Notify(String),
    DismissNotice(u64),
}

/// Pure state transition
pub fn reduce(mut state: PantryState, action: Action) -> PantryState {
    match action {
        Action::Loading(seq) => {
            state.load_seq = state.load_seq.max(seq);
            state.loading = true;
        }
        Action::Loaded { seq, items } => {
            if seq >= state.load_seq {
                state.items = items;
                state.loading = false;
            }
        }
        Action::LoadFailed { seq, error } => {
            if seq >= state.load_seq {
                state.loading = false;
                state = raise(state, NoticeKind::Error, format!("Could not refresh the pantry. {}", error.user_message()));
            }
        }
        Action::StoreFailed(message) => {
            state.loading = false;
            state = raise(state, NoticeKind::Error, format!("Could not open the store: {}", message));
        }
        Action::SetQuery(query) => state.query = query,
        Action::OpenAdd => {
            state.add_form.open = true;
            state.add_form.error = None;
        }
        Action::CloseAdd => {
            state.add_form.open = false;
            state.add_form.error = None;
        }
        Action::SetAddName(name) => {
            state.add_form.name = name;
            state.add_form.error = None;
        }
        Action::AddRejected(reason) => state.add_form.error = Some(reason),
        Action::AddSubmitted => state.add_form = AddForm::default(),
        Action::OpenEdit { name, count } => {
            state.edit_form = EditForm {
                open: true,
                name,
                quantity: count.map(|c| c.to_string()).unwrap_or_default(),
                error: None,
            };
        }
        Action::CloseEdit => {
            state.edit_form.open = false;
            state.edit_form.error = None;
        }
        Action::SetEditName(name) => {
            state.edit_form.name = name;
            state.edit_form.error = None;
        }
        Action::SetEditQuantity(quantity) => {
            state.edit_form.quantity = quantity;
            state.edit_form.error = None;
        }
        Action::EditRejected(reason) => state.edit_form.error = Some(reason),
        Action::EditSubmitted => state.edit_form = EditForm::default(),
        Action::OpenSettings => state.settings_open = true,
        Action::CloseSettings => state.settings_open = false,
        Action::MutationFailed(err) => {
            state = raise(state, NoticeKind::Error, err.user_message());
        }
        Action::Notify(text) => {
            state = raise(state, NoticeKind::Info, text);
        }
        Action::DismissNotice(id) => {
            if state.notice.as_ref().is_some_and(|n| n.id == id) {
                state.notice = None;
            }
        }
    }
    state
}

fn raise(mut state: PantryState, kind: NoticeKind, text: String) -> PantryState {
    state.next_notice_id += 1;
    state.notice = Some(Notice { id: state.next_notice_id, kind, text });
    state
}

/// Items whose name contains `query`, ignoring case
pub fn filter_items(items: &[PantryItem], query: &str) -> Vec<PantryItem> {
    let query = query.to_lowercase();
    items
        .iter()
        .filter(|item| item.name.to_lowercase().contains(&query))
        .cloned()
        .collect()
}

/// Name as shown in the table: first character upper-cased
pub fn display_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Type alias for the store
pub type PantryStore = Store<PantryState>;

/// Apply an action to the store
pub fn dispatch(store: PantryStore, action: Action) {
    store.update(|state| {
        let current = std::mem::take(state);
        *state = reduce(current, action);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, count: i64) -> PantryItem {
        PantryItem { name: name.to_string(), count }
    }

    fn network_error() -> CommandError {
        CommandError { kind: "network".into(), message: "timed out".into() }
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let items = vec![item("Eggs", 2), item("eggplant", 1), item("milk", 5), item("Green Tea", 1)];
        let cases: &[(&str, &[&str])] = &[
            ("", &["Eggs", "eggplant", "milk", "Green Tea"]),
            ("egg", &["Eggs", "eggplant"]),
            ("EGG", &["Eggs", "eggplant"]),
            ("n t", &["Green Tea"]),
            ("lk", &["milk"]),
            ("xyz", &[]),
        ];
        for (query, expected) in cases {
            let names: Vec<String> = filter_items(&items, query).into_iter().map(|i| i.name).collect();
            assert_eq!(&names, expected, "query {:?}", query);
        }
    }

    #[test]
    fn test_filter_matches_lowercase_definition() {
        let items = vec![item("Apple", 1), item("banana", 2), item("CHERRY", 3)];
        for query in ["a", "AN", "rr", "e", "Apple", ""] {
            let expected: Vec<PantryItem> = items
                .iter()
                .filter(|i| i.name.to_lowercase().contains(&query.to_lowercase()))
                .cloned()
                .collect();
            assert_eq!(filter_items(&items, query), expected);
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("eggs"), "Eggs");
        assert_eq!(display_name("Milk"), "Milk");
        assert_eq!(display_name("écrevisse"), "Écrevisse");
        assert_eq!(display_name(""), "");
    }

    #[test]
    fn test_load_failure_keeps_previous_items() {
        let state = reduce(PantryState::default(), Action::Loaded { seq: 0, items: vec![item("eggs", 2)] });
        let state = reduce(state, Action::Loading(1));
        let state = reduce(state, Action::LoadFailed { seq: 1, error: network_error() });

        assert_eq!(state.items, vec![item("eggs", 2)]);
        assert!(!state.loading);
        assert_eq!(state.notice.as_ref().map(|n| n.kind), Some(NoticeKind::Error));
    }

    #[test]
    fn test_add_submit_clears_and_closes() {
        let state = reduce(PantryState::default(), Action::OpenAdd);
        let state = reduce(state, Action::SetAddName("eggs".into()));
        assert!(state.add_form.open);

        let state = reduce(state, Action::AddSubmitted);
        assert_eq!(state.add_form, AddForm::default());
    }

    #[test]
    fn test_add_rejection_keeps_modal_open() {
        let state = reduce(PantryState::default(), Action::OpenAdd);
        let state = reduce(state, Action::AddRejected("item name must not be empty".into()));
        assert!(state.add_form.open);
        assert!(state.add_form.error.is_some());

        // Typing clears the error
        let state = reduce(state, Action::SetAddName("e".into()));
        assert!(state.add_form.error.is_none());
    }

    #[test]
    fn test_open_edit_prefills_row() {
        let state = reduce(
            PantryState::default(),
            Action::OpenEdit { name: "milk".into(), count: Some(3) },
        );
        assert!(state.edit_form.open);
        assert_eq!(state.edit_form.name, "milk");
        assert_eq!(state.edit_form.quantity, "3");

        let state = reduce(state, Action::EditSubmitted);
        assert_eq!(state.edit_form, EditForm::default());
    }

    #[test]
    fn test_query_does_not_touch_items() {
        let state = reduce(PantryState::default(), Action::Loaded { seq: 0, items: vec![item("eggs", 1), item("milk", 1)] });
        let state = reduce(state, Action::SetQuery("mi".into()));
        assert_eq!(state.items.len(), 2);
        assert_eq!(filter_items(&state.items, &state.query), vec![item("milk", 1)]);
    }

    #[test]
    fn test_dismiss_only_matching_notice() {
        let state = reduce(PantryState::default(), Action::MutationFailed(network_error()));
        let first = state.notice.as_ref().unwrap().id;
        let state = reduce(state, Action::Notify("Saved".into()));
        let second = state.notice.as_ref().unwrap().id;
        assert_ne!(first, second);

        // A stale timer for the first notice must not hide the second
        let state = reduce(state, Action::DismissNotice(first));
        assert!(state.notice.is_some());
        let state = reduce(state, Action::DismissNotice(second));
        assert!(state.notice.is_none());
    }

    #[test]
    fn test_stale_fetch_is_dropped() {
        let state = reduce(PantryState::default(), Action::Loading(1));
        let state = reduce(state, Action::Loading(2));

        // Newer fetch lands first, the older one must not overwrite it
        let state = reduce(state, Action::Loaded { seq: 2, items: vec![item("eggs", 3)] });
        let state = reduce(state, Action::Loaded { seq: 1, items: vec![item("eggs", 2)] });
        assert_eq!(state.items, vec![item("eggs", 3)]);

        let state = reduce(state, Action::LoadFailed { seq: 1, error: network_error() });
        assert!(state.notice.is_none());
        assert!(!state.loading);
    }

    #[test]
    fn test_older_fetch_still_pending_keeps_loading() {
        let state = reduce(PantryState::default(), Action::Loading(1));
        let state = reduce(state, Action::Loading(2));
        let state = reduce(state, Action::Loaded { seq: 1, items: vec![item("milk", 1)] });
        assert!(state.loading);
        assert!(state.items.is_empty());
    }

    #[test]
    fn test_store_failure_stops_loading() {
        let state = reduce(PantryState::default(), Action::Loading(1));
        let state = reduce(state, Action::StoreFailed("database locked".into()));
        assert!(!state.loading);
        assert_eq!(state.notice.as_ref().map(|n| n.kind), Some(NoticeKind::Error));
    }
}
