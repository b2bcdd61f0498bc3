//! Store Settings Modal
//!
//! Backend selection and Firestore credentials, plus the recent log lines.
//! Saving reconnects the backend and re-fetches the table.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::commands;
use crate::components::Modal;
use crate::context::use_app_context;
use crate::models::{FirestoreConfig, StoreConfig};
use crate::store::{Action, PantryStateStoreFields};

const DEFAULT_DATABASE: &str = "(default)";

/// Editable copy of the config, one string per input
#[derive(Clone, Debug, Default, PartialEq)]
struct Draft {
    backend: String,
    collection: String,
    project_id: String,
    api_key: String,
    database: String,
    timeout: String,
}

impl Draft {
    fn from_config(config: StoreConfig) -> Self {
        let firestore = config.firestore.unwrap_or(FirestoreConfig {
            project_id: String::new(),
            api_key: String::new(),
            database: DEFAULT_DATABASE.to_string(),
        });
        Self {
            backend: config.backend,
            collection: config.collection,
            project_id: firestore.project_id,
            api_key: firestore.api_key,
            database: firestore.database,
            timeout: config.request_timeout_secs.to_string(),
        }
    }

    fn to_config(&self) -> Result<StoreConfig, String> {
        let request_timeout_secs = match self.timeout.trim().parse::<u64>() {
            Ok(n) if n > 0 => n,
            _ => return Err("Timeout must be a whole number of seconds.".to_string()),
        };
        let firestore = if self.project_id.trim().is_empty() && self.api_key.is_empty() {
            None
        } else {
            Some(FirestoreConfig {
                project_id: self.project_id.trim().to_string(),
                api_key: self.api_key.clone(),
                database: match self.database.trim() {
                    "" => DEFAULT_DATABASE.to_string(),
                    name => name.to_string(),
                },
            })
        };
        Ok(StoreConfig {
            backend: self.backend.clone(),
            collection: self.collection.trim().to_string(),
            firestore,
            request_timeout_secs,
        })
    }
}

#[component]
pub fn StoreSettingsModal() -> impl IntoView {
    let ctx = use_app_context();
    let open = Signal::derive(move || ctx.store.settings_open().get());

    let (draft, set_draft) = signal(Draft::default());
    let (logs, set_logs) = signal(Vec::<String>::new());
    let (error, set_error) = signal(Option::<String>::None);
    let (saving, set_saving) = signal(false);

    // Refresh the form each time the dialog opens
    Effect::new(move |_| {
        if !open.get() {
            return;
        }
        set_error.set(None);
        spawn_local(async move {
            match commands::get_store_config().await {
                Ok(config) => set_draft.set(Draft::from_config(config)),
                Err(e) => set_error.set(Some(e.user_message())),
            }
            match commands::recent_logs().await {
                Ok(lines) => set_logs.set(lines),
                Err(e) => web_sys::console::warn_1(&format!("[PANTRY] recent_logs failed: {}", e).into()),
            }
        });
    });

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let config = match draft.get_untracked().to_config() {
            Ok(c) => c,
            Err(reason) => {
                set_error.set(Some(reason));
                return;
            }
        };
        set_saving.set(true);
        spawn_local(async move {
            match commands::save_store_config(&config).await {
                Ok(()) => {
                    ctx.dispatch(Action::CloseSettings);
                    ctx.dispatch(Action::Notify(format!("Connected to the {} store.", config.backend)));
                    ctx.reload();
                }
                Err(e) => set_error.set(Some(e.user_message())),
            }
            set_saving.set(false);
        });
    };

    let is_firestore = move || draft.with(|d| d.backend == "firestore");

    view! {
        <Modal
            open=open
            on_close=move |()| ctx.dispatch(Action::CloseSettings)
            title="Store Settings"
        >
            <form class="modal-form column" on:submit=on_submit>
                <label>
                    "Backend"
                    <select
                        prop:value=move || draft.with(|d| d.backend.clone())
                        on:change=move |ev| set_draft.update(|d| d.backend = event_target_value(&ev))
                    >
                        <option value="sqlite">"Local (SQLite)"</option>
                        <option value="firestore">"Firestore"</option>
                    </select>
                </label>
                <label>
                    "Collection"
                    <input
                        type="text"
                        prop:value=move || draft.with(|d| d.collection.clone())
                        on:input=move |ev| set_draft.update(|d| d.collection = event_target_value(&ev))
                    />
                </label>
                <Show when=is_firestore>
                    <label>
                        "Project ID"
                        <input
                            type="text"
                            prop:value=move || draft.with(|d| d.project_id.clone())
                            on:input=move |ev| set_draft.update(|d| d.project_id = event_target_value(&ev))
                        />
                    </label>
                    <label>
                        "API Key"
                        <input
                            type="password"
                            prop:value=move || draft.with(|d| d.api_key.clone())
                            on:input=move |ev| set_draft.update(|d| d.api_key = event_target_value(&ev))
                        />
                    </label>
                    <label>
                        "Database"
                        <input
                            type="text"
                            prop:value=move || draft.with(|d| d.database.clone())
                            on:input=move |ev| set_draft.update(|d| d.database = event_target_value(&ev))
                        />
                    </label>
                </Show>
                <label>
                    "Request timeout (seconds)"
                    <input
                        type="number"
                        min="1"
                        prop:value=move || draft.with(|d| d.timeout.clone())
                        on:input=move |ev| set_draft.update(|d| d.timeout = event_target_value(&ev))
                    />
                </label>
                <button type="submit" class="btn primary" disabled=move || saving.get()>
                    {move || if saving.get() { "Connecting..." } else { "Save" }}
                </button>
            </form>
            {move || error.get().map(|e| view! { <p class="form-error">{e}</p> })}
            <details class="log-view">
                <summary>"Recent activity"</summary>
                <pre>{move || logs.get().join("\n")}</pre>
            </details>
        </Modal>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sqlite_config() -> StoreConfig {
        StoreConfig {
            backend: "sqlite".into(),
            collection: "pantry".into(),
            firestore: None,
            request_timeout_secs: 10,
        }
    }

    #[test]
    fn test_draft_without_firestore_section() {
        let draft = Draft::from_config(sqlite_config());
        assert_eq!(draft.database, "(default)");
        assert_eq!(draft.to_config(), Ok(sqlite_config()));
    }

    #[test]
    fn test_draft_keeps_masked_key() {
        let mut draft = Draft::from_config(sqlite_config());
        draft.backend = "firestore".into();
        draft.project_id = " demo ".into();
        draft.api_key = "********".into();

        let config = draft.to_config().unwrap();
        let firestore = config.firestore.unwrap();
        assert_eq!(firestore.project_id, "demo");
        assert_eq!(firestore.api_key, "********");
    }

    #[test]
    fn test_blank_database_falls_back_to_default() {
        let mut draft = Draft::from_config(sqlite_config());
        draft.project_id = "demo".into();
        draft.api_key = "key".into();
        draft.database = "   ".into();

        let firestore = draft.to_config().unwrap().firestore.unwrap();
        assert_eq!(firestore.database, "(default)");
    }

    #[test]
    fn test_draft_rejects_bad_timeout() {
        let mut draft = Draft::from_config(sqlite_config());
        for bad in ["", "0", "-1", "ten"] {
            draft.timeout = bad.into();
            assert!(draft.to_config().is_err(), "timeout {:?}", bad);
        }
    }
}
