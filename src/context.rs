//! Application Context
//!
//! Shared handles provided via Leptos Context API.

use std::future::Future;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::models::CommandError;
use crate::store::{dispatch, Action, PantryStore};

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Trigger to reload items from backend - read
    pub reload_trigger: ReadSignal<u32>,
    /// Trigger to reload items from backend - write
    set_reload_trigger: WriteSignal<u32>,
    /// UI state
    pub store: PantryStore,
}

impl AppContext {
    pub fn new(reload_trigger: (ReadSignal<u32>, WriteSignal<u32>), store: PantryStore) -> Self {
        Self {
            reload_trigger: reload_trigger.0,
            set_reload_trigger: reload_trigger.1,
            store,
        }
    }

    /// Trigger a full re-fetch of items
    pub fn reload(&self) {
        self.set_reload_trigger.update(|v| *v += 1);
    }

    pub fn dispatch(&self, action: Action) {
        dispatch(self.store, action);
    }

    /// Run a store mutation, then re-fetch whether or not it succeeded.
    /// Failures raise a notice.
    pub fn mutate<T, Fut>(&self, label: &'static str, op: Fut)
    where
        T: 'static,
        Fut: Future<Output = Result<T, CommandError>> + 'static,
    {
        let ctx = *self;
        spawn_local(async move {
            if let Err(err) = op.await {
                web_sys::console::error_1(&format!("[PANTRY] {} failed: {}", label, err).into());
                ctx.dispatch(Action::MutationFailed(err));
            }
            ctx.reload();
        });
    }
}

/// Get the app context
pub fn use_app_context() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}
