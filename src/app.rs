//! Pantry Frontend App
//!
//! Single page: search, add, table and the dialogs.

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use crate::commands;
use crate::components::{AddItemModal, EditQuantityModal, NoticeBanner, PantryTable, SearchBar, StoreSettingsModal};
use crate::context::AppContext;
use crate::store::{Action, PantryState, PantryStateStoreFields};

#[component]
pub fn App() -> impl IntoView {
    let store = Store::new(PantryState::default());
    let (reload_trigger, set_reload_trigger) = signal(0u32);

    let ctx = AppContext::new((reload_trigger, set_reload_trigger), store);
    provide_context(ctx);

    // Re-fetch once the backend finishes connecting
    spawn_local(async move {
        let ready = commands::on_event("store-initialized", move |_| ctx.reload()).await;
        let failed = commands::on_event("store-failed", move |payload| {
            ctx.dispatch(Action::StoreFailed(payload.as_string().unwrap_or_default()));
        })
        .await;
        if let Err(e) = ready.and(failed) {
            web_sys::console::warn_1(&format!("[APP] Event subscription failed: {}", e).into());
        }
        // The store may have come up before the listeners were registered
        ctx.reload();
    });

    // Full re-fetch on every trigger change
    Effect::new(move |_| {
        let trigger = reload_trigger.get();
        ctx.dispatch(Action::Loading(trigger));
        spawn_local(async move {
            match commands::list_items().await {
                Ok(items) => {
                    web_sys::console::log_1(&format!("[APP] Loaded {} items, trigger={}", items.len(), trigger).into());
                    ctx.dispatch(Action::Loaded { seq: trigger, items });
                }
                // Still connecting: stay in loading until store-initialized or store-failed
                Err(e) if e.kind == "unavailable" => {}
                Err(error) => ctx.dispatch(Action::LoadFailed { seq: trigger, error }),
            }
        });
    });

    view! {
        <div class="app-layout">
            <header class="app-header">
                <h1>"Welcome to the Inventory Manager"</h1>
                <button
                    class="btn icon"
                    title="Store Settings"
                    aria-label="Store Settings"
                    on:click=move |_| ctx.dispatch(Action::OpenSettings)
                >
                    "⚙"
                </button>
            </header>

            <NoticeBanner />

            <div class="toolbar">
                <SearchBar />
                <button class="btn primary" on:click=move |_| ctx.dispatch(Action::OpenAdd)>
                    "Add Item"
                </button>
            </div>

            <div class="section-header">
                <h2>"Pantry Items"</h2>
            </div>

            <PantryTable />

            <p class="item-count">
                {move || format!("{} items", ctx.store.items().with(|items| items.len()))}
            </p>

            <AddItemModal />
            <EditQuantityModal />
            <StoreSettingsModal />
        </div>
    }
}
