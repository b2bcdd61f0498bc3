//! Pantry Table Component
//!
//! Lists the items that pass the search filter.

use leptos::prelude::*;

use crate::components::PantryRow;
use crate::context::use_app_context;
use crate::models::PantryItem;
use crate::store::{filter_items, PantryStateStoreFields};

#[component]
pub fn PantryTable() -> impl IntoView {
    let ctx = use_app_context();

    // Derived on every read from (items, query)
    let visible = move || filter_items(&ctx.store.items().get(), &ctx.store.query().get());

    let empty_text = move || {
        if ctx.store.loading().get() && ctx.store.items().with(|items| items.is_empty()) {
            "Loading..."
        } else if ctx.store.query().with(|q| q.is_empty()) {
            "The pantry is empty."
        } else {
            "No items match your search."
        }
    };

    view! {
        <div class="table-container">
            <table class="pantry-table">
                <thead>
                    <tr>
                        <th>"Item"</th>
                        <th class="align-right">"Quantity"</th>
                        <th class="align-right">"Actions"</th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=visible
                        key=|item: &PantryItem| (item.name.clone(), item.count)
                        children=move |item| view! { <PantryRow item=item /> }
                    />
                    <Show when=move || visible().is_empty()>
                        <tr class="empty-row">
                            <td colspan="3">{empty_text}</td>
                        </tr>
                    </Show>
                </tbody>
            </table>
        </div>
    }
}
