//! Pantry Row Component
//!
//! One table row with the per-item actions.

use leptos::prelude::*;

use crate::commands;
use crate::context::use_app_context;
use crate::models::PantryItem;
use crate::store::{display_name, Action};

#[component]
pub fn PantryRow(item: PantryItem) -> impl IntoView {
    let ctx = use_app_context();

    let label = display_name(&item.name);
    let count = item.count;
    let name = StoredValue::new(item.name);

    view! {
        <tr class="pantry-row">
            <td class="cell-name">{label}</td>
            <td class="cell-count">{count}</td>
            <td class="cell-actions">
                <button
                    class="btn warning"
                    on:click=move |_| ctx.dispatch(Action::OpenEdit {
                        name: name.get_value(),
                        count: Some(count),
                    })
                >
                    "Edit Quantity"
                </button>
                <button
                    class="btn danger"
                    on:click=move |_| {
                        let name = name.get_value();
                        ctx.mutate("remove one", async move { commands::decrement_item(&name).await });
                    }
                >
                    "Remove"
                </button>
                <button
                    class="btn danger"
                    on:click=move |_| {
                        let name = name.get_value();
                        ctx.mutate("delete", async move { commands::remove_item(&name).await });
                    }
                >
                    "Delete"
                </button>
            </td>
        </tr>
    }
}
