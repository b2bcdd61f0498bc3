//! Edit Quantity Modal
//!
//! Name and absolute quantity. Submitting overwrites the stored count,
//! creating the item if it does not exist.

use leptos::prelude::*;

use crate::commands;
use crate::components::Modal;
use crate::context::use_app_context;
use crate::form::{parse_item_name, parse_quantity};
use crate::store::{Action, PantryStateStoreFields};

#[component]
pub fn EditQuantityModal() -> impl IntoView {
    let ctx = use_app_context();
    let form = move || ctx.store.edit_form().get();

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let current = form();
        let parsed = parse_item_name(&current.name)
            .and_then(|name| parse_quantity(&current.quantity).map(|count| (name, count)));
        match parsed {
            Ok((name, count)) => {
                ctx.dispatch(Action::EditSubmitted);
                ctx.mutate("edit quantity", async move { commands::set_item_quantity(&name, count).await });
            }
            Err(reason) => ctx.dispatch(Action::EditRejected(reason)),
        }
    };

    view! {
        <Modal
            open=Signal::derive(move || form().open)
            on_close=move |()| ctx.dispatch(Action::CloseEdit)
            title="Edit Quantity"
        >
            <form class="modal-form column" on:submit=on_submit>
                <input
                    type="text"
                    placeholder="Item"
                    aria-label="Item"
                    prop:value=move || form().name
                    on:input=move |ev| ctx.dispatch(Action::SetEditName(event_target_value(&ev)))
                />
                <input
                    type="number"
                    min="0"
                    step="1"
                    placeholder="New Quantity"
                    aria-label="New Quantity"
                    prop:value=move || form().quantity
                    on:input=move |ev| ctx.dispatch(Action::SetEditQuantity(event_target_value(&ev)))
                />
                <button type="submit" class="btn primary">"Save"</button>
            </form>
            {move || form().error.map(|e| view! { <p class="form-error">{e}</p> })}
        </Modal>
    }
}
