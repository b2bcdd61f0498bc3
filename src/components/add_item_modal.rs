//! Add Item Modal
//!
//! Single name input. Submitting adds one unit of that item.

use leptos::prelude::*;

use crate::commands;
use crate::components::Modal;
use crate::context::use_app_context;
use crate::form::parse_item_name;
use crate::store::{Action, PantryStateStoreFields};

#[component]
pub fn AddItemModal() -> impl IntoView {
    let ctx = use_app_context();
    let form = move || ctx.store.add_form().get();

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        match parse_item_name(&form().name) {
            Ok(name) => {
                ctx.dispatch(Action::AddSubmitted);
                ctx.mutate("add item", async move { commands::increment_item(&name).await });
            }
            Err(reason) => ctx.dispatch(Action::AddRejected(reason)),
        }
    };

    view! {
        <Modal
            open=Signal::derive(move || form().open)
            on_close=move |()| ctx.dispatch(Action::CloseAdd)
            title="Add Item"
        >
            <form class="modal-form row" on:submit=on_submit>
                <input
                    type="text"
                    placeholder="Item"
                    aria-label="Item"
                    prop:value=move || form().name
                    on:input=move |ev| ctx.dispatch(Action::SetAddName(event_target_value(&ev)))
                />
                <button type="submit" class="btn primary">"Add"</button>
            </form>
            {move || form().error.map(|e| view! { <p class="form-error">{e}</p> })}
        </Modal>
    }
}
