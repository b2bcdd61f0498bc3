//! Search Bar Component
//!
//! Free-text filter over item names. Every keystroke updates the query.

use leptos::prelude::*;

use crate::context::use_app_context;
use crate::store::{Action, PantryStateStoreFields};

#[component]
pub fn SearchBar() -> impl IntoView {
    let ctx = use_app_context();

    view! {
        <input
            id="search-field"
            class="search-field"
            type="search"
            placeholder="Search Items"
            aria-label="Search Items"
            prop:value=move || ctx.store.query().get()
            on:input=move |ev| ctx.dispatch(Action::SetQuery(event_target_value(&ev)))
        />
    }
}
