//! Modal Component
//!
//! Centered dialog over a backdrop. Closes on backdrop click or Escape.

use leptos::ev;
use leptos::prelude::*;

#[component]
pub fn Modal(
    open: Signal<bool>,
    #[prop(into)] on_close: Callback<()>,
    #[prop(into)] title: String,
    children: ChildrenFn,
) -> impl IntoView {
    let handle = window_event_listener(ev::keydown, move |ev| {
        if ev.key() == "Escape" && open.get_untracked() {
            on_close.run(());
        }
    });
    on_cleanup(move || handle.remove());

    view! {
        <Show when=move || open.get()>
            <div class="modal-backdrop" on:click=move |_| on_close.run(())>
                <div class="modal" role="dialog" on:click=|ev| ev.stop_propagation()>
                    <h2 class="modal-title">{title.clone()}</h2>
                    {children()}
                </div>
            </div>
        </Show>
    }
}
