//! Notice Banner Component
//!
//! Shows the current notice. Each notice dismisses itself after a delay.

use std::time::Duration;

use gloo_timers::future::sleep;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::use_app_context;
use crate::store::{Action, NoticeKind, PantryStateStoreFields};

const AUTO_DISMISS: Duration = Duration::from_secs(6);

#[component]
pub fn NoticeBanner() -> impl IntoView {
    let ctx = use_app_context();
    let notice = move || ctx.store.notice().get();

    // Start a timer whenever a new notice appears
    Effect::new(move |_| {
        if let Some(id) = ctx.store.notice().with(|n| n.as_ref().map(|n| n.id)) {
            spawn_local(async move {
                sleep(AUTO_DISMISS).await;
                ctx.dispatch(Action::DismissNotice(id));
            });
        }
    });

    view! {
        {move || notice().map(|n| {
            let class = match n.kind {
                NoticeKind::Info => "notice info",
                NoticeKind::Error => "notice error",
            };
            let id = n.id;
            view! {
                <div class=class role="status">
                    <span class="notice-text">{n.text}</span>
                    <button class="notice-close" on:click=move |_| ctx.dispatch(Action::DismissNotice(id))>
                        "×"
                    </button>
                </div>
            }
        })}
    }
}
