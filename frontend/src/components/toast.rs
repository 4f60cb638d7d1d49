//! 通知提示框，3 秒后自动关闭

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

use crate::state::Notification;

const DISMISS_AFTER_MS: u32 = 3_000;

#[component]
pub fn Toast(
    #[prop(into)] notification: Signal<Option<Notification>>,
    #[prop(into)] on_dismiss: Callback<()>,
) -> impl IntoView {
    Effect::new(move |_| {
        if notification.get().is_some() {
            Timeout::new(DISMISS_AFTER_MS, move || on_dismiss.run(())).forget();
        }
    });

    move || {
        notification.get().map(|note| {
            let class = if note.is_error {
                "alert alert-error shadow-lg"
            } else {
                "alert alert-success shadow-lg"
            };
            view! {
                <div class="toast toast-top toast-end z-50">
                    <div class=class role="alert">
                        <span>{note.message}</span>
                    </div>
                </div>
            }
        })
    }
}
