//! 忘记密码：请求重置邮件，以及通过邮件链接设置新密码

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use odyssey_shared::protocol::PasswordResetConfirmRequest;
use odyssey_shared::validation::{check_password_reset, validate_email, INVALID_EMAIL_MESSAGE};

use crate::api::use_api;
use crate::components::form_alert::FormAlert;
use crate::web::router::Link;

// 无论邮箱是否存在都显示同一条消息
const RESET_SENT_MESSAGE: &str =
    "If an account exists for that email, you will receive a link to reset your password.";
const RESET_DONE_MESSAGE: &str = "Your password has been reset. You can now log in.";

#[component]
pub fn PasswordResetPage() -> impl IntoView {
    let api = use_api();

    let (email, set_email) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (notice, set_notice) = signal(Option::<String>::None);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let email = email.get();
        if !validate_email(&email) {
            set_error_msg.set(Some(INVALID_EMAIL_MESSAGE.to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let api = api.clone();
        spawn_local(async move {
            match api.password_reset(&email).await {
                Ok(_) => set_notice.set(Some(RESET_SENT_MESSAGE.to_string())),
                Err(e) => set_error_msg.set(Some(e.user_message())),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-[70vh] bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <h1 class="text-3xl font-bold">"Reset Password"</h1>
                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <FormAlert message=error_msg />
                        <FormAlert message=notice success=true />
                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                class="input input-bordered"
                                prop:value=email
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                "Send Reset Link"
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn PasswordResetConfirmPage(uidb64: String, token: String) -> impl IntoView {
    let api = use_api();

    let (password, set_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (done, set_done) = signal(false);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let password = password.get();
        if let Err(e) = check_password_reset(&password, &confirm.get()) {
            set_error_msg.set(Some(e.user_message()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let api = api.clone();
        let request = PasswordResetConfirmRequest {
            uidb64: uidb64.clone(),
            token: token.clone(),
            password,
        };
        spawn_local(async move {
            match api.password_reset_confirm(&request).await {
                Ok(_) => set_done.set(true),
                Err(e) => set_error_msg.set(Some(e.user_message())),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-[70vh] bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <h1 class="text-3xl font-bold">"Choose a New Password"</h1>
                <Show
                    when=move || !done.get()
                    fallback=|| view! {
                        <div class="card w-full shadow-2xl bg-base-100">
                            <div class="card-body gap-4">
                                <p>{RESET_DONE_MESSAGE}</p>
                                <Link to="/login" class="btn btn-primary">"Log In"</Link>
                            </div>
                        </div>
                    }
                >
                    <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                        <form class="card-body" on:submit=on_submit.clone()>
                            <FormAlert message=error_msg />
                            <div class="form-control">
                                <label class="label" for="password">
                                    <span class="label-text">"New Password"</span>
                                </label>
                                <input
                                    id="password"
                                    type="password"
                                    class="input input-bordered"
                                    prop:value=password
                                    on:input=move |ev| set_password.set(event_target_value(&ev))
                                />
                            </div>
                            <div class="form-control">
                                <label class="label" for="confirm">
                                    <span class="label-text">"Confirm Password"</span>
                                </label>
                                <input
                                    id="confirm"
                                    type="password"
                                    class="input input-bordered"
                                    prop:value=confirm
                                    on:input=move |ev| set_confirm.set(event_target_value(&ev))
                                />
                            </div>
                            <div class="form-control mt-6">
                                <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                    "Reset Password"
                                </button>
                            </div>
                        </form>
                    </div>
                </Show>
            </div>
        </div>
    }
}
