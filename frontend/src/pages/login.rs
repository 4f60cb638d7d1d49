use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use odyssey_shared::validation::check_login;

use crate::api::use_api;
use crate::auth::use_auth;
use crate::components::form_alert::FormAlert;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

const LOGIN_FAILED_MESSAGE: &str = "Invalid email or password";

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let api = use_api();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let (email, password) = (email.get(), password.get());
        if let Err(e) = check_login(&email, &password) {
            set_error_msg.set(Some(e.user_message()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let api = api.clone();
        spawn_local(async move {
            match auth.store.login(&api, &email, &password).await {
                Some(token) => {
                    auth.signed_in(&token);
                    router.go(AppRoute::auth_success_redirect());
                }
                None => set_error_msg.set(Some(LOGIN_FAILED_MESSAGE.to_string())),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-[70vh] bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <h1 class="text-3xl font-bold">"Log In"</h1>
                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <FormAlert message=error_msg />
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
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                class="input input-bordered"
                                prop:value=password
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                            />
                            <label class="label">
                                <Link to="/password/reset" class="label-text-alt link link-hover">
                                    "Forgot Password?"
                                </Link>
                            </label>
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Logging in..." }.into_any()
                                } else {
                                    "Log In".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-sm text-center">
                            "New here? "
                            <Link to="/create-account" class="link link-primary">"Create an account"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
