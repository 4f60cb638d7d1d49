use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use odyssey_shared::ClientError;
use odyssey_shared::validation::check_new_account;

use crate::api::use_api;
use crate::auth::use_auth;
use crate::components::form_alert::FormAlert;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

const EMAIL_IN_USE_MESSAGE: &str = "This email address is already in use. Please try a different email address or log in using this email address.";

#[component]
pub fn CreateAccountPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let api = use_api();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let (email, password) = (email.get(), password.get());
        if let Err(e) = check_new_account(&email, &password, &confirm.get()) {
            set_error_msg.set(Some(e.user_message()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let api = api.clone();
        spawn_local(async move {
            match auth.store.register(&api, &email, &password).await {
                Ok(token) => {
                    auth.signed_in(&token);
                    router.go(AppRoute::auth_success_redirect());
                }
                Err(ClientError::Conflict(_)) => {
                    set_error_msg.set(Some(EMAIL_IN_USE_MESSAGE.to_string()))
                }
                Err(e) => set_error_msg.set(Some(e.user_message())),
            }
            set_is_submitting.set(false);
        });
    };

    let input = move |id: &'static str,
                      label: &'static str,
                      kind: &'static str,
                      value: ReadSignal<String>,
                      set: WriteSignal<String>| {
        view! {
            <div class="form-control">
                <label class="label" for=id>
                    <span class="label-text">{label}</span>
                </label>
                <input
                    id=id
                    type=kind
                    class="input input-bordered"
                    prop:value=value
                    on:input=move |ev| set.set(event_target_value(&ev))
                />
            </div>
        }
    };

    view! {
        <div class="hero min-h-[70vh] bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <h1 class="text-3xl font-bold">"Create Account"</h1>
                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <FormAlert message=error_msg />
                        {input("email", "Email", "email", email, set_email)}
                        {input("password", "Password", "password", password, set_password)}
                        {input("confirm", "Confirm Password", "password", confirm, set_confirm)}
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Creating..." }.into_any()
                                } else {
                                    "Create Account".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-sm text-center">
                            "Already have an account? "
                            <Link to="/login" class="link link-primary">"Log in"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
