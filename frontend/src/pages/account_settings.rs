use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use odyssey_shared::protocol::UpdateUserRequest;
use odyssey_shared::validation::check_account_update;

use crate::api::use_api;
use crate::auth::use_auth;
use crate::components::form_alert::FormAlert;

const ACCOUNT_SAVED_MESSAGE: &str = "Your account has been updated.";

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

#[component]
pub fn AccountSettingsPage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();

    let (current_email, set_current_email) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (notice, set_notice) = signal(Option::<String>::None);

    // 载入当前邮箱
    if let Some(user_id) = auth.user_id.get_untracked() {
        let api = api.clone();
        spawn_local(async move {
            match api.get_user(user_id).await {
                Ok(user) => set_current_email.set(user.email),
                Err(e) => {
                    if !auth.check_error(&e) {
                        set_error_msg.set(Some(e.user_message()));
                    }
                }
            }
        });
    }

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let Some(user_id) = auth.user_id.get_untracked() else {
            return;
        };
        let (new_email, new_password) = (email.get(), password.get());
        if let Err(e) = check_account_update(&new_email, &new_password, &confirm.get()) {
            set_error_msg.set(Some(e.user_message()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);
        set_notice.set(None);

        let api = api.clone();
        let request = UpdateUserRequest {
            user_id,
            email: non_empty(new_email),
            password: non_empty(new_password),
        };
        spawn_local(async move {
            match api.update_user(&request).await {
                Ok(user) => {
                    set_current_email.set(user.email);
                    set_email.set(String::new());
                    set_password.set(String::new());
                    set_confirm.set(String::new());
                    set_notice.set(Some(ACCOUNT_SAVED_MESSAGE.to_string()));
                }
                Err(e) => {
                    if !auth.check_error(&e) {
                        set_error_msg.set(Some(e.user_message()));
                    }
                }
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
        <div class="container mx-auto max-w-lg p-6 flex flex-col gap-4">
            <h1 class="text-3xl font-bold">"Account Settings"</h1>
            <p class="text-base-content/70">
                "Signed in as " <span class="font-semibold">{current_email}</span>
            </p>
            <div class="card shadow-2xl bg-base-100">
                <form class="card-body" on:submit=on_submit>
                    <FormAlert message=error_msg />
                    <FormAlert message=notice success=true />
                    <p class="text-sm">"Leave a field blank to keep its current value."</p>
                    {input("email", "New Email", "email", email, set_email)}
                    {input("password", "New Password", "password", password, set_password)}
                    {input("confirm", "Confirm New Password", "password", confirm, set_confirm)}
                    <div class="form-control mt-6">
                        <button class="btn btn-primary" disabled=move || is_submitting.get()>
                            "Save Changes"
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
