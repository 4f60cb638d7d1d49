//! 冒险列表页

use leptos::prelude::*;
use leptos::task::spawn_local;
use odyssey_shared::Adventure;
use tracing::info;

use crate::api::use_api;
use crate::auth::use_auth;
use crate::components::delete_confirm::DeleteConfirm;
use crate::components::spinner::Spinner;
use crate::components::toast::Toast;
use crate::state::{ClimaxStore, DeleteFlow, DeleteTarget, Notification};
use crate::web::route::AppRoute;
use crate::web::router::Link;

#[component]
fn AdventureCard(adventure: Adventure, on_delete: Callback<u64>) -> impl IntoView {
    let id = adventure.id.unwrap_or_default();
    let link = AppRoute::AdventureDetail { id }.to_path();
    let setting = adventure.campaign_setting.clone().unwrap_or_default();
    let modified = adventure
        .last_modified
        .map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_default();
    let progress = adventure.progress;

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <h2 class="card-title">
                    <Link to=link class="link link-hover">{adventure.title}</Link>
                </h2>
                <p class="text-sm text-base-content/70">{adventure.game} " · " {setting}</p>
                <div class="flex items-center gap-2">
                    <progress class="progress progress-primary w-full" max="100" value=progress.to_string()></progress>
                    <span class="font-mono text-sm">{format!("{:.0}%", progress)}</span>
                </div>
                <div class="card-actions justify-between items-center">
                    <span class="text-xs text-base-content/60">{modified}</span>
                    <button class="btn btn-sm btn-error btn-outline" on:click=move |_| on_delete.run(id)>
                        "Delete"
                    </button>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn MyAdventuresPage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();

    let adventures = RwSignal::new(Vec::<Adventure>::new());
    let loading = RwSignal::new(true);
    let notification = RwSignal::new(Option::<Notification>::None);
    let delete_flow = RwSignal::new(DeleteFlow::new());

    if let Some(user_id) = auth.user_id.get_untracked() {
        let api = api.clone();
        spawn_local(async move {
            match api.list_adventures(user_id).await {
                Ok(list) => adventures.set(list),
                Err(e) => {
                    if !auth.check_error(&e) {
                        notification.set(Some(Notification::error(e.user_message())));
                    }
                }
            }
            loading.set(false);
        });
    } else {
        loading.set(false);
    }

    let on_delete = Callback::new(move |id: u64| delete_flow.update(|f| f.request_adventure(id)));

    let on_confirm = Callback::new(move |()| {
        let mut target = None;
        delete_flow.update(|f| target = f.confirm());
        let Some(DeleteTarget::Adventure { id }) = target else {
            return;
        };
        let api = api.clone();
        spawn_local(async move {
            match api.delete_adventure(id).await {
                Ok(()) => {
                    info!(adventure = id, "adventure deleted");
                    <ClimaxStore>::default().forget(id);
                    adventures.update(|list| list.retain(|a| a.id != Some(id)));
                    notification.set(Some(Notification::success("Adventure deleted.")));
                }
                Err(e) => {
                    if !auth.check_error(&e) {
                        notification.set(Some(Notification::error(e.user_message())));
                    }
                }
            }
        });
    });

    view! {
        <div class="container mx-auto p-6 flex flex-col gap-6">
            <div class="flex items-center justify-between">
                <h1 class="text-3xl font-bold">"My Adventures"</h1>
                <Link to="/adventures/new" class="btn btn-primary">"New Adventure"</Link>
            </div>
            <Show when=move || !loading.get() fallback=|| view! { <Spinner /> }>
                <Show
                    when=move || adventures.with(|list| !list.is_empty())
                    fallback=|| view! {
                        <p class="text-base-content/70">"You have no adventures yet. Generate one to get started."</p>
                    }
                >
                    <div class="grid gap-6 md:grid-cols-2 lg:grid-cols-3">
                        <For
                            each=move || adventures.get()
                            key=|a| a.id
                            children=move |adventure| view! {
                                <AdventureCard adventure=adventure on_delete=on_delete />
                            }
                        />
                    </div>
                </Show>
            </Show>
            <DeleteConfirm flow=delete_flow on_confirm=on_confirm />
            <Toast notification=notification on_dismiss=move |()| notification.set(None) />
        </div>
    }
}
