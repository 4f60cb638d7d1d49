//! 冒险详情页：查看、编辑、推进进度

use leptos::prelude::*;
use leptos::task::spawn_local;
use odyssey_shared::Adventure;
use tracing::info;

use crate::api::{BrowserApi, use_api};
use crate::auth::{AuthContext, use_auth};
use crate::components::adventure_view::AdventureView;
use crate::components::delete_confirm::DeleteConfirm;
use crate::components::spinner::Spinner;
use crate::components::toast::Toast;
use crate::state::{
    AdventureEditState, ClimaxStore, DeleteFlow, DeleteTarget, Notification, ProgressStep,
    execute_plan, load_adventure, submit_progress,
};
use crate::web::route::AppRoute;
use crate::web::router::use_router;

const CANNOT_DELETE_MESSAGE: &str = "Only items that have not been started can be deleted.";

/// 进度推进的 UI 入口：本地推进后异步提交，完成时确认或回滚
pub(crate) fn progress_handler(
    state: RwSignal<AdventureEditState>,
    api: BrowserApi,
    auth: AuthContext,
) -> Callback<ProgressStep> {
    Callback::new(move |step: ProgressStep| {
        let mut update = None;
        state.update(|s| update = s.begin_progress(step));
        let Some(update) = update else {
            return;
        };
        let api = api.clone();
        spawn_local(async move {
            let result = submit_progress(&api, &<ClimaxStore>::default(), update).await;
            if let Err(e) = &result {
                auth.check_error(e);
            }
            state.update(|s| s.finish_progress(result));
        });
    })
}

/// 删除请求的 UI 入口：已开始的场景或遭遇不能删除
pub(crate) fn delete_request_handler(
    state: RwSignal<AdventureEditState>,
    flow: RwSignal<DeleteFlow>,
) -> Callback<DeleteTarget> {
    Callback::new(move |target: DeleteTarget| {
        let allowed = state.with_untracked(|s| {
            let mut allowed = false;
            flow.update(|f| allowed = f.request(target, s.editor()));
            allowed
        });
        if !allowed {
            state.update(|s| s.notify(Notification::error(CANNOT_DELETE_MESSAGE)));
        }
    })
}

#[component]
pub fn AdventureDetailsPage(id: u64) -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let router = use_router();

    let state = RwSignal::new(AdventureEditState::new(Adventure::default()));
    let loaded = RwSignal::new(false);
    let load_error = RwSignal::new(Option::<String>::None);
    let delete_flow = RwSignal::new(DeleteFlow::new());

    {
        let api = api.clone();
        spawn_local(async move {
            match load_adventure(&api, &<ClimaxStore>::default(), id).await {
                Ok(adventure) => {
                    state.set(AdventureEditState::new(adventure));
                    loaded.set(true);
                }
                Err(e) => {
                    if !auth.check_error(&e) {
                        load_error.set(Some(e.user_message()));
                    }
                }
            }
        });
    }

    let editing = move || state.with(|s| s.is_editing());
    let busy = move || state.with(|s| s.is_loading());

    let on_edit = move |_| {
        state.update(|s| {
            s.begin_edit();
        })
    };
    let on_cancel = move |_| state.update(|s| s.cancel_edit());

    let on_save = {
        let api = api.clone();
        Callback::new(move |()| {
            let mut plan = None;
            state.update(|s| plan = s.begin_save());
            let Some(plan) = plan else {
                return;
            };
            let api = api.clone();
            spawn_local(async move {
                let report = execute_plan(&api, &<ClimaxStore>::default(), plan).await;
                if let Err(e) = &report.result {
                    auth.check_error(e);
                }
                state.update(|s| s.finish_save(report));
            });
        })
    };

    let on_progress = progress_handler(state, api.clone(), auth);
    let on_delete = delete_request_handler(state, delete_flow);

    let on_delete_adventure = move |_| delete_flow.update(|f| f.request_adventure(id));

    let on_confirm = Callback::new(move |()| {
        let mut target = None;
        delete_flow.update(|f| target = f.confirm());
        match target {
            Some(DeleteTarget::Adventure { id }) => {
                let api = api.clone();
                spawn_local(async move {
                    match api.delete_adventure(id).await {
                        Ok(()) => {
                            info!(adventure = id, "adventure deleted");
                            <ClimaxStore>::default().forget(id);
                            router.go(AppRoute::Adventures);
                        }
                        Err(e) => {
                            if !auth.check_error(&e) {
                                state.update(|s| {
                                    s.notify(Notification::error(e.user_message()))
                                });
                            }
                        }
                    }
                });
            }
            Some(target) => {
                state.update(|s| {
                    s.apply_delete(target);
                });
            }
            None => {}
        }
    });

    let notification = Signal::derive(move || state.with(|s| s.notification().cloned()));

    view! {
        <div class="container mx-auto max-w-4xl p-6 flex flex-col gap-6">
            <Show
                when=move || loaded.get()
                fallback=move || match load_error.get() {
                    Some(message) => view! {
                        <div role="alert" class="alert alert-error">
                            <span>{message}</span>
                        </div>
                    }
                    .into_any(),
                    None => view! { <Spinner label="Loading adventure..." /> }.into_any(),
                }
            >
                <div class="flex flex-wrap items-center justify-end gap-2">
                    <Show
                        when=editing
                        fallback=move || view! {
                            <button class="btn btn-primary" disabled=busy on:click=on_edit>"Edit"</button>
                            <button class="btn btn-error btn-outline" disabled=busy on:click=on_delete_adventure>
                                "Delete Adventure"
                            </button>
                        }
                    >
                        <button class="btn" disabled=busy on:click=on_cancel>"Cancel"</button>
                        <button class="btn btn-primary" disabled=busy on:click=move |_| on_save.run(())>
                            {move || if busy() {
                                view! { <span class="loading loading-spinner"></span> "Saving..." }.into_any()
                            } else {
                                "Save".into_any()
                            }}
                        </button>
                    </Show>
                </div>
                <AdventureView state=state on_delete=on_delete on_progress=on_progress />
            </Show>
            <DeleteConfirm flow=delete_flow on_confirm=on_confirm />
            <Toast
                notification=notification
                on_dismiss=move |()| state.update(|s| s.clear_notification())
            />
        </div>
    }
}
