//! 新建冒险：填写生成参数，预览生成结果，命名后保存

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use odyssey_shared::Adventure;
use odyssey_shared::catalog::GAMES;
use tracing::info;

use super::adventure_details::{delete_request_handler, progress_handler};
use crate::api::use_api;
use crate::auth::use_auth;
use crate::components::adventure_view::AdventureView;
use crate::components::delete_confirm::DeleteConfirm;
use crate::components::form_alert::FormAlert;
use crate::components::spinner::Spinner;
use crate::components::toast::Toast;
use crate::state::{AdventureEditState, ClimaxStore, DeleteFlow, GenerateForm, execute_plan};
use crate::web::route::AppRoute;
use crate::web::router::use_router;

#[component]
fn NumberInput(
    id: &'static str,
    label: &'static str,
    value: RwSignal<u32>,
    range: (u32, u32),
) -> impl IntoView {
    view! {
        <div class="form-control">
            <label class="label" for=id>
                <span class="label-text">{label}</span>
            </label>
            <input
                id=id
                type="number"
                class="input input-bordered"
                min=range.0.to_string()
                max=range.1.to_string()
                prop:value=move || value.get().to_string()
                on:input=move |ev| value.set(event_target_value(&ev).parse().unwrap_or(0))
            />
        </div>
    }
}

#[component]
fn GenerateFormView(form: GenerateForm, on_submit: Callback<()>, busy: Signal<bool>) -> impl IntoView {
    use crate::state::generate_form::{ENCOUNTERS_RANGE, PERCENT_RANGE, PLAYERS_RANGE, SCENES_RANGE};

    let uses_levels = move || form.advancement().is_some_and(|a| a.uses_levels());
    let uses_points = move || form.advancement().is_some_and(|a| a.uses_points());
    let has_settings = move || !form.settings().is_empty();

    view! {
        <form
            class="card-body"
            on:submit=move |ev: SubmitEvent| {
                ev.prevent_default();
                on_submit.run(());
            }
        >
            <div class="form-control">
                <label class="label" for="game">
                    <span class="label-text">"Game"</span>
                </label>
                <select
                    id="game"
                    class="select select-bordered"
                    prop:value=move || form.game.get()
                    on:change=move |ev| form.select_game(event_target_value(&ev))
                >
                    <option value="" disabled=true>"Choose a game"</option>
                    {GAMES
                        .iter()
                        .map(|entry| view! { <option value=entry.name>{entry.name}</option> })
                        .collect_view()}
                </select>
            </div>
            <Show when=move || form.is_custom()>
                <div class="form-control">
                    <label class="label" for="game-title">
                        <span class="label-text">"Game Title"</span>
                    </label>
                    <input
                        id="game-title"
                        type="text"
                        class="input input-bordered"
                        prop:value=move || form.custom_game.get()
                        on:input=move |ev| form.custom_game.set(event_target_value(&ev))
                    />
                </div>
                <div class="form-control">
                    <label class="label" for="homebrew-description">
                        <span class="label-text">"Describe the game"</span>
                    </label>
                    <textarea
                        id="homebrew-description"
                        class="textarea textarea-bordered"
                        prop:value=move || form.homebrew_description.get()
                        on:input=move |ev| form.homebrew_description.set(event_target_value(&ev))
                    ></textarea>
                </div>
            </Show>
            <div class="form-control">
                <label class="label" for="campaign-setting">
                    <span class="label-text">"Campaign Setting (optional)"</span>
                </label>
                <input
                    id="campaign-setting"
                    type="text"
                    class="input input-bordered"
                    list="campaign-settings"
                    prop:value=move || form.campaign_setting.get()
                    on:input=move |ev| form.campaign_setting.set(event_target_value(&ev))
                />
                <Show when=has_settings>
                    <datalist id="campaign-settings">
                        {move || {
                            form.settings()
                                .iter()
                                .map(|name| view! { <option value=name.to_string()></option> })
                                .collect_view()
                        }}
                    </datalist>
                </Show>
            </div>
            <div class="grid grid-cols-2 gap-3">
                <NumberInput id="players" label="Players" value=form.players range=PLAYERS_RANGE />
                <NumberInput id="scenes" label="Scenes" value=form.scenes range=SCENES_RANGE />
                <NumberInput
                    id="encounters"
                    label="Max Encounters per Scene"
                    value=form.encounters
                    range=ENCOUNTERS_RANGE
                />
                <NumberInput id="plot-twists" label="Plot Twists (%)" value=form.plot_twists range=PERCENT_RANGE />
                <NumberInput id="clues" label="Clues (%)" value=form.clues range=PERCENT_RANGE />
                <Show when=uses_levels>
                    <div class="form-control">
                        <label class="label" for="level">
                            <span class="label-text">"Level (optional)"</span>
                        </label>
                        <input
                            id="level"
                            type="number"
                            class="input input-bordered"
                            prop:value=move || form.level.get()
                            on:input=move |ev| form.level.set(event_target_value(&ev))
                        />
                    </div>
                </Show>
                <Show when=uses_points>
                    <div class="form-control">
                        <label class="label" for="experience">
                            <span class="label-text">"Experience Points (optional)"</span>
                        </label>
                        <input
                            id="experience"
                            type="number"
                            class="input input-bordered"
                            prop:value=move || form.experience.get()
                            on:input=move |ev| form.experience.set(event_target_value(&ev))
                        />
                    </div>
                </Show>
            </div>
            <div class="form-control">
                <label class="label" for="context">
                    <span class="label-text">"Additional Context (optional)"</span>
                </label>
                <textarea
                    id="context"
                    class="textarea textarea-bordered"
                    prop:value=move || form.context.get()
                    on:input=move |ev| form.context.set(event_target_value(&ev))
                ></textarea>
            </div>
            <div class="form-control mt-6">
                <button class="btn btn-primary" disabled=move || busy.get()>
                    "Generate Adventure"
                </button>
            </div>
        </form>
    }
}

#[component]
pub fn NewAdventurePage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let router = use_router();

    let form = GenerateForm::new();
    let generating = RwSignal::new(false);
    let error_msg = RwSignal::new(Option::<String>::None);

    let state = RwSignal::new(AdventureEditState::draft(Adventure::default()));
    let generated = RwSignal::new(false);
    let delete_flow = RwSignal::new(DeleteFlow::new());

    let on_generate = {
        let api = api.clone();
        Callback::new(move |()| {
            let request = match form.to_request() {
                Ok(request) => request,
                Err(e) => {
                    error_msg.set(Some(e.user_message()));
                    return;
                }
            };
            error_msg.set(None);
            generating.set(true);

            let api = api.clone();
            spawn_local(async move {
                match api.generate_adventure(&request).await {
                    Ok(result) => {
                        let adventure = result.into_adventure(
                            String::new(),
                            request.game.clone(),
                            request.campaign_setting.clone(),
                            auth.user_id.get_untracked(),
                        );
                        info!(scenes = adventure.scene_set.len(), "adventure generated");
                        state.set(AdventureEditState::draft(adventure));
                        generated.set(true);
                    }
                    Err(e) => {
                        if !auth.check_error(&e) {
                            error_msg.set(Some(e.user_message()));
                        }
                    }
                }
                generating.set(false);
            });
        })
    };

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
                let saved_id = report.result.as_ref().ok().and_then(|a| a.id);
                if let Err(e) = &report.result {
                    auth.check_error(e);
                }
                state.update(|s| s.finish_save(report));
                if let Some(id) = saved_id {
                    router.go(AppRoute::AdventureDetail { id });
                }
            });
        })
    };

    let on_discard = move |_| {
        generated.set(false);
        form.reset();
        state.set(AdventureEditState::draft(Adventure::default()));
    };

    let on_progress = progress_handler(state, api, auth);
    let on_delete = delete_request_handler(state, delete_flow);
    let on_confirm = Callback::new(move |()| {
        let mut target = None;
        delete_flow.update(|f| target = f.confirm());
        if let Some(target) = target {
            state.update(|s| {
                s.apply_delete(target);
            });
        }
    });

    let busy = Signal::derive(move || generating.get() || state.with(|s| s.is_loading()));
    let notification = Signal::derive(move || state.with(|s| s.notification().cloned()));

    view! {
        <div class="container mx-auto max-w-4xl p-6 flex flex-col gap-6">
            <h1 class="text-3xl font-bold">"New Adventure"</h1>
            <Show
                when=move || generated.get()
                fallback=move || view! {
                    <div class="card shadow-2xl bg-base-100">
                        <FormAlert message=error_msg />
                        <Show
                            when=move || !generating.get()
                            fallback=|| view! { <Spinner label="Generating your adventure..." /> }
                        >
                            <GenerateFormView form=form on_submit=on_generate busy=busy />
                        </Show>
                    </div>
                }
            >
                <div class="flex flex-wrap items-center justify-end gap-2">
                    <button class="btn" disabled=move || busy.get() on:click=on_discard>"Discard"</button>
                    <button class="btn btn-primary" disabled=move || busy.get() on:click=move |_| on_save.run(())>
                        "Save Adventure"
                    </button>
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
