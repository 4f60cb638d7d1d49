//! 冒险内容树视图
//!
//! 详情页与生成页共用：叙事文本、场景列表、高潮进度与总体进度条。
//! 保存 / 取消等动作由页面提供。

use leptos::prelude::*;
use odyssey_shared::editor::AdventureField;
use odyssey_shared::{Adventure, TextPath};

use super::progress_controls::ProgressControls;
use super::scene_panel::ScenePanel;
use super::text_field::TextField;
use crate::state::{AdventureEditState, DeleteTarget, ProgressStep};

#[component]
pub fn AdventureView(
    state: RwSignal<AdventureEditState>,
    #[prop(into)] on_delete: Callback<DeleteTarget>,
    #[prop(into)] on_progress: Callback<ProgressStep>,
) -> impl IntoView {
    let read = move |f: fn(&Adventure) -> String| {
        Signal::derive(move || state.with(|s| f(s.adventure())))
    };
    let write = move |field: AdventureField| {
        Callback::new(move |value: String| {
            state.update(|s| {
                s.edit(|e| e.update_text(TextPath::Adventure(field), value));
            })
        })
    };

    let editing = Signal::derive(move || state.with(|s| s.is_editing()));
    let progress = move || state.with(|s| s.adventure().progress);
    let scene_count = move || state.with(|s| s.editor().scene_count());
    let has_climax = move || state.with(|s| s.adventure().has_climax());
    let climax_progress = Signal::derive(move || state.with(|s| s.adventure().climax_progress));
    let can_advance_climax = Signal::derive(move || {
        state.with(|s| !s.is_editing() && !s.is_loading() && s.editor().can_advance_climax())
    });

    let add_first_scene = move |_| {
        state.update(|s| {
            s.edit(|e| e.insert_scene(0));
        })
    };

    view! {
        <div class="flex flex-col gap-6">
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body gap-3">
                    <TextField
                        label="Title"
                        value=read(|a| a.title.clone())
                        editing=editing
                        on_input=write(AdventureField::Title)
                    />
                    <div class="grid md:grid-cols-2 gap-3">
                        <TextField
                            label="Game"
                            value=read(|a| a.game.clone())
                            editing=editing
                            on_input=write(AdventureField::Game)
                        />
                        <TextField
                            label="Campaign Setting"
                            value=read(|a| a.campaign_setting.clone().unwrap_or_default())
                            editing=editing
                            on_input=write(AdventureField::CampaignSetting)
                        />
                    </div>
                    <div class="flex items-center gap-3">
                        <progress
                            class="progress progress-primary w-full"
                            max="100"
                            prop:value=progress
                        ></progress>
                        <span class="font-mono">{move || format!("{:.0}%", progress())}</span>
                    </div>
                </div>
            </div>

            <section class="card bg-base-100 shadow-xl">
                <div class="card-body gap-3">
                    <h2 class="card-title">"Exposition"</h2>
                    <TextField
                        label="Exposition"
                        value=read(|a| a.exposition.clone())
                        editing=editing
                        on_input=write(AdventureField::Exposition)
                        multiline=true
                    />
                    <h2 class="card-title">"Incitement"</h2>
                    <TextField
                        label="Incitement"
                        value=read(|a| a.incitement.clone())
                        editing=editing
                        on_input=write(AdventureField::Incitement)
                        multiline=true
                    />
                </div>
            </section>

            <h2 class="text-2xl font-bold">"Rising Action"</h2>
            {move || {
                (0..scene_count())
                    .map(|index| view! {
                        <ScenePanel
                            state=state
                            index=index
                            on_delete=on_delete
                            on_progress=on_progress
                        />
                    })
                    .collect_view()
            }}
            <Show when=move || editing.get() && scene_count() == 0>
                <button class="btn btn-outline self-start" on:click=add_first_scene>
                    "+ Scene"
                </button>
            </Show>

            <section class="card bg-base-100 shadow-xl">
                <div class="card-body gap-3">
                    <div class="flex items-center justify-between">
                        <h2 class="card-title">"Climax"</h2>
                        <Show when=has_climax>
                            <ProgressControls
                                progress=climax_progress
                                enabled=can_advance_climax
                                start=ProgressStep::StartClimax
                                complete=ProgressStep::CompleteClimax
                                on_progress=on_progress
                            />
                        </Show>
                    </div>
                    <TextField
                        label="Climax"
                        value=read(|a| a.climax.clone())
                        editing=editing
                        on_input=write(AdventureField::Climax)
                        multiline=true
                    />
                    <h2 class="card-title">"Denouement"</h2>
                    <TextField
                        label="Denouement"
                        value=read(|a| a.denoument.clone())
                        editing=editing
                        on_input=write(AdventureField::Denouement)
                        multiline=true
                    />
                </div>
            </section>
        </div>
    }
}
