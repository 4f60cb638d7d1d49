//! 场景面板
//!
//! 显示单个场景的文本、进度与遭遇列表。编辑模式下提供
//! "+ Before" / "+ After" 插入、删除以及新增遭遇。

use leptos::prelude::*;
use odyssey_shared::editor::SceneField;
use odyssey_shared::{Scene, TextPath};

use super::encounter_panel::EncounterPanel;
use super::progress_controls::ProgressControls;
use super::text_field::TextField;
use crate::state::{AdventureEditState, DeleteTarget, ProgressStep};

#[component]
pub fn ScenePanel(
    state: RwSignal<AdventureEditState>,
    index: usize,
    #[prop(into)] on_delete: Callback<DeleteTarget>,
    #[prop(into)] on_progress: Callback<ProgressStep>,
) -> impl IntoView {
    let read = move |f: fn(&Scene) -> String| {
        Signal::derive(move || state.with(|s| s.editor().scene(index).map(f).unwrap_or_default()))
    };
    let write = move |field: SceneField| {
        Callback::new(move |value: String| {
            state.update(|s| {
                s.edit(|e| e.update_text(TextPath::Scene { scene: index, field }, value));
            })
        })
    };

    let editing = Signal::derive(move || state.with(|s| s.is_editing()));
    let sequence = move || state.with(|s| s.editor().scene(index).map(|sc| sc.sequence));
    let progress = Signal::derive(move || {
        state.with(|s| s.editor().scene(index).map(|sc| sc.progress).unwrap_or_default())
    });
    let can_advance = Signal::derive(move || {
        state.with(|s| !s.is_editing() && !s.is_loading() && s.editor().can_advance_scene(index))
    });
    let can_delete = move || state.with(|s| s.is_editing() && s.editor().can_delete_scene(index));
    let encounter_count = move || {
        state.with(|s| {
            s.editor()
                .scene(index)
                .map(|sc| sc.encounter_set.len())
                .unwrap_or_default()
        })
    };

    let insert_before = move |_| {
        state.update(|s| {
            s.edit(|e| e.insert_scene_before(index));
        })
    };
    let insert_after = move |_| {
        state.update(|s| {
            s.edit(|e| e.insert_scene_after(index));
        })
    };
    let add_encounter = move |_| {
        state.update(|s| {
            let position = s
                .editor()
                .scene(index)
                .map(|sc| sc.encounter_set.len())
                .unwrap_or_default();
            s.edit(|e| e.insert_encounter(index, position));
        })
    };

    view! {
        <section class="card bg-base-100 shadow-xl">
            <div class="card-body gap-3">
                <div class="flex flex-wrap items-center justify-between gap-2">
                    <h3 class="card-title">"Scene " {sequence}</h3>
                    <ProgressControls
                        progress=progress
                        enabled=can_advance
                        start=ProgressStep::StartScene(index)
                        complete=ProgressStep::CompleteScene(index)
                        on_progress=on_progress
                    />
                </div>

                <Show when=move || editing.get()>
                    <div class="flex gap-2">
                        <button class="btn btn-sm btn-outline" on:click=insert_before>"+ Before"</button>
                        <button class="btn btn-sm btn-outline" on:click=insert_after>"+ After"</button>
                        <button
                            class="btn btn-sm btn-outline btn-error ml-auto"
                            disabled=move || !can_delete()
                            on:click=move |_| on_delete.run(DeleteTarget::Scene { index })
                        >
                            "Delete Scene"
                        </button>
                    </div>
                </Show>

                <TextField
                    label="Challenge"
                    value=read(|s| s.challenge.clone())
                    editing=editing
                    on_input=write(SceneField::Challenge)
                    multiline=true
                />
                <TextField
                    label="Setting"
                    value=read(|s| s.setting.clone())
                    editing=editing
                    on_input=write(SceneField::Setting)
                    multiline=true
                />
                <TextField
                    label="Plot Twist"
                    value=read(|s| s.plot_twist.clone().unwrap_or_default())
                    editing=editing
                    on_input=write(SceneField::PlotTwist)
                    multiline=true
                />
                <TextField
                    label="Clue"
                    value=read(|s| s.clue.clone().unwrap_or_default())
                    editing=editing
                    on_input=write(SceneField::Clue)
                    multiline=true
                />

                <div class="flex flex-col gap-3">
                    {move || {
                        (0..encounter_count())
                            .map(|position| view! {
                                <EncounterPanel
                                    state=state
                                    scene=index
                                    position=position
                                    on_delete=on_delete
                                    on_progress=on_progress
                                />
                            })
                            .collect_view()
                    }}
                </div>

                <Show when=move || editing.get()>
                    <button class="btn btn-sm btn-ghost self-start" on:click=add_encounter>
                        "+ Encounter"
                    </button>
                </Show>
            </div>
        </section>
    }
}
