use leptos::prelude::*;
use odyssey_shared::editor::EncounterField;
use odyssey_shared::{Encounter, Progress, TextPath};

use super::progress_controls::ProgressControls;
use super::text_field::TextField;
use crate::state::{AdventureEditState, DeleteTarget, ProgressStep};

#[component]
pub fn EncounterPanel(
    state: RwSignal<AdventureEditState>,
    scene: usize,
    position: usize,
    #[prop(into)] on_delete: Callback<DeleteTarget>,
    #[prop(into)] on_progress: Callback<ProgressStep>,
) -> impl IntoView {
    let read = move |f: fn(&Encounter) -> String| {
        Signal::derive(move || {
            state.with(|s| s.editor().encounter(scene, position).map(f).unwrap_or_default())
        })
    };
    let write = move |field: EncounterField| {
        Callback::new(move |value: String| {
            state.update(|s| {
                s.edit(|e| {
                    e.update_text(
                        TextPath::Encounter {
                            scene,
                            encounter: position,
                            field,
                        },
                        value,
                    )
                });
            })
        })
    };

    let editing = Signal::derive(move || state.with(|s| s.is_editing()));
    let progress = Signal::derive(move || {
        state.with(|s| {
            s.editor()
                .encounter(scene, position)
                .map(|e| e.progress)
                .unwrap_or_default()
        })
    });
    let can_advance = Signal::derive(move || {
        state.with(|s| {
            !s.is_editing() && !s.is_loading() && s.editor().can_advance_encounter(scene, position)
        })
    });
    let can_delete = move || {
        state.with(|s| s.is_editing() && s.editor().can_delete_encounter(scene, position))
    };

    view! {
        <div class="card bg-base-200 shadow">
            <div class="card-body gap-2">
                <div class="flex items-center justify-between">
                    <h4 class="card-title text-base">"Encounter " {position + 1}</h4>
                    <ProgressControls
                        progress=progress
                        enabled=can_advance
                        start=ProgressStep::StartEncounter(scene, position)
                        complete=ProgressStep::CompleteEncounter(scene, position)
                        on_progress=on_progress
                    />
                </div>
                <TextField
                    label="Type"
                    value=read(|e| e.encounter_type.clone())
                    editing=editing
                    on_input=write(EncounterField::Type)
                />
                <TextField
                    label="Description"
                    value=read(|e| e.description.clone())
                    editing=editing
                    on_input=write(EncounterField::Description)
                    multiline=true
                />
                <TextField
                    label="Stats"
                    value=read(|e| e.stats.clone().unwrap_or_default())
                    editing=editing
                    on_input=write(EncounterField::Stats)
                    multiline=true
                />
                <Show when=move || editing.get()>
                    <div class="card-actions justify-end">
                        <button
                            class="btn btn-sm btn-outline btn-error"
                            disabled=move || !can_delete()
                            title=move || {
                                if progress.get() == Progress::NotStarted {
                                    "Delete encounter"
                                } else {
                                    "Only encounters that have not started can be deleted"
                                }
                            }
                            on:click=move |_| {
                                on_delete.run(DeleteTarget::Encounter { scene, position })
                            }
                        >
                            "Delete Encounter"
                        </button>
                    </div>
                </Show>
            </div>
        </div>
    }
}
