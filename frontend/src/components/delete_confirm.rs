use leptos::prelude::*;

use crate::state::DeleteFlow;

/// 删除确认框，`flow` 中有待删除对象时显示
#[component]
pub fn DeleteConfirm(
    flow: RwSignal<DeleteFlow>,
    #[prop(into)] on_confirm: Callback<()>,
) -> impl IntoView {
    let label = move || flow.with(|f| f.pending().map(|t| t.label()).unwrap_or_default());

    view! {
        <Show when=move || flow.with(|f| f.is_open())>
            <div class="modal modal-open">
                <div class="modal-box">
                    <h3 class="font-bold text-lg">"Are you sure?"</h3>
                    <p class="py-4">
                        "Deleting this " {label} " cannot be undone."
                    </p>
                    <div class="modal-action">
                        <button class="btn" on:click=move |_| flow.update(|f| f.cancel())>
                            "Cancel"
                        </button>
                        <button class="btn btn-error" on:click=move |_| on_confirm.run(())>
                            "Delete"
                        </button>
                    </div>
                </div>
            </div>
        </Show>
    }
}
