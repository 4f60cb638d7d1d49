use leptos::prelude::*;
use odyssey_shared::Progress;

use crate::state::ProgressStep;

/// 进度徽章与 "Start" / "Complete" 按钮
///
/// 只显示下一步可执行的按钮；`enabled` 为 false 时（前一项未完成、加载中或编辑模式）禁用。
#[component]
pub fn ProgressControls(
    #[prop(into)] progress: Signal<Progress>,
    #[prop(into)] enabled: Signal<bool>,
    start: ProgressStep,
    complete: ProgressStep,
    #[prop(into)] on_progress: Callback<ProgressStep>,
) -> impl IntoView {
    let badge = move || match progress.get() {
        Progress::NotStarted => "badge badge-ghost",
        Progress::InProgress => "badge badge-warning",
        Progress::Complete => "badge badge-success",
    };

    view! {
        <div class="flex items-center gap-2">
            <span class=badge>{move || progress.get().as_str()}</span>
            {move || match progress.get() {
                Progress::NotStarted => Some(view! {
                    <button
                        class="btn btn-sm btn-primary"
                        disabled=move || !enabled.get()
                        on:click=move |_| on_progress.run(start)
                    >
                        "Start"
                    </button>
                }
                .into_any()),
                Progress::InProgress => Some(view! {
                    <button
                        class="btn btn-sm btn-success"
                        disabled=move || !enabled.get()
                        on:click=move |_| on_progress.run(complete)
                    >
                        "Complete"
                    </button>
                }
                .into_any()),
                Progress::Complete => None,
            }}
        </div>
    }
}
