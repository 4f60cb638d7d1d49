use leptos::prelude::*;

/// 表单顶部的提示条，`message` 为 `None` 时不显示
#[component]
pub fn FormAlert(
    #[prop(into)] message: Signal<Option<String>>,
    #[prop(optional)] success: bool,
) -> impl IntoView {
    let class = if success {
        "alert alert-success text-sm py-2"
    } else {
        "alert alert-error text-sm py-2"
    };
    view! {
        <Show when=move || message.with(|m| m.is_some())>
            <div role="alert" class=class>
                <span>{move || message.get().unwrap_or_default()}</span>
            </div>
        </Show>
    }
}
