use leptos::prelude::*;

/// 查看模式显示文本，编辑模式显示输入框
#[component]
pub fn TextField(
    #[prop(into)] label: String,
    #[prop(into)] value: Signal<String>,
    #[prop(into)] editing: Signal<bool>,
    #[prop(into)] on_input: Callback<String>,
    #[prop(optional)] multiline: bool,
) -> impl IntoView {
    let heading = label.clone();
    view! {
        <div class="form-control w-full">
            <label class="label">
                <span class="label-text font-semibold">{heading}</span>
            </label>
            {move || {
                if !editing.get() {
                    return view! { <p class="whitespace-pre-line">{value.get()}</p> }.into_any();
                }
                if multiline {
                    view! {
                        <textarea
                            class="textarea textarea-bordered w-full"
                            aria-label=label.clone()
                            prop:value=move || value.get()
                            on:input=move |ev| on_input.run(event_target_value(&ev))
                        ></textarea>
                    }
                    .into_any()
                } else {
                    view! {
                        <input
                            type="text"
                            class="input input-bordered w-full"
                            aria-label=label.clone()
                            prop:value=move || value.get()
                            on:input=move |ev| on_input.run(event_target_value(&ev))
                        />
                    }
                    .into_any()
                }
            }}
        </div>
    }
}
