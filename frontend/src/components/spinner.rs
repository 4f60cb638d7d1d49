use leptos::prelude::*;

#[component]
pub fn Spinner(#[prop(optional, into)] label: Option<String>) -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center gap-2 py-8">
            <span class="loading loading-spinner loading-lg text-primary"></span>
            {label.map(|text| view! { <p class="text-base-content/70">{text}</p> })}
        </div>
    }
}
