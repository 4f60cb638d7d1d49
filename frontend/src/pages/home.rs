use leptos::prelude::*;

use crate::web::router::Link;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="hero min-h-[70vh] bg-base-200">
            <div class="hero-content text-center">
                <div class="max-w-xl flex flex-col gap-6">
                    <h1 class="text-5xl font-bold">"Odyssey"</h1>
                    <p class="text-lg text-base-content/70">
                        "Generate tabletop adventures for your game and setting, then track your party's progress scene by scene."
                    </p>
                    <div class="flex justify-center gap-4">
                        <Link to="/create-account" class="btn btn-primary">"Get Started"</Link>
                        <Link to="/login" class="btn btn-ghost">"Log In"</Link>
                    </div>
                </div>
            </div>
        </div>
    }
}
