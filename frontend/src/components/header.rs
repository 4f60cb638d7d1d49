//! 页头与导航
//!
//! 未登录时显示 "Get Started" / "Log In"，登录后显示冒险与账户入口；
//! 任何页面都可以切换主题。

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::use_api;
use crate::auth::use_auth;
use crate::theme::{Theme, use_theme};
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

#[component]
fn ThemeToggle() -> impl IntoView {
    let theme_ctx = use_theme();
    let is_sci_fi = move || theme_ctx.theme.get() == Theme::SciFi;

    view! {
        <label class="flex items-center gap-2 cursor-pointer" title="Switch theme">
            <span class="text-sm">"Fantasy"</span>
            <input
                type="checkbox"
                class="toggle toggle-accent"
                prop:checked=is_sci_fi
                on:change=move |_| theme_ctx.toggle()
            />
            <span class="text-sm">"Sci-Fi"</span>
        </label>
    }
}

#[component]
pub fn Header() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let api = use_api();

    let on_logout = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        let api = api.clone();
        spawn_local(async move {
            auth.store.logout(&api).await;
            auth.signed_out();
            router.go(AppRoute::Home);
        });
    };

    let home_link = move || {
        if auth.is_authenticated.get() {
            AppRoute::Adventures.to_path()
        } else {
            AppRoute::Home.to_path()
        }
    };

    view! {
        <header class="navbar bg-base-100 shadow-xl px-4">
            <div class="flex-1">
                {move || view! {
                    <Link to=home_link() class="btn btn-ghost text-3xl font-bold">"Odyssey"</Link>
                }}
            </div>
            <nav class="flex-none flex items-center gap-4">
                <Show
                    when=move || auth.is_authenticated.get()
                    fallback=|| view! {
                        <Link to="/create-account" class="link link-hover">"Get Started"</Link>
                        <Link to="/login" class="link link-hover">"Log In"</Link>
                    }
                >
                    <Link to="/adventures" class="link link-hover">"My Adventures"</Link>
                    <Link to="/adventures/new" class="link link-hover">"New Adventure"</Link>
                    <Link to="/account" class="link link-hover">"Account Settings"</Link>
                    <a href="#" class="link link-hover" on:click=on_logout.clone()>"Logout"</a>
                </Show>
                <ThemeToggle />
            </nav>
        </header>
    }
}
