//! Odyssey 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth` / `theme`: 会话与主题状态
//! - `api`: REST 接口客户端
//! - `state`: 页面状态容器
//! - `components` / `pages`: UI 层

mod api;
mod auth;
mod config;
mod state;
mod theme;

mod components {
    pub mod adventure_view;
    pub mod delete_confirm;
    pub mod encounter_panel;
    pub mod form_alert;
    pub mod header;
    pub mod progress_controls;
    pub mod scene_panel;
    pub mod spinner;
    pub mod text_field;
    pub mod toast;
}

mod pages {
    pub mod account_settings;
    pub mod adventure_details;
    pub mod create_account;
    pub mod home;
    pub mod login;
    pub mod my_adventures;
    pub mod new_adventure;
    pub mod reset_password;
}

// 浏览器 API 封装：fetch、本地存储、History 路由
pub(crate) mod web {
    pub mod http;
    #[cfg(test)]
    pub mod mock;
    pub mod route;
    pub mod router;
    pub mod storage;
}

use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::warn;

use crate::api::OdysseyApi;
use crate::auth::{AuthContext, init_auth};
use crate::components::header::Header;
use crate::config::AppConfig;
use crate::pages::account_settings::AccountSettingsPage;
use crate::pages::adventure_details::AdventureDetailsPage;
use crate::pages::create_account::CreateAccountPage;
use crate::pages::home::HomePage;
use crate::pages::login::LoginPage;
use crate::pages::my_adventures::MyAdventuresPage;
use crate::pages::new_adventure::NewAdventurePage;
use crate::pages::reset_password::{PasswordResetConfirmPage, PasswordResetPage};
use crate::theme::provide_theme;
use web::route::AppRoute;
use web::router::{Link, Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Home => view! { <HomePage /> }.into_any(),
        AppRoute::CreateAccount => view! { <CreateAccountPage /> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::PasswordReset => view! { <PasswordResetPage /> }.into_any(),
        AppRoute::PasswordResetConfirm { uidb64, token } => {
            view! { <PasswordResetConfirmPage uidb64=uidb64 token=token /> }.into_any()
        }
        AppRoute::Adventures => view! { <MyAdventuresPage /> }.into_any(),
        AppRoute::NewAdventure => view! { <NewAdventurePage /> }.into_any(),
        AppRoute::AdventureDetail { id } => view! { <AdventureDetailsPage id=id /> }.into_any(),
        AppRoute::Account => view! { <AccountSettingsPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-[70vh] bg-base-200">
                <div class="text-center flex flex-col gap-4">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl">"Page not found"</p>
                    <Link to="/" class="btn btn-primary">"Back to Odyssey"</Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建认证上下文，从本地存储恢复会话
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);
    init_auth(&auth_ctx);

    // 2. 主题
    provide_theme();

    // 3. API 客户端
    let api = OdysseyApi::browser(AppConfig::from_env());
    provide_context(api.clone());

    // 4. 预先获取 CSRF cookie，之后的写请求才能带上令牌
    spawn_local(async move {
        if let Err(e) = api.csrf_cookie().await {
            warn!(error = %e, "failed to prime csrf cookie");
        }
    });

    // 5. 认证信号与令牌检查注入路由服务
    let is_authenticated = auth_ctx.is_authenticated_signal();
    let check_auth = auth_ctx.check_callback();

    view! {
        <Router is_authenticated=is_authenticated check_auth=check_auth>
            <Header />
            <main class="min-h-screen bg-base-200">
                <RouterOutlet matcher=route_matcher />
            </main>
        </Router>
    }
}
