//! 认证模块
//!
//! 会话令牌以 JSON 形式保存在本地存储的 `odysseyToken` 键下。
//! `SessionStore` 负责令牌的读写与过期判断，`AuthContext` 把结果暴露为信号，
//! 路由服务在每次导航前通过注入的回调重新检查令牌，过期即登出。

use leptos::prelude::*;
use odyssey_shared::{ClientError, ClientResult, STORAGE_TOKEN_KEY, SessionToken, Timestamp};
use tracing::{info, warn};

use crate::api::OdysseyApi;
use crate::web::http::HttpClient;
use crate::web::storage::{BrowserStorage, KeyValueStore};

// =========================================================
// 会话存储
// =========================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct SessionStore<S = BrowserStorage> {
    storage: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// 读取已保存的令牌，损坏的数据会被清除
    pub fn token(&self) -> Option<SessionToken> {
        let raw = self.storage.get(STORAGE_TOKEN_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(token) => Some(token),
            Err(e) => {
                warn!(error = %e, "discarding unreadable session token");
                self.storage.delete(STORAGE_TOKEN_KEY);
                None
            }
        }
    }

    pub fn store(&self, token: &SessionToken) -> bool {
        match serde_json::to_string(token) {
            Ok(json) => self.storage.set(STORAGE_TOKEN_KEY, &json),
            Err(_) => false,
        }
    }

    pub fn clear(&self) {
        self.storage.delete(STORAGE_TOKEN_KEY);
    }

    /// 存在未过期的令牌；过期的令牌会被删除
    pub fn logged_in(&self, now: Timestamp) -> bool {
        let Some(token) = self.token() else {
            return false;
        };
        if token.is_expired(now) {
            info!(user = token.user_id(), "session token expired");
            self.clear();
            return false;
        }
        true
    }

    pub fn user_id(&self) -> Option<u64> {
        self.token().map(|token| token.user_id())
    }

    /// 登录成功时保存并返回令牌，失败返回 `None`
    pub async fn login<C: HttpClient>(
        &self,
        api: &OdysseyApi<C>,
        username: &str,
        password: &str,
    ) -> Option<SessionToken> {
        match api.login(username, password).await {
            Ok(response) => {
                self.store(&response.token);
                info!(user = response.token.user_id(), "logged in");
                Some(response.token)
            }
            Err(e) => {
                warn!(error = %e, "login rejected");
                None
            }
        }
    }

    /// 注册并直接登录
    pub async fn register<C: HttpClient>(
        &self,
        api: &OdysseyApi<C>,
        email: &str,
        password: &str,
    ) -> ClientResult<SessionToken> {
        let response = api.register(email, password).await?;
        self.store(&response.token);
        info!(user = response.user.id, "account created");
        Ok(response.token)
    }

    /// 通知服务端注销，无论结果如何都清除本地令牌
    pub async fn logout<C: HttpClient>(&self, api: &OdysseyApi<C>) {
        if let Some(user_id) = self.user_id() {
            if let Err(e) = api.logout(user_id).await {
                warn!(error = %e, "server logout failed, clearing local session anyway");
            }
        }
        self.clear();
    }
}

// =========================================================
// Leptos 上下文
// =========================================================

/// 认证上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext<S = BrowserStorage> {
    pub is_authenticated: RwSignal<bool>,
    pub user_id: RwSignal<Option<u64>>,
    pub store: SessionStore<S>,
}

impl AuthContext {
    pub fn new() -> Self {
        Self::with_store(SessionStore::new(BrowserStorage))
    }

    /// 供路由服务在每次导航前调用的检查
    pub fn check_callback(&self) -> Callback<(), bool> {
        let ctx = *self;
        Callback::new(move |()| ctx.refresh())
    }
}

impl<S: KeyValueStore> AuthContext<S> {
    pub fn with_store(store: SessionStore<S>) -> Self {
        Self {
            is_authenticated: RwSignal::new(false),
            user_id: RwSignal::new(None),
            store,
        }
    }

    /// 获取认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        self.is_authenticated.into()
    }

    /// 重新检查本地令牌（过期即登出）
    pub fn refresh(&self) -> bool {
        self.refresh_at(Timestamp::now())
    }

    pub fn refresh_at(&self, now: Timestamp) -> bool {
        let logged_in = self.store.logged_in(now);
        if self.is_authenticated.get_untracked() != logged_in {
            self.is_authenticated.set(logged_in);
        }
        self.user_id
            .set(if logged_in { self.store.user_id() } else { None });
        logged_in
    }

    pub fn signed_in(&self, token: &SessionToken) {
        self.user_id.set(Some(token.user_id()));
        self.is_authenticated.set(true);
    }

    pub fn signed_out(&self) {
        self.store.clear();
        self.user_id.set(None);
        self.is_authenticated.set(false);
    }

    /// 会话失效的错误会清除登录状态，路由守卫随后跳转到登录页
    pub fn check_error(&self, error: &ClientError) -> bool {
        if error.requires_login() {
            warn!("session rejected by server");
            self.signed_out();
            return true;
        }
        false
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 启动时从本地存储读取初始认证状态
pub fn init_auth(ctx: &AuthContext) {
    ctx.refresh();
}
