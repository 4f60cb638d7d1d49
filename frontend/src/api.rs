//! REST 客户端
//!
//! 每个接口在 `odyssey_shared::protocol` 中以 `ApiRequest` 描述，
//! 这里只负责拼接 URL、附加 CSRF 头、发送请求和归类错误。

use odyssey_shared::protocol::*;
use odyssey_shared::{
    Adventure, CSRF_COOKIE_NAME, ClientError, ClientResult, HEADER_CSRF_TOKEN, Progress, User,
};
use leptos::prelude::*;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::config::AppConfig;
use crate::web::http::{FetchClient, HttpClient, HttpRequest, cookie_value, document_cookies};

/// 浏览器中使用的客户端
pub type BrowserApi = OdysseyApi<FetchClient>;

/// 从 Context 获取 API 客户端
pub fn use_api() -> BrowserApi {
    use_context::<BrowserApi>().expect("OdysseyApi should be provided")
}

/// 返回当前 cookie 字符串的函数
pub type CookieSource = fn() -> Option<String>;

#[derive(Clone)]
pub struct OdysseyApi<C = FetchClient> {
    client: C,
    config: AppConfig,
    cookies: CookieSource,
}

impl OdysseyApi<FetchClient> {
    /// 浏览器环境：fetch + document.cookie
    pub fn browser(config: AppConfig) -> Self {
        Self::new(FetchClient, config, document_cookies)
    }
}

impl<C: HttpClient> OdysseyApi<C> {
    pub fn new(client: C, config: AppConfig, cookies: CookieSource) -> Self {
        Self {
            client,
            config,
            cookies,
        }
    }

    fn csrf_token(&self) -> Option<String> {
        (self.cookies)().and_then(|cookies| cookie_value(&cookies, CSRF_COOKIE_NAME))
    }

    /// 发送一个接口请求并解析响应
    pub async fn send<R: ApiRequest>(&self, request: &R) -> ClientResult<R::Response> {
        let method = R::METHOD;
        let mut http = HttpRequest::new(method, self.config.url(&request.path()));

        if method.is_mutating() {
            if let Some(token) = self.csrf_token() {
                http = http.header(HEADER_CSRF_TOKEN, &token);
            }
        }
        if method.has_body() {
            http = http.json_body(serde_json::to_string(request)?);
        }

        debug!(method = method.as_str(), url = %http.url, "api request");
        let response = self.client.send(http).await.map_err(|e| {
            error!(method = method.as_str(), path = %request.path(), error = %e, "request failed");
            ClientError::from(e)
        })?;

        if !response.ok() {
            let err = ClientError::from_status(response.status, &response.body);
            error!(
                method = method.as_str(),
                path = %request.path(),
                status = response.status,
                error = %err,
                "api error"
            );
            return Err(err);
        }

        decode_body(&response.body)
    }

    // --- 账户 ---

    pub async fn csrf_cookie(&self) -> ClientResult<()> {
        self.send(&CsrfCookieRequest).await.map(|_| ())
    }

    pub async fn login(&self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        self.send(&LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        })
        .await
    }

    pub async fn logout(&self, user_id: u64) -> ClientResult<MessageResponse> {
        self.send(&LogoutRequest { user_id }).await
    }

    /// 注册时邮箱同时作为用户名
    pub async fn register(&self, email: &str, password: &str) -> ClientResult<RegisterResponse> {
        self.send(&RegisterRequest {
            username: email.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        })
        .await
    }

    pub async fn get_user(&self, user_id: u64) -> ClientResult<User> {
        self.send(&GetUserRequest { user_id }).await
    }

    pub async fn update_user(&self, request: &UpdateUserRequest) -> ClientResult<User> {
        self.send(request).await
    }

    pub async fn password_reset(&self, email: &str) -> ClientResult<MessageResponse> {
        self.send(&PasswordResetRequest {
            email: email.to_string(),
        })
        .await
    }

    pub async fn password_reset_confirm(
        &self,
        request: &PasswordResetConfirmRequest,
    ) -> ClientResult<MessageResponse> {
        self.send(request).await
    }

    // --- 冒险 ---

    pub async fn list_adventures(&self, user_id: u64) -> ClientResult<Vec<Adventure>> {
        self.send(&ListAdventuresRequest { user_id }).await
    }

    pub async fn get_adventure(&self, id: u64) -> ClientResult<Adventure> {
        self.send(&GetAdventureRequest { id }).await
    }

    pub async fn create_adventure(&self, payload: &AdventurePayload) -> ClientResult<Adventure> {
        self.send(payload).await
    }

    pub async fn update_adventure(&self, id: u64, payload: AdventurePayload) -> ClientResult<Adventure> {
        self.send(&UpdateAdventureRequest { id, payload }).await
    }

    pub async fn delete_adventure(&self, id: u64) -> ClientResult<()> {
        self.send(&DeleteAdventureRequest { id }).await
    }

    pub async fn generate_adventure(
        &self,
        request: &GenerateAdventureRequest,
    ) -> ClientResult<GeneratedAdventure> {
        self.send(request).await
    }

    // --- 场景与遭遇 ---

    /// 创建或更新场景，返回其 id
    pub async fn save_scene(&self, id: Option<u64>, payload: ScenePayload) -> ClientResult<u64> {
        let saved = match id {
            Some(id) => self.send(&UpdateSceneRequest { id, payload }).await?,
            None => self.send(&payload).await?,
        };
        Ok(saved.id)
    }

    pub async fn delete_scene(&self, id: u64) -> ClientResult<()> {
        self.send(&DeleteSceneRequest { id }).await
    }

    /// 创建或更新遭遇，返回其 id
    pub async fn save_encounter(&self, id: Option<u64>, payload: EncounterPayload) -> ClientResult<u64> {
        let saved = match id {
            Some(id) => self.send(&UpdateEncounterRequest { id, payload }).await?,
            None => self.send(&payload).await?,
        };
        Ok(saved.id)
    }

    pub async fn delete_encounter(&self, id: u64) -> ClientResult<()> {
        self.send(&DeleteEncounterRequest { id }).await
    }

    pub async fn update_progress(&self, target: ProgressTarget, progress: Progress) -> ClientResult<()> {
        self.send(&UpdateProgressRequest { target, progress })
            .await
            .map(|_| ())
    }
}

/// 空响应体（如 204）按 `null` 解析
fn decode_body<T: DeserializeOwned>(body: &str) -> ClientResult<T> {
    let body = body.trim();
    let body = if body.is_empty() { "null" } else { body };
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests;
