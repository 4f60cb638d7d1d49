//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其属性。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 首页 (默认路由)
    #[default]
    Home,
    CreateAccount,
    Login,
    /// 申请重置密码
    PasswordReset,
    /// 邮件中的重置链接
    PasswordResetConfirm { uidb64: String, token: String },
    /// 我的冒险列表 (需要认证)
    Adventures,
    /// 生成新冒险 (需要认证)
    NewAdventure,
    /// 冒险详情与编辑 (需要认证)
    AdventureDetail { id: u64 },
    /// 账户设置 (需要认证)
    Account,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    ///
    /// 结尾的 `/` 与查询串不影响匹配。
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Self::Home,
            ["create-account"] => Self::CreateAccount,
            ["login"] => Self::Login,
            ["password", "reset"] => Self::PasswordReset,
            ["password", "reset", "confirm", uidb64, token] => Self::PasswordResetConfirm {
                uidb64: (*uidb64).to_string(),
                token: (*token).to_string(),
            },
            ["adventures"] => Self::Adventures,
            ["adventures", "new"] => Self::NewAdventure,
            ["adventures", id] => match id.parse() {
                Ok(id) => Self::AdventureDetail { id },
                Err(_) => Self::NotFound,
            },
            ["account"] => Self::Account,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::CreateAccount => "/create-account".to_string(),
            Self::Login => "/login".to_string(),
            Self::PasswordReset => "/password/reset".to_string(),
            Self::PasswordResetConfirm { uidb64, token } => {
                format!("/password/reset/confirm/{}/{}", uidb64, token)
            }
            Self::Adventures => "/adventures".to_string(),
            Self::NewAdventure => "/adventures/new".to_string(),
            Self::AdventureDetail { id } => format!("/adventures/{}", id),
            Self::Account => "/account".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Self::Adventures | Self::NewAdventure | Self::AdventureDetail { .. } | Self::Account
        )
    }

    /// 定义已认证用户是否应该离开此路由（如登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::CreateAccount)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功时的重定向目标（从登录页）
    pub fn auth_success_redirect() -> Self {
        Self::Adventures
    }

    /// 守卫：给定认证状态，返回实际应当展示的路由
    pub fn guard(self, is_authenticated: bool) -> Self {
        if self.requires_auth() && !is_authenticated {
            Self::auth_failure_redirect()
        } else if self.should_redirect_when_authenticated() && is_authenticated {
            Self::auth_success_redirect()
        } else {
            self
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_static_routes() {
        assert_eq!(AppRoute::from_path("/"), AppRoute::Home);
        assert_eq!(AppRoute::from_path(""), AppRoute::Home);
        assert_eq!(AppRoute::from_path("/login"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/login/"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/create-account"), AppRoute::CreateAccount);
        assert_eq!(AppRoute::from_path("/password/reset"), AppRoute::PasswordReset);
        assert_eq!(AppRoute::from_path("/adventures"), AppRoute::Adventures);
        assert_eq!(AppRoute::from_path("/adventures/new"), AppRoute::NewAdventure);
        assert_eq!(AppRoute::from_path("/account?tab=email"), AppRoute::Account);
        assert_eq!(AppRoute::from_path("/nowhere"), AppRoute::NotFound);
    }

    #[test]
    fn test_parse_parameterized_routes() {
        assert_eq!(
            AppRoute::from_path("/adventures/42"),
            AppRoute::AdventureDetail { id: 42 }
        );
        assert_eq!(AppRoute::from_path("/adventures/abc"), AppRoute::NotFound);
        assert_eq!(
            AppRoute::from_path("/password/reset/confirm/MQ/abc-123"),
            AppRoute::PasswordResetConfirm {
                uidb64: "MQ".into(),
                token: "abc-123".into()
            }
        );
    }

    #[test]
    fn test_path_round_trip() {
        let routes = [
            AppRoute::Home,
            AppRoute::Login,
            AppRoute::AdventureDetail { id: 7 },
            AppRoute::PasswordResetConfirm {
                uidb64: "MQ".into(),
                token: "t0k".into(),
            },
            AppRoute::NewAdventure,
        ];
        for route in routes {
            assert_eq!(AppRoute::from_path(&route.to_path()), route);
        }
    }

    #[test]
    fn test_guard() {
        assert_eq!(AppRoute::Adventures.guard(false), AppRoute::Login);
        assert_eq!(
            AppRoute::AdventureDetail { id: 1 }.guard(false),
            AppRoute::Login
        );
        assert_eq!(AppRoute::Account.guard(true), AppRoute::Account);
        assert_eq!(AppRoute::Login.guard(true), AppRoute::Adventures);
        assert_eq!(AppRoute::CreateAccount.guard(true), AppRoute::Adventures);
        assert_eq!(AppRoute::Home.guard(false), AppRoute::Home);
        assert_eq!(AppRoute::PasswordReset.guard(true), AppRoute::PasswordReset);
    }
}
