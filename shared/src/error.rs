use crate::GENERIC_ERROR_MESSAGE;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =========================================================
// 客户端错误分类
// =========================================================

/// 页面层可见的错误
///
/// 所有错误都在页面层被捕获并转换为通知文本，不向全局传播。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// 400: 表单校验失败，在发出请求前就地提示
    #[error("{field}: {message}")]
    Validation { field: String, message: String },
    /// 401/403: 会话缺失或过期，需要重新登录
    #[error("authentication required")]
    Unauthorized,
    /// 409 或等价的唯一性冲突（如用户名已被使用）
    #[error("{0}")]
    Conflict(String),
    /// 404: 资源不存在
    #[error("resource not found")]
    NotFound,
    /// 5xx 或其他非预期状态码
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },
    /// 请求未能到达服务端
    #[error("network error: {0}")]
    Network(String),
    /// 响应体无法解析
    #[error("unexpected response: {0}")]
    Decode(String),
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// 服务端错误响应体 `{ "error": "..." }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ClientError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// 根据状态码和响应体归类错误
    ///
    /// 服务端用 400 + "already in use" 表达唯一性冲突。
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .map(|e| e.error)
            .unwrap_or_else(|_| body.trim().to_string());

        match status {
            401 | 403 => Self::Unauthorized,
            404 => Self::NotFound,
            409 => Self::Conflict(message),
            400 if message.to_lowercase().contains("already in use") => Self::Conflict(message),
            400 => Self::validation("form", message),
            _ => Self::Server { status, message },
        }
    }

    /// 是否需要跳转到登录页
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// 转换为面向用户的通知文本
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message, .. } => message.clone(),
            Self::Unauthorized => "Your session has expired. Please log in again.".to_string(),
            Self::Conflict(message) => message.clone(),
            Self::NotFound => "That adventure could not be found.".to_string(),
            Self::Server { .. } | Self::Network(_) | Self::Decode(_) => {
                GENERIC_ERROR_MESSAGE.to_string()
            }
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ClientError::from_status(401, ""), ClientError::Unauthorized);
        assert_eq!(ClientError::from_status(404, ""), ClientError::NotFound);
        assert_eq!(
            ClientError::from_status(400, r#"{"error": "Username already in use"}"#),
            ClientError::Conflict("Username already in use".into())
        );
        assert!(matches!(
            ClientError::from_status(400, r#"{"error": "bad"}"#),
            ClientError::Validation { .. }
        ));
        assert_eq!(
            ClientError::from_status(500, "boom"),
            ClientError::Server {
                status: 500,
                message: "boom".into()
            }
        );
    }

    #[test]
    fn test_user_message() {
        assert_eq!(
            ClientError::Network("offline".into()).user_message(),
            GENERIC_ERROR_MESSAGE
        );
        assert_eq!(
            ClientError::Conflict("Username already in use".into()).user_message(),
            "Username already in use"
        );
        assert!(ClientError::Unauthorized.requires_login());
    }
}
