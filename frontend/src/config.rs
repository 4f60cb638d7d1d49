//! 前端配置
//!
//! API 基础路径在编译期通过 `ODYSSEY_API_BASE` 覆盖，默认与页面同源的 `/api`。

const DEFAULT_API_BASE: &str = "/api";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base: String,
}

impl AppConfig {
    /// 读取编译期环境变量
    pub fn from_env() -> Self {
        Self::with_base(option_env!("ODYSSEY_API_BASE").unwrap_or(DEFAULT_API_BASE))
    }

    pub fn with_base(base: &str) -> Self {
        let trimmed = base.trim().trim_end_matches('/');
        let api_base = if trimmed.is_empty() {
            DEFAULT_API_BASE.to_string()
        } else {
            trimmed.to_string()
        };
        Self { api_base }
    }

    /// 拼接完整 URL，`path` 以 `/` 开头
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.api_base, path)
        } else {
            format!("{}/{}", self.api_base, path)
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::with_base(DEFAULT_API_BASE)
    }
}
