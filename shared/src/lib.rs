//! Odyssey 共享层
//!
//! 纯 Rust 实现，不依赖任何浏览器 API，前端与测试共用：
//! - `model`: 冒险 / 场景 / 遭遇的数据模型
//! - `sequence`: 保证连续编号的有序列表
//! - `editor`: 冒险内容树编辑器
//! - `validation`: 表单校验
//! - `catalog`: 生成表单的游戏目录
//! - `protocol`: REST 接口定义
//! - `error`: 客户端错误分类

pub mod catalog;
pub mod date;
pub mod editor;
pub mod error;
pub mod model;
pub mod protocol;
pub mod sequence;
pub mod validation;

pub use date::Timestamp;
pub use editor::{
    AdventureEditor, AdventureField, EditError, EncounterField, EncounterOp, RemoteOp, SavedOp,
    SceneField, TextPath,
};
pub use error::{ClientError, ClientResult};
pub use model::{
    Adventure, AdventureStatus, Encounter, Progress, Scene, SessionToken, TokenFields, User,
};
pub use sequence::{Sequenced, SequencedList};

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 会话令牌在本地存储中的键
pub const STORAGE_TOKEN_KEY: &str = "odysseyToken";
/// 高潮进度在本地存储中的键前缀，完整的键为 `odysseyClimax:{adventure_id}`
pub const STORAGE_CLIMAX_KEY_PREFIX: &str = "odysseyClimax";
/// 主题偏好在本地存储中的键
pub const STORAGE_THEME_KEY: &str = "theme";
/// Django 写入的 CSRF cookie 名称
pub const CSRF_COOKIE_NAME: &str = "csrftoken";
/// 变更类请求携带的 CSRF 头
pub const HEADER_CSRF_TOKEN: &str = "X-CSRFToken";
/// 页面级通用错误提示
pub const GENERIC_ERROR_MESSAGE: &str = "Oops! Something went wrong. Please try again.";
