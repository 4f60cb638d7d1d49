//! 主题模块
//!
//! 两套主题：`fantasy`（默认）与 `sci-fi`。偏好保存在本地存储的 `theme` 键下，
//! 当前主题名同时作为 `<body>` 的 class。

use leptos::prelude::*;
use odyssey_shared::STORAGE_THEME_KEY;
use tracing::debug;

use crate::web::storage::{BrowserStorage, KeyValueStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Fantasy,
    SciFi,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Fantasy => "fantasy",
            Theme::SciFi => "sci-fi",
        }
    }

    /// 未知的值回退到默认主题
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "sci-fi" => Theme::SciFi,
            _ => Theme::Fantasy,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Fantasy => Theme::SciFi,
            Theme::SciFi => Theme::Fantasy,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ThemeStore<S = BrowserStorage> {
    storage: S,
}

impl<S: KeyValueStore> ThemeStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn current(&self) -> Theme {
        self.storage
            .get(STORAGE_THEME_KEY)
            .map(|value| Theme::parse(&value))
            .unwrap_or_default()
    }

    /// 切换并保存新主题
    pub fn toggle(&self) -> Theme {
        let next = self.current().toggled();
        self.storage.set(STORAGE_THEME_KEY, next.as_str());
        debug!(theme = next.as_str(), "theme toggled");
        next
    }
}

// =========================================================
// Leptos 上下文
// =========================================================

#[derive(Clone, Copy)]
pub struct ThemeContext {
    pub theme: RwSignal<Theme>,
    store: ThemeStore,
}

impl ThemeContext {
    pub fn new() -> Self {
        let store = ThemeStore::new(BrowserStorage);
        Self {
            theme: RwSignal::new(store.current()),
            store,
        }
    }

    pub fn toggle(&self) {
        self.theme.set(self.store.toggle());
    }
}

impl Default for ThemeContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_theme() -> ThemeContext {
    use_context::<ThemeContext>().expect("ThemeContext should be provided")
}

/// 创建主题上下文，并在主题变化时同步 `<body>` 的 class
pub fn provide_theme() -> ThemeContext {
    let ctx = ThemeContext::new();
    provide_context(ctx);

    let theme = ctx.theme;
    Effect::new(move |_| {
        let name = theme.get().as_str();
        if let Some(body) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.body())
        {
            body.set_class_name(name);
        }
    });

    ctx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::storage::MemoryStorage;

    #[test]
    fn test_default_theme() {
        let store = ThemeStore::new(MemoryStorage::new());
        assert_eq!(store.current(), Theme::Fantasy);
    }

    #[test]
    fn test_toggle_persists_new_theme() {
        let storage = MemoryStorage::new();
        let store = ThemeStore::new(storage.clone());

        assert_eq!(store.toggle(), Theme::SciFi);
        assert_eq!(storage.get(STORAGE_THEME_KEY).as_deref(), Some("sci-fi"));
        assert_eq!(store.current(), Theme::SciFi);

        assert_eq!(store.toggle(), Theme::Fantasy);
        assert_eq!(storage.get(STORAGE_THEME_KEY).as_deref(), Some("fantasy"));
    }

    #[test]
    fn test_unknown_value_falls_back() {
        let storage = MemoryStorage::new();
        storage.set(STORAGE_THEME_KEY, "steampunk");
        assert_eq!(ThemeStore::new(storage).current(), Theme::Fantasy);
    }
}
