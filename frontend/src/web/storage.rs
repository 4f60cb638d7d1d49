//! 本地存储封装模块
//!
//! `KeyValueStore` 抽象出同步的字符串键值存储：
//! - `BrowserStorage`: 浏览器 LocalStorage（通过 `gloo-storage`）
//! - `MemoryStorage`: 内存实现，供测试使用

use gloo_storage::{LocalStorage, Storage};
use tracing::warn;

/// 同步字符串键值存储
pub trait KeyValueStore {
    /// 获取存储的字符串值，键不存在或发生错误时返回 `None`
    fn get(&self, key: &str) -> Option<String>;

    /// 设置存储值，返回操作是否成功
    fn set(&self, key: &str, value: &str) -> bool;

    /// 删除存储的键值对
    fn delete(&self, key: &str);
}

/// 浏览器 LocalStorage
///
/// 值按原始字符串存取，不做额外的 JSON 包装，与页面脚本直接写入的数据兼容。
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        match LocalStorage::raw().set_item(key, value) {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = ?e, "failed to write local storage");
                false
            }
        }
    }

    fn delete(&self, key: &str) {
        LocalStorage::delete(key);
    }
}

/// 内存存储，克隆后共享同一份数据
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: std::rc::Rc<std::cell::RefCell<std::collections::HashMap<String, String>>>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn delete(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_shares_state() {
        let storage = MemoryStorage::new();
        let handle = storage.clone();

        assert!(storage.set("theme", "sci-fi"));
        assert_eq!(handle.get("theme").as_deref(), Some("sci-fi"));

        handle.delete("theme");
        assert_eq!(storage.get("theme"), None);
        assert_eq!(storage.len(), 0);
    }
}
