//! 高潮进度的本地保存
//!
//! 服务端的冒险记录没有高潮进度列，前端按冒险 id 把它保存在本地存储中，
//! 每次从服务端加载冒险后再合并回去。

use odyssey_shared::{Adventure, Progress, STORAGE_CLIMAX_KEY_PREFIX};
use tracing::debug;

use crate::web::storage::{BrowserStorage, KeyValueStore};

#[derive(Debug, Clone, Copy, Default)]
pub struct ClimaxStore<S = BrowserStorage> {
    storage: S,
}

impl<S: KeyValueStore> ClimaxStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    fn key(id: u64) -> String {
        format!("{}:{}", STORAGE_CLIMAX_KEY_PREFIX, id)
    }

    /// 未保存或无法识别的值视为未开始
    pub fn load(&self, id: u64) -> Progress {
        let Some(value) = self.storage.get(&Self::key(id)) else {
            return Progress::NotStarted;
        };
        [Progress::InProgress, Progress::Complete]
            .into_iter()
            .find(|progress| progress.as_str() == value)
            .unwrap_or_default()
    }

    pub fn store(&self, id: u64, progress: Progress) -> bool {
        debug!(id, %progress, "climax progress stored");
        match progress {
            Progress::NotStarted => {
                self.storage.delete(&Self::key(id));
                true
            }
            _ => self.storage.set(&Self::key(id), progress.as_str()),
        }
    }

    /// 冒险被删除后清除对应的记录
    pub fn forget(&self, id: u64) {
        self.storage.delete(&Self::key(id));
    }

    /// 把本地保存的高潮进度合并进服务端返回的冒险
    pub fn restore(&self, mut adventure: Adventure) -> Adventure {
        if let Some(id) = adventure.id {
            adventure.climax_progress = self.load(id);
        }
        adventure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::storage::MemoryStorage;

    #[test]
    fn test_climax_progress_keyed_by_adventure() {
        let storage = MemoryStorage::new();
        let store = ClimaxStore::new(storage.clone());

        assert!(store.store(4, Progress::Complete));
        assert_eq!(storage.get("odysseyClimax:4").as_deref(), Some("Complete"));
        assert_eq!(store.load(4), Progress::Complete);
        assert_eq!(store.load(5), Progress::NotStarted);

        store.forget(4);
        assert_eq!(store.load(4), Progress::NotStarted);
    }

    #[test]
    fn test_restore_fills_loaded_adventure() {
        let store = ClimaxStore::new(MemoryStorage::new());
        store.store(4, Progress::InProgress);

        let loaded = store.restore(Adventure {
            id: Some(4),
            ..Default::default()
        });
        assert_eq!(loaded.climax_progress, Progress::InProgress);

        // 未保存的冒险保持原值
        let draft = store.restore(Adventure::default());
        assert_eq!(draft.climax_progress, Progress::NotStarted);
    }

    #[test]
    fn test_unknown_value_reads_as_not_started() {
        let storage = MemoryStorage::new();
        storage.set("odysseyClimax:9", "Halfway");
        assert_eq!(ClimaxStore::new(storage).load(9), Progress::NotStarted);
    }
}
