//! InMemoryStore - 開発・テスト用のキーバリューストア
//!
//! # 学習ポイント
//! - シングルスレッド前提の内部可変性（RefCell）
//! - 書き込み拒否モードで quota 超過を再現

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::ports::{KeyValueStore, StorageError};

/// InMemoryStore はプロセス内だけで値を保持するストア
///
/// # 使用例
/// ```ignore
/// let store = InMemoryStore::new();
/// store.set("lastVisited", "{}")?;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
    reject_writes: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 初期値を持つストアを作成
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: RefCell::new(entries),
            reject_writes: false,
        }
    }

    /// すべての書き込みを QuotaExceeded で拒否するストア
    pub fn rejecting_writes() -> Self {
        Self {
            entries: RefCell::new(BTreeMap::new()),
            reject_writes: true,
        }
    }

    /// 保存済みの内容をスナップショット
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries.borrow().clone()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.reject_writes {
            return Err(StorageError::QuotaExceeded(key.to_string()));
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
