//! KeyValueStore port - 永続化されたキーバリューストア（localStorage 相当）
//!
//! このクレートが使うキーは 2 つだけです:
//! - `installBannerDismissed`: dismiss 時刻（epoch ms の文字列）
//! - `lastVisited`: `{portal, timestamp}` の JSON

use thiserror::Error;

/// StorageError はストアの操作エラー
///
/// 書き込み失敗は呼び出し元にそのまま伝播させる（便利機能なので特別扱いしない）。
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage quota exceeded while writing key={0}")]
    QuotaExceeded(String),
}

/// KeyValueStore は文字列キー・文字列値のストア
///
/// # 設計原則
/// - 各キーは独立（単一フィールドの read-modify-write のみ）
/// - 上書きのみ、削除はしない
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
