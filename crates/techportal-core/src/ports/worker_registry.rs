//! WorkerRegistry port - バックグラウンドワーカー（ServiceWorker）の登録
//!
//! 登録後の updatefound / statechange は `PlatformEvent` として届くので、
//! この trait は登録とコントローラの有無だけを扱います。

use async_trait::async_trait;
use thiserror::Error;

/// 登録成功時の情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub scope: String,
}

/// RegistrationError は登録失敗
///
/// 致命的ではない。ログに残してオフライン対応なしで動き続ける。
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("service workers are not supported on this platform")]
    Unsupported,

    #[error("registration of {url} rejected: {reason}")]
    Rejected { url: String, reason: String },
}

/// WorkerRegistry はワーカーを登録するプラットフォーム機能
#[async_trait(?Send)]
pub trait WorkerRegistry {
    /// プラットフォームがワーカーを扱えるか
    fn is_supported(&self) -> bool;

    /// 固定 URL のワーカーを登録
    async fn register(&self, url: &str) -> Result<Registration, RegistrationError>;

    /// 現在ページを制御しているワーカーがいるか（= 既存インストールがある）
    fn has_controller(&self) -> bool;
}
