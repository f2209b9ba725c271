//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 各 trait はブラウザのプラットフォーム機能（ServiceWorker, localStorage,
//! navigator.onLine, インストールプロンプト, DOM）へのインターフェースを提供し、
//! サブ機能のロジックを偽実装でテストできるようにします。
//!
//! # 実行モデル
//! - シングルスレッド・協調的（`async_trait(?Send)`）
//! - 非同期の操作は登録・プロンプト・確認ダイアログのみ

pub mod clock;
pub mod storage;
pub mod worker_registry;
pub mod connectivity;
pub mod install_prompt;
pub mod surface;

// 主要な trait を再エクスポート
pub use self::clock::{Clock, ClockError, FixedClock, ManualClock, SystemClock, offset_millis};
pub use self::storage::{KeyValueStore, StorageError};
pub use self::worker_registry::{Registration, RegistrationError, WorkerRegistry};
pub use self::connectivity::Connectivity;
pub use self::install_prompt::{DeferredPrompt, PromptError, PromptOutcome};
pub use self::surface::UiSurface;
