//! App - アプリケーション層
//!
//! このモジュールは、ports を組み合わせてポータルのライフサイクルを実装します。
//!
//! # 主要コンポーネント
//! - **UpdateWatcher**: ServiceWorker の登録と新バージョン検出
//! - **ConnectivityMonitor**: オフライン表示
//! - **InstallGatekeeper**: インストールバナーとクールダウン
//! - **InteractionRecorder**: 最後に開いたポータルの記録
//! - **Coordinator**: 起動とイベント配送
//! - **AppBuilder**: 構築とワイヤリング

pub mod builder;
pub mod listener;
pub mod update_watcher;
pub mod connectivity_monitor;
pub mod install_gatekeeper;
pub mod interaction_recorder;
pub mod coordinator;

// 主要な型を再エクスポート
pub use self::builder::{AppBuilder, BuildError};
pub use self::listener::EventListener;
pub use self::update_watcher::UpdateWatcher;
pub use self::connectivity_monitor::ConnectivityMonitor;
pub use self::install_gatekeeper::InstallGatekeeper;
pub use self::interaction_recorder::InteractionRecorder;
pub use self::coordinator::Coordinator;
