//! techportal-core
//!
//! Lifecycle coordinator for the Servicetechniker Portal PWA.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（portal, visit, dismissal, state, events, errors）
//! - **ports**: プラットフォーム機能の抽象化（Clock, KeyValueStore, WorkerRegistry, Connectivity, DeferredPrompt, UiSurface）
//! - **app**: サブ機能と Coordinator（UpdateWatcher, ConnectivityMonitor, InstallGatekeeper, InteractionRecorder）
//! - **impls**: プロセス内の実装（InMemoryStore など開発・テスト用）
//! - **config**: 設定（TOML）
//! - **icons**: マニフェストが参照するアイコンファイルの一覧

pub mod domain;
pub mod ports;
pub mod app;
pub mod impls;
pub mod config;
pub mod icons;

pub use app::{AppBuilder, Coordinator};
pub use config::PortalConfig;
pub use domain::{PlatformEvent, PortalError, Result};
