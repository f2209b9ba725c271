//! Impls - 実装（開発用・テスト用）
//!
//! このモジュールには ports のプロセス内実装を含めます。
//!
//! # 含まれる実装
//! - **InMemoryStore**: localStorage の代わり
//! - **ToggleConnectivity / ScriptedRegistry / ScriptedPrompt / RecordingSurface**:
//!   決められた振る舞いをするプラットフォーム
//!
//! # 本番用実装
//! ブラウザ向けの実装は `techportal-web` クレートに配置します。

pub mod inmem_store;
pub mod scripted;

// 主要な型を再エクスポート
pub use self::inmem_store::InMemoryStore;
pub use self::scripted::{
    PromptLog, RecordingSurface, ScriptedPrompt, ScriptedRegistry, ToggleConnectivity,
};
