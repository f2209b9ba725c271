//! DeferredPrompt port - 保留されたインストールプロンプト
//!
//! `beforeinstallprompt` で受け取ったハンドルを表します。
//! `prompt` は `self: Box<Self>` を消費するので、一度使ったハンドルは再利用できません。

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// PromptOutcome はユーザーの選択結果（プラットフォームが返す不透明な文字列）
///
/// 値はログにのみ使い、ポリシーの分岐には使わない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptOutcome(String);

impl PromptOutcome {
    pub fn new(outcome: impl Into<String>) -> Self {
        Self(outcome.into())
    }

    pub fn accepted() -> Self {
        Self::new("accepted")
    }

    pub fn dismissed() -> Self {
        Self::new("dismissed")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PromptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("install prompt failed: {0}")]
    Failed(String),
}

/// DeferredPrompt はプラットフォームのインストールプロンプトへのハンドル
#[async_trait(?Send)]
pub trait DeferredPrompt {
    /// プラットフォーム既定のインストール UI を抑止する
    fn suppress_default(&self);

    /// プロンプトを表示してユーザーの選択を待つ
    async fn prompt(self: Box<Self>) -> Result<PromptOutcome, PromptError>;
}
