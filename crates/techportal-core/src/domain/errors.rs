//! Errors - ポータル全体のエラー型
//!
//! 各 port は自分のエラー型（StorageError, RegistrationError, PromptError）を持ち、
//! ここでそれらを `PortalError` にまとめます。

use thiserror::Error;

use crate::app::BuildError;
use crate::config::ConfigError;
use crate::ports::{ClockError, PromptError, RegistrationError, StorageError};

/// PortalError はクレート全体のエラー
#[derive(Debug, Error)]
pub enum PortalError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Clock(#[from] ClockError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized `Result` type for portal operations.
pub type Result<T> = std::result::Result<T, PortalError>;
