//! State - ライフサイクルの状態
//!
//! ServiceWorker の登録状態、個々のワーカーの状態、バナーと UI 要素の状態を定義します。

use serde::{Deserialize, Serialize};
use std::fmt;

/// RegistrationState は ServiceWorker 登録の状態
///
/// # 状態遷移
/// - idle → registering → registered
/// - idle → registering → failed（このセッションでは終端）
/// - idle → unsupported（プラットフォームが ServiceWorker を持たない）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationState {
    Idle,
    Registering,
    Registered { scope: String },
    Failed { reason: String },
    Unsupported,
}

impl RegistrationState {
    pub fn is_registered(&self) -> bool {
        matches!(self, RegistrationState::Registered { .. })
    }
}

/// WorkerId は updatefound で見つかったワーカーの識別子
///
/// プラットフォームアダプタが採番します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerId(pub u32);

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "worker-{}", self.0)
    }
}

/// WorkerState はネストしたワーカー自身の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerState {
    Parsed,
    Installing,
    Installed,
    Activating,
    Activated,
    Redundant,
}

impl WorkerState {
    /// これ以上監視する必要がない状態か
    pub fn is_settled(self) -> bool {
        matches!(self, WorkerState::Activated | WorkerState::Redundant)
    }
}

/// BannerState はインストールバナーの表示状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BannerState {
    #[default]
    Hidden,
    Visible,
}

impl BannerState {
    pub fn is_visible(self) -> bool {
        matches!(self, BannerState::Visible)
    }
}

/// UiElement は表示切り替えの対象となる要素
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiElement {
    OfflineIndicator,
    InstallBanner,
}

impl fmt::Display for UiElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiElement::OfflineIndicator => f.write_str("offline indicator"),
            UiElement::InstallBanner => f.write_str("install banner"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_state_uses_platform_spelling() {
        let state: WorkerState = serde_json::from_str("\"installed\"").unwrap();
        assert_eq!(state, WorkerState::Installed);
        assert_eq!(serde_json::to_string(&WorkerState::Redundant).unwrap(), "\"redundant\"");
    }

    #[test]
    fn only_activated_and_redundant_are_settled() {
        assert!(WorkerState::Activated.is_settled());
        assert!(WorkerState::Redundant.is_settled());
        assert!(!WorkerState::Installed.is_settled());
    }
}
