//! Events - プラットフォームから届くイベント
//!
//! ブラウザのリスナー（またはシミュレータ）はすべての入力を `PlatformEvent` に変換して
//! Coordinator に渡します。各イベントはちょうど 1 つの Lane（担当するサブ機能）に属します。

use std::fmt;

use super::state::{WorkerId, WorkerState};
use crate::ports::DeferredPrompt;

/// PlatformEvent はプラットフォームで発生したイベント
pub enum PlatformEvent {
    /// 接続が回復した
    Online,
    /// 接続が切れた
    Offline,
    /// インストール可能になった（deferred prompt を伴う）
    InstallEligible(Box<dyn DeferredPrompt>),
    /// インストールボタンが押された
    InstallClicked,
    /// バナーの閉じるボタンが押された
    DismissClicked,
    /// アプリがインストールされた（ブラウザ UI 経由も含む）
    AppInstalled,
    /// 登録済み ServiceWorker に新しいワーカーが現れた
    UpdateFound { worker: WorkerId },
    /// updatefound で見つかったワーカーの状態が変わった
    WorkerStateChanged { worker: WorkerId, state: WorkerState },
    /// ポータルカードが選択された（カードのクラス一覧）
    PortalSelected { classes: Vec<String> },
}

/// Lane はイベントを担当するサブ機能
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lane {
    Update,
    Connectivity,
    Install,
    Interaction,
}

impl PlatformEvent {
    pub fn lane(&self) -> Lane {
        match self {
            PlatformEvent::Online | PlatformEvent::Offline => Lane::Connectivity,
            PlatformEvent::InstallEligible(_)
            | PlatformEvent::InstallClicked
            | PlatformEvent::DismissClicked
            | PlatformEvent::AppInstalled => Lane::Install,
            PlatformEvent::UpdateFound { .. } | PlatformEvent::WorkerStateChanged { .. } => {
                Lane::Update
            }
            PlatformEvent::PortalSelected { .. } => Lane::Interaction,
        }
    }

    /// ログ用のイベント名（ブラウザのイベント名に合わせる）
    pub fn name(&self) -> &'static str {
        match self {
            PlatformEvent::Online => "online",
            PlatformEvent::Offline => "offline",
            PlatformEvent::InstallEligible(_) => "beforeinstallprompt",
            PlatformEvent::InstallClicked => "install-click",
            PlatformEvent::DismissClicked => "dismiss-click",
            PlatformEvent::AppInstalled => "appinstalled",
            PlatformEvent::UpdateFound { .. } => "updatefound",
            PlatformEvent::WorkerStateChanged { .. } => "statechange",
            PlatformEvent::PortalSelected { .. } => "portal-click",
        }
    }
}

impl fmt::Debug for PlatformEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformEvent::InstallEligible(_) => f.write_str("InstallEligible(<deferred prompt>)"),
            PlatformEvent::UpdateFound { worker } => {
                f.debug_struct("UpdateFound").field("worker", worker).finish()
            }
            PlatformEvent::WorkerStateChanged { worker, state } => f
                .debug_struct("WorkerStateChanged")
                .field("worker", worker)
                .field("state", state)
                .finish(),
            PlatformEvent::PortalSelected { classes } => f
                .debug_struct("PortalSelected")
                .field("classes", classes)
                .finish(),
            other => f.write_str(other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::online(PlatformEvent::Online, Lane::Connectivity)]
    #[case::offline(PlatformEvent::Offline, Lane::Connectivity)]
    #[case::install_click(PlatformEvent::InstallClicked, Lane::Install)]
    #[case::dismiss_click(PlatformEvent::DismissClicked, Lane::Install)]
    #[case::installed(PlatformEvent::AppInstalled, Lane::Install)]
    #[case::update_found(PlatformEvent::UpdateFound { worker: WorkerId(1) }, Lane::Update)]
    #[case::state_change(
        PlatformEvent::WorkerStateChanged { worker: WorkerId(1), state: WorkerState::Installed },
        Lane::Update
    )]
    #[case::portal(PlatformEvent::PortalSelected { classes: vec![] }, Lane::Interaction)]
    fn routes_to_owning_lane(#[case] event: PlatformEvent, #[case] lane: Lane) {
        assert_eq!(event.lane(), lane);
    }
}
