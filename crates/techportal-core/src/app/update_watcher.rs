//! UpdateWatcher - ServiceWorker の登録と新バージョン検出
//!
//! # 状態遷移
//! - idle → registering → registered / failed
//! - registered の間だけ updatefound を受け付け、見つかったワーカーの
//!   statechange を追跡する
//!
//! ワーカーが installed に **入った** とき、既存のコントローラがいれば
//! アップデートなので確認ダイアログを出し、承諾されたらリロードします。
//! 初回インストール（コントローラなし）では何もしません。

use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;

use super::listener::EventListener;
use crate::domain::{Lane, PlatformEvent, RegistrationState, Result, WorkerId, WorkerState};
use crate::ports::{UiSurface, WorkerRegistry};

pub struct UpdateWatcher {
    registry: Rc<dyn WorkerRegistry>,
    surface: Rc<dyn UiSurface>,
    worker_url: String,
    update_message: String,
    state: RegistrationState,
    /// updatefound で見つかり、まだ落ち着いていないワーカー
    workers: HashMap<WorkerId, WorkerState>,
    update_offers: u32,
}

impl UpdateWatcher {
    pub fn new(
        registry: Rc<dyn WorkerRegistry>,
        surface: Rc<dyn UiSurface>,
        worker_url: impl Into<String>,
        update_message: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            surface,
            worker_url: worker_url.into(),
            update_message: update_message.into(),
            state: RegistrationState::Idle,
            workers: HashMap::new(),
            update_offers: 0,
        }
    }

    pub fn state(&self) -> &RegistrationState {
        &self.state
    }

    /// 確認ダイアログを出した回数
    pub fn update_offers(&self) -> u32 {
        self.update_offers
    }

    /// 追跡中のワーカー
    pub fn tracked_workers(&self) -> usize {
        self.workers.len()
    }

    /// ワーカーを登録する（セッションにつき 1 回）
    ///
    /// 失敗してもエラーは返さない。ログに残して failed に遷移するだけ。
    pub async fn register(&mut self) {
        if self.state != RegistrationState::Idle {
            log::debug!("[App] ServiceWorker registration already attempted");
            return;
        }
        if !self.registry.is_supported() {
            log::info!("[App] ServiceWorker not supported, continuing without offline support");
            self.state = RegistrationState::Unsupported;
            return;
        }

        self.state = RegistrationState::Registering;
        self.state = match self.registry.register(&self.worker_url).await {
            Ok(registration) => {
                log::info!("[App] ServiceWorker registered: {}", registration.scope);
                RegistrationState::Registered {
                    scope: registration.scope,
                }
            }
            Err(err) => {
                log::error!("[App] ServiceWorker registration failed: {err}");
                RegistrationState::Failed {
                    reason: err.to_string(),
                }
            }
        };
    }

    pub fn on_update_found(&mut self, worker: WorkerId) {
        if !self.state.is_registered() {
            log::debug!("[App] updatefound for {worker} ignored: no registration");
            return;
        }
        log::info!("[App] New ServiceWorker installing... ({worker})");
        self.workers.insert(worker, WorkerState::Installing);
    }

    pub async fn on_worker_state(&mut self, worker: WorkerId, state: WorkerState) {
        let Some(previous) = self.workers.get_mut(&worker) else {
            log::debug!("[App] statechange for untracked {worker} ignored");
            return;
        };
        let entered_installed = state == WorkerState::Installed && *previous != state;
        *previous = state;
        if state.is_settled() {
            self.workers.remove(&worker);
        }

        if entered_installed && self.registry.has_controller() {
            log::info!("[App] New version available");
            self.offer_reload().await;
        }
    }

    async fn offer_reload(&mut self) {
        self.update_offers += 1;
        if self.surface.confirm(&self.update_message).await {
            log::info!("[App] Reloading to activate the new version");
            self.surface.reload();
        }
    }
}

#[async_trait(?Send)]
impl EventListener for UpdateWatcher {
    fn lane(&self) -> Lane {
        Lane::Update
    }

    async fn on_event(&mut self, event: PlatformEvent) -> Result<()> {
        match event {
            PlatformEvent::UpdateFound { worker } => self.on_update_found(worker),
            PlatformEvent::WorkerStateChanged { worker, state } => {
                self.on_worker_state(worker, state).await
            }
            other => log::debug!("[App] update watcher ignores {}", other.name()),
        }
        Ok(())
    }
}
