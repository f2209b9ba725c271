//! Coordinator - 4 つのサブ機能の起動とイベント配送
//!
//! # 実行モデル
//! - シングルスレッド・協調的（Send を要求しない）
//! - `run()` はイベントを Lane ごとのキューに振り分け、4 本の Lane を並行に処理する
//! - 各 Lane は 1 件ずつ最後まで処理する（リスナーが自分自身と並行しない）
//! - Lane 同士は独立（更新の確認ダイアログ待ちでもオフライン表示は更新される）

use futures::StreamExt;
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::stream::Stream;

use super::connectivity_monitor::ConnectivityMonitor;
use super::install_gatekeeper::InstallGatekeeper;
use super::interaction_recorder::InteractionRecorder;
use super::listener::EventListener;
use super::update_watcher::UpdateWatcher;
use crate::domain::{Lane, PlatformEvent, Result};

pub struct Coordinator {
    app_name: String,
    watcher: UpdateWatcher,
    monitor: ConnectivityMonitor,
    gatekeeper: InstallGatekeeper,
    recorder: InteractionRecorder,
}

impl Coordinator {
    pub fn new(
        app_name: impl Into<String>,
        watcher: UpdateWatcher,
        monitor: ConnectivityMonitor,
        gatekeeper: InstallGatekeeper,
        recorder: InteractionRecorder,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            watcher,
            monitor,
            gatekeeper,
            recorder,
        }
    }

    pub fn watcher(&self) -> &UpdateWatcher {
        &self.watcher
    }

    pub fn monitor(&self) -> &ConnectivityMonitor {
        &self.monitor
    }

    pub fn gatekeeper(&self) -> &InstallGatekeeper {
        &self.gatekeeper
    }

    pub fn recorder(&self) -> &InteractionRecorder {
        &self.recorder
    }

    /// 起動時の処理をすべて行う（ワーカー登録、接続状態の初回反映）
    pub async fn init(&mut self) {
        log::info!("[App] Initializing {}", self.app_name);
        self.watcher.register().await;
        self.monitor.refresh();
        log::info!("[App] Initialization complete");
    }

    /// 1 件のイベントを担当のサブ機能で最後まで処理する
    pub async fn handle(&mut self, event: PlatformEvent) -> Result<()> {
        self.listener_mut(event.lane()).on_event(event).await
    }

    fn listener_mut(&mut self, lane: Lane) -> &mut dyn EventListener {
        match lane {
            Lane::Update => &mut self.watcher,
            Lane::Connectivity => &mut self.monitor,
            Lane::Install => &mut self.gatekeeper,
            Lane::Interaction => &mut self.recorder,
        }
    }

    /// 起動処理を行い、イベントストリームが終わるまで処理し続ける
    ///
    /// ハンドラのエラーはログに残して Lane を続行する。
    pub async fn run<S>(&mut self, events: S)
    where
        S: Stream<Item = PlatformEvent> + Unpin,
    {
        log::info!("[App] Initializing {}", self.app_name);

        let (update_tx, update_rx) = mpsc::unbounded();
        let (connectivity_tx, connectivity_rx) = mpsc::unbounded();
        let (install_tx, install_rx) = mpsc::unbounded();
        let (interaction_tx, interaction_rx) = mpsc::unbounded();
        let lanes = LaneSenders {
            update: update_tx,
            connectivity: connectivity_tx,
            install: install_tx,
            interaction: interaction_tx,
        };

        let Self {
            watcher,
            monitor,
            gatekeeper,
            recorder,
            ..
        } = self;

        // 登録は非同期なので、他の Lane の起動を待たせない
        let update_lane = async {
            watcher.register().await;
            drain(watcher, update_rx).await;
        };
        let connectivity_lane = async {
            monitor.refresh();
            drain(monitor, connectivity_rx).await;
        };

        log::info!("[App] Initialization complete");
        futures::join!(
            lanes.dispatch(events),
            update_lane,
            connectivity_lane,
            drain(gatekeeper, install_rx),
            drain(recorder, interaction_rx)
        );
        log::debug!("[App] event stream closed");
    }
}

struct LaneSenders {
    update: UnboundedSender<PlatformEvent>,
    connectivity: UnboundedSender<PlatformEvent>,
    install: UnboundedSender<PlatformEvent>,
    interaction: UnboundedSender<PlatformEvent>,
}

impl LaneSenders {
    /// ストリームが尽きたら self ごと sender を drop し、各 Lane を終わらせる
    async fn dispatch<S>(self, mut events: S)
    where
        S: Stream<Item = PlatformEvent> + Unpin,
    {
        while let Some(event) = events.next().await {
            let tx = match event.lane() {
                Lane::Update => &self.update,
                Lane::Connectivity => &self.connectivity,
                Lane::Install => &self.install,
                Lane::Interaction => &self.interaction,
            };
            if let Err(err) = tx.unbounded_send(event) {
                log::warn!("[App] lane closed, dropping {}", err.into_inner().name());
            }
        }
    }
}

async fn drain<L>(listener: &mut L, mut events: UnboundedReceiver<PlatformEvent>)
where
    L: EventListener + ?Sized,
{
    while let Some(event) = events.next().await {
        let name = event.name();
        if let Err(err) = listener.on_event(event).await {
            log::error!("[App] {name} handler failed: {err}");
        }
    }
}
