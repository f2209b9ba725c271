//! AppBuilder - アプリケーションの構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）
//! - 開発体験の改善（明確なエラーメッセージ）

use std::rc::Rc;

use super::{
    ConnectivityMonitor, Coordinator, InstallGatekeeper, InteractionRecorder, UpdateWatcher,
};
use crate::config::PortalConfig;
use crate::ports::{Clock, Connectivity, KeyValueStore, SystemClock, UiSurface, WorkerRegistry};

/// AppBuilder はプラットフォーム機能を集めて Coordinator を構築
///
/// # 使用例
/// ```ignore
/// let coordinator = AppBuilder::new()
///     .config(PortalConfig::default())
///     .registry(Rc::new(registry))
///     .connectivity(Rc::new(connectivity))
///     .store(Rc::new(store))
///     .surface(Rc::new(surface))
///     .build()?;
/// ```
///
/// # Fail-fast 設計
/// - 必須の機能（registry, connectivity, store, surface）が 1 つでも欠けていれば
///   build() が BuildError を返す
/// - Clock だけは省略可能（SystemClock を使う）
#[derive(Default)]
pub struct AppBuilder {
    config: PortalConfig,
    clock: Option<Rc<dyn Clock>>,
    registry: Option<Rc<dyn WorkerRegistry>>,
    connectivity: Option<Rc<dyn Connectivity>>,
    store: Option<Rc<dyn KeyValueStore>>,
    surface: Option<Rc<dyn UiSurface>>,
}

/// BuildError はアプリケーション構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing capabilities: {0:?}. These must be provided before build().")]
    MissingCapabilities(Vec<&'static str>),
}

impl AppBuilder {
    /// 新しい AppBuilder を作成
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: PortalConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn registry(mut self, registry: Rc<dyn WorkerRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn connectivity(mut self, connectivity: Rc<dyn Connectivity>) -> Self {
        self.connectivity = Some(connectivity);
        self
    }

    pub fn store(mut self, store: Rc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn surface(mut self, surface: Rc<dyn UiSurface>) -> Self {
        self.surface = Some(surface);
        self
    }

    /// AppBuilder を検証して Coordinator を生成
    ///
    /// # 検証
    /// - 必須の機能がすべて設定されているかチェック
    /// - 不足があれば BuildError::MissingCapabilities を返す
    pub fn build(self) -> Result<Coordinator, BuildError> {
        let mut missing = Vec::new();
        if self.registry.is_none() {
            missing.push("registry");
        }
        if self.connectivity.is_none() {
            missing.push("connectivity");
        }
        if self.store.is_none() {
            missing.push("store");
        }
        if self.surface.is_none() {
            missing.push("surface");
        }

        let (Some(registry), Some(connectivity), Some(store), Some(surface)) =
            (self.registry, self.connectivity, self.store, self.surface)
        else {
            return Err(BuildError::MissingCapabilities(missing));
        };
        let clock = self.clock.unwrap_or_else(|| Rc::new(SystemClock));
        let config = self.config;

        Ok(Coordinator::new(
            config.app_name.clone(),
            UpdateWatcher::new(
                registry,
                surface.clone(),
                config.worker_url.clone(),
                config.update_message.clone(),
            ),
            ConnectivityMonitor::new(connectivity, surface.clone()),
            InstallGatekeeper::new(
                store.clone(),
                clock.clone(),
                surface,
                config.dismissed_key.clone(),
                config.install_cooldown_ms(),
            ),
            InteractionRecorder::new(store, clock, config.last_visited_key),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::{InMemoryStore, RecordingSurface, ScriptedRegistry, ToggleConnectivity};

    #[test]
    fn test_build_success() {
        let coordinator = AppBuilder::new()
            .registry(Rc::new(ScriptedRegistry::succeeding(false)))
            .connectivity(Rc::new(ToggleConnectivity::new(true)))
            .store(Rc::new(InMemoryStore::new()))
            .surface(Rc::new(RecordingSurface::new(true)))
            .build();
        assert!(coordinator.is_ok());
    }

    #[test]
    fn test_build_missing_capabilities() {
        let coordinator = AppBuilder::new()
            .registry(Rc::new(ScriptedRegistry::succeeding(false)))
            .store(Rc::new(InMemoryStore::new()))
            .build();
        assert!(matches!(
            coordinator,
            Err(BuildError::MissingCapabilities(missing)) if missing == vec!["connectivity", "surface"]
        ));
    }

    #[tokio::test]
    async fn test_build_applies_config() {
        let store = Rc::new(InMemoryStore::new());
        let mut coordinator = AppBuilder::new()
            .config(PortalConfig {
                last_visited_key: "portal.last".into(),
                ..PortalConfig::default()
            })
            .registry(Rc::new(ScriptedRegistry::succeeding(false)))
            .connectivity(Rc::new(ToggleConnectivity::new(true)))
            .store(store.clone())
            .surface(Rc::new(RecordingSurface::new(true)))
            .build()
            .unwrap();

        coordinator
            .handle(crate::domain::PlatformEvent::PortalSelected {
                classes: vec!["kasys".into()],
            })
            .await
            .unwrap();

        assert!(store.get("portal.last").unwrap().is_some());
        assert!(store.get("lastVisited").unwrap().is_none());
    }
}
