//! ConnectivityMonitor - オフライン表示の切り替え
//!
//! online/offline イベントのたびに（そして起動時に 1 回）現在の接続状態を読み、
//! オフラインなら表示、オンラインなら非表示にします。デバウンスもリトライもしません。

use std::rc::Rc;

use async_trait::async_trait;

use super::listener::EventListener;
use crate::domain::{Lane, PlatformEvent, Result, UiElement};
use crate::ports::{Connectivity, UiSurface};

pub struct ConnectivityMonitor {
    connectivity: Rc<dyn Connectivity>,
    surface: Rc<dyn UiSurface>,
    indicator_visible: bool,
}

impl ConnectivityMonitor {
    pub fn new(connectivity: Rc<dyn Connectivity>, surface: Rc<dyn UiSurface>) -> Self {
        Self {
            connectivity,
            surface,
            indicator_visible: false,
        }
    }

    /// 現在の接続状態をインジケータに反映し、表示状態を返す
    pub fn refresh(&mut self) -> bool {
        let offline = !self.connectivity.is_online();
        self.indicator_visible = offline;
        if !self.surface.set_visible(UiElement::OfflineIndicator, offline) {
            log::debug!("[App] {} not present", UiElement::OfflineIndicator);
        }
        offline
    }

    pub fn indicator_visible(&self) -> bool {
        self.indicator_visible
    }
}

#[async_trait(?Send)]
impl EventListener for ConnectivityMonitor {
    fn lane(&self) -> Lane {
        Lane::Connectivity
    }

    async fn on_event(&mut self, event: PlatformEvent) -> Result<()> {
        match event {
            PlatformEvent::Online | PlatformEvent::Offline => {
                self.refresh();
            }
            other => log::debug!("[App] connectivity monitor ignores {}", other.name()),
        }
        Ok(())
    }
}
