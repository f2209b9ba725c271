//! DOM 側のアダプタ: localStorage / navigator.onLine / 表示面

use async_trait::async_trait;
use techportal_core::domain::UiElement;
use techportal_core::ports::{Connectivity, KeyValueStore, StorageError, UiSurface};
use web_sys::{Document, Storage, Window};

/// DomConfig はページ側の要素 ID とクラス名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomConfig {
    pub offline_indicator_id: String,
    pub install_banner_id: String,
    pub install_button_id: String,
    pub dismiss_button_id: String,
    pub portal_card_selector: String,
    pub visible_class: String,
}

impl Default for DomConfig {
    fn default() -> Self {
        Self {
            offline_indicator_id: "offlineIndicator".to_string(),
            install_banner_id: "installBanner".to_string(),
            install_button_id: "installBtn".to_string(),
            dismiss_button_id: "dismissBtn".to_string(),
            portal_card_selector: ".portal-card".to_string(),
            visible_class: "visible".to_string(),
        }
    }
}

impl DomConfig {
    pub fn element_id(&self, element: UiElement) -> &str {
        match element {
            UiElement::OfflineIndicator => &self.offline_indicator_id,
            UiElement::InstallBanner => &self.install_banner_id,
        }
    }
}

/// window.localStorage
///
/// プライベートモード等でストレージが取れない場合は読み書きとも Unavailable。
pub struct LocalStore {
    storage: Option<Storage>,
}

impl LocalStore {
    pub fn new(window: &Window) -> Self {
        let storage = match window.local_storage() {
            Ok(storage) => storage,
            Err(err) => {
                log::warn!("[App] localStorage unavailable: {:?}", err);
                None
            }
        };
        Self { storage }
    }

    fn storage(&self) -> Result<&Storage, StorageError> {
        self.storage
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable("window.localStorage".to_string()))
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?
            .get_item(key)
            .map_err(|err| StorageError::Unavailable(format!("{err:?}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|_| StorageError::QuotaExceeded(key.to_string()))
    }
}

/// navigator.onLine
pub struct NavigatorConnectivity {
    window: Window,
}

impl NavigatorConnectivity {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Connectivity for NavigatorConnectivity {
    fn is_online(&self) -> bool {
        self.window.navigator().on_line()
    }
}

/// DomSurface は `visible` クラスの付け外しで要素を表示する
pub struct DomSurface {
    window: Window,
    document: Document,
    config: DomConfig,
}

impl DomSurface {
    pub fn new(window: Window, document: Document, config: DomConfig) -> Self {
        Self {
            window,
            document,
            config,
        }
    }
}

#[async_trait(?Send)]
impl UiSurface for DomSurface {
    fn set_visible(&self, element: UiElement, visible: bool) -> bool {
        let Some(node) = self
            .document
            .get_element_by_id(self.config.element_id(element))
        else {
            return false;
        };

        let classes = node.class_list();
        let result = if visible {
            classes.add_1(&self.config.visible_class)
        } else {
            classes.remove_1(&self.config.visible_class)
        };
        result.is_ok()
    }

    async fn confirm(&self, message: &str) -> bool {
        self.window.confirm_with_message(message).unwrap_or(false)
    }

    fn reload(&self) {
        if let Err(err) = self.window.location().reload() {
            log::error!("[App] reload failed: {:?}", err);
        }
    }
}
