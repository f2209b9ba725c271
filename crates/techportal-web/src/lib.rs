//! techportal-web: ブラウザ上でコーディネータを動かすエントリポイント
//!
//! DOM イベントを `PlatformEvent` に変換してキューに積み、
//! `Coordinator::run` が Lane ごとに処理する。

mod dom;
mod prompt;
mod worker;

use std::rc::Rc;

use futures::channel::mpsc::{self, UnboundedSender};
use techportal_core::{AppBuilder, PlatformEvent, PortalConfig};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, EventTarget, Window};

pub use dom::{DomConfig, DomSurface, LocalStore, NavigatorConnectivity};
pub use prompt::{BeforeInstallPromptEvent, BrowserInstallPrompt};
pub use worker::ServiceWorkerRegistry;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();

    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;

    if document.ready_state() == "loading" {
        let on_ready: Closure<dyn FnMut()> = Closure::once(move || {
            if let Err(err) = boot(PortalConfig::default(), DomConfig::default()) {
                log::error!("[App] startup failed: {:?}", err);
            }
        });
        document.add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref())?;
        on_ready.forget();
        return Ok(());
    }
    boot(PortalConfig::default(), DomConfig::default())
}

/// 各アダプタを組み立て、イベント購読を張ってコーディネータを起動する
pub fn boot(config: PortalConfig, dom: DomConfig) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let (tx, rx) = mpsc::unbounded();

    let coordinator = AppBuilder::new()
        .config(config)
        .registry(Rc::new(ServiceWorkerRegistry::new(window.clone(), tx.clone())))
        .connectivity(Rc::new(NavigatorConnectivity::new(window.clone())))
        .store(Rc::new(LocalStore::new(&window)))
        .surface(Rc::new(DomSurface::new(
            window.clone(),
            document.clone(),
            dom.clone(),
        )))
        .build()
        .map_err(|err| JsValue::from_str(&err.to_string()))?;

    attach_listeners(&window, &document, &dom, &tx)?;

    wasm_bindgen_futures::spawn_local(async move {
        let mut coordinator = coordinator;
        coordinator.run(rx).await;
    });
    Ok(())
}

fn attach_listeners(
    window: &Window,
    document: &Document,
    dom: &DomConfig,
    tx: &UnboundedSender<PlatformEvent>,
) -> Result<(), JsValue> {
    listen(window, "online", tx, |_| Some(PlatformEvent::Online))?;
    listen(window, "offline", tx, |_| Some(PlatformEvent::Offline))?;
    listen(window, "beforeinstallprompt", tx, |event| {
        // 既定のミニ情報バーはディスパッチ中に止める必要がある
        event.prevent_default();
        Some(PlatformEvent::InstallEligible(Box::new(
            BrowserInstallPrompt::new(event),
        )))
    })?;
    listen(window, "appinstalled", tx, |_| Some(PlatformEvent::AppInstalled))?;

    if let Some(button) = document.get_element_by_id(&dom.install_button_id) {
        listen(&button, "click", tx, |_| Some(PlatformEvent::InstallClicked))?;
    }
    if let Some(button) = document.get_element_by_id(&dom.dismiss_button_id) {
        listen(&button, "click", tx, |_| Some(PlatformEvent::DismissClicked))?;
    }

    let cards = document.query_selector_all(&dom.portal_card_selector)?;
    for i in 0..cards.length() {
        let Some(card) = cards.item(i).and_then(|node| node.dyn_into::<Element>().ok()) else {
            continue;
        };
        let classes_of = card.clone();
        listen(&card, "click", tx, move |_| {
            Some(PlatformEvent::PortalSelected {
                classes: class_names(&classes_of.class_name()),
            })
        })?;
    }
    Ok(())
}

fn listen<F>(
    target: &EventTarget,
    name: &str,
    tx: &UnboundedSender<PlatformEvent>,
    to_event: F,
) -> Result<(), JsValue>
where
    F: Fn(web_sys::Event) -> Option<PlatformEvent> + 'static,
{
    let tx = tx.clone();
    let name_owned = name.to_string();
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        let Some(event) = to_event(event) else {
            return;
        };
        if tx.unbounded_send(event).is_err() {
            log::debug!("[App] event queue closed, dropped {name_owned}");
        }
    });
    target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn class_names(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_class_attribute() {
        assert_eq!(
            class_names("portal-card  kasys\tactive"),
            vec!["portal-card", "kasys", "active"]
        );
        assert!(class_names("").is_empty());
    }
}
