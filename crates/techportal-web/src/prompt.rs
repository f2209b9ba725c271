//! `beforeinstallprompt` イベントのラッパー

use async_trait::async_trait;
use techportal_core::ports::{DeferredPrompt, PromptError, PromptOutcome};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen]
extern "C" {
    /// Chromium 系のみが持つイベント型（web-sys には無い）
    #[wasm_bindgen(extends = web_sys::Event, js_name = BeforeInstallPromptEvent)]
    #[derive(Debug, Clone)]
    pub type BeforeInstallPromptEvent;

    #[wasm_bindgen(method, catch)]
    fn prompt(this: &BeforeInstallPromptEvent) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(method, getter, js_name = userChoice)]
    fn user_choice(this: &BeforeInstallPromptEvent) -> js_sys::Promise;
}

/// BrowserInstallPrompt は保留中の beforeinstallprompt イベント
pub struct BrowserInstallPrompt {
    event: BeforeInstallPromptEvent,
}

impl BrowserInstallPrompt {
    pub fn new(event: web_sys::Event) -> Self {
        // Firefox などコンストラクタが無い環境もあるので instanceof は使わない
        Self {
            event: event.unchecked_into(),
        }
    }
}

fn js_error(err: JsValue) -> PromptError {
    PromptError::Failed(format!("{err:?}"))
}

#[async_trait(?Send)]
impl DeferredPrompt for BrowserInstallPrompt {
    fn suppress_default(&self) {
        self.event.prevent_default();
    }

    async fn prompt(self: Box<Self>) -> Result<PromptOutcome, PromptError> {
        let shown = self.event.prompt().map_err(js_error)?;
        JsFuture::from(shown).await.map_err(js_error)?;

        let choice = JsFuture::from(self.event.user_choice())
            .await
            .map_err(js_error)?;
        let outcome = js_sys::Reflect::get(&choice, &JsValue::from_str("outcome"))
            .ok()
            .and_then(|value| value.as_string())
            .unwrap_or_else(|| "unknown".to_string());
        Ok(PromptOutcome::new(outcome))
    }
}
