//! Scripted platform - 決められた振る舞いをするプラットフォーム機能
//!
//! テストと CLI シミュレータで使う偽実装です。どれも呼び出し回数や
//! 表示状態を記録するので、後から検証できます。

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use async_trait::async_trait;

use crate::domain::UiElement;
use crate::ports::{
    Connectivity, DeferredPrompt, PromptError, PromptOutcome, Registration, RegistrationError,
    UiSurface, WorkerRegistry,
};

/// ToggleConnectivity は外から切り替えられる接続状態
#[derive(Debug)]
pub struct ToggleConnectivity {
    online: Cell<bool>,
}

impl ToggleConnectivity {
    pub fn new(online: bool) -> Self {
        Self {
            online: Cell::new(online),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.set(online);
    }
}

impl Connectivity for ToggleConnectivity {
    fn is_online(&self) -> bool {
        self.online.get()
    }
}

/// ScriptedRegistry は登録結果とコントローラの有無を固定したレジストリ
#[derive(Debug)]
pub struct ScriptedRegistry {
    supported: bool,
    failure: Option<String>,
    controller: Cell<bool>,
    registrations: Cell<u32>,
}

impl ScriptedRegistry {
    /// 登録に成功するレジストリ
    pub fn succeeding(controller: bool) -> Self {
        Self {
            supported: true,
            failure: None,
            controller: Cell::new(controller),
            registrations: Cell::new(0),
        }
    }

    /// 登録に失敗するレジストリ
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::succeeding(false)
        }
    }

    /// ServiceWorker を持たないプラットフォーム
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::succeeding(false)
        }
    }

    pub fn set_controller(&self, controller: bool) {
        self.controller.set(controller);
    }

    /// register が呼ばれた回数
    pub fn registrations(&self) -> u32 {
        self.registrations.get()
    }
}

#[async_trait(?Send)]
impl WorkerRegistry for ScriptedRegistry {
    fn is_supported(&self) -> bool {
        self.supported
    }

    async fn register(&self, url: &str) -> Result<Registration, RegistrationError> {
        self.registrations.set(self.registrations.get() + 1);
        if !self.supported {
            return Err(RegistrationError::Unsupported);
        }
        match &self.failure {
            Some(reason) => Err(RegistrationError::Rejected {
                url: url.to_string(),
                reason: reason.clone(),
            }),
            None => {
                let dir = url
                    .trim_start_matches('/')
                    .rsplit_once('/')
                    .map_or(String::new(), |(dir, _)| format!("{dir}/"));
                Ok(Registration {
                    scope: format!("/{dir}"),
                })
            }
        }
    }

    fn has_controller(&self) -> bool {
        self.controller.get()
    }
}

/// PromptLog は ScriptedPrompt の呼び出し記録（複数のハンドルで共有）
#[derive(Debug, Default)]
pub struct PromptLog {
    suppressed: Cell<u32>,
    prompted: Cell<u32>,
}

impl PromptLog {
    pub fn suppressed(&self) -> u32 {
        self.suppressed.get()
    }

    pub fn prompted(&self) -> u32 {
        self.prompted.get()
    }
}

/// ScriptedPrompt は決められた結果を返す deferred prompt
#[derive(Debug)]
pub struct ScriptedPrompt {
    result: Result<PromptOutcome, String>,
    log: Rc<PromptLog>,
}

impl ScriptedPrompt {
    pub fn new(outcome: PromptOutcome, log: Rc<PromptLog>) -> Self {
        Self {
            result: Ok(outcome),
            log,
        }
    }

    /// prompt() が失敗するハンドル
    pub fn failing(reason: impl Into<String>, log: Rc<PromptLog>) -> Self {
        Self {
            result: Err(reason.into()),
            log,
        }
    }

    pub fn boxed(self) -> Box<dyn DeferredPrompt> {
        Box::new(self)
    }
}

#[async_trait(?Send)]
impl DeferredPrompt for ScriptedPrompt {
    fn suppress_default(&self) {
        self.log.suppressed.set(self.log.suppressed.get() + 1);
    }

    async fn prompt(self: Box<Self>) -> Result<PromptOutcome, PromptError> {
        let this = *self;
        this.log.prompted.set(this.log.prompted.get() + 1);
        this.result.map_err(PromptError::Failed)
    }
}

/// RecordingSurface は表示状態・確認ダイアログ・リロードを記録する表示面
#[derive(Debug)]
pub struct RecordingSurface {
    visible: RefCell<HashMap<UiElement, bool>>,
    missing: HashSet<UiElement>,
    confirm_answer: Cell<bool>,
    confirmations: RefCell<Vec<String>>,
    reloads: Cell<u32>,
}

impl RecordingSurface {
    /// すべての要素が存在し、確認ダイアログに `confirm_answer` で答える表示面
    pub fn new(confirm_answer: bool) -> Self {
        Self {
            visible: RefCell::new(HashMap::new()),
            missing: HashSet::new(),
            confirm_answer: Cell::new(confirm_answer),
            confirmations: RefCell::new(Vec::new()),
            reloads: Cell::new(0),
        }
    }

    /// 指定した要素が DOM に存在しない表示面
    pub fn without(mut self, element: UiElement) -> Self {
        self.missing.insert(element);
        self
    }

    pub fn set_confirm_answer(&self, answer: bool) {
        self.confirm_answer.set(answer);
    }

    /// 要素が現在 visible か（一度も触られていなければ false）
    pub fn is_visible(&self, element: UiElement) -> bool {
        self.visible.borrow().get(&element).copied().unwrap_or(false)
    }

    /// 要素に一度でも触れたか
    pub fn was_touched(&self, element: UiElement) -> bool {
        self.visible.borrow().contains_key(&element)
    }

    pub fn confirmations(&self) -> Vec<String> {
        self.confirmations.borrow().clone()
    }

    pub fn reloads(&self) -> u32 {
        self.reloads.get()
    }
}

#[async_trait(?Send)]
impl UiSurface for RecordingSurface {
    fn set_visible(&self, element: UiElement, visible: bool) -> bool {
        if self.missing.contains(&element) {
            return false;
        }
        self.visible.borrow_mut().insert(element, visible);
        true
    }

    async fn confirm(&self, message: &str) -> bool {
        self.confirmations.borrow_mut().push(message.to_string());
        self.confirm_answer.get()
    }

    fn reload(&self) {
        self.reloads.set(self.reloads.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_registry_reports_scope() {
        let registry = ScriptedRegistry::succeeding(false);
        let registration = registry.register("sw.js").await.unwrap();
        assert_eq!(registration.scope, "/");
        assert_eq!(registry.registrations(), 1);

        let nested = registry.register("app/sw.js").await.unwrap();
        assert_eq!(nested.scope, "/app/");
    }

    #[tokio::test]
    async fn failing_registry_rejects() {
        let registry = ScriptedRegistry::failing("404");
        let err = registry.register("sw.js").await.unwrap_err();
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn scripted_prompt_counts_calls() {
        let log = Rc::new(PromptLog::default());
        let prompt = ScriptedPrompt::new(PromptOutcome::accepted(), log.clone()).boxed();
        prompt.suppress_default();
        let outcome = prompt.prompt().await.unwrap();
        assert_eq!(outcome.as_str(), "accepted");
        assert_eq!(log.suppressed(), 1);
        assert_eq!(log.prompted(), 1);
    }

    #[test]
    fn missing_element_is_not_recorded() {
        let surface = RecordingSurface::new(true).without(UiElement::InstallBanner);
        assert!(!surface.set_visible(UiElement::InstallBanner, true));
        assert!(!surface.was_touched(UiElement::InstallBanner));
        assert!(surface.set_visible(UiElement::OfflineIndicator, true));
        assert!(surface.is_visible(UiElement::OfflineIndicator));
    }
}
