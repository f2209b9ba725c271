//! InstallGatekeeper - インストールバナーの表示ポリシー
//!
//! # 学習ポイント
//! - 保留中のプロンプトは `Option<Box<dyn DeferredPrompt>>` の private フィールド
//! - 使う直前に `take()` するので、同じハンドルを 2 回使うことはできない
//! - dismiss 時刻を永続化し、7 日間（設定可能）バナーを抑止する
//!
//! # フロー
//! 1. beforeinstallprompt: 既定動作を抑止 → ハンドルを保持 → クールダウン判定
//! 2. install クリック: ハンドルを取り出してプロンプト → 結果に関係なくバナーを隠す
//! 3. dismiss クリック: バナーを隠して現在時刻を保存
//! 4. appinstalled: バナーを隠してハンドルを破棄

use std::rc::Rc;

use async_trait::async_trait;

use super::listener::EventListener;
use crate::domain::{BannerState, DismissalMarker, Lane, PlatformEvent, Result, UiElement};
use crate::ports::{Clock, DeferredPrompt, KeyValueStore, PromptOutcome, StorageError, UiSurface};

pub struct InstallGatekeeper {
    store: Rc<dyn KeyValueStore>,
    clock: Rc<dyn Clock>,
    surface: Rc<dyn UiSurface>,
    dismissed_key: String,
    cooldown_ms: i64,
    deferred: Option<Box<dyn DeferredPrompt>>,
    banner: BannerState,
}

impl InstallGatekeeper {
    pub fn new(
        store: Rc<dyn KeyValueStore>,
        clock: Rc<dyn Clock>,
        surface: Rc<dyn UiSurface>,
        dismissed_key: impl Into<String>,
        cooldown_ms: i64,
    ) -> Self {
        Self {
            store,
            clock,
            surface,
            dismissed_key: dismissed_key.into(),
            cooldown_ms,
            deferred: None,
            banner: BannerState::Hidden,
        }
    }

    pub fn banner(&self) -> BannerState {
        self.banner
    }

    pub fn has_deferred_prompt(&self) -> bool {
        self.deferred.is_some()
    }

    /// beforeinstallprompt
    ///
    /// ハンドルはクールダウン中でも保持する（後から手動で使えるように）。
    /// ストアの読み取りに失敗した場合もハンドルは保持済み、バナーは変えない。
    pub fn on_install_eligible(
        &mut self,
        prompt: Box<dyn DeferredPrompt>,
    ) -> std::result::Result<BannerState, StorageError> {
        log::info!("[App] beforeinstallprompt fired");
        prompt.suppress_default();
        if self.deferred.replace(prompt).is_some() {
            log::debug!("[App] replacing a previously retained install prompt");
        }

        let stored = self.store.get(&self.dismissed_key)?;
        let marker = DismissalMarker::parse(stored.as_deref());
        if marker.allows_banner(self.clock.now_millis(), self.cooldown_ms) {
            self.show_banner();
        } else {
            log::debug!("[App] install banner suppressed by recent dismissal ({marker:?})");
        }
        Ok(self.banner)
    }

    /// install ボタン
    ///
    /// ハンドルが無ければ何もしない。結果（accepted / dismissed）はログのみ。
    pub async fn on_install_clicked(&mut self) -> Option<PromptOutcome> {
        let Some(prompt) = self.deferred.take() else {
            log::debug!("[App] install clicked without a retained prompt");
            return None;
        };

        log::info!("[App] Showing install prompt");
        let outcome = match prompt.prompt().await {
            Ok(outcome) => {
                log::info!("[App] Install prompt outcome: {outcome}");
                Some(outcome)
            }
            Err(err) => {
                log::warn!("[App] {err}");
                None
            }
        };
        self.hide_banner();
        outcome
    }

    /// dismiss ボタン: クールダウンを現在時刻から張り直す
    pub fn on_dismiss_clicked(&mut self) -> std::result::Result<(), StorageError> {
        self.hide_banner();
        let now = self.clock.now_millis();
        self.store
            .set(&self.dismissed_key, &DismissalMarker::encode(now))
    }

    /// appinstalled: どの経路のインストールでも無条件に後始末する
    pub fn on_app_installed(&mut self) {
        log::info!("[App] App was installed");
        self.hide_banner();
        self.deferred = None;
    }

    fn show_banner(&mut self) {
        self.set_banner(BannerState::Visible);
    }

    fn hide_banner(&mut self) {
        self.set_banner(BannerState::Hidden);
    }

    fn set_banner(&mut self, state: BannerState) {
        self.banner = state;
        if !self
            .surface
            .set_visible(UiElement::InstallBanner, state.is_visible())
        {
            log::debug!("[App] {} not present", UiElement::InstallBanner);
        }
    }
}

#[async_trait(?Send)]
impl EventListener for InstallGatekeeper {
    fn lane(&self) -> Lane {
        Lane::Install
    }

    async fn on_event(&mut self, event: PlatformEvent) -> Result<()> {
        match event {
            PlatformEvent::InstallEligible(prompt) => {
                self.on_install_eligible(prompt)?;
            }
            PlatformEvent::InstallClicked => {
                self.on_install_clicked().await;
            }
            PlatformEvent::DismissClicked => self.on_dismiss_clicked()?,
            PlatformEvent::AppInstalled => self.on_app_installed(),
            other => log::debug!("[App] install gatekeeper ignores {}", other.name()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DAY_MS, DEFAULT_COOLDOWN_MS};
    use crate::impls::{InMemoryStore, PromptLog, RecordingSurface, ScriptedPrompt};
    use crate::ports::ManualClock;
    use rstest::rstest;

    const KEY: &str = "installBannerDismissed";
    const T0: i64 = 1_700_000_000_000;

    struct Fixture {
        store: Rc<InMemoryStore>,
        clock: Rc<ManualClock>,
        surface: Rc<RecordingSurface>,
        log: Rc<PromptLog>,
        gatekeeper: InstallGatekeeper,
    }

    impl Fixture {
        fn with_store(store: InMemoryStore) -> Self {
            let store = Rc::new(store);
            let clock = Rc::new(ManualClock::from_millis(T0).unwrap());
            let surface = Rc::new(RecordingSurface::new(true));
            let gatekeeper = InstallGatekeeper::new(
                store.clone(),
                clock.clone(),
                surface.clone(),
                KEY,
                DEFAULT_COOLDOWN_MS,
            );
            Self {
                store,
                clock,
                surface,
                log: Rc::new(PromptLog::default()),
                gatekeeper,
            }
        }

        fn new() -> Self {
            Self::with_store(InMemoryStore::new())
        }

        fn prompt(&self, outcome: PromptOutcome) -> Box<dyn DeferredPrompt> {
            ScriptedPrompt::new(outcome, self.log.clone()).boxed()
        }

        fn eligible(&mut self) -> BannerState {
            let prompt = self.prompt(PromptOutcome::accepted());
            self.gatekeeper.on_install_eligible(prompt).unwrap()
        }

        fn banner_visible(&self) -> bool {
            self.surface.is_visible(UiElement::InstallBanner)
        }
    }

    #[test]
    fn first_eligibility_shows_banner() {
        let mut fx = Fixture::new();

        assert_eq!(fx.eligible(), BannerState::Visible);
        assert!(fx.banner_visible());
        assert!(fx.gatekeeper.has_deferred_prompt());
        assert_eq!(fx.log.suppressed(), 1);
    }

    #[rstest]
    #[case::same_instant(0, false)]
    #[case::one_day(DAY_MS, false)]
    #[case::exactly_seven_days(7 * DAY_MS, false)]
    #[case::just_past_seven_days(7 * DAY_MS + 1, true)]
    #[case::thirty_days(30 * DAY_MS, true)]
    fn cooldown_after_dismissal(#[case] elapsed: i64, #[case] shown: bool) {
        let mut fx = Fixture::new();
        fx.gatekeeper.on_dismiss_clicked().unwrap();

        fx.clock.set_millis(T0 + elapsed).unwrap();
        let banner = fx.eligible();

        assert_eq!(banner.is_visible(), shown);
        assert_eq!(fx.banner_visible(), shown);
        // 抑止中でもハンドルは保持する
        assert!(fx.gatekeeper.has_deferred_prompt());
    }

    #[test]
    fn dismiss_six_days_then_eight_days() {
        let mut fx = Fixture::new();
        fx.eligible();
        fx.gatekeeper.on_dismiss_clicked().unwrap();
        assert!(!fx.banner_visible());

        fx.clock.set_millis(T0 + 6 * DAY_MS).unwrap();
        assert_eq!(fx.eligible(), BannerState::Hidden);

        fx.clock.set_millis(T0 + 8 * DAY_MS).unwrap();
        assert_eq!(fx.eligible(), BannerState::Visible);
    }

    #[test]
    fn dismiss_persists_current_time() {
        let mut fx = Fixture::new();
        fx.clock.set_millis(T0 + 123).unwrap();

        fx.gatekeeper.on_dismiss_clicked().unwrap();

        assert_eq!(
            fx.store.get(KEY).unwrap(),
            Some((T0 + 123).to_string())
        );
    }

    #[test]
    fn unreadable_marker_keeps_banner_hidden() {
        let mut fx = Fixture::with_store(InMemoryStore::with_entries([(KEY, "not-a-number")]));
        assert_eq!(fx.eligible(), BannerState::Hidden);
    }

    #[tokio::test]
    async fn accepted_install_clears_prompt_without_dismissal() {
        let mut fx = Fixture::new();
        fx.eligible();

        let outcome = fx.gatekeeper.on_install_clicked().await;

        assert_eq!(outcome, Some(PromptOutcome::accepted()));
        assert!(!fx.gatekeeper.has_deferred_prompt());
        assert!(!fx.banner_visible());
        assert_eq!(fx.store.get(KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn dismissed_outcome_also_clears_prompt() {
        let mut fx = Fixture::new();
        let prompt = fx.prompt(PromptOutcome::dismissed());
        fx.gatekeeper.on_install_eligible(prompt).unwrap();

        let outcome = fx.gatekeeper.on_install_clicked().await;

        assert_eq!(outcome, Some(PromptOutcome::dismissed()));
        assert!(!fx.gatekeeper.has_deferred_prompt());
        assert_eq!(fx.gatekeeper.banner(), BannerState::Hidden);
        assert_eq!(fx.store.get(KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn second_install_click_is_a_no_op() {
        let mut fx = Fixture::new();
        fx.eligible();

        fx.gatekeeper.on_install_clicked().await;
        let second = fx.gatekeeper.on_install_clicked().await;

        assert_eq!(second, None);
        assert_eq!(fx.log.prompted(), 1);
    }

    #[tokio::test]
    async fn install_click_without_eligibility_is_a_no_op() {
        let mut fx = Fixture::new();

        assert_eq!(fx.gatekeeper.on_install_clicked().await, None);
        assert_eq!(fx.log.prompted(), 0);
        assert!(!fx.surface.was_touched(UiElement::InstallBanner));
    }

    #[tokio::test]
    async fn failed_prompt_still_clears_state() {
        let mut fx = Fixture::new();
        let prompt = ScriptedPrompt::failing("already shown", fx.log.clone()).boxed();
        fx.gatekeeper.on_install_eligible(prompt).unwrap();

        assert_eq!(fx.gatekeeper.on_install_clicked().await, None);
        assert!(!fx.gatekeeper.has_deferred_prompt());
        assert!(!fx.banner_visible());
    }

    #[tokio::test]
    async fn app_installed_clears_prompt_and_banner() {
        let mut fx = Fixture::new();
        fx.eligible();

        fx.gatekeeper.on_app_installed();

        assert!(!fx.gatekeeper.has_deferred_prompt());
        assert!(!fx.banner_visible());
        assert_eq!(fx.gatekeeper.on_install_clicked().await, None);
        assert_eq!(fx.log.prompted(), 0);
    }

    #[test]
    fn app_installed_without_prompt_is_harmless() {
        let mut fx = Fixture::new();
        fx.gatekeeper.on_app_installed();
        assert!(!fx.gatekeeper.has_deferred_prompt());
        assert_eq!(fx.gatekeeper.banner(), BannerState::Hidden);
    }

    #[test]
    fn dismiss_write_failure_propagates() {
        let mut fx = Fixture::with_store(InMemoryStore::rejecting_writes());
        fx.eligible();

        let err = fx.gatekeeper.on_dismiss_clicked().unwrap_err();

        assert!(matches!(err, StorageError::QuotaExceeded(_)));
        assert!(!fx.banner_visible());
    }

    #[test]
    fn missing_banner_element_is_absorbed() {
        let store = Rc::new(InMemoryStore::new());
        let clock = Rc::new(ManualClock::from_millis(T0).unwrap());
        let surface = Rc::new(RecordingSurface::new(true).without(UiElement::InstallBanner));
        let log = Rc::new(PromptLog::default());
        let mut gatekeeper =
            InstallGatekeeper::new(store, clock, surface.clone(), KEY, DEFAULT_COOLDOWN_MS);

        let banner = gatekeeper
            .on_install_eligible(ScriptedPrompt::new(PromptOutcome::accepted(), log).boxed())
            .unwrap();

        assert_eq!(banner, BannerState::Visible);
        assert!(!surface.was_touched(UiElement::InstallBanner));
    }
}
