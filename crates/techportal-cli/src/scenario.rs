//! Scenario replay: drives the coordinator with in-memory capabilities.
//!
//! A scenario is a JSON document describing the initial platform and a list
//! of timed events. Steps are replayed in order with a manual clock, so
//! cooldown behavior can be checked without waiting days.

use std::collections::BTreeMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use techportal_core::domain::{LastVisited, RegistrationState, UiElement, WorkerId, WorkerState};
use techportal_core::impls::{
    InMemoryStore, PromptLog, RecordingSurface, ScriptedPrompt, ScriptedRegistry,
    ToggleConnectivity,
};
use techportal_core::ports::{ManualClock, PromptOutcome, offset_millis};
use techportal_core::{AppBuilder, PlatformEvent, PortalConfig, Result};

fn default_true() -> bool {
    true
}

fn default_start_ms() -> i64 {
    1_700_000_000_000
}

fn default_outcome() -> String {
    "accepted".to_string()
}

#[derive(Debug, Deserialize)]
pub struct Scenario {
    /// Epoch milliseconds of step offset 0.
    #[serde(default = "default_start_ms")]
    pub start_ms: i64,
    #[serde(default = "default_true")]
    pub online: bool,
    /// Whether a worker already controls the page (update vs. first install).
    #[serde(default)]
    pub controller: bool,
    #[serde(default)]
    pub registration_fails: bool,
    #[serde(default)]
    pub service_worker_unsupported: bool,
    /// Answer given to the reload confirmation.
    #[serde(default = "default_true")]
    pub confirm_updates: bool,
    /// Pre-existing storage contents.
    #[serde(default)]
    pub stored: BTreeMap<String, String>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
pub struct Step {
    /// Offset from `start_ms`.
    pub at_ms: i64,
    pub event: ScenarioEvent,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioEvent {
    Online,
    Offline,
    InstallEligible {
        #[serde(default = "default_outcome")]
        outcome: String,
    },
    InstallClicked,
    DismissClicked,
    AppInstalled,
    UpdateFound {
        worker: u32,
    },
    WorkerState {
        worker: u32,
        state: WorkerState,
    },
    PortalSelected {
        classes: Vec<String>,
    },
}

/// Final state after a replay.
#[derive(Debug, Serialize)]
pub struct Report {
    pub registration: String,
    pub offline_indicator: bool,
    pub install_banner: bool,
    pub deferred_prompt: bool,
    pub install_prompts_shown: u32,
    pub update_offers: u32,
    pub reloads: u32,
    pub last_visited: Option<LastVisited>,
    pub stored: BTreeMap<String, String>,
}

impl Scenario {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

pub async fn replay(scenario: &Scenario, config: &PortalConfig) -> Result<Report> {
    let registry = Rc::new(if scenario.service_worker_unsupported {
        ScriptedRegistry::unsupported()
    } else if scenario.registration_fails {
        ScriptedRegistry::failing("scenario: registration rejected")
    } else {
        ScriptedRegistry::succeeding(scenario.controller)
    });
    let connectivity = Rc::new(ToggleConnectivity::new(scenario.online));
    let store = Rc::new(InMemoryStore::with_entries(scenario.stored.clone()));
    let surface = Rc::new(RecordingSurface::new(scenario.confirm_updates));
    let clock = Rc::new(ManualClock::from_millis(scenario.start_ms)?);
    let prompts = Rc::new(PromptLog::default());

    let mut coordinator = AppBuilder::new()
        .config(config.clone())
        .clock(clock.clone())
        .registry(registry)
        .connectivity(connectivity.clone())
        .store(store.clone())
        .surface(surface.clone())
        .build()?;

    coordinator.init().await;

    for step in &scenario.steps {
        clock.set_millis(offset_millis(scenario.start_ms, step.at_ms)?)?;
        let event = match &step.event {
            ScenarioEvent::Online => {
                connectivity.set_online(true);
                PlatformEvent::Online
            }
            ScenarioEvent::Offline => {
                connectivity.set_online(false);
                PlatformEvent::Offline
            }
            ScenarioEvent::InstallEligible { outcome } => PlatformEvent::InstallEligible(
                ScriptedPrompt::new(PromptOutcome::new(outcome.clone()), prompts.clone()).boxed(),
            ),
            ScenarioEvent::InstallClicked => PlatformEvent::InstallClicked,
            ScenarioEvent::DismissClicked => PlatformEvent::DismissClicked,
            ScenarioEvent::AppInstalled => PlatformEvent::AppInstalled,
            ScenarioEvent::UpdateFound { worker } => PlatformEvent::UpdateFound {
                worker: WorkerId(*worker),
            },
            ScenarioEvent::WorkerState { worker, state } => PlatformEvent::WorkerStateChanged {
                worker: WorkerId(*worker),
                state: *state,
            },
            ScenarioEvent::PortalSelected { classes } => PlatformEvent::PortalSelected {
                classes: classes.clone(),
            },
        };

        log::debug!("t+{}ms {:?}", step.at_ms, event);
        let name = event.name();
        if let Err(err) = coordinator.handle(event).await {
            log::error!("[App] {name} handler failed: {err}");
        }
    }

    let registration = match coordinator.watcher().state() {
        RegistrationState::Registered { scope } => format!("registered ({scope})"),
        RegistrationState::Failed { reason } => format!("failed ({reason})"),
        other => format!("{other:?}").to_lowercase(),
    };
    let last_visited = match coordinator.recorder().last_visited() {
        Ok(record) => record,
        Err(err) => {
            log::warn!("[App] last visited record unreadable: {err}");
            None
        }
    };

    Ok(Report {
        registration,
        offline_indicator: surface.is_visible(UiElement::OfflineIndicator),
        install_banner: surface.is_visible(UiElement::InstallBanner),
        deferred_prompt: coordinator.gatekeeper().has_deferred_prompt(),
        install_prompts_shown: prompts.prompted(),
        update_offers: coordinator.watcher().update_offers(),
        reloads: surface.reloads(),
        last_visited,
        stored: store.snapshot(),
    })
}
