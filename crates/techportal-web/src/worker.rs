//! navigator.serviceWorker のアダプタ
//!
//! 登録に成功したら updatefound / statechange を購読し、
//! `PlatformEvent` としてイベントキューに流す。

use std::cell::Cell;
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::mpsc::UnboundedSender;
use techportal_core::PlatformEvent;
use techportal_core::domain::{WorkerId, WorkerState};
use techportal_core::ports::{Registration, RegistrationError, WorkerRegistry};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{ServiceWorker, ServiceWorkerRegistration, ServiceWorkerState, Window};

pub struct ServiceWorkerRegistry {
    window: Window,
    events: UnboundedSender<PlatformEvent>,
    next_worker: Rc<Cell<u32>>,
}

impl ServiceWorkerRegistry {
    pub fn new(window: Window, events: UnboundedSender<PlatformEvent>) -> Self {
        Self {
            window,
            events,
            next_worker: Rc::new(Cell::new(1)),
        }
    }

    fn watch_updates(&self, registration: &ServiceWorkerRegistration) {
        let events = self.events.clone();
        let next_worker = self.next_worker.clone();
        let reg = registration.clone();

        let on_update_found = Closure::<dyn FnMut()>::new(move || {
            let Some(installing) = reg.installing() else {
                return;
            };
            let worker = WorkerId(next_worker.get());
            next_worker.set(worker.0 + 1);

            send(&events, PlatformEvent::UpdateFound { worker });
            watch_state(&installing, worker, events.clone());
        });
        registration.set_onupdatefound(Some(on_update_found.as_ref().unchecked_ref()));
        on_update_found.forget();
    }
}

fn watch_state(worker_handle: &ServiceWorker, worker: WorkerId, events: UnboundedSender<PlatformEvent>) {
    let handle = worker_handle.clone();
    let on_state_change = Closure::<dyn FnMut()>::new(move || {
        if let Some(state) = map_state(handle.state()) {
            send(&events, PlatformEvent::WorkerStateChanged { worker, state });
        }
    });
    worker_handle.set_onstatechange(Some(on_state_change.as_ref().unchecked_ref()));
    on_state_change.forget();
}

fn send(events: &UnboundedSender<PlatformEvent>, event: PlatformEvent) {
    if events.unbounded_send(event).is_err() {
        log::debug!("[App] event queue closed");
    }
}

pub(crate) fn map_state(state: ServiceWorkerState) -> Option<WorkerState> {
    match state {
        ServiceWorkerState::Parsed => Some(WorkerState::Parsed),
        ServiceWorkerState::Installing => Some(WorkerState::Installing),
        ServiceWorkerState::Installed => Some(WorkerState::Installed),
        ServiceWorkerState::Activating => Some(WorkerState::Activating),
        ServiceWorkerState::Activated => Some(WorkerState::Activated),
        ServiceWorkerState::Redundant => Some(WorkerState::Redundant),
        _ => None,
    }
}

#[async_trait(?Send)]
impl WorkerRegistry for ServiceWorkerRegistry {
    fn is_supported(&self) -> bool {
        js_sys::Reflect::has(&self.window.navigator(), &JsValue::from_str("serviceWorker"))
            .unwrap_or(false)
    }

    async fn register(&self, url: &str) -> Result<Registration, RegistrationError> {
        let rejected = |err: JsValue| RegistrationError::Rejected {
            url: url.to_string(),
            reason: format!("{err:?}"),
        };

        let container = self.window.navigator().service_worker();
        let registration: ServiceWorkerRegistration = JsFuture::from(container.register(url))
            .await
            .map_err(rejected)?
            .dyn_into()
            .map_err(rejected)?;

        self.watch_updates(&registration);
        Ok(Registration {
            scope: registration.scope(),
        })
    }

    fn has_controller(&self) -> bool {
        self.window.navigator().service_worker().controller().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_known_state() {
        assert_eq!(map_state(ServiceWorkerState::Installed), Some(WorkerState::Installed));
        assert_eq!(map_state(ServiceWorkerState::Redundant), Some(WorkerState::Redundant));
        assert_eq!(map_state(ServiceWorkerState::Parsed), Some(WorkerState::Parsed));
    }
}
