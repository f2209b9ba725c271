//! InteractionRecorder - 最後に開いたポータルの記録
//!
//! ポータルカードが選択されるたびに `{portal, timestamp}` を上書き保存します。
//! 書き込み失敗はそのまま呼び出し元に返します（便利機能なので特別扱いしない）。

use std::rc::Rc;

use async_trait::async_trait;

use super::listener::EventListener;
use crate::domain::{Lane, LastVisited, PlatformEvent, PortalKind, Result};
use crate::ports::{Clock, KeyValueStore};

pub struct InteractionRecorder {
    store: Rc<dyn KeyValueStore>,
    clock: Rc<dyn Clock>,
    key: String,
}

impl InteractionRecorder {
    pub fn new(store: Rc<dyn KeyValueStore>, clock: Rc<dyn Clock>, key: impl Into<String>) -> Self {
        Self {
            store,
            clock,
            key: key.into(),
        }
    }

    /// カードのクラス一覧からカテゴリを解決して記録する
    pub fn on_portal_selected<I, S>(&self, classes: I) -> Result<LastVisited>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let kind = PortalKind::from_classes(classes);
        log::info!("[App] Portal clicked: {kind}");

        let record = LastVisited::new(kind, self.clock.now_millis());
        self.store.set(&self.key, &record.to_json()?)?;
        Ok(record)
    }

    /// 保存済みの記録を読む
    pub fn last_visited(&self) -> Result<Option<LastVisited>> {
        match self.store.get(&self.key)? {
            Some(raw) => Ok(Some(LastVisited::from_json(&raw)?)),
            None => Ok(None),
        }
    }
}

#[async_trait(?Send)]
impl EventListener for InteractionRecorder {
    fn lane(&self) -> Lane {
        Lane::Interaction
    }

    async fn on_event(&mut self, event: PlatformEvent) -> Result<()> {
        match event {
            PlatformEvent::PortalSelected { classes } => {
                self.on_portal_selected(&classes)?;
            }
            other => log::debug!("[App] interaction recorder ignores {}", other.name()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PortalError;
    use crate::impls::InMemoryStore;
    use crate::ports::{ManualClock, StorageError, SystemClock};

    const KEY: &str = "lastVisited";

    #[test]
    fn last_write_wins() {
        let store = Rc::new(InMemoryStore::new());
        let clock = Rc::new(ManualClock::from_millis(1_000).unwrap());
        let recorder = InteractionRecorder::new(store.clone(), clock.clone(), KEY);

        recorder.on_portal_selected(["portal-card", "kasys"]).unwrap();
        clock.set_millis(2_000).unwrap();
        recorder.on_portal_selected(["portal-card", "telekom"]).unwrap();

        let stored = recorder.last_visited().unwrap().unwrap();
        assert_eq!(stored.portal, "Telekom");
        assert_eq!(stored.timestamp, 2_000);
        assert_eq!(
            store.get(KEY).unwrap().as_deref(),
            Some(r#"{"portal":"Telekom","timestamp":2000}"#)
        );
    }

    #[test]
    fn timestamp_falls_within_execution_window() {
        let store = Rc::new(InMemoryStore::new());
        let recorder = InteractionRecorder::new(store, Rc::new(SystemClock), KEY);

        let before = SystemClock.now_millis();
        let record = recorder.on_portal_selected(["kasys"]).unwrap();
        let after = SystemClock.now_millis();

        assert_eq!(record.kind(), Some(PortalKind::Kasys));
        assert!(before <= record.timestamp && record.timestamp <= after);
    }

    #[test]
    fn nothing_recorded_yet() {
        let recorder = InteractionRecorder::new(
            Rc::new(InMemoryStore::new()),
            Rc::new(ManualClock::from_millis(0).unwrap()),
            KEY,
        );
        assert_eq!(recorder.last_visited().unwrap(), None);
    }

    #[test]
    fn write_failure_propagates() {
        let recorder = InteractionRecorder::new(
            Rc::new(InMemoryStore::rejecting_writes()),
            Rc::new(ManualClock::from_millis(0).unwrap()),
            KEY,
        );

        let err = recorder.on_portal_selected(["kasys"]).unwrap_err();

        assert!(matches!(
            err,
            PortalError::Storage(StorageError::QuotaExceeded(_))
        ));
    }

    #[test]
    fn corrupt_record_is_reported() {
        let recorder = InteractionRecorder::new(
            Rc::new(InMemoryStore::with_entries([(KEY, "{oops")])),
            Rc::new(ManualClock::from_millis(0).unwrap()),
            KEY,
        );
        assert!(matches!(recorder.last_visited(), Err(PortalError::Json(_))));
    }
}
