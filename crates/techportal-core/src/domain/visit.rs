//! Last-visited record persisted on every portal-link selection.

use serde::{Deserialize, Serialize};

use super::PortalKind;

/// `{portal, timestamp}` as stored under the last-visited key.
///
/// `timestamp` is epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastVisited {
    pub portal: String,
    pub timestamp: i64,
}

impl LastVisited {
    pub fn new(kind: PortalKind, timestamp: i64) -> Self {
        Self {
            portal: kind.label().to_string(),
            timestamp,
        }
    }

    /// The category this record refers to, if the label is one we know.
    pub fn kind(&self) -> Option<PortalKind> {
        PortalKind::from_label(&self.portal)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_in_storage_format() {
        let record = LastVisited::new(PortalKind::Kasys, 1_700_000_000_000);
        assert_eq!(
            record.to_json().unwrap(),
            r#"{"portal":"KASYS","timestamp":1700000000000}"#
        );
    }

    #[test]
    fn decodes_record_written_by_browser() {
        let record = LastVisited::from_json(r#"{"portal":"Telekom","timestamp":42}"#).unwrap();
        assert_eq!(record.kind(), Some(PortalKind::Telekom));
        assert_eq!(record.timestamp, 42);
    }

    #[test]
    fn unknown_label_has_no_kind() {
        let record = LastVisited::from_json(r#"{"portal":"Other","timestamp":1}"#).unwrap();
        assert_eq!(record.kind(), None);
    }
}
