use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Telemetry posted by a device. `device_id` and `timestamp` are required,
/// they are optional here so a missing field is a 400 instead of a
/// deserialization rejection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub device_id: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub hostname: Option<String>,
    pub os_version: Option<String>,
    pub hardware_model: Option<String>,
    pub cpu_count: Option<u32>,
    pub cpu_usage_percent: Option<f64>,
    /// Bytes.
    pub total_memory: Option<u64>,
    pub memory_used: Option<u64>,
    pub memory_free: Option<u64>,
    pub memory_usage_percent: Option<f64>,
    /// Seconds.
    pub uptime: Option<u64>,
    pub battery_percent: Option<f64>,
}

impl StatusSnapshot {
    pub fn has_required_fields(&self) -> bool {
        self.device_id.as_deref().is_some_and(|id| !id.is_empty()) && self.timestamp.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredStatus {
    pub id: String,
    pub received_at: DateTime<Utc>,
    #[serde(flatten)]
    pub snapshot: StatusSnapshot,
}

impl StoredStatus {
    /// When the device took the reading, falling back to when it arrived.
    pub fn taken_at(&self) -> DateTime<Utc> {
        self.snapshot.timestamp.unwrap_or(self.received_at)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReceipt {
    pub success: bool,
    pub message: String,
    pub received_at: DateTime<Utc>,
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_fields() {
        let snapshot: StatusSnapshot = serde_json::from_value(serde_json::json!({
            "deviceId": "mbp",
            "timestamp": "2025-11-05T10:00:00Z",
            "cpuUsagePercent": 12.5
        }))
        .unwrap();

        assert!(snapshot.has_required_fields());
        assert_eq!(snapshot.cpu_usage_percent, Some(12.5));

        let partial: StatusSnapshot =
            serde_json::from_value(serde_json::json!({ "deviceId": "mbp" })).unwrap();
        assert!(!partial.has_required_fields());

        let blank: StatusSnapshot = serde_json::from_value(serde_json::json!({
            "deviceId": "",
            "timestamp": "2025-11-05T10:00:00Z"
        }))
        .unwrap();
        assert!(!blank.has_required_fields());
    }

    #[test]
    fn test_stored_is_flat() {
        let stored = StoredStatus {
            id: "1".into(),
            received_at: DateTime::parse_from_rfc3339("2025-11-05T10:00:01Z")
                .unwrap()
                .with_timezone(&Utc),
            snapshot: StatusSnapshot {
                device_id: Some("mbp".into()),
                ..Default::default()
            },
        };

        let value = serde_json::to_value(&stored).unwrap();
        assert_eq!(value["deviceId"], "mbp");
        assert_eq!(value["id"], "1");
        assert!(value.get("snapshot").is_none());
    }
}
