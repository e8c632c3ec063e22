//! Order tracking data in the ONDC `on_track` message shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingData {
    #[serde(default)]
    pub order_id: Option<String>,
    pub tracking: TrackingInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingInfo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// `"active"` while the fulfillment is moving, `"inactive"` otherwise.
    pub status: String,
    #[serde(default)]
    pub location: Option<TrackingLocation>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingLocation {
    pub gps: String,
    #[serde(default)]
    pub time: Option<TrackingTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingTime {
    pub timestamp: DateTime<Utc>,
}

impl TrackingData {
    /// Accepts either a bare `on_track` message or the full
    /// `{context, message}` envelope.
    ///
    /// Returns `None` when the value matches neither shape.
    #[must_use]
    pub fn from_on_track(value: serde_json::Value) -> Option<Self> {
        let message = match value.get("message") {
            Some(inner) => inner.clone(),
            None => value,
        };
        let mut data: Self = serde_json::from_value(message.clone()).ok()?;
        if data.order_id.is_none() {
            data.order_id = message
                .get("order")
                .and_then(|o| o.get("id"))
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned);
        }
        Some(data)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.tracking.status.eq_ignore_ascii_case("active")
    }

    #[must_use]
    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.tracking
            .location
            .as_ref()
            .and_then(|l| l.time.as_ref())
            .map(|t| t.timestamp)
    }
}
