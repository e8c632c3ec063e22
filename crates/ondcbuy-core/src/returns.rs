//! Return requests as served by `GET /returns`.
//!
//! Records are owned by the seller side. Unknown fields are kept in `extra`
//! so a round trip through local storage loses nothing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReturnStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
    Cancelled,
    Other(String),
}

impl From<String> for ReturnStatus {
    fn from(raw: String) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "pending" | "initiated" | "requested" => Self::Pending,
            "approved" | "accepted" => Self::Approved,
            "rejected" => Self::Rejected,
            "completed" | "refunded" => Self::Completed,
            "cancelled" | "canceled" => Self::Cancelled,
            _ => Self::Other(raw),
        }
    }
}

impl From<ReturnStatus> for String {
    fn from(status: ReturnStatus) -> Self {
        status.to_string()
    }
}

impl std::fmt::Display for ReturnStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::Other(s) => s.as_str(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnItem {
    #[serde(alias = "id")]
    pub item_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnRequest {
    pub return_request_id: String,
    pub order_id: String,
    #[serde(default)]
    pub transaction_id: String,
    pub status: ReturnStatus,
    #[serde(default)]
    pub items: Vec<ReturnItem>,
    #[serde(default)]
    pub total_return_amount: Option<Decimal>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ReturnRequest {
    /// A request already in a terminal state cannot be cancelled.
    #[must_use]
    pub fn is_cancellable(&self) -> bool {
        !matches!(
            self.status,
            ReturnStatus::Cancelled | ReturnStatus::Completed | ReturnStatus::Rejected
        )
    }
}
