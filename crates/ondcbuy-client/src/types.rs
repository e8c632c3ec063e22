//! Response shapes from the buyer gateway.
//!
//! ### `POST /select`
//! Synchronous ONDC acknowledgement: `{"message":{"ack":{"status":"ACK"}}}`.
//! A rejection carries `"NACK"` plus an optional `error` object with a
//! `message`.
//!
//! ### `GET /cart/{transaction_id}`
//! Observed in three wrappings: a bare cart object, `{"cart": {...}}`, and the
//! raw `on_select` envelope `{"context":{..},"message":{"order":{..}}}`.
//! Item quantities appear either as a plain number or in ONDC form
//! `{"selected":{"count":2}}`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct SelectAck {
    pub message: AckMessage,
    #[serde(default)]
    pub error: Option<AckError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AckMessage {
    pub ack: AckStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AckStatus {
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AckError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl SelectAck {
    #[must_use]
    pub fn is_ack(&self) -> bool {
        self.message.ack.status.eq_ignore_ascii_case("ACK")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartConfirmation {
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub items: Vec<ConfirmationItem>,
    #[serde(default)]
    pub quote: Option<Quote>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CartConfirmation {
    /// Unwraps whichever envelope the gateway used.
    #[must_use]
    pub fn from_response(value: serde_json::Value) -> Option<Self> {
        let inner = if let Some(order) = value.get("message").and_then(|m| m.get("order")) {
            let mut order = order.clone();
            if let (Some(obj), Some(txn)) = (
                order.as_object_mut(),
                value
                    .get("context")
                    .and_then(|c| c.get("transaction_id"))
                    .cloned(),
            ) {
                obj.entry("transaction_id").or_insert(txn);
            }
            order
        } else if let Some(cart) = value.get("cart") {
            cart.clone()
        } else {
            value
        };

        if !inner.is_object() {
            return None;
        }
        serde_json::from_value(inner)
            .map_err(|e| tracing::debug!(error = %e, "cart confirmation did not decode"))
            .ok()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmationItem {
    pub id: String,
    #[serde(deserialize_with = "de_quantity")]
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub price: QuotePrice,
    #[serde(default)]
    pub breakup: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotePrice {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(deserialize_with = "de_amount")]
    pub value: String,
}

fn default_currency() -> String {
    "INR".to_owned()
}

#[derive(Deserialize)]
struct CountOnly {
    count: u32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum QuantityRepr {
    Plain(u32),
    Count(CountOnly),
    Selected { selected: CountOnly },
}

fn de_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match QuantityRepr::deserialize(deserializer)? {
        QuantityRepr::Plain(n) => n,
        QuantityRepr::Count(c) | QuantityRepr::Selected { selected: c } => c.count,
    })
}

/// ONDC amounts are strings, but some gateways send bare numbers.
fn de_amount<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected amount string or number, got {other}"
        ))),
    }
}
