use ondcbuy_core::CoreError;
use ondcbuy_store::StoreError;
use thiserror::Error;

/// Errors returned by the ONDC buyer client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A required field was missing or invalid; nothing was sent.
    #[error("validation error: {0}")]
    Validation(#[from] CoreError),

    /// The server answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from {url}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    /// The request never produced a response (connect, timeout, TLS, body
    /// read). This is the class that triggers a proxy retry.
    #[error("transport error calling {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Building the underlying `reqwest::Client` failed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON serialization error for {context}: {source}")]
    Serialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("response for {context} did not match the expected shape")]
    UnexpectedShape { context: String },

    /// The seller platform rejected the message with a `NACK`.
    #[error("request rejected (NACK): {message}")]
    Nack { message: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("cart is empty")]
    EmptyCart,

    #[error("cart spans several providers ({}); select one provider at a time", .providers.join(", "))]
    MixedProviders { providers: Vec<String> },

    /// The confirmation endpoint answered but has no items yet.
    #[error("confirmation for transaction {transaction_id} is not ready")]
    ConfirmationPending { transaction_id: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ClientError {
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// `true` for failures a degraded-mode fallback may paper over: HTTP
    /// status and transport errors, a confirmation that never fills in, and
    /// a 2xx body that cannot be read. A `NACK` or a validation error is
    /// never degradable.
    #[must_use]
    pub fn is_degradable(&self) -> bool {
        matches!(
            self,
            Self::Status { .. }
                | Self::Transport { .. }
                | Self::ConfirmationPending { .. }
                | Self::Deserialize { .. }
                | Self::UnexpectedShape { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bad_json() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("<html>").unwrap_err()
    }

    #[test]
    fn unreadable_bodies_are_degradable() {
        let deserialize = ClientError::Deserialize {
            context: "cart".to_owned(),
            source: bad_json(),
        };
        let shape = ClientError::UnexpectedShape {
            context: "cart".to_owned(),
        };
        assert!(deserialize.is_degradable());
        assert!(shape.is_degradable());
    }

    #[test]
    fn rejections_are_not_degradable() {
        let nack = ClientError::Nack {
            message: "out of stock".to_owned(),
        };
        assert!(!nack.is_degradable());
        assert!(!ClientError::Validation(CoreError::MissingField("id")).is_degradable());
        assert!(!ClientError::EmptyCart.is_degradable());
    }
}
