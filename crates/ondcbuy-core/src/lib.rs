pub mod account;
pub mod app_config;
pub mod cart;
pub mod config;
pub mod ids;
pub mod money;
pub mod ondc_context;
pub mod product;
pub mod returns;
pub mod tracking;

pub use account::{
    validate_registration, AuthToken, RegistrationForm, RegistrationResponse, UserProfile,
};
pub use app_config::{AppConfig, Environment};
pub use cart::{
    clamp_quantity, summarize, CartItem, CartSummary, MAX_QUANTITY, MIN_QUANTITY,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use ids::{MessageId, TransactionId};
pub use money::{parse_price, FeeSchedule};
pub use ondc_context::{load_ondc_context, FulfillmentEnd, OndcContextConfig};
pub use product::ProductDetail;
pub use returns::{ReturnItem, ReturnRequest, ReturnStatus};
pub use tracking::{TrackingData, TrackingInfo, TrackingLocation, TrackingTime};

use thiserror::Error;

/// Domain-level validation failures.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid price \"{raw}\": {reason}")]
    InvalidPrice { raw: String, reason: String },

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("quantity {requested} for item {id} is outside {min}..={max} (current: {current})")]
    QuantityOutOfRange {
        id: String,
        requested: i64,
        current: u32,
        min: u32,
        max: u32,
    },

    #[error("quantity {requested} for item {id} is outside {min}..={max}")]
    InvalidQuantity {
        id: String,
        requested: u32,
        min: u32,
        max: u32,
    },

    #[error("invalid registration field {field}: {reason}")]
    InvalidRegistration { field: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read ONDC context file {path}: {source}")]
    ContextFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse ONDC context file: {0}")]
    ContextFileParse(#[from] serde_yaml::Error),

    #[error("ONDC context validation failed: {0}")]
    Validation(String),
}
