use ondcbuy_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize {context}: {source}")]
    Serialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage lock poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Validation(#[from] CoreError),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("return request {id} cannot be cancelled in status {status}")]
    NotCancellable { id: String, status: String },
}
