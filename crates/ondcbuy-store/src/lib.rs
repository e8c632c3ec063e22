//! Local persisted state for the buyer app.
//!
//! Everything lives in a flat key/value [`Storage`] holding JSON strings,
//! mirroring browser `localStorage`. Writes across keys are not atomic;
//! readers treat a missing or malformed key as absent.

pub mod cart_store;
pub mod error;
pub mod keys;
pub mod profile_store;
pub mod repair;
pub mod returns_store;
pub mod session;
pub mod storage;
pub mod tracking_store;

pub use cart_store::CartStore;
pub use error::StoreError;
pub use profile_store::ProfileStore;
pub use repair::RepairReport;
pub use returns_store::ReturnsStore;
pub use session::SessionState;
pub use storage::{JsonFileStorage, MemoryStorage, Storage};
pub use tracking_store::TrackingStore;
