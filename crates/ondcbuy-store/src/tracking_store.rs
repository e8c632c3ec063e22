use std::sync::Arc;

use ondcbuy_core::TrackingData;

use crate::error::StoreError;
use crate::keys;
use crate::storage::{read_json, write_json, Storage};

#[derive(Clone)]
pub struct TrackingStore {
    storage: Arc<dyn Storage>,
}

impl TrackingStore {
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Last saved tracking snapshot. Stale or malformed data reads as `None`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend read fails.
    pub fn load(&self) -> Result<Option<TrackingData>, StoreError> {
        let raw: Option<serde_json::Value> = read_json(self.storage.as_ref(), keys::TRACKING_DATA)?;
        Ok(raw.and_then(TrackingData::from_on_track))
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] when serialization or the backend write fails.
    pub fn save(&self, data: &TrackingData) -> Result<(), StoreError> {
        write_json(self.storage.as_ref(), keys::TRACKING_DATA, data)
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend write fails.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.storage.remove(keys::TRACKING_DATA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn accepts_raw_on_track_envelope_written_by_other_code() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set(
                keys::TRACKING_DATA,
                r#"{"context":{},"message":{"order":{"id":"O-7"},"tracking":{"status":"active"}}}"#,
            )
            .unwrap();
        let data = TrackingStore::new(storage).load().unwrap().expect("tracking");
        assert_eq!(data.order_id.as_deref(), Some("O-7"));
        assert!(data.is_active());
    }

    #[test]
    fn save_then_load_and_clear() {
        let store = TrackingStore::new(Arc::new(MemoryStorage::new()));
        let data = TrackingData::from_on_track(serde_json::json!({
            "order_id": "O-1",
            "tracking": { "status": "inactive", "url": "https://t.example.com/1" }
        }))
        .unwrap();
        store.save(&data).unwrap();
        assert_eq!(store.load().unwrap(), Some(data));
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn malformed_tracking_reads_as_absent() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(keys::TRACKING_DATA, r#"{"tracking":42}"#).unwrap();
        assert!(TrackingStore::new(storage).load().unwrap().is_none());
    }
}
