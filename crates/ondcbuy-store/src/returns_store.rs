use std::sync::Arc;

use ondcbuy_core::{ReturnRequest, ReturnStatus};

use crate::error::StoreError;
use crate::keys;
use crate::storage::{write_json, Storage};

/// Locally cached return requests.
///
/// The seller side owns these records; the only local mutation is
/// [`ReturnsStore::cancel`], which is never sent anywhere.
#[derive(Clone)]
pub struct ReturnsStore {
    storage: Arc<dyn Storage>,
}

impl ReturnsStore {
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Loads cached requests, skipping entries that fail to decode.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend read fails.
    pub fn load(&self) -> Result<Vec<ReturnRequest>, StoreError> {
        let Some(raw) = self.storage.get(keys::RETURN_REQUESTS)? else {
            return Ok(Vec::new());
        };
        let entries = match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "stored return requests are not an array; ignoring");
                return Ok(Vec::new());
            }
        };
        Ok(entries
            .into_iter()
            .filter_map(|v| {
                serde_json::from_value::<ReturnRequest>(v)
                    .map_err(|e| {
                        tracing::warn!(error = %e, "skipping malformed stored return request");
                    })
                    .ok()
            })
            .collect())
    }

    /// Replaces the cache with a freshly fetched list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when serialization or the backend write fails.
    pub fn replace(&self, requests: &[ReturnRequest]) -> Result<(), StoreError> {
        write_json(self.storage.as_ref(), keys::RETURN_REQUESTS, requests)
    }

    /// Flips a request's status to `Cancelled` in the local cache only.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] when no cached request has the id.
    /// - [`StoreError::NotCancellable`] when it is already terminal.
    pub fn cancel(&self, return_request_id: &str) -> Result<ReturnRequest, StoreError> {
        let mut requests = self.load()?;
        let request = requests
            .iter_mut()
            .find(|r| r.return_request_id == return_request_id)
            .ok_or_else(|| StoreError::NotFound {
                kind: "return request",
                id: return_request_id.to_owned(),
            })?;

        if !request.is_cancellable() {
            return Err(StoreError::NotCancellable {
                id: return_request_id.to_owned(),
                status: request.status.to_string(),
            });
        }

        request.status = ReturnStatus::Cancelled;
        let cancelled = request.clone();
        self.replace(&requests)?;
        tracing::info!(return_request_id, "return request cancelled locally");
        Ok(cancelled)
    }
}
