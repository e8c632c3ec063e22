//! Shopping-session state: the transaction id shared by select and
//! confirmation calls.

use std::sync::Arc;

use ondcbuy_core::TransactionId;

use crate::error::StoreError;
use crate::keys;
use crate::storage::{read_json, write_json, Storage};

#[derive(Clone)]
pub struct SessionState {
    storage: Arc<dyn Storage>,
}

impl SessionState {
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// The persisted transaction id, if any. A blank stored value counts as
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend read fails.
    pub fn current_transaction_id(&self) -> Result<Option<TransactionId>, StoreError> {
        let stored: Option<String> = read_json(self.storage.as_ref(), keys::TRANSACTION_ID)?;
        Ok(stored.as_deref().and_then(TransactionId::parse))
    }

    /// Returns the current transaction id, generating and persisting one on
    /// first use.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend read or write fails.
    pub fn transaction_id(&self) -> Result<TransactionId, StoreError> {
        if let Some(existing) = self.current_transaction_id()? {
            return Ok(existing);
        }
        self.start_new_transaction()
    }

    /// Replaces the transaction id with a freshly generated one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend write fails.
    pub fn start_new_transaction(&self) -> Result<TransactionId, StoreError> {
        let id = TransactionId::generate();
        self.set_transaction_id(&id)?;
        tracing::info!(transaction_id = %id, "started new transaction");
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend write fails.
    pub fn set_transaction_id(&self, id: &TransactionId) -> Result<(), StoreError> {
        write_json(self.storage.as_ref(), keys::TRANSACTION_ID, id)
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend write fails.
    pub fn clear_transaction(&self) -> Result<(), StoreError> {
        self.storage.remove(keys::TRANSACTION_ID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn session() -> (SessionState, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        (SessionState::new(storage.clone()), storage)
    }

    #[test]
    fn transaction_id_is_generated_once_and_reused() {
        let (session, _) = session();
        assert!(session.current_transaction_id().unwrap().is_none());
        let first = session.transaction_id().unwrap();
        let second = session.transaction_id().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn transaction_id_survives_new_session_over_same_storage() {
        let (session, storage) = session();
        let id = session.transaction_id().unwrap();
        let again = SessionState::new(storage);
        assert_eq!(again.current_transaction_id().unwrap(), Some(id));
    }

    #[test]
    fn start_new_transaction_replaces_id() {
        let (session, _) = session();
        let first = session.transaction_id().unwrap();
        let second = session.start_new_transaction().unwrap();
        assert_ne!(first, second);
        assert_eq!(session.transaction_id().unwrap(), second);
    }

    #[test]
    fn malformed_or_blank_stored_id_counts_as_absent() {
        let (session, storage) = session();
        storage.set(keys::TRANSACTION_ID, "not-json").unwrap();
        assert!(session.current_transaction_id().unwrap().is_none());
        storage.set(keys::TRANSACTION_ID, "\"  \"").unwrap();
        assert!(session.current_transaction_id().unwrap().is_none());
    }

    #[test]
    fn clear_transaction_removes_key() {
        let (session, storage) = session();
        session.transaction_id().unwrap();
        session.clear_transaction().unwrap();
        assert!(storage.get(keys::TRANSACTION_ID).unwrap().is_none());
    }
}
