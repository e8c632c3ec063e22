use std::sync::Arc;

use ondcbuy_core::{AuthToken, RegistrationResponse, UserProfile};

use crate::error::StoreError;
use crate::keys;
use crate::storage::{read_json, write_json, Storage};

/// The signed-in user's token and profile.
#[derive(Clone)]
pub struct ProfileStore {
    storage: Arc<dyn Storage>,
}

impl ProfileStore {
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend read fails.
    pub fn token(&self) -> Result<Option<AuthToken>, StoreError> {
        let token: Option<AuthToken> = read_json(self.storage.as_ref(), keys::USER_TOKEN)?;
        Ok(token.filter(|t| !t.expose().trim().is_empty()))
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend read fails.
    pub fn profile(&self) -> Result<Option<UserProfile>, StoreError> {
        read_json(self.storage.as_ref(), keys::USER_PROFILE)
    }

    /// Persists token and profile from a registration response.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when serialization or the backend write fails.
    pub fn save_registration(&self, response: &RegistrationResponse) -> Result<(), StoreError> {
        write_json(self.storage.as_ref(), keys::USER_TOKEN, &response.token)?;
        write_json(self.storage.as_ref(), keys::USER_PROFILE, &response.user)
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend write fails.
    pub fn sign_out(&self) -> Result<(), StoreError> {
        self.storage.remove(keys::USER_TOKEN)?;
        self.storage.remove(keys::USER_PROFILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn save_registration_then_sign_out() {
        let store = ProfileStore::new(Arc::new(MemoryStorage::new()));
        assert!(store.token().unwrap().is_none());

        let response: RegistrationResponse = serde_json::from_value(serde_json::json!({
            "token": "tok-1",
            "user": { "id": "u1", "name": "Asha", "email": "asha@example.com" }
        }))
        .unwrap();
        store.save_registration(&response).unwrap();

        assert_eq!(store.token().unwrap().unwrap().expose(), "tok-1");
        assert_eq!(store.profile().unwrap().unwrap().name, "Asha");

        store.sign_out().unwrap();
        assert!(store.token().unwrap().is_none());
        assert!(store.profile().unwrap().is_none());
    }
}
