use ondcbuy_core::{validate_registration, RegistrationForm, RegistrationResponse};

use crate::error::ClientError;

use super::OndcClient;

impl OndcClient {
    /// Registers a buyer account. The form is validated before anything is
    /// sent.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Validation`] for an invalid form.
    /// - [`ClientError::Status`] / [`ClientError::Transport`] on HTTP failure.
    /// - [`ClientError::Deserialize`] if the response lacks a token or user.
    pub async fn register(
        &self,
        form: &RegistrationForm,
    ) -> Result<RegistrationResponse, ClientError> {
        validate_registration(form)?;
        let url = self.endpoint(&["register"])?;
        let body = self.post_json(&url, form).await?;
        serde_json::from_value(body).map_err(|e| ClientError::Deserialize {
            context: "register".to_owned(),
            source: e,
        })
    }
}
