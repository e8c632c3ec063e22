//! Registration form, its validation, and the persisted user identity.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::CoreError;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

// Indian mobile numbers: ten digits starting 6-9, optional +91 prefix.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\+91[\s-]?)?[6-9]\d{9}$").expect("valid phone regex"));

const MIN_PASSWORD_LEN: usize = 8;

/// Body of `POST /register`.
#[derive(Clone, Serialize, Deserialize)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl std::fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("password", &"[redacted]")
            .field("address", &self.address)
            .finish()
    }
}

/// Validates every field of a registration form before it is sent.
///
/// # Errors
///
/// Returns [`CoreError::InvalidRegistration`] naming the first invalid field.
pub fn validate_registration(form: &RegistrationForm) -> Result<(), CoreError> {
    if form.name.trim().is_empty() {
        return Err(CoreError::InvalidRegistration {
            field: "name",
            reason: "must not be empty".to_owned(),
        });
    }
    if !EMAIL_RE.is_match(form.email.trim()) {
        return Err(CoreError::InvalidRegistration {
            field: "email",
            reason: format!("'{}' is not a valid email address", form.email),
        });
    }
    if !PHONE_RE.is_match(form.phone.trim()) {
        return Err(CoreError::InvalidRegistration {
            field: "phone",
            reason: "expected a 10-digit mobile number".to_owned(),
        });
    }
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CoreError::InvalidRegistration {
            field: "password",
            reason: format!("must be at least {MIN_PASSWORD_LEN} characters"),
        });
    }
    Ok(())
}

/// Bearer token issued on registration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken([redacted])")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Response of `POST /register`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationResponse {
    #[serde(alias = "access_token")]
    pub token: AuthToken,
    pub user: UserProfile,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> RegistrationForm {
        RegistrationForm {
            name: "Asha Rao".to_owned(),
            email: "asha@example.com".to_owned(),
            phone: "9876543210".to_owned(),
            password: "s3cret-pass".to_owned(),
            address: None,
        }
    }

    #[test]
    fn accepts_valid_form() {
        assert!(validate_registration(&valid_form()).is_ok());
    }

    #[test]
    fn accepts_country_code_prefix() {
        let mut form = valid_form();
        form.phone = "+91 9876543210".to_owned();
        assert!(validate_registration(&form).is_ok());
    }

    #[test]
    fn rejects_bad_email() {
        let mut form = valid_form();
        form.email = "asha@example".to_owned();
        assert!(matches!(
            validate_registration(&form),
            Err(CoreError::InvalidRegistration { field: "email", .. })
        ));
    }

    #[test]
    fn rejects_landline_style_phone() {
        let mut form = valid_form();
        form.phone = "0801234567".to_owned();
        assert!(matches!(
            validate_registration(&form),
            Err(CoreError::InvalidRegistration { field: "phone", .. })
        ));
    }

    #[test]
    fn rejects_short_password() {
        let mut form = valid_form();
        form.password = "short".to_owned();
        assert!(matches!(
            validate_registration(&form),
            Err(CoreError::InvalidRegistration { field: "password", .. })
        ));
    }

    #[test]
    fn debug_redacts_secrets() {
        let rendered = format!("{:?}", valid_form());
        assert!(!rendered.contains("s3cret-pass"));
        assert_eq!(format!("{:?}", AuthToken::new("t0k")), "AuthToken([redacted])");
    }

    #[test]
    fn registration_response_accepts_access_token_alias() {
        let resp: RegistrationResponse = serde_json::from_value(serde_json::json!({
            "access_token": "abc",
            "user": { "id": "u1", "name": "Asha", "email": "asha@example.com" }
        }))
        .unwrap();
        assert_eq!(resp.token.expose(), "abc");
        assert_eq!(resp.user.id, "u1");
    }
}
