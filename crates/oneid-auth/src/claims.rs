//! Identity claims extracted from the OneID user-info payload
//!
//! OneID publishes a small, fixed profile. Each field is looked up on its
//! own; a missing field yields an empty claim rather than a failure.

use crate::error::AuthResult;
use crate::payload::{require_object, value_text};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Provider field holding the subject identifier.
pub const SUBJECT_KEY: &str = "sub";
/// Provider field holding the email address.
pub const EMAIL_KEY: &str = "email";
/// Provider field holding the first name.
pub const GIVEN_NAME_KEY: &str = "given_name";
/// Provider field holding the last name.
pub const FAMILY_NAME_KEY: &str = "family_name";
/// Provider field holding the phone number. OneID uses camel case here.
pub const PHONE_NUMBER_KEY: &str = "phoneNumber";

/// Normalized profile fields for the authenticated user.
///
/// # Example
///
/// ```rust
/// use oneid_auth::IdentityClaims;
/// use serde_json::json;
///
/// let profile = json!({ "sub": "user-1", "email": "user@example.com" });
/// let claims = IdentityClaims::extract(Some(&profile)).unwrap();
///
/// assert_eq!(claims.id, "user-1");
/// assert_eq!(claims.given_name, "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// User identifier (`sub`)
    pub id: String,

    /// User email address
    pub email: String,

    /// First name
    pub given_name: String,

    /// Last name
    pub family_name: String,

    /// Phone number
    pub phone_number: String,
}

impl IdentityClaims {
    /// Extract claims from a raw user-info payload.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::InvalidArgument`] when the payload is
    /// absent, `null`, or not a JSON object. Missing fields never fail.
    pub fn extract(raw: Option<&Value>) -> AuthResult<Self> {
        let profile = require_object("profile", raw)?;

        Ok(Self {
            id: claim(profile, SUBJECT_KEY),
            email: claim(profile, EMAIL_KEY),
            given_name: claim(profile, GIVEN_NAME_KEY),
            family_name: claim(profile, FAMILY_NAME_KEY),
            phone_number: claim(profile, PHONE_NUMBER_KEY),
        })
    }

    /// Standard OIDC claim names paired with their non-empty values.
    ///
    /// Host principal builders can feed these straight into their identity
    /// type. Empty claims are skipped.
    pub fn to_claim_pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("sub", self.id.as_str()),
            ("email", self.email.as_str()),
            ("given_name", self.given_name.as_str()),
            ("family_name", self.family_name.as_str()),
            ("phone_number", self.phone_number.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .collect()
    }
}

fn claim(profile: &Map<String, Value>, key: &str) -> String {
    profile.get(key).and_then(value_text).unwrap_or_default()
}
