//! Token endpoint response parsing
//!
//! The token endpoint's reply is kept verbatim: no field is validated,
//! defaulted, or interpreted here. Interpretation (expiry math, what to
//! persist) happens in [`crate::persistence`].

use crate::error::AuthResult;
use crate::payload::{require_object, value_text};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Raw fields returned by the OneID token endpoint.
///
/// Every field is optional text. Providers send `expires_in` as a JSON
/// number, so numeric and boolean values are carried in their textual form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenEndpointResponse {
    /// Access token
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub access_token: Option<String>,

    /// Refresh token (if issued)
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub refresh_token: Option<String>,

    /// Token type (usually "Bearer")
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub token_type: Option<String>,

    /// Lifetime of the access token in seconds, as sent
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires_in: Option<String>,

    /// OIDC id token
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub id_token: Option<String>,
}

impl TokenEndpointResponse {
    /// Parse a raw token endpoint payload.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::InvalidArgument`] when the payload is absent,
    /// `null`, or not a JSON object.
    pub fn parse(raw: Option<&Value>) -> AuthResult<Self> {
        let object = require_object("tokens", raw)?;
        let mut response = Self::default();

        for (key, value) in object {
            let slot = match key.as_str() {
                "access_token" => &mut response.access_token,
                "refresh_token" => &mut response.refresh_token,
                "token_type" => &mut response.token_type,
                "expires_in" => &mut response.expires_in,
                "id_token" => &mut response.id_token,
                _ => continue,
            };
            *slot = value_text(value);
        }

        Ok(response)
    }

    /// Translate a token response from the `oauth2` crate.
    ///
    /// The id token is taken from the extra token fields when they carry an
    /// `id_token` entry (as OIDC responses do).
    #[cfg(feature = "oauth")]
    pub fn from_oauth2<EF, TT>(response: &oauth2::StandardTokenResponse<EF, TT>) -> Self
    where
        EF: oauth2::ExtraTokenFields,
        TT: oauth2::TokenType,
    {
        use oauth2::TokenResponse;

        Self {
            access_token: Some(response.access_token().secret().clone()),
            refresh_token: response.refresh_token().map(|t| t.secret().clone()),
            token_type: serialized_text(response.token_type()),
            expires_in: response.expires_in().map(|d| d.as_secs().to_string()),
            id_token: serde_json::to_value(response.extra_fields())
                .ok()
                .as_ref()
                .and_then(|extra| extra.get("id_token"))
                .and_then(value_text),
        }
    }
}

#[cfg(feature = "oauth")]
fn serialized_text<T: Serialize>(value: &T) -> Option<String> {
    serde_json::to_value(value).ok().as_ref().and_then(value_text)
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_text))
}
