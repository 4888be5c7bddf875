//! Authentication context assembly
//!
//! Combines the parsed token response, the identity claims, and (when saving
//! is enabled) the selected token entries into a single value handed to the
//! host. Construction either fully succeeds or fails; there is no partially
//! built context.
//!
//! # Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use oneid_auth::{ContextBuilder, FixedClock, OneIdOptions, TokenSaveSelector};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let builder = ContextBuilder::new(OneIdOptions::saving(TokenSaveSelector::all()))
//!     .with_clock(Arc::new(FixedClock(now)));
//!
//! let tokens = json!({ "access_token": "at", "token_type": "Bearer", "expires_in": 3600 });
//! let profile = json!({ "sub": "user-1", "email": "user@example.com" });
//!
//! let context = builder.build(Some(&tokens), Some(&profile)).unwrap();
//! assert_eq!(context.email(), "user@example.com");
//! assert_eq!(context.persisted_tokens().map(|t| t.len()), Some(3));
//! ```

use crate::claims::IdentityClaims;
use crate::clock::{Clock, SystemClock};
use crate::config::OneIdOptions;
use crate::error::{AuthError, AuthResult};
use crate::id_token;
use crate::persistence::{self, PersistedTokenEntry, TokenSaveSelector};
use crate::store::TokenStore;
use crate::tokens::TokenEndpointResponse;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Normalized result of a single OneID authentication event.
///
/// Only [`build`] and [`ContextBuilder`] create contexts, so persisted entry
/// names stay unique and ordered. Contexts serialize but never deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticationContext {
    parsed_response: TokenEndpointResponse,
    claims: IdentityClaims,
    #[serde(skip_serializing_if = "Option::is_none")]
    persisted_tokens: Option<Vec<PersistedTokenEntry>>,
}

impl AuthenticationContext {
    /// The token endpoint response as parsed.
    pub fn parsed_response(&self) -> &TokenEndpointResponse {
        &self.parsed_response
    }

    /// The identity claims.
    pub fn claims(&self) -> &IdentityClaims {
        &self.claims
    }

    /// Entries to forward to the host's token store.
    ///
    /// `None` when saving was disabled; `Some` (possibly empty) otherwise.
    pub fn persisted_tokens(&self) -> Option<&[PersistedTokenEntry]> {
        self.persisted_tokens.as_deref()
    }

    /// Forward the persisted entries to a token store.
    ///
    /// Returns `false` and leaves the store untouched when saving was disabled.
    pub fn store_tokens<S: TokenStore + ?Sized>(&self, store: &mut S) -> bool {
        match &self.persisted_tokens {
            Some(entries) => {
                store.store_tokens(entries);
                true
            }
            None => false,
        }
    }

    /// Access token from the token response.
    pub fn access_token(&self) -> Option<&str> {
        self.parsed_response.access_token.as_deref()
    }

    /// Refresh token from the token response.
    pub fn refresh_token(&self) -> Option<&str> {
        self.parsed_response.refresh_token.as_deref()
    }

    /// Id token from the token response.
    pub fn identity_token(&self) -> Option<&str> {
        self.parsed_response.id_token.as_deref()
    }

    /// User identifier.
    pub fn id(&self) -> &str {
        &self.claims.id
    }

    /// User email address.
    pub fn email(&self) -> &str {
        &self.claims.email
    }

    /// First name.
    pub fn given_name(&self) -> &str {
        &self.claims.given_name
    }

    /// Last name.
    pub fn family_name(&self) -> &str {
        &self.claims.family_name
    }

    /// Phone number.
    pub fn phone_number(&self) -> &str {
        &self.claims.phone_number
    }
}

/// Build an authentication context from raw payloads.
///
/// # Arguments
///
/// * `raw_tokens` - Token endpoint payload
/// * `raw_profile` - User-info payload
/// * `selector` - Optional tokens to save
/// * `persistence_enabled` - Whether any token entries are produced
/// * `now` - Instant the expiry is computed from
///
/// # Errors
///
/// Returns [`AuthError::InvalidArgument`] when either payload is absent,
/// `null`, or not a JSON object.
pub fn build(
    raw_tokens: Option<&Value>,
    raw_profile: Option<&Value>,
    selector: &TokenSaveSelector,
    persistence_enabled: bool,
    now: DateTime<Utc>,
) -> AuthResult<AuthenticationContext> {
    let parsed_response = TokenEndpointResponse::parse(raw_tokens)?;
    assemble(parsed_response, raw_profile, selector, persistence_enabled, now)
}

fn assemble(
    parsed_response: TokenEndpointResponse,
    raw_profile: Option<&Value>,
    selector: &TokenSaveSelector,
    persistence_enabled: bool,
    now: DateTime<Utc>,
) -> AuthResult<AuthenticationContext> {
    let claims = IdentityClaims::extract(raw_profile)?;

    let persisted_tokens =
        persistence_enabled.then(|| persistence::select(&parsed_response, selector, now));

    debug!(
        subject = %claims.id,
        persisted = persisted_tokens.as_ref().map_or(0, Vec::len),
        "Built OneID authentication context"
    );

    Ok(AuthenticationContext {
        parsed_response,
        claims,
        persisted_tokens,
    })
}

/// Builds authentication contexts from configured options and a clock.
#[derive(Clone)]
pub struct ContextBuilder {
    options: OneIdOptions,
    clock: Arc<dyn Clock>,
}

impl ContextBuilder {
    /// Create a builder using the system clock.
    pub fn new(options: OneIdOptions) -> Self {
        Self {
            options,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The configured options.
    pub fn options(&self) -> &OneIdOptions {
        &self.options
    }

    /// Build a context from a token payload and a user-info payload.
    pub fn build(
        &self,
        raw_tokens: Option<&Value>,
        raw_profile: Option<&Value>,
    ) -> AuthResult<AuthenticationContext> {
        build(
            raw_tokens,
            raw_profile,
            &self.options.token_save,
            self.options.save_tokens,
            self.clock.now(),
        )
    }

    /// Build a context taking the profile from the response's id token.
    ///
    /// The id token is decoded without verification.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidArgument`] when the token payload is
    /// unusable or carries no id token, and [`AuthError::InvalidToken`] when
    /// the id token cannot be decoded.
    pub fn build_from_id_token(
        &self,
        raw_tokens: Option<&Value>,
    ) -> AuthResult<AuthenticationContext> {
        let parsed_response = TokenEndpointResponse::parse(raw_tokens)?;

        let profile = match parsed_response.id_token.as_deref() {
            Some(token) if !token.is_empty() => id_token::decode_payload(token)?,
            _ => {
                return Err(AuthError::invalid_argument(
                    "tokens",
                    "response carries no id_token",
                ))
            }
        };

        assemble(
            parsed_response,
            Some(&profile),
            &self.options.token_save,
            self.options.save_tokens,
            self.clock.now(),
        )
    }
}

impl fmt::Debug for ContextBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextBuilder")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
