//! Token persistence selection
//!
//! Decides which token artifacts are handed to the host's token store once
//! saving is enabled. Access and refresh tokens are opt-in through a
//! [`TokenSaveSelector`]; the token type and computed expiry are always
//! included when the provider sent them.
//!
//! Entries are produced in a fixed order:
//!
//! ```text
//! access_token -> refresh_token -> token_type -> expires_at
//! ```

use crate::error::AuthError;
use crate::tokens::TokenEndpointResponse;
use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Entry name for the access token.
pub const ACCESS_TOKEN: &str = "access_token";
/// Entry name for the refresh token.
pub const REFRESH_TOKEN: &str = "refresh_token";
/// Entry name for the token type.
pub const TOKEN_TYPE: &str = "token_type";
/// Entry name for the computed expiry timestamp.
pub const EXPIRES_AT: &str = "expires_at";

/// Token artifacts a caller can opt into saving.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TokenSave {
    /// Save the access token
    AccessToken,
    /// Save the refresh token
    RefreshToken,
}

impl TokenSave {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenSave::AccessToken => ACCESS_TOKEN,
            TokenSave::RefreshToken => REFRESH_TOKEN,
        }
    }

    /// Parse from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "access_token" | "accesstoken" => Some(TokenSave::AccessToken),
            "refresh_token" | "refreshtoken" => Some(TokenSave::RefreshToken),
            _ => None,
        }
    }
}

impl fmt::Display for TokenSave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Set of [`TokenSave`] flags chosen by configuration.
///
/// Any combination is allowed, including none. Serializes as a list of
/// snake_case names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSaveSelector(BTreeSet<TokenSave>);

impl TokenSaveSelector {
    /// A selector that saves neither access nor refresh tokens.
    pub fn empty() -> Self {
        Self(BTreeSet::new())
    }

    /// A selector that saves both access and refresh tokens.
    pub fn all() -> Self {
        [TokenSave::AccessToken, TokenSave::RefreshToken]
            .into_iter()
            .collect()
    }

    /// Add a flag.
    pub fn with(mut self, flag: TokenSave) -> Self {
        self.0.insert(flag);
        self
    }

    /// Check whether a flag is set.
    pub fn contains(&self, flag: TokenSave) -> bool {
        self.0.contains(&flag)
    }

    /// Check whether no flag is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the set flags in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = TokenSave> + '_ {
        self.0.iter().copied()
    }
}

impl Default for TokenSaveSelector {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<TokenSave> for TokenSaveSelector {
    fn from_iter<I: IntoIterator<Item = TokenSave>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FromStr for TokenSaveSelector {
    type Err = AuthError;

    /// Parse a comma-separated list such as `access_token,refresh_token`.
    /// Empty parts and `none` select nothing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty() && !part.eq_ignore_ascii_case("none"))
            .map(|part| {
                TokenSave::parse(part).ok_or_else(|| {
                    AuthError::ConfigError(format!("Unknown token save option: {}", part))
                })
            })
            .collect()
    }
}

impl fmt::Display for TokenSaveSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        let names: Vec<&str> = self.iter().map(|flag| flag.as_str()).collect();
        write!(f, "{}", names.join(","))
    }
}

/// A named token value forwarded to the host's token store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedTokenEntry {
    /// One of `access_token`, `refresh_token`, `token_type`, `expires_at`
    pub name: String,

    /// Token value
    pub value: String,
}

impl PersistedTokenEntry {
    fn new(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            value: value.into(),
        }
    }
}

/// Select the token entries to persist.
///
/// `now` is the instant the expiry is computed from; nothing here reads the
/// system clock. A present but unusable `expires_in` is logged and skipped.
pub fn select(
    tokens: &TokenEndpointResponse,
    selector: &TokenSaveSelector,
    now: DateTime<Utc>,
) -> Vec<PersistedTokenEntry> {
    let mut entries = Vec::with_capacity(4);

    if selector.contains(TokenSave::AccessToken) {
        if let Some(access_token) = non_empty(&tokens.access_token) {
            entries.push(PersistedTokenEntry::new(ACCESS_TOKEN, access_token));
        }
    }

    if selector.contains(TokenSave::RefreshToken) {
        if let Some(refresh_token) = non_empty(&tokens.refresh_token) {
            entries.push(PersistedTokenEntry::new(REFRESH_TOKEN, refresh_token));
        }
    }

    if let Some(token_type) = non_empty(&tokens.token_type) {
        entries.push(PersistedTokenEntry::new(TOKEN_TYPE, token_type));
    }

    if let Some(expires_in) = non_empty(&tokens.expires_in) {
        if let Some(expires_at) = expires_at(expires_in, now) {
            entries.push(PersistedTokenEntry::new(EXPIRES_AT, format_round_trip(expires_at)));
        }
    }

    entries
}

/// Compute the absolute expiry for an `expires_in` value.
///
/// Accepts an optional sign and surrounding ASCII whitespace (space, tab,
/// and `\n`, `\v`, `\f`, `\r`). Values outside the 32-bit range, negative
/// values, and non-integers yield `None`.
pub fn expires_at(expires_in: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let seconds = match trim_integer_whitespace(expires_in).parse::<i32>() {
        Ok(seconds) if seconds >= 0 => seconds,
        Ok(_) => {
            warn!(expires_in = %expires_in, "Ignoring negative expires_in");
            return None;
        }
        Err(e) => {
            warn!(expires_in = %expires_in, error = %e, "Ignoring unparseable expires_in");
            return None;
        }
    };

    let expires_at = now.checked_add_signed(Duration::seconds(i64::from(seconds)));
    if expires_at.is_none() {
        warn!(expires_in = %expires_in, "Ignoring expires_in beyond representable time");
    }
    expires_at
}

/// Format a timestamp as an ISO-8601 round-trip string.
///
/// Always UTC with seven fractional digits, e.g. `2024-01-01T01:00:00.0000000Z`,
/// so values sort lexically.
pub fn format_round_trip(timestamp: DateTime<Utc>) -> String {
    let ticks = (timestamp.nanosecond() % 1_000_000_000) / 100;
    format!("{}.{:07}Z", timestamp.format("%Y-%m-%dT%H:%M:%S"), ticks)
}

fn trim_integer_whitespace(s: &str) -> &str {
    s.trim_matches(|c: char| c == ' ' || ('\t'..='\r').contains(&c))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
