//! OneID provider options.
//!
//! Options are an explicit value handed to [`crate::ContextBuilder`] at
//! construction time. They can be loaded from environment variables with
//! defaults suitable for local development.

use crate::error::{AuthError, AuthResult};
use crate::persistence::TokenSaveSelector;
use serde::{Deserialize, Serialize};

/// Environment variable enabling token persistence.
pub const SAVE_TOKENS_VAR: &str = "ONEID_SAVE_TOKENS";
/// Environment variable listing the tokens to persist.
pub const TOKEN_SAVE_VAR: &str = "ONEID_TOKEN_SAVE";

/// Options controlling how authentication contexts are built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneIdOptions {
    /// Whether token entries are produced for the host's token store
    #[serde(default)]
    pub save_tokens: bool,

    /// Which optional tokens to save when saving is enabled
    #[serde(default)]
    pub token_save: TokenSaveSelector,
}

impl Default for OneIdOptions {
    fn default() -> Self {
        Self {
            save_tokens: false,
            token_save: TokenSaveSelector::all(),
        }
    }
}

impl OneIdOptions {
    /// Create options with saving enabled for the given selector.
    pub fn saving(token_save: TokenSaveSelector) -> Self {
        Self {
            save_tokens: true,
            token_save,
        }
    }

    /// Load options from environment variables.
    ///
    /// Environment variables:
    /// - `ONEID_SAVE_TOKENS`: `true`/`1` or `false`/`0` (default: false)
    /// - `ONEID_TOKEN_SAVE`: comma-separated `access_token`, `refresh_token`,
    ///   or `none` (default: both)
    pub fn from_env() -> AuthResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load options from an arbitrary key lookup, using the same keys as
    /// [`OneIdOptions::from_env`].
    pub fn from_lookup<F>(lookup: F) -> AuthResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();

        let save_tokens = match lookup(SAVE_TOKENS_VAR) {
            Some(value) => parse_bool(SAVE_TOKENS_VAR, &value)?,
            None => default.save_tokens,
        };

        let token_save = match lookup(TOKEN_SAVE_VAR) {
            Some(value) => value.parse()?,
            None => default.token_save,
        };

        Ok(Self {
            save_tokens,
            token_save,
        })
    }
}

fn parse_bool(key: &str, value: &str) -> AuthResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        other => Err(AuthError::ConfigError(format!(
            "Invalid value for {}: {}",
            key, other
        ))),
    }
}
