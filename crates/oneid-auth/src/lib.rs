//! # OneID Authentication
//!
//! This crate builds a normalized authentication context for the OneID
//! identity provider from data the host has already fetched: the token
//! endpoint response and the user-info payload.
//!
//! ## Overview
//!
//! The oneid-auth crate handles:
//! - **Token parsing**: The token endpoint response, kept verbatim
//! - **Claims**: Subject, email, names, and phone number from the profile
//! - **Token persistence**: Which tokens the host session should retain,
//!   including a computed `expires_at` timestamp
//! - **Id tokens**: Reading the profile from an (already validated) id token
//!
//! The OAuth 2.0 flow itself, token validation, and transport stay with the
//! host framework.
//!
//! ## Features
//!
//! - `oauth` (default): conversion from `oauth2` crate token responses
//!
//! ## Usage
//!
//! ```rust
//! use chrono::Utc;
//! use oneid_auth::{build, AuthenticationProperties, TokenSave, TokenSaveSelector};
//! use serde_json::json;
//!
//! let tokens = json!({
//!     "access_token": "at",
//!     "refresh_token": "rt",
//!     "token_type": "Bearer",
//!     "expires_in": 3600,
//! });
//! let profile = json!({ "sub": "user-1", "email": "user@example.com" });
//!
//! let selector = TokenSaveSelector::empty().with(TokenSave::RefreshToken);
//! let context = build(Some(&tokens), Some(&profile), &selector, true, Utc::now()).unwrap();
//!
//! let mut properties = AuthenticationProperties::new();
//! context.store_tokens(&mut properties);
//! assert_eq!(properties.token_names(), vec!["refresh_token", "token_type", "expires_at"]);
//! ```
//!
//! ## Persistence rules
//!
//! - `access_token` and `refresh_token` are saved only when selected
//! - `token_type` and `expires_at` are saved whenever present
//! - An `expires_in` that is not a non-negative integer is skipped with a warning

pub mod claims;
pub mod clock;
pub mod config;
pub mod context;
pub mod error;
pub mod id_token;
mod payload;
pub mod persistence;
pub mod store;
pub mod tokens;

// Re-export main types
pub use claims::IdentityClaims;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::OneIdOptions;
pub use context::{build, AuthenticationContext, ContextBuilder};
pub use error::{AuthError, AuthResult};
pub use persistence::{PersistedTokenEntry, TokenSave, TokenSaveSelector};
pub use store::{AuthenticationProperties, TokenStore};
pub use tokens::TokenEndpointResponse;
