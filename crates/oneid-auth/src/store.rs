//! Hand-off of persisted token entries to a host token store.
//!
//! Hosts keep tokens in a string property bag attached to the
//! authentication session. [`AuthenticationProperties`] is an in-memory bag
//! using the conventional key layout; hosts with their own storage implement
//! [`TokenStore`] directly.

use crate::persistence::PersistedTokenEntry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Prefix for the item key holding a single token value.
pub const TOKEN_KEY_PREFIX: &str = ".Token.";
/// Item key holding the `;`-separated names of stored tokens.
pub const TOKEN_NAMES_KEY: &str = ".TokenNames";

/// Destination for persisted token entries.
pub trait TokenStore {
    /// Store the entries, replacing any tokens stored earlier.
    fn store_tokens(&mut self, entries: &[PersistedTokenEntry]);
}

/// String property bag for an authentication session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationProperties {
    #[serde(default)]
    items: BTreeMap<String, String>,
}

impl AuthenticationProperties {
    /// Create an empty property bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// All items, including token keys.
    pub fn items(&self) -> &BTreeMap<String, String> {
        &self.items
    }

    /// Get an item by key.
    pub fn get_item(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    /// Set an item, or remove it when `value` is `None`.
    pub fn set_item(&mut self, key: impl Into<String>, value: Option<String>) {
        let key = key.into();
        match value {
            Some(value) => {
                self.items.insert(key, value);
            }
            None => {
                self.items.remove(&key);
            }
        }
    }

    /// Names of the stored tokens, in the order they were stored.
    pub fn token_names(&self) -> Vec<&str> {
        self.get_item(TOKEN_NAMES_KEY)
            .map(|names| names.split(';').filter(|n| !n.is_empty()).collect())
            .unwrap_or_default()
    }

    /// Get a stored token value by name.
    pub fn get_token_value(&self, name: &str) -> Option<&str> {
        self.get_item(&token_key(name))
    }

    /// Stored tokens as entries, in the order they were stored.
    pub fn get_tokens(&self) -> Vec<PersistedTokenEntry> {
        self.token_names()
            .into_iter()
            .filter_map(|name| {
                self.get_token_value(name).map(|value| PersistedTokenEntry {
                    name: name.to_string(),
                    value: value.to_string(),
                })
            })
            .collect()
    }
}

impl TokenStore for AuthenticationProperties {
    fn store_tokens(&mut self, entries: &[PersistedTokenEntry]) {
        let previous: Vec<String> = self.token_names().into_iter().map(token_key).collect();
        for key in previous {
            self.items.remove(&key);
        }

        let mut names = Vec::with_capacity(entries.len());
        for entry in entries {
            self.items.insert(token_key(&entry.name), entry.value.clone());
            names.push(entry.name.as_str());
        }

        self.items
            .insert(TOKEN_NAMES_KEY.to_string(), names.join(";"));
    }
}

fn token_key(name: &str) -> String {
    format!("{}{}", TOKEN_KEY_PREFIX, name)
}
