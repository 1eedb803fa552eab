//! Credential lookup: where API keys come from.
//!
//! Absence is a normal value, not an error: a missing or blank key simply
//! means the provider that needs it is not available.

use std::collections::HashMap;

/// Resolves a credential by its fixed key name (e.g. `GROQ_API_KEY`).
pub trait CredentialLookup: Send + Sync {
    /// Raw value for `name`, if the store has one.
    fn lookup_credential(&self, name: &str) -> Option<String>;

    /// Value for `name`, treating blank strings as absent.
    fn credential(&self, name: &str) -> Option<String> {
        self.lookup_credential(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Whether a non-blank value exists for `name`.
    fn has_credential(&self, name: &str) -> bool {
        self.credential(name).is_some()
    }
}

impl CredentialLookup for HashMap<String, String> {
    fn lookup_credential(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// A store with no credentials at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentials;

impl CredentialLookup for NoCredentials {
    fn lookup_credential(&self, _name: &str) -> Option<String> {
        None
    }
}
