use ravenscan_cache::KeyValueStore;
use std::sync::Arc;

/// Storage key, shared with the web client's localStorage layout
const API_KEY_STORAGE_KEY: &str = "ravenscan-api-key";

/// Persists the single API key used for brand checks
///
/// The value is stored exactly as given, blank included. Whether a key is
/// usable is the caller's call (the search orchestrator refuses blank keys).
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored key, if one was ever set
    pub fn get(&self) -> crate::Result<Option<String>> {
        Ok(self.store.get(API_KEY_STORAGE_KEY)?)
    }

    pub fn set(&self, value: &str) -> crate::Result<()> {
        self.store.set(API_KEY_STORAGE_KEY, value)?;
        Ok(())
    }

    /// Forget the stored key
    pub fn clear(&self) -> crate::Result<()> {
        self.store.delete(API_KEY_STORAGE_KEY)?;
        Ok(())
    }

    /// Stored key if it has something besides whitespace
    pub fn usable_key(&self) -> crate::Result<Option<String>> {
        Ok(self.get()?.filter(|key| !key.trim().is_empty()))
    }
}

/// Render a key for display without giving it away
///
/// Shows the last four characters of keys long enough to keep most of the
/// secret hidden.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }

    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}
