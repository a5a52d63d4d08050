use std::collections::HashMap;
use std::sync::Mutex;

use crate::{CacheError, Result};

/// String-keyed storage shared by the credential, theme and history stores
///
/// Think browser localStorage: no expiry, no capacity limits, one value per
/// key. Implementations must persist synchronously - when `set` returns Ok
/// the value is readable by the next `get`, including from a new process.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn delete(&self, key: &str) -> Result<()>;
}

/// In-memory store for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held
    pub fn len(&self) -> Result<usize> {
        let values = self.values.lock().map_err(|_| CacheError::Poisoned)?;
        Ok(values.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.lock().map_err(|_| CacheError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.lock().map_err(|_| CacheError::Poisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut values = self.values.lock().map_err(|_| CacheError::Poisoned)?;
        values.remove(key);
        Ok(())
    }
}
