//! In-memory credential store.

use std::sync::RwLock;

use crate::traits::TokenStore;
use crate::{Credential, Result};

/// A [`TokenStore`] that lives only as long as the process.
///
/// Used by tests and by embedders that persist credentials themselves.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<Credential>>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `credential`.
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            token: RwLock::new(Some(credential)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<Credential> {
        self.token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set(&self, credential: Credential) -> Result<()> {
        *self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(credential);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_overwrites_and_clear_removes() {
        let store = MemoryTokenStore::new();
        assert!(!store.is_logged_in());

        store.set(Credential::parse("first").unwrap()).unwrap();
        store.set(Credential::parse("second").unwrap()).unwrap();
        assert_eq!(store.get().unwrap().as_str(), "second");

        store.clear().unwrap();
        assert!(store.get().is_none());
        store.clear().unwrap();
    }
}
