//! Credential store trait.

use crate::{Credential, Result};

/// Process-wide storage for the current [`Credential`].
///
/// Reads are synchronous and must not touch the network or the disk;
/// implementations keep the current value in memory and persist on write.
/// Writes are last-writer-wins.
pub trait TokenStore: Send + Sync {
    /// Returns the current credential, if one is stored.
    fn get(&self) -> Option<Credential>;

    /// Overwrite the stored credential.
    fn set(&self, credential: Credential) -> Result<()>;

    /// Remove the stored credential.
    fn clear(&self) -> Result<()>;

    /// Returns true if a credential is stored.
    fn is_logged_in(&self) -> bool {
        self.get().is_some()
    }
}
