//! Credential ownership lookups.

use coffer_types::{CredentialId, Identity};
use std::sync::Arc;

/// The external registry of voting credentials (an enumerable token contract).
pub trait OwnershipRegistry {
    /// How many credentials `owner` holds right now.
    fn credit_count(&self, owner: &Identity) -> u64;

    /// The credential at `index` in `owner`'s holdings, for
    /// `index < credit_count(owner)`.
    fn credit_at(&self, owner: &Identity, index: u64) -> Option<CredentialId>;

    /// Every credential `owner` holds. Order is unspecified.
    ///
    /// Indices the registry cannot resolve are skipped.
    fn credentials(&self, owner: &Identity) -> Vec<CredentialId> {
        (0..self.credit_count(owner))
            .filter_map(|index| self.credit_at(owner, index))
            .collect()
    }
}

impl<T: OwnershipRegistry + ?Sized> OwnershipRegistry for Arc<T> {
    fn credit_count(&self, owner: &Identity) -> u64 {
        (**self).credit_count(owner)
    }

    fn credit_at(&self, owner: &Identity, index: u64) -> Option<CredentialId> {
        (**self).credit_at(owner, index)
    }

    fn credentials(&self, owner: &Identity) -> Vec<CredentialId> {
        (**self).credentials(owner)
    }
}
