//! Single-owner administrative capability.
//!
//! Independent of credential membership: owning credentials grants nothing
//! here, and the owner needs no credentials to withdraw.

use crate::error::GovernanceError;
use coffer_types::Identity;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnerCapability {
    owner: Identity,
}

impl OwnerCapability {
    pub fn new(owner: Identity) -> Self {
        Self { owner }
    }

    pub fn owner(&self) -> Identity {
        self.owner
    }

    /// Check that `caller` holds the capability.
    pub fn authorize(&self, caller: &Identity) -> Result<(), GovernanceError> {
        if *caller != self.owner {
            return Err(GovernanceError::NotOwner(*caller));
        }
        Ok(())
    }

    /// Hand the capability to `new_owner`. Only the current owner may do this.
    pub fn transfer(&mut self, caller: &Identity, new_owner: Identity) -> Result<(), GovernanceError> {
        self.authorize(caller)?;
        self.owner = new_owner;
        Ok(())
    }
}
