//! Nullable ownership registry: an in-memory enumerable credential ledger.

use coffer_governance::OwnershipRegistry;
use coffer_types::{CredentialId, Identity};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
struct Ledger {
    holdings: HashMap<Identity, Vec<CredentialId>>,
    next_id: u64,
}

/// In-memory credential registry.
///
/// Credentials are minted with sequential ids starting at zero. Transfers
/// remove by swap, so enumeration order changes the way an enumerable token
/// contract's does.
#[derive(Default)]
pub struct NullRegistry {
    ledger: Mutex<Ledger>,
}

impl NullRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint one credential to `owner`.
    pub fn mint(&self, owner: &Identity) -> CredentialId {
        let mut ledger = self.ledger.lock().unwrap();
        let id = CredentialId(ledger.next_id);
        ledger.next_id += 1;
        ledger.holdings.entry(*owner).or_default().push(id);
        id
    }

    /// Mint `count` credentials to `owner`.
    pub fn mint_many(&self, owner: &Identity, count: u64) -> Vec<CredentialId> {
        (0..count).map(|_| self.mint(owner)).collect()
    }

    pub fn owner_of(&self, credential: CredentialId) -> Option<Identity> {
        self.ledger
            .lock()
            .unwrap()
            .holdings
            .iter()
            .find(|(_, held)| held.contains(&credential))
            .map(|(owner, _)| *owner)
    }

    /// Move `credential` to `to`. Returns false if nobody holds it.
    pub fn transfer(&self, credential: CredentialId, to: &Identity) -> bool {
        let mut ledger = self.ledger.lock().unwrap();
        let Some(from) = ledger
            .holdings
            .iter()
            .find(|(_, held)| held.contains(&credential))
            .map(|(owner, _)| *owner)
        else {
            return false;
        };
        if let Some(held) = ledger.holdings.get_mut(&from) {
            if let Some(pos) = held.iter().position(|c| *c == credential) {
                held.swap_remove(pos);
            }
            if held.is_empty() {
                ledger.holdings.remove(&from);
            }
        }
        ledger.holdings.entry(*to).or_default().push(credential);
        true
    }
}

impl OwnershipRegistry for NullRegistry {
    fn credit_count(&self, owner: &Identity) -> u64 {
        self.ledger
            .lock()
            .unwrap()
            .holdings
            .get(owner)
            .map_or(0, |held| held.len() as u64)
    }

    fn credit_at(&self, owner: &Identity, index: u64) -> Option<CredentialId> {
        let index = usize::try_from(index).ok()?;
        self.ledger
            .lock()
            .unwrap()
            .holdings
            .get(owner)
            .and_then(|held| held.get(index).copied())
    }
}
