//! Authoritative proposal storage.

use crate::proposal::Proposal;
use coffer_types::{AssetId, ProposalId, Timestamp};

/// Every proposal ever created, indexed densely by id.
///
/// Ids are assigned `0, 1, 2, …` and never reused; proposals are never removed,
/// so the next id always equals the number of proposals.
#[derive(Debug, Default)]
pub struct ProposalStore {
    proposals: Vec<Proposal>,
}

impl ProposalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next proposal.
    pub fn create(&mut self, asset: AssetId, deadline: Timestamp) -> ProposalId {
        let id = self.next_id();
        self.proposals.push(Proposal::new(id, asset, deadline));
        id
    }

    pub fn next_id(&self) -> ProposalId {
        ProposalId(self.proposals.len() as u64)
    }

    pub fn count(&self) -> u64 {
        self.proposals.len() as u64
    }

    pub fn get(&self, id: ProposalId) -> Option<&Proposal> {
        usize::try_from(id.0).ok().and_then(|i| self.proposals.get(i))
    }

    pub(crate) fn get_mut(&mut self, id: ProposalId) -> Option<&mut Proposal> {
        usize::try_from(id.0)
            .ok()
            .and_then(|i| self.proposals.get_mut(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.iter()
    }
}
