//! Governance proposals and their lifecycle.

use crate::error::GovernanceError;
use coffer_types::{AssetId, CredentialId, Identity, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which side a vote counts towards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteChoice {
    Yay,
    Nay,
}

/// Where a proposal sits in its lifecycle at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalState {
    /// Before the deadline: votes accepted.
    Open,
    /// Deadline reached, not yet executed.
    ClosedPending,
    /// Executed. Terminal.
    ClosedExecuted,
}

/// A request to purchase one asset from the market.
///
/// Fields are only writable inside the crate: tallies grow through
/// [`Proposal::record_vote`] and the executed flag is only ever set.
#[derive(Clone, Debug)]
pub struct Proposal {
    pub(crate) id: ProposalId,
    /// The asset bought if the proposal passes.
    pub(crate) asset: AssetId,
    /// Voting closes and execution opens at this instant.
    pub(crate) deadline: Timestamp,
    pub(crate) yay: u64,
    pub(crate) nay: u64,
    executed: bool,
    /// Credentials already spent on this proposal.
    voted: HashSet<CredentialId>,
}

impl Proposal {
    pub fn new(id: ProposalId, asset: AssetId, deadline: Timestamp) -> Self {
        Self {
            id,
            asset,
            deadline,
            yay: 0,
            nay: 0,
            executed: false,
            voted: HashSet::new(),
        }
    }

    pub fn id(&self) -> ProposalId {
        self.id
    }

    pub fn asset(&self) -> AssetId {
        self.asset
    }

    pub fn deadline(&self) -> Timestamp {
        self.deadline
    }

    pub fn yay(&self) -> u64 {
        self.yay
    }

    pub fn nay(&self) -> u64 {
        self.nay
    }

    pub fn executed(&self) -> bool {
        self.executed
    }

    /// Terminal transition. There is no way back.
    pub(crate) fn mark_executed(&mut self) {
        self.executed = true;
    }

    pub fn state(&self, now: Timestamp) -> ProposalState {
        if self.executed {
            ProposalState::ClosedExecuted
        } else if self.deadline.has_passed(now) {
            ProposalState::ClosedPending
        } else {
            ProposalState::Open
        }
    }

    pub fn is_open(&self, now: Timestamp) -> bool {
        self.state(now) == ProposalState::Open
    }

    /// Strict majority of cast weight. A tie is a rejection.
    pub fn passed(&self) -> bool {
        self.yay > self.nay
    }

    pub fn has_voted(&self, credential: CredentialId) -> bool {
        self.voted.contains(&credential)
    }

    pub fn voter_count(&self) -> usize {
        self.voted.len()
    }

    /// Spend every credential in `credentials` not yet used on this proposal.
    ///
    /// Returns the weight applied. Either all fresh credentials are marked and
    /// the tally grows by their count, or nothing changes.
    pub(crate) fn record_vote(
        &mut self,
        voter: &Identity,
        credentials: &[CredentialId],
        choice: VoteChoice,
    ) -> Result<u64, GovernanceError> {
        let fresh: HashSet<CredentialId> = credentials
            .iter()
            .copied()
            .filter(|c| !self.voted.contains(c))
            .collect();
        if fresh.is_empty() {
            return Err(GovernanceError::AlreadyVoted {
                proposal: self.id,
                voter: *voter,
            });
        }
        let weight = fresh.len() as u64;
        let tally = match choice {
            VoteChoice::Yay => &mut self.yay,
            VoteChoice::Nay => &mut self.nay,
        };
        *tally = tally.checked_add(weight).ok_or(GovernanceError::Overflow)?;
        self.voted.extend(fresh);
        Ok(weight)
    }

    pub fn snapshot(&self, now: Timestamp) -> ProposalSnapshot {
        ProposalSnapshot {
            id: self.id,
            asset: self.asset,
            deadline: self.deadline,
            yay: self.yay,
            nay: self.nay,
            executed: self.executed,
            voters: self.voted.len(),
            state: self.state(now),
        }
    }
}

/// Read-only view of a proposal handed to callers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalSnapshot {
    pub id: ProposalId,
    pub asset: AssetId,
    pub deadline: Timestamp,
    pub yay: u64,
    pub nay: u64,
    pub executed: bool,
    /// Number of credentials that have voted.
    pub voters: usize,
    pub state: ProposalState,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(ids: &[u64]) -> Vec<CredentialId> {
        ids.iter().copied().map(CredentialId).collect()
    }

    fn proposal() -> Proposal {
        Proposal::new(ProposalId(0), AssetId(7), Timestamp::new(300))
    }

    #[test]
    fn state_follows_deadline_and_flag() {
        let mut p = proposal();
        assert_eq!(p.state(Timestamp::new(299)), ProposalState::Open);
        assert_eq!(p.state(Timestamp::new(300)), ProposalState::ClosedPending);
        p.mark_executed();
        assert_eq!(p.state(Timestamp::new(10_000)), ProposalState::ClosedExecuted);
        assert!(p.executed());
    }

    #[test]
    fn vote_weight_is_fresh_credential_count() {
        let mut p = proposal();
        let voter = Identity::from_seed(1);
        assert_eq!(p.record_vote(&voter, &creds(&[1, 2, 3]), VoteChoice::Yay).unwrap(), 3);
        assert_eq!(p.yay, 3);
        assert_eq!(p.nay, 0);
        assert!(p.has_voted(CredentialId(2)));
    }

    #[test]
    fn spent_credentials_add_nothing() {
        let mut p = proposal();
        let voter = Identity::from_seed(1);
        p.record_vote(&voter, &creds(&[1, 2]), VoteChoice::Yay).unwrap();
        let weight = p.record_vote(&voter, &creds(&[1, 2, 3]), VoteChoice::Nay).unwrap();
        assert_eq!(weight, 1);
        assert_eq!((p.yay, p.nay), (2, 1));
    }

    #[test]
    fn all_spent_is_rejected_without_mutation() {
        let mut p = proposal();
        let voter = Identity::from_seed(1);
        p.record_vote(&voter, &creds(&[1, 2]), VoteChoice::Yay).unwrap();
        let err = p.record_vote(&voter, &creds(&[2, 1]), VoteChoice::Nay).unwrap_err();
        assert_eq!(err.code(), "already_voted");
        assert_eq!((p.yay, p.nay), (2, 0));
        assert_eq!(p.voter_count(), 2);
    }

    #[test]
    fn duplicate_enumeration_counts_once() {
        let mut p = proposal();
        let weight = p
            .record_vote(&Identity::from_seed(1), &creds(&[5, 5, 5]), VoteChoice::Nay)
            .unwrap();
        assert_eq!(weight, 1);
        assert_eq!(p.nay, 1);
    }

    #[test]
    fn overflow_leaves_proposal_untouched() {
        let mut p = proposal();
        p.yay = u64::MAX;
        let err = p
            .record_vote(&Identity::from_seed(1), &creds(&[1]), VoteChoice::Yay)
            .unwrap_err();
        assert_eq!(err, GovernanceError::Overflow);
        assert!(!p.has_voted(CredentialId(1)));
    }

    #[test]
    fn tie_does_not_pass() {
        let mut p = proposal();
        p.yay = 5;
        p.nay = 5;
        assert!(!p.passed());
        p.yay = 6;
        assert!(p.passed());
    }
}
