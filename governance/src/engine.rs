//! Core governance engine: proposals move from open to closed-pending to closed-executed.
//!
//! All engine state (proposal store, treasury, owner, in-flight executions)
//! sits behind a single mutex, so every operation commits atomically with
//! respect to every other. The mutex is never held across a collaborator
//! call: registry and market queries happen before the commit, and the one
//! state-changing external call (the purchase) runs between a treasury
//! reservation and the final commit.

use crate::clock::Clock;
use crate::config::GovernanceConfig;
use crate::error::GovernanceError;
use crate::market::AssetMarket;
use crate::owner::OwnerCapability;
use crate::payout::Payout;
use crate::proposal::{ProposalSnapshot, VoteChoice};
use crate::registry::OwnershipRegistry;
use crate::store::ProposalStore;
use crate::treasury::{Reservation, Treasury};
use coffer_types::{Amount, AssetId, CredentialId, Identity, ProposalId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// What a successful execution did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    /// The proposal passed and the asset was bought.
    Purchased { asset: AssetId, price: Amount },
    /// Tie or nay majority. No funds moved.
    Rejected { yay: u64, nay: u64 },
}

struct EngineState {
    store: ProposalStore,
    treasury: Treasury,
    owner: OwnerCapability,
    /// Proposals whose execution has been claimed but not yet finished.
    in_flight: HashSet<ProposalId>,
}

fn lock(state: &Mutex<EngineState>) -> MutexGuard<'_, EngineState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Exclusive right to execute one proposal. Released on drop, on every path.
struct ExecutionClaim<'a> {
    state: &'a Mutex<EngineState>,
    id: ProposalId,
}

impl Drop for ExecutionClaim<'_> {
    fn drop(&mut self) {
        lock(self.state).in_flight.remove(&self.id);
    }
}

/// Treasury funds held for one outbound transfer. Released on drop unless
/// committed, so a failing or panicking collaborator never strands them.
struct PendingSpend<'a> {
    state: &'a Mutex<EngineState>,
    reservation: Option<Reservation>,
}

impl<'a> PendingSpend<'a> {
    fn new(state: &'a Mutex<EngineState>, reservation: Reservation) -> Self {
        Self {
            state,
            reservation: Some(reservation),
        }
    }

    fn amount(&self) -> Amount {
        self.reservation
            .as_ref()
            .map_or(Amount::ZERO, Reservation::amount)
    }

    /// Debit the treasury. `then` runs under the same lock acquisition.
    fn commit(mut self, then: impl FnOnce(&mut EngineState)) {
        let mut guard = lock(self.state);
        if let Some(reservation) = self.reservation.take() {
            guard.treasury.settle(reservation);
        }
        then(&mut *guard);
    }
}

impl Drop for PendingSpend<'_> {
    fn drop(&mut self) {
        if let Some(reservation) = self.reservation.take() {
            lock(self.state).treasury.release(reservation);
        }
    }
}

fn mark_executed(state: &mut EngineState, id: ProposalId) {
    if let Some(proposal) = state.store.get_mut(id) {
        proposal.mark_executed();
    }
}

/// The treasury-governed decision engine.
pub struct GovernanceEngine<R, M, C> {
    registry: R,
    market: M,
    clock: C,
    config: GovernanceConfig,
    state: Mutex<EngineState>,
}

impl<R, M, C> GovernanceEngine<R, M, C>
where
    R: OwnershipRegistry,
    M: AssetMarket,
    C: Clock,
{
    /// Create an engine with an empty store and treasury.
    pub fn new(
        config: GovernanceConfig,
        owner: Identity,
        registry: R,
        market: M,
        clock: C,
    ) -> Result<Self, GovernanceError> {
        config.validate()?;
        Ok(Self {
            registry,
            market,
            clock,
            config,
            state: Mutex::new(EngineState {
                store: ProposalStore::new(),
                treasury: Treasury::default(),
                owner: OwnerCapability::new(owner),
                in_flight: HashSet::new(),
            }),
        })
    }

    fn state(&self) -> MutexGuard<'_, EngineState> {
        lock(&self.state)
    }

    fn require_member(&self, caller: &Identity) -> Result<(), GovernanceError> {
        if self.registry.credit_count(caller) == 0 {
            tracing::debug!(caller = %caller, "rejected: caller holds no credentials");
            return Err(GovernanceError::NotAMember(*caller));
        }
        Ok(())
    }

    /// Open a proposal to buy `asset`. Returns the new proposal's id.
    pub fn create_proposal(
        &self,
        caller: &Identity,
        asset: AssetId,
    ) -> Result<ProposalId, GovernanceError> {
        self.require_member(caller)?;
        if !self.market.is_available(asset) {
            tracing::debug!(asset = asset.0, "rejected: asset not available");
            return Err(GovernanceError::AssetNotAvailable(asset));
        }
        let deadline = self
            .clock
            .now()
            .plus_secs(self.config.voting_window_secs);
        let id = self.state().store.create(asset, deadline);
        tracing::info!(
            proposal = id.0,
            asset = asset.0,
            deadline = deadline.as_secs(),
            creator = %caller,
            "proposal created"
        );
        Ok(id)
    }

    /// Vote with every credential `caller` owns that has not yet voted on
    /// this proposal. Returns the weight applied.
    pub fn vote(
        &self,
        id: ProposalId,
        caller: &Identity,
        choice: VoteChoice,
    ) -> Result<u64, GovernanceError> {
        self.require_member(caller)?;
        let now = self.clock.now();
        let credentials = self.registry.credentials(caller);

        let mut state = self.state();
        let proposal = state
            .store
            .get_mut(id)
            .filter(|p| p.is_open(now))
            .ok_or(GovernanceError::DeadlineExceeded(id))?;
        let weight = proposal.record_vote(caller, &credentials, choice)?;
        tracing::info!(
            proposal = id.0,
            voter = %caller,
            ?choice,
            weight,
            yay = proposal.yay,
            nay = proposal.nay,
            "vote applied"
        );
        Ok(weight)
    }

    /// Settle a closed proposal exactly once.
    ///
    /// A passed proposal buys its asset at the market's current price; a
    /// rejected one just becomes executed. If the treasury cannot cover the
    /// price, or the purchase fails, nothing changes and the call can be
    /// retried.
    pub fn execute(
        &self,
        id: ProposalId,
        caller: &Identity,
    ) -> Result<ExecutionOutcome, GovernanceError> {
        self.require_member(caller)?;
        let now = self.clock.now();

        let (asset, yay, nay, passed) = {
            let mut guard = self.state();
            let state = &mut *guard;
            let proposal = state
                .store
                .get(id)
                .ok_or(GovernanceError::ProposalNotFound(id))?;
            if !proposal.deadline.has_passed(now) {
                return Err(GovernanceError::DeadlineNotExceeded(id));
            }
            if proposal.executed() {
                return Err(GovernanceError::AlreadyExecuted(id));
            }
            let tally = (proposal.asset, proposal.yay, proposal.nay, proposal.passed());
            if !state.in_flight.insert(id) {
                tracing::debug!(proposal = id.0, "rejected: execution already in flight");
                return Err(GovernanceError::ExecutionInProgress(id));
            }
            tally
        };
        let _claim = ExecutionClaim {
            state: &self.state,
            id,
        };

        if !passed {
            mark_executed(&mut self.state(), id);
            tracing::info!(proposal = id.0, yay, nay, "proposal rejected, executed without purchase");
            return Ok(ExecutionOutcome::Rejected { yay, nay });
        }

        let price = self.market.price();
        let reserved = self.state().treasury.reserve(price);
        let reservation = reserved
            .inspect_err(|e| tracing::debug!(proposal = id.0, error = %e, "execution deferred"))?;
        let spend = PendingSpend::new(&self.state, reservation);

        if let Err(e) = self.market.purchase(asset, price) {
            drop(spend);
            tracing::warn!(proposal = id.0, asset = asset.0, error = %e, "purchase failed");
            return Err(GovernanceError::TransferFailed(e.to_string()));
        }

        spend.commit(|state| mark_executed(state, id));
        tracing::info!(
            proposal = id.0,
            asset = asset.0,
            price = price.raw(),
            "proposal executed, asset purchased"
        );
        Ok(ExecutionOutcome::Purchased { asset, price })
    }

    /// Accept funds from anyone. Returns the new balance.
    pub fn deposit(&self, amount: Amount) -> Result<Amount, GovernanceError> {
        let balance = self.state().treasury.deposit(amount)?;
        tracing::info!(amount = amount.raw(), balance = balance.raw(), "deposit received");
        Ok(balance)
    }

    /// Pay every unreserved unit of the treasury to the owner.
    pub fn withdraw<P: Payout>(
        &self,
        caller: &Identity,
        payout: &P,
    ) -> Result<Amount, GovernanceError> {
        let (owner, reservation) = {
            let mut guard = self.state();
            let state = &mut *guard;
            state.owner.authorize(caller)?;
            let available = state.treasury.available();
            if available.is_zero() {
                return Err(GovernanceError::NothingToWithdraw);
            }
            (state.owner.owner(), state.treasury.reserve(available)?)
        };
        let spend = PendingSpend::new(&self.state, reservation);
        let amount = spend.amount();

        if let Err(e) = payout.pay(&owner, amount) {
            drop(spend);
            tracing::warn!(owner = %owner, error = %e, "withdrawal failed");
            return Err(GovernanceError::TransferFailed(e.to_string()));
        }
        spend.commit(|_| {});
        tracing::info!(owner = %owner, amount = amount.raw(), "treasury withdrawn");
        Ok(amount)
    }

    pub fn transfer_ownership(
        &self,
        caller: &Identity,
        new_owner: Identity,
    ) -> Result<(), GovernanceError> {
        self.state().owner.transfer(caller, new_owner)?;
        tracing::info!(from = %caller, to = %new_owner, "ownership transferred");
        Ok(())
    }

    pub fn proposal_count(&self) -> u64 {
        self.state().store.count()
    }

    pub fn proposal(&self, id: ProposalId) -> Option<ProposalSnapshot> {
        let now = self.clock.now();
        self.state().store.get(id).map(|p| p.snapshot(now))
    }

    pub fn proposals(&self) -> Vec<ProposalSnapshot> {
        let now = self.clock.now();
        self.state().store.iter().map(|p| p.snapshot(now)).collect()
    }

    pub fn has_voted(&self, id: ProposalId, credential: CredentialId) -> bool {
        self.state()
            .store
            .get(id)
            .is_some_and(|p| p.has_voted(credential))
    }

    /// Total funds held, including any reserved for an in-flight transfer.
    pub fn treasury_balance(&self) -> Amount {
        self.state().treasury.balance()
    }

    pub fn available_funds(&self) -> Amount {
        self.state().treasury.available()
    }

    pub fn owner(&self) -> Identity {
        self.state().owner.owner()
    }

    pub fn voting_window(&self) -> Duration {
        self.config.voting_window()
    }
}
