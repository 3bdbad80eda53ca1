//! Scenario files: a scripted sequence of governance actions replayed
//! against an engine wired to the nullable collaborators.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use coffer_governance::{
    ExecutionOutcome, GovernanceConfig, GovernanceEngine, GovernanceError, ProposalSnapshot,
    VoteChoice,
};
use coffer_nullables::{NullClock, NullMarket, NullPayout, NullRegistry};
use coffer_types::{Amount, AssetId, CredentialId, Identity, ProposalId};

fn default_price() -> u64 {
    100
}

fn default_count() -> u64 {
    1
}

/// A scripted run.
#[derive(Clone, Debug, Deserialize)]
pub struct Scenario {
    /// Holder of the withdrawal capability.
    pub owner: Identity,
    /// Initial market price of every asset.
    #[serde(default = "default_price")]
    pub price: u64,
    /// Clock reading when the run starts.
    #[serde(default)]
    pub start_time: u64,
    /// Credentials minted before the first step.
    #[serde(default)]
    pub members: Vec<MemberSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MemberSpec {
    pub identity: Identity,
    #[serde(default = "default_count")]
    pub credentials: u64,
}

/// One action plus the result the author expects from it.
#[derive(Clone, Debug, Deserialize)]
pub struct Step {
    #[serde(flatten)]
    pub action: Action,
    /// `"ok"` or an error code such as `"already_voted"`.
    #[serde(default)]
    pub expect: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Mint {
        to: Identity,
        #[serde(default = "default_count")]
        count: u64,
    },
    Transfer {
        credential: u64,
        to: Identity,
    },
    Create {
        caller: Identity,
        asset: u64,
    },
    Vote {
        caller: Identity,
        proposal: u64,
        choice: VoteChoice,
    },
    Advance {
        secs: u64,
    },
    Execute {
        caller: Identity,
        proposal: u64,
    },
    Deposit {
        amount: u64,
    },
    Withdraw {
        caller: Identity,
    },
    TransferOwnership {
        caller: Identity,
        new_owner: Identity,
    },
    Withhold {
        asset: u64,
    },
    SetPrice {
        price: u64,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mint { .. } => "mint",
            Self::Transfer { .. } => "transfer",
            Self::Create { .. } => "create",
            Self::Vote { .. } => "vote",
            Self::Advance { .. } => "advance",
            Self::Execute { .. } => "execute",
            Self::Deposit { .. } => "deposit",
            Self::Withdraw { .. } => "withdraw",
            Self::TransferOwnership { .. } => "transfer_ownership",
            Self::Withhold { .. } => "withhold",
            Self::SetPrice { .. } => "set_price",
        }
    }
}

impl Scenario {
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("invalid scenario")
    }

    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::from_toml_str(&content)
    }
}

/// How one step went.
#[derive(Clone, Debug, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub action: &'static str,
    /// `"ok"` or the error code.
    pub result: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    pub matched: bool,
}

/// Everything a run produced.
#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub voting_window: String,
    pub steps: Vec<StepReport>,
    pub proposals: Vec<ProposalSnapshot>,
    pub treasury: Amount,
    pub owner: Identity,
    pub purchases: Vec<(AssetId, Amount)>,
    pub payouts: Vec<(Identity, Amount)>,
}

impl Report {
    /// Steps whose result differed from their `expect`.
    pub fn mismatches(&self) -> usize {
        self.steps.iter().filter(|s| !s.matched).count()
    }
}

type Engine = GovernanceEngine<Arc<NullRegistry>, Arc<NullMarket>, Arc<NullClock>>;

/// An engine plus handles on its collaborators.
pub struct Simulation {
    engine: Engine,
    registry: Arc<NullRegistry>,
    market: Arc<NullMarket>,
    clock: Arc<NullClock>,
    payout: NullPayout,
}

impl Simulation {
    pub fn new(scenario: &Scenario, config: GovernanceConfig) -> Result<Self, GovernanceError> {
        let registry = Arc::new(NullRegistry::new());
        let market = Arc::new(NullMarket::new(Amount::from(scenario.price)));
        let clock = Arc::new(NullClock::new(scenario.start_time));
        let engine = GovernanceEngine::new(
            config,
            scenario.owner,
            Arc::clone(&registry),
            Arc::clone(&market),
            Arc::clone(&clock),
        )?;
        for member in &scenario.members {
            registry.mint_many(&member.identity, member.credentials);
        }
        Ok(Self {
            engine,
            registry,
            market,
            clock,
            payout: NullPayout::new(),
        })
    }

    /// Apply one action. `Ok` carries a short description of what happened.
    pub fn apply(&self, action: &Action) -> Result<String, (String, String)> {
        let governance = |e: GovernanceError| (e.code().to_string(), e.to_string());
        match action {
            Action::Mint { to, count } => {
                let minted = self.registry.mint_many(to, *count);
                let ids: Vec<u64> = minted.iter().map(|c| c.0).collect();
                Ok(format!("minted credentials {ids:?} to {to}"))
            }
            Action::Transfer { credential, to } => {
                if self.registry.transfer(CredentialId(*credential), to) {
                    Ok(format!("credential {credential} now held by {to}"))
                } else {
                    Err((
                        "unknown_credential".to_string(),
                        format!("credential {credential} was never minted"),
                    ))
                }
            }
            Action::Create { caller, asset } => self
                .engine
                .create_proposal(caller, AssetId(*asset))
                .map(|id| format!("created proposal {id}"))
                .map_err(governance),
            Action::Vote {
                caller,
                proposal,
                choice,
            } => self
                .engine
                .vote(ProposalId(*proposal), caller, *choice)
                .map(|weight| format!("{choice:?} with weight {weight}"))
                .map_err(governance),
            Action::Advance { secs } => {
                self.clock.advance(*secs);
                Ok(format!(
                    "clock advanced {}",
                    coffer_utils::format_duration(*secs)
                ))
            }
            Action::Execute { caller, proposal } => self
                .engine
                .execute(ProposalId(*proposal), caller)
                .map(|outcome| match outcome {
                    ExecutionOutcome::Purchased { asset, price } => {
                        format!("purchased asset {asset} for {price}")
                    }
                    ExecutionOutcome::Rejected { yay, nay } => {
                        format!("rejected {yay} to {nay}, nothing purchased")
                    }
                })
                .map_err(governance),
            Action::Deposit { amount } => self
                .engine
                .deposit(Amount::from(*amount))
                .map(|balance| format!("treasury now {balance}"))
                .map_err(governance),
            Action::Withdraw { caller } => self
                .engine
                .withdraw(caller, &self.payout)
                .map(|amount| format!("withdrew {amount}"))
                .map_err(governance),
            Action::TransferOwnership { caller, new_owner } => self
                .engine
                .transfer_ownership(caller, *new_owner)
                .map(|()| format!("owner is now {new_owner}"))
                .map_err(governance),
            Action::Withhold { asset } => {
                self.market.withhold(AssetId(*asset));
                Ok(format!("asset {asset} delisted"))
            }
            Action::SetPrice { price } => {
                self.market.set_price(Amount::from(*price));
                Ok(format!("price set to {price}"))
            }
        }
    }

    pub fn report(&self, steps: Vec<StepReport>) -> Report {
        Report {
            voting_window: coffer_utils::format_duration(self.engine.voting_window().as_secs()),
            steps,
            proposals: self.engine.proposals(),
            treasury: self.engine.treasury_balance(),
            owner: self.engine.owner(),
            purchases: self.market.purchases(),
            payouts: self.payout.payments(),
        }
    }
}

/// Replay `scenario` from a fresh engine.
pub fn run(scenario: &Scenario, config: GovernanceConfig) -> anyhow::Result<Report> {
    let simulation = Simulation::new(scenario, config).context("failed to build engine")?;
    let mut steps = Vec::with_capacity(scenario.steps.len());
    for (index, step) in scenario.steps.iter().enumerate() {
        let (result, detail) = match simulation.apply(&step.action) {
            Ok(detail) => ("ok".to_string(), detail),
            Err(failure) => failure,
        };
        let matched = step.expect.as_deref().is_none_or(|want| want == result);
        if !matched {
            tracing::warn!(
                step = index,
                action = step.action.name(),
                expected = step.expect.as_deref().unwrap_or_default(),
                got = %result,
                "step did not match expectation"
            );
        }
        steps.push(StepReport {
            index,
            action: step.action.name(),
            result,
            detail,
            expected: step.expect.clone(),
            matched,
        });
    }
    Ok(simulation.report(steps))
}
