use coffer_types::{Amount, AssetId, Identity, ProposalId};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GovernanceError {
    #[error("{0} holds no voting credentials")]
    NotAMember(Identity),

    #[error("asset {0} is not available on the market")]
    AssetNotAvailable(AssetId),

    #[error("voting on proposal {0} is closed or the proposal does not exist")]
    DeadlineExceeded(ProposalId),

    #[error("proposal {0} is still open for voting")]
    DeadlineNotExceeded(ProposalId),

    #[error("proposal {0} has already been executed")]
    AlreadyExecuted(ProposalId),

    #[error("every credential of {voter} has already voted on proposal {proposal}")]
    AlreadyVoted { proposal: ProposalId, voter: Identity },

    #[error("insufficient treasury funds: need {needed}, available {available}")]
    InsufficientFunds { needed: Amount, available: Amount },

    #[error("fund transfer failed: {0}")]
    TransferFailed(String),

    #[error("proposal {0} not found")]
    ProposalNotFound(ProposalId),

    #[error("execution of proposal {0} is already in progress")]
    ExecutionInProgress(ProposalId),

    #[error("{0} is not the owner")]
    NotOwner(Identity),

    #[error("treasury holds nothing to withdraw")]
    NothingToWithdraw,

    #[error("arithmetic overflow")]
    Overflow,

    #[error("configuration error: {0}")]
    Config(String),
}

impl GovernanceError {
    /// Stable snake_case tag for reports and scenario expectations.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotAMember(_) => "not_a_member",
            Self::AssetNotAvailable(_) => "asset_not_available",
            Self::DeadlineExceeded(_) => "deadline_exceeded",
            Self::DeadlineNotExceeded(_) => "deadline_not_exceeded",
            Self::AlreadyExecuted(_) => "already_executed",
            Self::AlreadyVoted { .. } => "already_voted",
            Self::InsufficientFunds { .. } => "insufficient_funds",
            Self::TransferFailed(_) => "transfer_failed",
            Self::ProposalNotFound(_) => "proposal_not_found",
            Self::ExecutionInProgress(_) => "execution_in_progress",
            Self::NotOwner(_) => "not_owner",
            Self::NothingToWithdraw => "nothing_to_withdraw",
            Self::Overflow => "overflow",
            Self::Config(_) => "config",
        }
    }
}
