//! Treasury governance for the coffer DAO.
//!
//! Members holding voting credentials propose purchasing an external asset,
//! vote with one unit of weight per owned credential, and once the voting
//! window closes any member may execute the outcome exactly once:
//! Open → Closed-Pending → Closed-Executed.
//!
//! Key principle: one credential = one vote per proposal (not stake-weighted).
//! Funds leave the treasury only through a passed proposal's purchase or the
//! owner's withdrawal.

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod market;
pub mod owner;
pub mod payout;
pub mod proposal;
pub mod registry;
pub mod store;
pub mod treasury;

pub use clock::{Clock, SystemClock};
pub use config::GovernanceConfig;
pub use engine::{ExecutionOutcome, GovernanceEngine};
pub use error::GovernanceError;
pub use market::{AssetMarket, MarketError};
pub use owner::OwnerCapability;
pub use payout::{Payout, PayoutError};
pub use proposal::{Proposal, ProposalSnapshot, ProposalState, VoteChoice};
pub use registry::OwnershipRegistry;
pub use store::ProposalStore;
pub use treasury::Treasury;
