//! Fundamental types for the coffer treasury DAO.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! identities, credential/asset/proposal identifiers, fund amounts and timestamps.

pub mod address;
pub mod amount;
pub mod error;
pub mod ids;
pub mod time;

pub use address::Identity;
pub use amount::Amount;
pub use error::ParseError;
pub use ids::{AssetId, CredentialId, ProposalId};
pub use time::Timestamp;
