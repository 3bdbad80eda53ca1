//! Outbound fund transfers to an identity.

use coffer_types::{Amount, Identity};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PayoutError {
    #[error("recipient {0} refused the transfer")]
    Refused(Identity),

    #[error("transfer failed: {0}")]
    Failed(String),
}

/// Moves funds out of the treasury to a recipient.
pub trait Payout {
    fn pay(&self, to: &Identity, amount: Amount) -> Result<(), PayoutError>;
}

impl<T: Payout + ?Sized> Payout for Arc<T> {
    fn pay(&self, to: &Identity, amount: Amount) -> Result<(), PayoutError> {
        (**self).pay(to, amount)
    }
}
