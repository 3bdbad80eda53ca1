//! The external market selling the assets proposals target.

use coffer_types::{Amount, AssetId};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MarketError {
    #[error("asset {0} is not available")]
    Unavailable(AssetId),

    #[error("payment of {offered} is below the price of {price}")]
    InsufficientPayment { offered: Amount, price: Amount },

    #[error("purchase rejected: {0}")]
    Rejected(String),
}

/// Price, availability and purchase of listed assets.
///
/// `purchase` may call back into the engine; the engine never holds its own
/// lock across it.
pub trait AssetMarket {
    /// Current price of any listed asset.
    fn price(&self) -> Amount;

    fn is_available(&self, asset: AssetId) -> bool;

    /// Buy `asset`, paying exactly `amount`.
    fn purchase(&self, asset: AssetId, amount: Amount) -> Result<(), MarketError>;
}

impl<T: AssetMarket + ?Sized> AssetMarket for Arc<T> {
    fn price(&self) -> Amount {
        (**self).price()
    }

    fn is_available(&self, asset: AssetId) -> bool {
        (**self).is_available(asset)
    }

    fn purchase(&self, asset: AssetId, amount: Amount) -> Result<(), MarketError> {
        (**self).purchase(asset, amount)
    }
}
