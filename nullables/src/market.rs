//! Nullable asset market: a fixed-price marketplace kept in memory.

use coffer_governance::{AssetMarket, MarketError};
use coffer_types::{Amount, AssetId};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Callback run inside `purchase`, before the sale is recorded.
pub type PurchaseHook = Arc<dyn Fn(AssetId) + Send + Sync>;

/// In-memory market where every asset is listed until it is sold or withheld.
pub struct NullMarket {
    price: Mutex<Amount>,
    sold: Mutex<HashSet<AssetId>>,
    withheld: Mutex<HashSet<AssetId>>,
    purchases: Mutex<Vec<(AssetId, Amount)>>,
    fail_next: Mutex<Option<MarketError>>,
    hook: Mutex<Option<PurchaseHook>>,
}

impl NullMarket {
    pub fn new(price: Amount) -> Self {
        Self {
            price: Mutex::new(price),
            sold: Mutex::new(HashSet::new()),
            withheld: Mutex::new(HashSet::new()),
            purchases: Mutex::new(Vec::new()),
            fail_next: Mutex::new(None),
            hook: Mutex::new(None),
        }
    }

    pub fn set_price(&self, price: Amount) {
        *self.price.lock().unwrap() = price;
    }

    /// Delist `asset` without selling it.
    pub fn withhold(&self, asset: AssetId) {
        self.withheld.lock().unwrap().insert(asset);
    }

    /// Make the next purchase fail with `error`.
    pub fn fail_next_purchase(&self, error: MarketError) {
        *self.fail_next.lock().unwrap() = Some(error);
    }

    /// Run `hook` during every purchase, before the sale is recorded. Used to
    /// simulate a market that calls back into its buyer.
    pub fn set_purchase_hook(&self, hook: impl Fn(AssetId) + Send + Sync + 'static) {
        *self.hook.lock().unwrap() = Some(Arc::new(hook));
    }

    /// Completed purchases, in order.
    pub fn purchases(&self) -> Vec<(AssetId, Amount)> {
        self.purchases.lock().unwrap().clone()
    }

    pub fn is_sold(&self, asset: AssetId) -> bool {
        self.sold.lock().unwrap().contains(&asset)
    }
}

impl Default for NullMarket {
    fn default() -> Self {
        Self::new(Amount::new(100))
    }
}

impl AssetMarket for NullMarket {
    fn price(&self) -> Amount {
        *self.price.lock().unwrap()
    }

    fn is_available(&self, asset: AssetId) -> bool {
        !self.sold.lock().unwrap().contains(&asset)
            && !self.withheld.lock().unwrap().contains(&asset)
    }

    fn purchase(&self, asset: AssetId, amount: Amount) -> Result<(), MarketError> {
        let price = self.price();
        if amount < price {
            return Err(MarketError::InsufficientPayment {
                offered: amount,
                price,
            });
        }
        if !self.is_available(asset) {
            return Err(MarketError::Unavailable(asset));
        }
        if let Some(error) = self.fail_next.lock().unwrap().take() {
            return Err(error);
        }
        let hook = self.hook.lock().unwrap().clone();
        if let Some(hook) = hook {
            hook(asset);
        }
        self.sold.lock().unwrap().insert(asset);
        self.purchases.lock().unwrap().push((asset, amount));
        Ok(())
    }
}
