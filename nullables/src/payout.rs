//! Nullable payout: records outbound transfers instead of making them.

use coffer_governance::{Payout, PayoutError};
use coffer_types::{Amount, Identity};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub struct NullPayout {
    payments: Mutex<Vec<(Identity, Amount)>>,
    refuse_next: AtomicBool,
}

impl NullPayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `pay` call fail.
    pub fn refuse_next(&self) {
        self.refuse_next.store(true, Ordering::SeqCst);
    }

    pub fn payments(&self) -> Vec<(Identity, Amount)> {
        self.payments.lock().unwrap().clone()
    }

    /// Total paid to `to` so far.
    pub fn paid_to(&self, to: &Identity) -> Amount {
        self.payments
            .lock()
            .unwrap()
            .iter()
            .filter(|(recipient, _)| recipient == to)
            .map(|(_, amount)| *amount)
            .sum()
    }
}

impl Payout for NullPayout {
    fn pay(&self, to: &Identity, amount: Amount) -> Result<(), PayoutError> {
        if self.refuse_next.swap(false, Ordering::SeqCst) {
            return Err(PayoutError::Refused(*to));
        }
        self.payments.lock().unwrap().push((*to, amount));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_payments() {
        let payout = NullPayout::new();
        let owner = Identity::from_seed(1);
        payout.pay(&owner, Amount::new(5)).unwrap();
        payout.pay(&owner, Amount::new(7)).unwrap();
        assert_eq!(payout.paid_to(&owner), Amount::new(12));
        assert_eq!(payout.payments().len(), 2);
    }

    #[test]
    fn refusal_applies_once() {
        let payout = NullPayout::new();
        let owner = Identity::from_seed(1);
        payout.refuse_next();
        assert_eq!(payout.pay(&owner, Amount::new(5)), Err(PayoutError::Refused(owner)));
        assert!(payout.pay(&owner, Amount::new(5)).is_ok());
        assert_eq!(payout.paid_to(&owner), Amount::new(5));
    }
}
