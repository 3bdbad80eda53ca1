//! The engine's own fund balance.
//!
//! Outflows go through a two-step reservation: funds are reserved while an
//! external transfer is in flight, then either settled (balance decreases) or
//! released (nothing changes). Reserved funds cannot be reserved twice, so two
//! in-flight spends can never jointly exceed the balance.

use crate::error::GovernanceError;
use coffer_types::Amount;

#[derive(Debug, Default)]
pub struct Treasury {
    balance: Amount,
    reserved: Amount,
}

/// Funds set aside for one pending outflow. Consumed by
/// [`Treasury::settle`] or [`Treasury::release`].
#[derive(Debug)]
#[must_use = "a reservation must be settled or released"]
pub struct Reservation {
    amount: Amount,
}

impl Reservation {
    pub fn amount(&self) -> Amount {
        self.amount
    }
}

impl Treasury {
    pub fn new(balance: Amount) -> Self {
        Self {
            balance,
            reserved: Amount::ZERO,
        }
    }

    /// Total funds held, including reserved funds not yet paid out.
    pub fn balance(&self) -> Amount {
        self.balance
    }

    /// Funds not tied up in an in-flight transfer.
    pub fn available(&self) -> Amount {
        self.balance.saturating_sub(self.reserved)
    }

    /// Accept a deposit. Returns the new balance.
    pub fn deposit(&mut self, amount: Amount) -> Result<Amount, GovernanceError> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(GovernanceError::Overflow)?;
        Ok(self.balance)
    }

    pub fn reserve(&mut self, amount: Amount) -> Result<Reservation, GovernanceError> {
        let available = self.available();
        if available < amount {
            return Err(GovernanceError::InsufficientFunds {
                needed: amount,
                available,
            });
        }
        self.reserved = self
            .reserved
            .checked_add(amount)
            .ok_or(GovernanceError::Overflow)?;
        Ok(Reservation { amount })
    }

    /// The transfer went through: the reserved funds leave the treasury.
    pub fn settle(&mut self, reservation: Reservation) {
        self.reserved = self.reserved.saturating_sub(reservation.amount);
        self.balance = self.balance.saturating_sub(reservation.amount);
    }

    /// The transfer failed: the reserved funds become available again.
    pub fn release(&mut self, reservation: Reservation) {
        self.reserved = self.reserved.saturating_sub(reservation.amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amt(raw: u128) -> Amount {
        Amount::new(raw)
    }

    #[test]
    fn deposit_accumulates() {
        let mut t = Treasury::default();
        assert_eq!(t.deposit(amt(10)).unwrap(), amt(10));
        assert_eq!(t.deposit(amt(5)).unwrap(), amt(15));
    }

    #[test]
    fn deposit_overflow_is_rejected() {
        let mut t = Treasury::new(Amount::new(u128::MAX));
        assert_eq!(t.deposit(amt(1)), Err(GovernanceError::Overflow));
        assert_eq!(t.balance(), Amount::new(u128::MAX));
    }

    #[test]
    fn reserve_beyond_available_fails() {
        let mut t = Treasury::new(amt(10));
        let err = t.reserve(amt(11)).unwrap_err();
        assert_eq!(
            err,
            GovernanceError::InsufficientFunds {
                needed: amt(11),
                available: amt(10)
            }
        );
    }

    #[test]
    fn reservations_exclude_each_other() {
        let mut t = Treasury::new(amt(10));
        let first = t.reserve(amt(7)).unwrap();
        assert_eq!(t.available(), amt(3));
        assert_eq!(t.balance(), amt(10));
        assert!(t.reserve(amt(7)).is_err());
        t.release(first);
        assert_eq!(t.available(), amt(10));
    }

    #[test]
    fn settle_debits_balance() {
        let mut t = Treasury::new(amt(10));
        let r = t.reserve(amt(4)).unwrap();
        t.settle(r);
        assert_eq!(t.balance(), amt(6));
        assert_eq!(t.available(), amt(6));
    }

    #[test]
    fn release_restores_everything() {
        let mut t = Treasury::new(amt(10));
        let r = t.reserve(amt(10)).unwrap();
        assert_eq!(t.available(), Amount::ZERO);
        t.release(r);
        assert_eq!(t.balance(), amt(10));
        assert_eq!(t.available(), amt(10));
    }
}
