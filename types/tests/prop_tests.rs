use proptest::prelude::*;

use coffer_types::{Amount, Identity, Timestamp};

proptest! {
    /// Identity text form parses back to the same identity.
    #[test]
    fn identity_display_parses_back(bytes in prop::array::uniform20(0u8..)) {
        let id = Identity::new(bytes);
        let parsed = Identity::parse(&id.to_string()).unwrap();
        prop_assert_eq!(parsed, id);
    }

    /// Anything without the 0x prefix is rejected.
    #[test]
    fn identity_without_prefix_rejected(s in "[0-9a-f]{40}") {
        prop_assert!(Identity::parse(&s).is_err());
    }

    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
    }

    /// A deadline has passed exactly when now >= deadline.
    #[test]
    fn deadline_has_passed(start in 0u64..1_000_000, window in 1u64..1_000_000, offset in 0u64..2_000_000) {
        let deadline = Timestamp::new(start).plus_secs(window);
        let now = Timestamp::new(start + offset);
        prop_assert_eq!(deadline.has_passed(now), offset >= window);
        prop_assert_eq!(deadline.secs_until(now), window.saturating_sub(offset));
    }

    /// plus_secs saturates rather than wrapping.
    #[test]
    fn plus_secs_saturates(base in 0u64..u64::MAX, add in 0u64..u64::MAX) {
        let t = Timestamp::new(base).plus_secs(add);
        prop_assert!(t >= Timestamp::new(base));
    }

    /// Amount: checked_sub returns None when b > a.
    #[test]
    fn amount_checked_sub_underflow(a in 0u128..1_000_000, b in 0u128..1_000_000) {
        let result = Amount::new(a).checked_sub(Amount::new(b));
        if b > a {
            prop_assert!(result.is_none());
        } else {
            prop_assert_eq!(result, Some(Amount::new(a - b)));
        }
    }

    /// Amount: saturating_sub never panics and returns ZERO on underflow.
    #[test]
    fn amount_saturating_sub(a in 0u128..1_000_000, b in 0u128..1_000_000) {
        let result = Amount::new(a).saturating_sub(Amount::new(b));
        prop_assert_eq!(result, Amount::new(a.saturating_sub(b)));
    }

    /// Amount: checked_add(a, b) == Some(a + b) when no overflow.
    #[test]
    fn amount_checked_add(a in 0u128..u128::MAX / 2, b in 0u128..u128::MAX / 2) {
        prop_assert_eq!(Amount::new(a).checked_add(Amount::new(b)), Some(Amount::new(a + b)));
    }
}
