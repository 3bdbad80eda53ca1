//! Caller identity: a 20-byte address rendered as `0x`-prefixed hex.

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An address-like reference to a caller.
///
/// Used both for authorization (owner capability) and for credential
/// ownership lookups in the registry.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity([u8; 20]);

impl Identity {
    /// The textual prefix of every identity.
    pub const PREFIX: &'static str = "0x";

    pub const LEN: usize = 20;

    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Deterministic identity with every byte set to `seed`. Handy for fixtures.
    pub fn from_seed(seed: u8) -> Self {
        Self([seed; 20])
    }

    /// Parse `0x` + 40 hex digits.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let invalid = |reason| ParseError::InvalidIdentity {
            input: input.to_string(),
            reason,
        };
        let digits = input
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| invalid("missing 0x prefix"))?;
        if digits.len() != Self::LEN * 2 {
            return Err(invalid("expected 40 hex digits"));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| invalid("not hexadecimal"))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, hex::encode(self.0))
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({}..)", hex::encode(&self.0[..4]))
    }
}

impl FromStr for Identity {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Identity {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_lowercase_prefixed_hex() {
        let id = Identity::from_seed(0xab);
        assert_eq!(id.to_string(), format!("0x{}", "ab".repeat(20)));
    }

    #[test]
    fn parse_accepts_mixed_case() {
        let raw = format!("0x{}", "Ab".repeat(20));
        assert_eq!(Identity::parse(&raw).unwrap(), Identity::from_seed(0xab));
    }

    #[test]
    fn parse_rejects_missing_prefix() {
        let err = Identity::parse(&"ab".repeat(20)).unwrap_err();
        assert!(matches!(err, ParseError::InvalidIdentity { reason: "missing 0x prefix", .. }));
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert!(Identity::parse("0x1234").is_err());
        assert!(Identity::parse(&format!("0x{}", "00".repeat(21))).is_err());
    }

    #[test]
    fn parse_rejects_non_hex() {
        let raw = format!("0x{}", "zz".repeat(20));
        assert!(Identity::parse(&raw).is_err());
    }

    #[test]
    fn serializes_as_string() {
        let id = Identity::from_seed(1);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "01".repeat(20)));
        let back: Identity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
