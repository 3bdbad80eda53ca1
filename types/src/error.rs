//! Errors raised while parsing fundamental types from external input.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid identity {input:?}: {reason}")]
    InvalidIdentity { input: String, reason: &'static str },
}
