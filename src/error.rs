//! Error types

use thiserror::Error;

/// Error parsing an invalid string representation of UUID.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Error)]
pub enum ParseError {
    /// The input is not 36 bytes long.
    #[error("invalid length for UUID string: {0}")]
    Length(usize),

    /// The input does not have dashes at positions 8, 13, 18, and 23.
    #[error("invalid dash placement in UUID string")]
    Dash,

    /// The input contains a non-hexadecimal character in the given 1-based group of the
    /// 8-4-4-4-12 layout.
    #[error("unexpected character in segment {0} of UUID string")]
    Segment(u8),
}

/// Error returned by fallible generation and conversion operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The textual input is malformed.
    #[error(transparent)]
    Format(#[from] ParseError),

    /// The binary input is not exactly 16 bytes long.
    #[error("invalid length for binary UUID: {0}")]
    Length(usize),

    /// The underlying secure random source failed.
    #[error("secure random source unavailable")]
    EntropyUnavailable(#[source] rand::Error),

    /// The requested version is not implemented (e.g., version 2).
    #[error("UUID version {0} is not supported")]
    UnsupportedVersion(u8),

    /// The requested version cannot be generated without caller input (namespace and name, or
    /// custom payload).
    #[error("UUID version {0} requires caller-supplied input")]
    InputRequired(u8),

    /// No usable hardware address was found for the node identifier.
    #[error("no hardware address available for node identifier")]
    NodeUnavailable,
}

impl Error {
    /// Creates an [`Error::EntropyUnavailable`] carrying a plain message.
    pub(crate) fn entropy(msg: &'static str) -> Self {
        Self::EntropyUnavailable(rand::Error::new(msg))
    }
}
