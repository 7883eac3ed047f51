//! Shared error type for sender and receiver operations.

use core::fmt;

/// Failure modes surfaced by this crate's sender and receiver APIs.
///
/// Mirrors the `ENONE`/`EFULL`/`EINVALID`/`ENULL` taxonomy of the wire
/// protocol this crate implements. `Null` only arises from construction-time
/// misuse the type system can't rule out on its own (an out-of-range buffer
/// length still needs a runtime check); `Full` is reserved for future
/// backpressure and is never returned by the current implementation, same as
/// the protocol this crate is modeled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A required buffer was missing or empty.
    Null,
    /// An argument, or a value read off the wire, was out of range.
    Invalid,
    /// Reserved for future backpressure; never returned today.
    Full,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Null => f.write_str("required buffer was missing or empty"),
            Error::Invalid => f.write_str("argument or wire value out of range"),
            Error::Full => f.write_str("buffer full"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
