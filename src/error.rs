use core::fmt;

/// The error type shared by every fallible operation in this crate.
///
/// The hash cores are deterministic, in-memory transforms; the only failure
/// modes are bad arguments and misuse of a finalized state, so the taxonomy
/// stays this small on purpose.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// A length is out of range: zero or oversized digest length, oversized
    /// or empty key, or an output buffer shorter than the configured digest.
    InvalidArgument,
    /// The state has already been finalized and is permanently unusable.
    InvalidState,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument => f.write_str("invalid argument"),
            Error::InvalidState => f.write_str("state already finalized"),
        }
    }
}

impl std::error::Error for Error {}
