//! Unified error types for the IR receiver.
//!
//! Decoding itself never fails: bad timing is absorbed by the reader's
//! resynchronization.  Only setup can fail (attaching the pin interrupt,
//! loading configuration), and those paths funnel into this one `Copy` enum.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The edge source could not be set up.
    Edge(EdgeError),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Edge(e) => write!(f, "edge source: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Edge source errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeError {
    /// The pin has no interrupt capability.
    NoInterrupt { pin: i32 },
    /// A handler is already attached; detach first.
    AlreadyAttached,
    /// The platform GPIO driver returned an error code.
    Platform(i32),
}

impl fmt::Display for EdgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoInterrupt { pin } => write!(f, "GPIO {pin} has no interrupt"),
            Self::AlreadyAttached => write!(f, "handler already attached"),
            Self::Platform(rc) => write!(f, "GPIO driver error (rc={rc})"),
        }
    }
}

impl core::error::Error for EdgeError {}

impl From<EdgeError> for Error {
    fn from(e: EdgeError) -> Self {
        Self::Edge(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

pub type Result<T> = core::result::Result<T, Error>;
