//! Errors surfaced to the host embedding the checker.
//!
//! Problems in the *checked program* are never reported through this type;
//! they are collected as diagnostics. This enum covers misuse of the library
//! itself: bad configuration and lookups of names that were never interned.

use thiserror::Error;

/// Host-facing error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration text was not valid JSON or did not match the schema.
    #[error("invalid checker configuration: {0}")]
    InvalidConfig(String),

    /// A configuration value is outside of its accepted range.
    #[error("option '{name}' must be between {min} and {max}, got {value}")]
    OptionOutOfRange {
        name: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    /// The configuration file could not be read.
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A name was looked up that the interner has never seen.
    #[error("'{0}' has not been interned")]
    UnknownName(String),
}

pub type Result<T> = std::result::Result<T, Error>;
