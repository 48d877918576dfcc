//! minits_core: Core utilities shared by the minits checker crates.
//!
//! Provides name interning, source spans, and the host-facing error type.

pub mod error;
pub mod intern;
pub mod text;

// Re-export commonly used types
pub use error::{Error, Result};
pub use intern::{Atom, Interner};
pub use text::{LineAndColumn, LineMap, TextSpan};
