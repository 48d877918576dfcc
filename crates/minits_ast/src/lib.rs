//! minits_ast: The syntax tree consumed by the minits checker.
//!
//! The checker never sees source text. A front end parses and hands over a
//! [`SourceFile`] whose nodes live in a `bumpalo` arena and carry byte spans.
//! [`AstBuilder`] is the construction API for such front ends and for tests.

pub mod builder;
pub mod node;
pub mod types;

// Re-export key types
pub use builder::AstBuilder;
pub use node::*;
pub use types::NodeFlags;
