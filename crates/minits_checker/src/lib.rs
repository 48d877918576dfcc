//! minits_checker: type checking for a small structurally typed language.
//!
//! The crate holds the type representation ([`TypeTable`]), the
//! assignability relation ([`Relation`]), structural comparison, the
//! narrowing engine and the checking pass ([`Checker`]) that ties them to a
//! syntax tree.

pub mod builtins;
mod checker;
mod expression;
pub mod narrowing;
pub mod relation;
mod resolve;
pub mod scope;
pub mod structural;
pub mod types;

pub use checker::Checker;
pub use narrowing::{Guard, TypeofTag};
pub use relation::{Reason, Relation};
pub use scope::{Binding, BindingId, Environment, ScopeExit, ScopeKind};
pub use types::{
    LiteralValue, ObjectShape, ParamInfo, PrimitiveKind, PropertyInfo, Signature, TypeId,
    TypeKind, TypeTable,
};
