//! The syntax model consumed by the analysis core.
//!
//! Trees are produced by an external parser and arrive either through the
//! builder methods on [`SyntaxNode`] or as JSON documents (see
//! [`Source::from_json`]). They are read-only once built.

mod kind;
pub use kind::*;
mod node;
pub use node::*;
mod source;
pub use source::*;
