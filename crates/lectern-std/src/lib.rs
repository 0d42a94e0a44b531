//! Additional functions wrapping Rust's standard library, shared by the
//! lectern crates.

pub mod adt;
pub mod error;

pub use error::{ErrKind, Error, Result};
