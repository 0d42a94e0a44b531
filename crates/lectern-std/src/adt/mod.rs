//! This module contains the implementation of the abstract data types.

pub mod arena;
pub use arena::{Arena, ArenaIdx};
