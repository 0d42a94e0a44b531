//! Lectern Analysis
//!
//! The substrate shared by every analysis feature:
//! - [`syntax`]: the node model of parsed trees and the [`syntax::Source`]
//!   owning one.
//! - [`dispatcher`]: a single depth-first walk fanning typed events out to
//!   any number of registered [`dispatcher::Listener`]s.
//! - [`matcher`]: tables classifying a node as a read or write occurrence of
//!   the symbol a target node names.
//! - [`location`]: conversions between byte offsets and LSP positions.

pub mod dispatcher;
pub mod location;
pub mod matcher;
pub mod syntax;

pub use dispatcher::{Accumulator, Dispatcher, Event, Listener};
pub use location::{LspPosition, LspRange, PositionEncoding};
pub use matcher::{NodeMatcher, Occurrence};
pub use syntax::{Source, SyntaxKind, SyntaxNode};

/// Completely disabled log
#[macro_export]
macro_rules! log_debug_ct_ {
    // debug!(target: "my_target", "a {} event", "log")
    (target: $target:expr, $($arg:tt)+) => {
        let _ = format_args!($target, $($arg)+);
    };

    // debug!("a {} event", "log")
    ($($arg:tt)+) => {
        let _ = format_args!($($arg)+);
    };
}
pub use log_debug_ct_ as log_debug_ct;
