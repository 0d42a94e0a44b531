//! A single depth-first walk fanning typed events out to listeners.
//!
//! Every analysis feature is a [`Listener`] declaring which events it wants.
//! A request registers its listeners on a fresh [`Dispatcher`], drives exactly
//! one pass over a tree, and reads the results back through
//! [`Accumulator::finish`]. Many features share one pass without re-walking
//! the tree.
//!
//! ```
//! use lectern_analysis::{Dispatcher, Event, Listener, SyntaxKind, SyntaxNode};
//!
//! #[derive(Default)]
//! struct CountMethods(usize);
//!
//! impl Listener for CountMethods {
//!     fn subscriptions(&self) -> Vec<Event> {
//!         vec![Event::Enter(SyntaxKind::MethodDef)]
//!     }
//!
//!     fn on_event(&mut self, _event: Event, _node: &SyntaxNode) {
//!         self.0 += 1;
//!     }
//! }
//!
//! let tree = SyntaxNode::new(SyntaxKind::Program, 0..20).with_children([
//!     SyntaxNode::new(SyntaxKind::MethodDef, 0..10),
//!     SyntaxNode::new(SyntaxKind::MethodDef, 10..20),
//! ]);
//!
//! let mut counter = CountMethods::default();
//! let mut dispatcher = Dispatcher::new();
//! dispatcher.register_listener(&mut counter);
//! dispatcher.visit(&tree);
//! assert_eq!(counter.0, 2);
//! ```

use rustc_hash::{FxHashMap, FxHashSet};

use crate::log_debug_ct;
use crate::syntax::{SyntaxKind, SyntaxNode};

/// An event produced while walking a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// Fired for every node before its enter event.
    AnyNode,
    /// Fired when a node of the kind is reached, before its children.
    Enter(SyntaxKind),
    /// Fired after every descendant of a node of the kind. Only scope kinds
    /// (see [`SyntaxKind::is_scope`]) produce exit events.
    Exit(SyntaxKind),
}

/// An analysis feature consuming dispatcher events.
///
/// The node handed to [`Listener::on_event`] is only borrowed for the
/// duration of the callback. A listener copies out whatever it needs.
pub trait Listener {
    /// The events the listener wants, declared up front.
    fn subscriptions(&self) -> Vec<Event>;

    /// Handles one event.
    fn on_event(&mut self, event: Event, node: &SyntaxNode);
}

/// A listener producing a result once its pass is over.
pub trait Accumulator: Listener {
    /// The result of the feature.
    type Output;

    /// Consumes the listener and returns its result.
    fn finish(self) -> Self::Output;
}

/// Multiplexes one traversal to many listeners.
///
/// Listeners are borrowed mutably for the lifetime of the dispatcher. Driving
/// a pass consumes the dispatcher, which releases those borrows, so every
/// pass needs a fresh dispatcher.
#[derive(Default)]
pub struct Dispatcher<'a> {
    listeners: Vec<&'a mut dyn Listener>,
    /// Listener indices per event, in registration order.
    table: FxHashMap<Event, Vec<usize>>,
}

impl<'a> Dispatcher<'a> {
    /// Creates a dispatcher without listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener for the given events. Listeners registered
    /// earlier for an event are invoked earlier. An event listed twice is
    /// registered once.
    pub fn register(&mut self, listener: &'a mut dyn Listener, events: &[Event]) {
        let idx = self.listeners.len();
        self.listeners.push(listener);

        let mut seen = FxHashSet::default();
        for &event in events {
            if !seen.insert(event) {
                continue;
            }
            if let Event::Exit(kind) = event
                && !kind.is_scope()
            {
                log::debug!("dispatcher: exit of {kind:?} never fires");
            }
            self.table.entry(event).or_default().push(idx);
        }
    }

    /// Registers a listener for the events it subscribes to.
    pub fn register_listener(&mut self, listener: &'a mut dyn Listener) {
        let events = listener.subscriptions();
        self.register(listener, &events);
    }

    /// Returns `true` if some listener waits for the event.
    pub fn is_subscribed(&self, event: Event) -> bool {
        self.table.contains_key(&event)
    }

    /// Walks the tree rooted at `root` depth-first.
    ///
    /// At each node, "any node" listeners run first, then the enter listeners
    /// of its kind, then the node's children in source order, and finally the
    /// exit listeners of its kind if it is a scope. Empty child slots are
    /// skipped.
    pub fn visit(mut self, root: &SyntaxNode) {
        enum Step<'n> {
            Enter(&'n SyntaxNode),
            Exit(&'n SyntaxNode),
        }

        let mut nodes = 0usize;
        let mut calls = 0usize;
        let mut stack = vec![Step::Enter(root)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Enter(node) => {
                    nodes += 1;
                    log_debug_ct!("dispatcher: enter {:?} at {:?}", node.kind(), node.range());

                    calls += self.emit(Event::AnyNode, node);
                    calls += self.emit(Event::Enter(node.kind()), node);
                    if node.kind().is_scope() {
                        stack.push(Step::Exit(node));
                    }
                    stack.extend(node.children().rev().map(Step::Enter));
                }
                Step::Exit(node) => {
                    calls += self.emit(Event::Exit(node.kind()), node);
                }
            }
        }

        log::debug!(
            "dispatcher: visited {nodes} nodes with {} listeners, {calls} callbacks",
            self.listeners.len()
        );
    }

    /// Fires only the enter event of `node` itself, without touching its
    /// children, "any node" listeners, or exit listeners.
    pub fn emit_for_target(mut self, node: &SyntaxNode) {
        let calls = self.emit(Event::Enter(node.kind()), node);
        log::debug!("dispatcher: emitted {:?} to {calls} listeners", node.kind());
    }

    fn emit(&mut self, event: Event, node: &SyntaxNode) -> usize {
        let Some(subscribers) = self.table.get(&event) else {
            return 0;
        };

        for &idx in subscribers {
            self.listeners[idx].on_event(event, node);
        }
        subscribers.len()
    }
}
