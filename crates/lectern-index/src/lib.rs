//! # lectern-index
//!
//! A prefix-searchable index mapping string keys to values, used to store and
//! query fully qualified symbol names.
//!
//! The index is a radix tree: every edge carries a string fragment, and the
//! concatenation of the labels from the root to a node is the key of the
//! value stored there. Inserting a key that diverges in the middle of an edge
//! splits the edge at the divergence point, so sibling edges never share a
//! nonempty common prefix.
//!
//! ```
//! use lectern_index::PrefixIndex;
//!
//! let mut index = PrefixIndex::new();
//! index.insert("foo", 1);
//! index.insert("fo", 2);
//! assert_eq!(index.search("fo"), vec![&2, &1]);
//! assert_eq!(index.search("foo"), vec![&1]);
//! ```
//!
//! Results are produced in pre-order of the reached subtree. Callers that
//! need alphabetical or relevance ordering sort the results themselves.
//!
//! The index is not internally synchronized. Mutation takes `&mut self`, so a
//! caller sharing the index across threads wraps it in a lock of its choice.

use core::fmt;

use ecow::EcoString;
use lectern_std::adt::{Arena, ArenaIdx};

type NodeId<V> = ArenaIdx<Node<V>>;

/// A node of the index.
#[derive(Clone)]
struct Node<V> {
    /// The edge label from the parent to this node. Empty only for the root.
    label: EcoString,
    /// The value stored under the key ending at this node.
    value: Option<V>,
    /// The children in insertion order. Their labels are pairwise prefix-free.
    children: Vec<NodeId<V>>,
    /// The parent node, used to prune upwards on deletion.
    parent: Option<NodeId<V>>,
}

impl<V> Node<V> {
    fn leaf(label: &str, value: Option<V>, parent: NodeId<V>) -> Self {
        Self {
            label: label.into(),
            value,
            children: Vec::new(),
            parent: Some(parent),
        }
    }

    fn is_dead(&self) -> bool {
        self.value.is_none() && self.children.is_empty()
    }
}

/// A radix tree mapping string keys to values with prefix search.
#[derive(Clone)]
pub struct PrefixIndex<V> {
    nodes: Arena<Node<V>>,
    root: NodeId<V>,
    len: usize,
}

impl<V> Default for PrefixIndex<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for PrefixIndex<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries("")).finish()
    }
}

impl<V> PrefixIndex<V> {
    /// Creates an empty index.
    pub fn new() -> Self {
        let mut nodes = Arena::new();
        let root = nodes.alloc(Node {
            label: EcoString::new(),
            value: None,
            children: Vec::new(),
            parent: None,
        });

        Self {
            nodes,
            root,
            len: 0,
        }
    }

    /// Returns the number of values stored in the index.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the index stores no value.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes every value from the index.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Inserts a value under the given key, returning the value previously
    /// stored under the same key.
    ///
    /// The empty key addresses the root, which never carries a value, so
    /// inserting under it is a no-op and returns `None`.
    pub fn insert(&mut self, key: &str, value: V) -> Option<V> {
        if key.is_empty() {
            log::debug!("prefix index: ignoring insertion under the empty key");
            return None;
        }

        let mut node = self.root;
        let mut rest = key;
        loop {
            if rest.is_empty() {
                let prev = self.nodes[node].value.replace(value);
                if prev.is_none() {
                    self.len += 1;
                }
                return prev;
            }

            let Some((pos, child, common)) = self.longest_common_child(node, rest) else {
                let leaf = self.nodes.alloc(Node::leaf(rest, Some(value), node));
                self.nodes[node].children.push(leaf);
                self.len += 1;
                return None;
            };

            if common == self.nodes[child].label.len() {
                node = child;
                rest = &rest[common..];
                continue;
            }

            let mid = self.split(node, pos, common);
            rest = &rest[common..];
            if rest.is_empty() {
                self.nodes[mid].value = Some(value);
            } else {
                let leaf = self.nodes.alloc(Node::leaf(rest, Some(value), mid));
                self.nodes[mid].children.push(leaf);
            }
            self.len += 1;
            return None;
        }
    }

    /// Finds the child sharing the longest nonempty common prefix with `rest`.
    /// Ties go to the earliest child.
    fn longest_common_child(
        &self,
        node: NodeId<V>,
        rest: &str,
    ) -> Option<(usize, NodeId<V>, usize)> {
        let mut best: Option<(usize, NodeId<V>, usize)> = None;
        for (pos, &child) in self.nodes[node].children.iter().enumerate() {
            let common = common_prefix_len(&self.nodes[child].label, rest);
            if common > 0 && best.is_none_or(|(_, _, longest)| common > longest) {
                best = Some((pos, child, common));
            }
        }
        best
    }

    /// Splits the edge to the `pos`-th child of `parent` after `at` bytes.
    /// The new intermediate node takes the child's place and is returned.
    fn split(&mut self, parent: NodeId<V>, pos: usize, at: usize) -> NodeId<V> {
        let child = self.nodes[parent].children[pos];
        let label = self.nodes[child].label.clone();

        let mid = self.nodes.alloc(Node {
            label: EcoString::from(&label[..at]),
            value: None,
            children: vec![child],
            parent: Some(parent),
        });
        self.nodes[parent].children[pos] = mid;

        let child = &mut self.nodes[child];
        child.label = EcoString::from(&label[at..]);
        child.parent = Some(mid);

        mid
    }

    /// Returns the value stored under exactly the given key.
    pub fn get(&self, key: &str) -> Option<&V> {
        let node = self.find_exact(key)?;
        self.nodes[node].value.as_ref()
    }

    /// Returns a mutable reference to the value stored under exactly the given
    /// key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let node = self.find_exact(key)?;
        self.nodes[node].value.as_mut()
    }

    /// Returns `true` if a value is stored under exactly the given key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Collects the values of every key starting with `prefix`, in pre-order.
    ///
    /// An unknown prefix yields an empty result and the empty prefix yields
    /// every value.
    pub fn search(&self, prefix: &str) -> Vec<&V> {
        self.prefix_iter(prefix).collect()
    }

    /// Iterates over the values of every key starting with `prefix`, in
    /// pre-order.
    pub fn prefix_iter(&self, prefix: &str) -> PrefixIter<'_, V> {
        PrefixIter {
            nodes: &self.nodes,
            stack: self.find_prefix(prefix).into_iter().collect(),
        }
    }

    /// Collects the keys and values of every key starting with `prefix`, in
    /// pre-order.
    pub fn entries(&self, prefix: &str) -> Vec<(EcoString, &V)> {
        let mut entries = Vec::new();
        let Some((node, key)) = self.find_prefix_with_key(prefix) else {
            return entries;
        };

        let mut stack = vec![(node, key)];
        while let Some((node, key)) = stack.pop() {
            let node = &self.nodes[node];
            stack.extend(node.children.iter().rev().map(|&child| {
                let mut key = key.clone();
                key.push_str(&self.nodes[child].label);
                (child, key)
            }));
            if let Some(value) = &node.value {
                entries.push((key, value));
            }
        }

        entries
    }

    /// Removes the value stored under exactly the given key and returns it.
    ///
    /// Keys that are prefixes or extensions of `key` are untouched. Nodes left
    /// without value and children are pruned upwards, but an intermediate
    /// node left with a single child is not merged into it.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let node = self.find_exact(key)?;
        let value = self.nodes[node].value.take()?;
        self.len -= 1;
        self.prune(node);
        Some(value)
    }

    /// Deletes the value stored under exactly the given key. Unknown keys are
    /// ignored.
    pub fn delete(&mut self, key: &str) {
        self.remove(key);
    }

    /// Releases `node` and its ancestors while they are dead, stopping at the
    /// root.
    fn prune(&mut self, mut node: NodeId<V>) {
        while node != self.root && self.nodes[node].is_dead() {
            let Some(parent) = self.nodes[node].parent else {
                break;
            };

            self.nodes[parent].children.retain(|&child| child != node);
            self.nodes.release(node);
            node = parent;
        }
    }

    /// Walks down the edges consuming `key` entirely.
    fn find_exact(&self, key: &str) -> Option<NodeId<V>> {
        let mut node = self.root;
        let mut rest = key;
        while !rest.is_empty() {
            let &child = self.nodes[node]
                .children
                .iter()
                .find(|&&child| rest.starts_with(self.nodes[child].label.as_str()))?;
            rest = &rest[self.nodes[child].label.len()..];
            node = child;
        }
        Some(node)
    }

    /// Walks down the edges consuming `prefix`, possibly ending in the middle
    /// of an edge.
    fn find_prefix(&self, prefix: &str) -> Option<NodeId<V>> {
        self.find_prefix_with_key(prefix).map(|(node, _)| node)
    }

    /// Like [`Self::find_prefix`], and also returns the full key of the
    /// reached node, which may extend past `prefix`.
    fn find_prefix_with_key(&self, prefix: &str) -> Option<(NodeId<V>, EcoString)> {
        let mut node = self.root;
        let mut key = EcoString::new();
        let mut rest = prefix;
        while !rest.is_empty() {
            let (child, consumed) = self.nodes[node].children.iter().find_map(|&child| {
                let label = self.nodes[child].label.as_str();
                if rest.starts_with(label) {
                    Some((child, label.len()))
                } else if label.starts_with(rest) {
                    Some((child, rest.len()))
                } else {
                    None
                }
            })?;

            key.push_str(&self.nodes[child].label);
            rest = &rest[consumed..];
            node = child;
        }
        Some((node, key))
    }
}

/// An iterator over the values of a subtree in pre-order, created by
/// [`PrefixIndex::prefix_iter`].
pub struct PrefixIter<'a, V> {
    nodes: &'a Arena<Node<V>>,
    stack: Vec<NodeId<V>>,
}

impl<'a, V> Iterator for PrefixIter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;
        while let Some(node) = self.stack.pop() {
            let node = &nodes[node];
            self.stack.extend(node.children.iter().rev());
            if let Some(value) = &node.value {
                return Some(value);
            }
        }
        None
    }
}

/// Returns the byte length of the longest common prefix of `a` and `b`, always
/// on a char boundary of both.
fn common_prefix_len(a: &str, b: &str) -> usize {
    a.char_indices()
        .zip(b.chars())
        .find(|((_, x), y)| x != y)
        .map_or(a.len().min(b.len()), |((i, _), _)| i)
}

#[cfg(test)]
mod proptests;
