use std::ops::Range;

use ecow::EcoString;
use serde::{Deserialize, Serialize};

use super::SyntaxKind;

/// A node in a parsed tree.
///
/// A node owns its children. A child slot may be empty, which happens when
/// the parser leaves an optional part out (e.g. the superclass of a class).
/// Empty slots are skipped by [`SyntaxNode::children`] and by every traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntaxNode {
    kind: SyntaxKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<EcoString>,
    range: Range<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name_range: Option<Range<usize>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<Option<SyntaxNode>>,
}

impl SyntaxNode {
    /// Creates a node without name and children covering the byte range.
    pub fn new(kind: SyntaxKind, range: Range<usize>) -> Self {
        Self {
            kind,
            name: None,
            range,
            name_range: None,
            children: Vec::new(),
        }
    }

    /// Attaches the identifier the node binds or references, along with the
    /// byte range of the identifier.
    pub fn with_name(mut self, name: impl Into<EcoString>, name_range: Range<usize>) -> Self {
        self.name = Some(name.into());
        self.name_range = Some(name_range);
        self
    }

    /// Appends children to the node.
    pub fn with_children(mut self, children: impl IntoIterator<Item = SyntaxNode>) -> Self {
        self.children.extend(children.into_iter().map(Some));
        self
    }

    /// Appends a child slot, which may be empty.
    pub fn with_slot(mut self, child: Option<SyntaxNode>) -> Self {
        self.children.push(child);
        self
    }

    /// The kind of the node.
    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    /// The identifier the node binds or references, if any.
    pub fn name(&self) -> Option<&EcoString> {
        self.name.as_ref()
    }

    /// The byte range of the node.
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// The byte range of the identifier, falling back to the range of the
    /// whole node.
    pub fn name_range(&self) -> Range<usize> {
        self.name_range.clone().unwrap_or_else(|| self.range())
    }

    /// The children in source order, skipping empty slots.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = &SyntaxNode> {
        self.children.iter().flatten()
    }

    /// The raw child slots, including empty ones.
    pub fn slots(&self) -> &[Option<SyntaxNode>] {
        &self.children
    }

    /// Whether the cursor at `offset` touches the node. The end is inclusive
    /// so that a cursor right after an identifier still selects it.
    pub fn covers(&self, offset: usize) -> bool {
        self.range.start <= offset && offset <= self.range.end
    }

    /// Returns the chain of nodes covering `offset`, from `self` down to the
    /// innermost one. When two siblings touch at `offset`, the earlier one is
    /// taken. Empty if `self` does not cover `offset`.
    pub fn path_at(&self, offset: usize) -> Vec<&SyntaxNode> {
        let mut path = Vec::new();
        if !self.covers(offset) {
            return path;
        }

        let mut node = self;
        path.push(node);
        while let Some(child) = node.children().find(|child| child.covers(offset)) {
            path.push(child);
            node = child;
        }
        path
    }

    /// Returns the innermost node covering `offset`.
    pub fn leaf_at(&self, offset: usize) -> Option<&SyntaxNode> {
        self.path_at(offset).pop()
    }

    /// Counts the nodes of the tree, skipping empty slots.
    pub fn descendant_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children());
        }
        count
    }
}
