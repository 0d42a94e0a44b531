use std::ops::Range;
use std::path::Path;

use ecow::EcoString;
use lectern_std::error::prelude::*;
use serde::Deserialize;

use super::SyntaxNode;

/// A source file: its text, the tree parsed from it, and a line table.
#[derive(Debug, Clone)]
pub struct Source {
    path: EcoString,
    text: EcoString,
    root: SyntaxNode,
    /// The byte offset at which each line starts. The first entry is zero.
    lines: Vec<usize>,
}

/// The on-disk shape of a [`Source`].
#[derive(Deserialize)]
struct SourceRepr {
    path: EcoString,
    text: EcoString,
    root: SyntaxNode,
}

impl Source {
    /// Creates a source from a parsed tree.
    pub fn new(path: impl Into<EcoString>, text: impl Into<EcoString>, root: SyntaxNode) -> Self {
        let text = text.into();
        let lines = line_starts(&text);
        Self {
            path: path.into(),
            text,
            root,
            lines,
        }
    }

    /// Parses a source from its JSON form:
    /// `{"path": "...", "text": "...", "root": <node>}`.
    pub fn from_json(json: &str) -> Result<Self> {
        // Trees nest two JSON levels per node, so deep expressions exceed the
        // default recursion limit. The stack grows on demand instead.
        let mut de = serde_json::Deserializer::from_str(json);
        de.disable_recursion_limit();
        let repr = SourceRepr::deserialize(serde_stacker::Deserializer::new(&mut de))
            .context("parse source tree")?;
        de.end().context("parse source tree")?;
        let source = Self::new(repr.path, repr.text, repr.root);

        let root = source.root.range();
        if root.end > source.len_bytes() {
            return Err(error_once!("source tree exceeds text",
                path: source.path,
                end: root.end,
                len: source.len_bytes(),
            ));
        }

        Ok(source)
    }

    /// Reads and parses a source from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(error_once_map!("read source tree", path: path.display()))?;
        Self::from_json(&json).map_err(wrap_err("load source tree"))
    }

    /// The path of the file.
    pub fn path(&self) -> &EcoString {
        &self.path
    }

    /// The text of the file.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The root of the tree.
    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    /// The length of the text in bytes.
    pub fn len_bytes(&self) -> usize {
        self.text.len()
    }

    /// The number of lines. An empty text still has one line.
    pub fn len_lines(&self) -> usize {
        self.lines.len()
    }

    /// The byte offset at which the line starts.
    pub fn line_to_byte(&self, line: usize) -> Option<usize> {
        self.lines.get(line).copied()
    }

    /// The byte range of the line, including its line break.
    pub fn line_to_range(&self, line: usize) -> Option<Range<usize>> {
        let start = self.line_to_byte(line)?;
        let end = self.line_to_byte(line + 1).unwrap_or(self.len_bytes());
        Some(start..end)
    }

    /// The index of the line containing the byte offset.
    pub fn byte_to_line(&self, offset: usize) -> Option<usize> {
        if offset > self.len_bytes() {
            return None;
        }
        Some(self.lines.partition_point(|&start| start <= offset) - 1)
    }

    /// The byte column of the offset within its line.
    pub fn byte_to_column(&self, offset: usize) -> Option<usize> {
        let line = self.byte_to_line(offset)?;
        Some(offset - self.lines[line])
    }

    /// The innermost node at the byte offset.
    pub fn node_at(&self, offset: usize) -> Option<&SyntaxNode> {
        self.root.leaf_at(offset)
    }
}

fn line_starts(text: &str) -> Vec<usize> {
    let mut lines = vec![0];
    let bytes = text.as_bytes();
    let mut idx = 0;
    while idx < bytes.len() {
        match bytes[idx] {
            b'\r' if bytes.get(idx + 1) == Some(&b'\n') => {
                idx += 2;
                lines.push(idx);
            }
            b'\n' | b'\r' => {
                idx += 1;
                lines.push(idx);
            }
            _ => idx += 1,
        }
    }
    lines
}
