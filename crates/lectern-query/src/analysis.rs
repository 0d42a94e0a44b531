//! The state queries are answered from.

use lectern_analysis::location::{to_lsp_position, to_lsp_range, to_offset};
use lectern_std::error::prelude::*;

use crate::QueryConfig;
use crate::index::{SymbolEntry, WorkspaceIndex};
use crate::prelude::*;

/// The loaded sources of a workspace, their symbol index, and the query
/// options.
#[derive(Debug, Default)]
pub struct AnalysisContext {
    config: QueryConfig,
    sources: FxHashMap<EcoString, Source>,
    index: WorkspaceIndex,
}

impl AnalysisContext {
    /// Creates an empty context.
    pub fn new(config: QueryConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The query options.
    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// The encoding of character offsets in LSP positions.
    pub fn position_encoding(&self) -> PositionEncoding {
        self.config.position_encoding
    }

    /// The workspace symbol index.
    pub fn index(&self) -> &WorkspaceIndex {
        &self.index
    }

    /// Adds or replaces a source and reindexes its symbols.
    pub fn add_source(&mut self, source: Source) {
        self.index.index_source(&source);
        self.sources.insert(source.path().clone(), source);
    }

    /// Removes a source and its symbols.
    pub fn remove_source(&mut self, path: &str) -> Option<Source> {
        self.index.remove_file(path);
        self.sources.remove(path)
    }

    /// Looks up a loaded source.
    pub fn source_by_path(&self, path: &str) -> Result<&Source> {
        self.sources
            .get(path)
            .with_context("source not loaded", || Some(Box::new([("path", path.to_owned())])))
    }

    /// Converts an LSP position in `source` to a byte offset.
    pub fn to_offset(&self, position: LspPosition, source: &Source) -> usize {
        to_offset(position, self.position_encoding(), source)
    }

    /// Converts a byte offset in `source` to an LSP position.
    pub fn to_lsp_pos(&self, offset: usize, source: &Source) -> LspPosition {
        to_lsp_position(offset, self.position_encoding(), source)
    }

    /// Converts a byte range in `source` to an LSP range.
    pub fn to_lsp_range(&self, range: Range<usize>, source: &Source) -> LspRange {
        to_lsp_range(range, source, self.position_encoding())
    }

    /// The location of a symbol definition, if its file is loaded.
    pub fn to_lsp_location(&self, entry: &SymbolEntry) -> Option<LspLocation> {
        let source = match self.source_by_path(&entry.path) {
            Ok(source) => source,
            Err(err) => {
                log::warn!("cannot locate symbol {}: {err}", entry.name);
                return None;
            }
        };

        Some(LspLocation {
            uri: path_to_url(&entry.path).ok()?,
            range: self.to_lsp_range(entry.range.clone(), source),
        })
    }
}

/// Converts a source path to a `file:` URL. Relative paths are taken as
/// relative to the file system root.
pub fn path_to_url(path: &str) -> Result<Url> {
    let path = path.replace('\\', "/");
    let url = if path.starts_with('/') {
        eco_format!("file://{path}")
    } else {
        eco_format!("file:///{path}")
    };

    Url::parse(&url).map_err(map_string_err("invalid source path"))
}
