//! The workspace symbol index.
//!
//! Every file is indexed by one [`SymbolCollector`] pass. Fully qualified
//! names go into a [`PrefixIndex`] so that workspace symbol queries are
//! answered by prefix search, and the definitions behind each name are kept
//! aside per name and per file.

mod collector;
pub use collector::*;

use std::time::Instant;

use lectern_index::PrefixIndex;

use crate::prelude::*;

/// The symbols defined across the workspace.
#[derive(Debug, Default, Clone)]
pub struct WorkspaceIndex {
    /// Fully qualified names, each stored under itself.
    names: PrefixIndex<EcoString>,
    /// The definitions of each name, in indexing order.
    entries: FxHashMap<EcoString, Vec<SymbolEntry>>,
    /// The names each file defines.
    files: FxHashMap<EcoString, Vec<EcoString>>,
}

impl WorkspaceIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of distinct names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if no symbol is indexed.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Indexes the definitions of `source`, replacing any previous definitions
    /// from the same file.
    pub fn index_source(&mut self, source: &Source) {
        let start = Instant::now();
        let path = source.path().clone();
        self.remove_file(&path);

        let mut collector = SymbolCollector::new(path.clone());
        let mut dispatcher = Dispatcher::new();
        dispatcher.register_listener(&mut collector);
        dispatcher.visit(source.root());
        let symbols = collector.finish();
        let count = symbols.len();

        let mut names = Vec::new();
        for entry in symbols {
            if !self.names.contains_key(&entry.name) {
                self.names.insert(&entry.name, entry.name.clone());
            }
            if !names.contains(&entry.name) {
                names.push(entry.name.clone());
            }
            self.entries.entry(entry.name.clone()).or_default().push(entry);
        }
        self.files.insert(path.clone(), names);

        log::info!(
            "workspace index: indexed {count} symbols of {path} in {:?}",
            start.elapsed()
        );
    }

    /// Drops every definition of the file at `path`.
    pub fn remove_file(&mut self, path: &str) {
        let Some(names) = self.files.remove(path) else {
            return;
        };

        for name in names {
            let Some(entries) = self.entries.get_mut(&name) else {
                continue;
            };
            entries.retain(|entry| entry.path != path);
            if entries.is_empty() {
                self.entries.remove(&name);
                self.names.delete(&name);
            }
        }
    }

    /// Returns the definitions of every name starting with `prefix`, in
    /// prefix index order.
    pub fn search(&self, prefix: &str) -> Vec<&SymbolEntry> {
        self.names
            .prefix_iter(prefix)
            .filter_map(|name| self.entries.get(name))
            .flatten()
            .collect()
    }

    /// Returns the definitions of exactly `name`.
    pub fn resolve(&self, name: &str) -> &[SymbolEntry] {
        self.entries.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// The files with indexed definitions.
    pub fn files(&self) -> impl Iterator<Item = &EcoString> {
        self.files.keys()
    }
}
