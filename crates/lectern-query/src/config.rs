use std::path::Path;

use lectern_analysis::PositionEncoding;
use lectern_std::error::prelude::*;
use serde::{Deserialize, Serialize};

/// Options shared by every query.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryConfig {
    /// The encoding of character offsets in LSP positions.
    #[serde(default)]
    pub position_encoding: PositionEncoding,
    /// Whether the client only folds whole lines.
    #[serde(default)]
    pub line_folding_only: bool,
    /// The maximum number of workspace symbols returned by one request.
    pub symbol_limit: Option<usize>,
    /// Whether document highlights include definitions and assignments.
    pub highlight_definitions: Option<bool>,
}

impl QueryConfig {
    /// Parses the configuration from TOML.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("parse query config")
    }

    /// Reads the configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(error_once_map!("read query config", path: path.display()))?;
        Self::from_toml(&text)
    }

    /// Whether document highlights include write occurrences.
    pub fn highlight_definitions(&self) -> bool {
        self.highlight_definitions.unwrap_or(true)
    }

    /// Truncates workspace symbol results to the configured limit.
    pub(crate) fn limit_symbols<T>(&self, mut symbols: Vec<T>) -> Vec<T> {
        if let Some(limit) = self.symbol_limit {
            symbols.truncate(limit);
        }
        symbols
    }
}
