pub use std::ops::Range;

pub use ecow::{EcoString, eco_format};
pub use itertools::Itertools;
pub use lsp_types::{
    DocumentHighlight, DocumentHighlightKind, DocumentSymbol, DocumentSymbolResponse,
    FoldingRange, GotoDefinitionResponse, Location as LspLocation, SelectionRange,
    SymbolInformation, SymbolKind, Url,
};
pub use rustc_hash::FxHashMap;
pub use serde::Serialize;

pub use lectern_analysis::{
    Accumulator, Dispatcher, Event, Listener, LspPosition, LspRange, NodeMatcher, Occurrence,
    PositionEncoding, Source, SyntaxKind, SyntaxNode,
};

pub use crate::analysis::AnalysisContext;
pub use crate::{SemanticRequest, SyntaxRequest};
