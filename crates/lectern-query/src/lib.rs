//! Lectern Query
//!
//! Language queries answered from parsed sources. Each request is a small
//! listener (or a pair of a listener and an index lookup) driven by one
//! dispatcher pass, and answers with `lsp-types` values.

pub mod analysis;
pub mod index;

mod config;
pub use config::*;
pub(crate) mod document_highlight;
pub use document_highlight::*;
pub(crate) mod document_symbol;
pub use document_symbol::*;
pub(crate) mod folding_range;
pub use folding_range::*;
pub(crate) mod goto_definition;
pub use goto_definition::*;
pub(crate) mod selection_range;
pub use selection_range::*;
pub(crate) mod workspace_symbol;
pub use workspace_symbol::*;

mod prelude;

pub use analysis::AnalysisContext;
pub use index::{SymbolCollector, SymbolEntry, WorkspaceIndex};

/// A request answered from the tree of a single file.
pub trait SyntaxRequest {
    /// The response of the request.
    type Response;

    /// Answers the request.
    fn request(self, ctx: &AnalysisContext) -> Option<Self::Response>;
}

/// A request that needs the workspace symbol index.
pub trait SemanticRequest {
    /// The response of the request.
    type Response;

    /// Answers the request.
    fn request(self, ctx: &AnalysisContext) -> Option<Self::Response>;
}

mod polymorphic {
    use super::prelude::*;
    use super::*;

    /// Any request lectern answers.
    #[derive(Debug, Clone)]
    pub enum QueryRequest {
        /// A [`WorkspaceSymbolRequest`].
        WorkspaceSymbol(WorkspaceSymbolRequest),
        /// A [`DocumentHighlightRequest`].
        DocumentHighlight(DocumentHighlightRequest),
        /// A [`DocumentSymbolRequest`].
        DocumentSymbol(DocumentSymbolRequest),
        /// A [`FoldingRangeRequest`].
        FoldingRange(FoldingRangeRequest),
        /// A [`SelectionRangeRequest`].
        SelectionRange(SelectionRangeRequest),
        /// A [`GotoDefinitionRequest`].
        GotoDefinition(GotoDefinitionRequest),
    }

    impl QueryRequest {
        /// The file the request is about, if any.
        pub fn associated_path(&self) -> Option<&str> {
            Some(match self {
                QueryRequest::WorkspaceSymbol(..) => return None,
                QueryRequest::DocumentHighlight(req) => &req.path,
                QueryRequest::DocumentSymbol(req) => &req.path,
                QueryRequest::FoldingRange(req) => &req.path,
                QueryRequest::SelectionRange(req) => &req.path,
                QueryRequest::GotoDefinition(req) => &req.path,
            })
        }
    }

    /// The response to a [`QueryRequest`].
    #[derive(Debug, Clone, Serialize)]
    #[serde(untagged)]
    pub enum QueryResponse {
        /// The response to a [`WorkspaceSymbolRequest`].
        WorkspaceSymbol(Option<Vec<SymbolInformation>>),
        /// The response to a [`DocumentHighlightRequest`].
        DocumentHighlight(Option<Vec<DocumentHighlight>>),
        /// The response to a [`DocumentSymbolRequest`].
        DocumentSymbol(Option<DocumentSymbolResponse>),
        /// The response to a [`FoldingRangeRequest`].
        FoldingRange(Option<Vec<FoldingRange>>),
        /// The response to a [`SelectionRangeRequest`].
        SelectionRange(Option<Vec<SelectionRange>>),
        /// The response to a [`GotoDefinitionRequest`].
        GotoDefinition(Option<GotoDefinitionResponse>),
    }

    impl AnalysisContext {
        /// Answers any request.
        pub fn query(&self, req: QueryRequest) -> QueryResponse {
            if let Some(path) = req.associated_path() {
                log::debug!("query: {req:?} on {path}");
            }

            match req {
                QueryRequest::WorkspaceSymbol(req) => {
                    QueryResponse::WorkspaceSymbol(req.request(self))
                }
                QueryRequest::DocumentHighlight(req) => {
                    QueryResponse::DocumentHighlight(req.request(self))
                }
                QueryRequest::DocumentSymbol(req) => {
                    QueryResponse::DocumentSymbol(req.request(self))
                }
                QueryRequest::FoldingRange(req) => QueryResponse::FoldingRange(req.request(self)),
                QueryRequest::SelectionRange(req) => {
                    QueryResponse::SelectionRange(req.request(self))
                }
                QueryRequest::GotoDefinition(req) => {
                    QueryResponse::GotoDefinition(req.request(self))
                }
            }
        }
    }

}
pub use polymorphic::*;

#[cfg(test)]
mod tests;
