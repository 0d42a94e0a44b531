use crate::prelude::*;

/// The [`workspace/symbol`] request is sent from the client to the server to
/// list project-wide symbols matching the given query string.
///
/// Symbols are matched by prefix of their fully qualified name and listed in
/// the order of the symbol index.
///
/// [`workspace/symbol`]: https://microsoft.github.io/language-server-protocol/specification#workspace_symbol
#[derive(Debug, Clone)]
pub struct WorkspaceSymbolRequest {
    /// The query string to filter symbols by. It is usually the exact content
    /// of the user's input box in the UI.
    pub pattern: Option<String>,
}

impl SemanticRequest for WorkspaceSymbolRequest {
    type Response = Vec<SymbolInformation>;

    #[allow(deprecated)]
    fn request(self, ctx: &AnalysisContext) -> Option<Self::Response> {
        let pattern = self.pattern.as_deref().unwrap_or_default();
        let entries = ctx.config().limit_symbols(ctx.index().search(pattern));

        let symbols = entries
            .into_iter()
            .filter_map(|entry| {
                Some(SymbolInformation {
                    name: entry.name.to_string(),
                    kind: entry.kind,
                    tags: None,
                    deprecated: None,
                    location: ctx.to_lsp_location(entry)?,
                    container_name: entry.container.as_ref().map(ToString::to_string),
                })
            })
            .collect();

        Some(symbols)
    }
}
