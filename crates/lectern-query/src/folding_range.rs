use crate::prelude::*;

/// The [`textDocument/foldingRange`] request is sent from the client to the
/// server to return all folding ranges found in a given text document.
///
/// [`textDocument/foldingRange`]: https://microsoft.github.io/language-server-protocol/specification#textDocument_foldingRange
#[derive(Debug, Clone)]
pub struct FoldingRangeRequest {
    /// The path of the document to get folding ranges for.
    pub path: EcoString,
}

impl SyntaxRequest for FoldingRangeRequest {
    type Response = Vec<FoldingRange>;

    fn request(self, ctx: &AnalysisContext) -> Option<Self::Response> {
        let source = ctx.source_by_path(&self.path).ok()?;

        let mut worker = FoldingRangeWorker {
            ctx,
            source,
            line_folding_only: ctx.config().line_folding_only,
            ranges: Vec::new(),
        };
        let mut dispatcher = Dispatcher::new();
        dispatcher.register_listener(&mut worker);
        dispatcher.visit(source.root());

        let ranges = worker.finish();
        log::trace!("FoldingRangeRequest({}) results: {ranges:#?}", self.path);
        Some(ranges)
    }
}

/// The kinds whose nodes fold when they span several lines.
const FOLDABLE: &[SyntaxKind] = &[
    SyntaxKind::ModuleDef,
    SyntaxKind::ClassDef,
    SyntaxKind::SingletonClass,
    SyntaxKind::MethodDef,
    SyntaxKind::Block,
    SyntaxKind::Lambda,
    SyntaxKind::If,
    SyntaxKind::Unless,
    SyntaxKind::Case,
    SyntaxKind::While,
    SyntaxKind::Until,
    SyntaxKind::For,
    SyntaxKind::Begin,
    SyntaxKind::Array,
    SyntaxKind::Hash,
    SyntaxKind::Call,
];

struct FoldingRangeWorker<'a> {
    ctx: &'a AnalysisContext,
    source: &'a Source,
    line_folding_only: bool,
    ranges: Vec<FoldingRange>,
}

impl Listener for FoldingRangeWorker<'_> {
    fn subscriptions(&self) -> Vec<Event> {
        FOLDABLE.iter().copied().map(Event::Enter).collect()
    }

    fn on_event(&mut self, _event: Event, node: &SyntaxNode) {
        // A call ending with a block folds at the block.
        if node.kind() == SyntaxKind::Call
            && node
                .children()
                .next_back()
                .is_some_and(|last| last.kind() == SyntaxKind::Block)
        {
            return;
        }

        let rng = self.ctx.to_lsp_range(node.range(), self.source);
        if rng.start.line >= rng.end.line {
            return;
        }

        let character = |character| (!self.line_folding_only).then_some(character);
        self.ranges.push(FoldingRange {
            start_line: rng.start.line,
            start_character: character(rng.start.character),
            end_line: rng.end.line,
            end_character: character(rng.end.character),
            kind: None,
            collapsed_text: node.name().map(ToString::to_string),
        });
    }
}

impl Accumulator for FoldingRangeWorker<'_> {
    type Output = Vec<FoldingRange>;

    fn finish(self) -> Self::Output {
        self.ranges
    }
}
