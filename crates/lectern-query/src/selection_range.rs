use crate::prelude::*;

/// The [`textDocument/selectionRange`] request is sent from the client to the
/// server to return suggested selection ranges at an array of given positions.
/// A selection range is a range around the cursor position which the user
/// might be interested in selecting.
///
/// [`textDocument/selectionRange`]: https://microsoft.github.io/language-server-protocol/specification#textDocument_selectionRange
#[derive(Debug, Clone)]
pub struct SelectionRangeRequest {
    /// The path of the document to get selection ranges for.
    pub path: EcoString,
    /// The positions to get selection ranges for.
    pub positions: Vec<LspPosition>,
}

impl SyntaxRequest for SelectionRangeRequest {
    type Response = Vec<SelectionRange>;

    fn request(self, ctx: &AnalysisContext) -> Option<Self::Response> {
        let source = ctx.source_by_path(&self.path).ok()?;

        let ranges = self
            .positions
            .into_iter()
            .map(|position| {
                let cursor = ctx.to_offset(position, source);

                let mut worker = SelectionRangeWorker::new(cursor);
                let mut dispatcher = Dispatcher::new();
                dispatcher.register_listener(&mut worker);
                dispatcher.visit(source.root());

                // Innermost last.
                let chain = worker
                    .finish()
                    .into_iter()
                    .map(|range| ctx.to_lsp_range(range, source))
                    .dedup()
                    .collect_vec();

                chain
                    .into_iter()
                    .fold(None, |parent, range| {
                        Some(SelectionRange {
                            range,
                            parent: parent.map(Box::new),
                        })
                    })
                    .unwrap_or_else(|| SelectionRange {
                        range: LspRange::new(position, position),
                        parent: None,
                    })
            })
            .collect();

        Some(ranges)
    }
}

/// Collects the ranges of the nodes containing a cursor, outermost first.
struct SelectionRangeWorker {
    cursor: usize,
    ranges: Vec<Range<usize>>,
}

impl SelectionRangeWorker {
    fn new(cursor: usize) -> Self {
        Self {
            cursor,
            ranges: Vec::new(),
        }
    }
}

impl Listener for SelectionRangeWorker {
    fn subscriptions(&self) -> Vec<Event> {
        vec![Event::AnyNode]
    }

    fn on_event(&mut self, _event: Event, node: &SyntaxNode) {
        if !node.covers(self.cursor) {
            return;
        }

        // A sibling touching the cursor from the right is not nested in the
        // chain collected so far.
        let range = node.range();
        let nested = self
            .ranges
            .last()
            .is_none_or(|outer| outer.start <= range.start && range.end <= outer.end);
        if nested {
            self.ranges.push(range);
        }
    }
}

impl Accumulator for SelectionRangeWorker {
    type Output = Vec<Range<usize>>;

    fn finish(self) -> Self::Output {
        self.ranges
    }
}
