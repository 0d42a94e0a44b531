use lectern_analysis::matcher::{IdentClass, matchable_kinds};

use crate::prelude::*;

/// The [`textDocument/documentHighlight`] request
///
/// [`textDocument/documentHighlight`]: https://microsoft.github.io/language-server-protocol/specification#textDocument_documentHighlight
#[derive(Debug, Clone)]
pub struct DocumentHighlightRequest {
    /// The path of the document to request highlight for.
    pub path: EcoString,
    /// The position of the document to request highlight for.
    pub position: LspPosition,
}

impl SyntaxRequest for DocumentHighlightRequest {
    type Response = Vec<DocumentHighlight>;

    fn request(self, ctx: &AnalysisContext) -> Option<Self::Response> {
        let source = ctx.source_by_path(&self.path).ok()?;
        let cursor = ctx.to_offset(self.position, source);

        let path = source.root().path_at(cursor);
        let target = path.last()?;
        let matcher = NodeMatcher::new(target)?;

        // Locals never escape the method or namespace body defining them.
        let local_scope = match matcher.target().class {
            IdentClass::Local => Some(
                path.iter()
                    .rev()
                    .find(|node| introduces_local_scope(node.kind()))
                    .copied()
                    .unwrap_or(source.root()),
            ),
            _ => None,
        };
        let scope = local_scope.unwrap_or(source.root());

        let mut worker =
            DocumentHighlightWorker::new(matcher, local_scope, ctx.config().highlight_definitions());
        let mut dispatcher = Dispatcher::new();
        dispatcher.register_listener(&mut worker);
        dispatcher.visit(scope);

        let highlights = worker
            .finish()
            .into_iter()
            .map(|(range, occurrence)| DocumentHighlight {
                range: ctx.to_lsp_range(range, source),
                kind: Some(occurrence.into()),
            })
            .collect_vec();
        (!highlights.is_empty()).then_some(highlights)
    }
}

/// The kinds whose bodies start a fresh set of locals, below the program.
const LOCAL_SCOPES: &[SyntaxKind] = &[
    SyntaxKind::MethodDef,
    SyntaxKind::ClassDef,
    SyntaxKind::ModuleDef,
    SyntaxKind::SingletonClass,
];

fn introduces_local_scope(kind: SyntaxKind) -> bool {
    kind == SyntaxKind::Program || LOCAL_SCOPES.contains(&kind)
}

/// Collects the occurrences of the symbol a [`NodeMatcher`] targets.
struct DocumentHighlightWorker<'a> {
    matcher: NodeMatcher,
    /// The scope defining the target, when the target is a local.
    local_scope: Option<&'a SyntaxNode>,
    /// The number of scopes nested in `local_scope` enclosing the current
    /// node. Locals of those scopes are unrelated to the target.
    foreign_depth: usize,
    include_writes: bool,
    highlights: Vec<(Range<usize>, Occurrence)>,
}

impl<'a> DocumentHighlightWorker<'a> {
    fn new(matcher: NodeMatcher, local_scope: Option<&'a SyntaxNode>, include_writes: bool) -> Self {
        Self {
            matcher,
            local_scope,
            foreign_depth: 0,
            include_writes,
            highlights: Vec::new(),
        }
    }

    fn opens_foreign_scope(&self, node: &SyntaxNode) -> bool {
        self.local_scope.is_some_and(|scope| {
            introduces_local_scope(node.kind()) && !std::ptr::eq(scope, node)
        })
    }
}

impl Listener for DocumentHighlightWorker<'_> {
    fn subscriptions(&self) -> Vec<Event> {
        let mut events = matchable_kinds().map(Event::Enter).collect_vec();
        if self.local_scope.is_some() {
            for kind in LOCAL_SCOPES {
                events.push(Event::Enter(*kind));
                events.push(Event::Exit(*kind));
            }
        }
        events
    }

    fn on_event(&mut self, event: Event, node: &SyntaxNode) {
        match event {
            Event::Enter(..) => {
                if self.opens_foreign_scope(node) {
                    self.foreign_depth += 1;
                }
                if self.foreign_depth > 0 {
                    return;
                }
            }
            Event::Exit(..) => {
                if self.opens_foreign_scope(node) {
                    self.foreign_depth = self.foreign_depth.saturating_sub(1);
                }
                return;
            }
            Event::AnyNode => return,
        }

        match self.matcher.classify(node) {
            Some(Occurrence::Write) if !self.include_writes => {}
            Some(occurrence) => self.highlights.push((node.name_range(), occurrence)),
            None => {}
        }
    }
}

impl Accumulator for DocumentHighlightWorker<'_> {
    type Output = Vec<(Range<usize>, Occurrence)>;

    fn finish(self) -> Self::Output {
        self.highlights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QueryConfig;
    use crate::tests::*;

    fn highlight(config: QueryConfig, ident: &str, nth: usize) -> String {
        let ctx = cart_context(config);
        let highlights = DocumentHighlightRequest {
            path: CART_PATH.into(),
            position: cart_pos(ident, nth),
        }
        .request(&ctx);

        let Some(highlights) = highlights else {
            return "no highlights".to_owned();
        };
        highlights
            .into_iter()
            .map(|highlight| {
                let kind = if highlight.kind == Some(DocumentHighlightKind::WRITE) {
                    "write"
                } else {
                    "read"
                };
                format!("{} {kind}", render_range(highlight.range))
            })
            .join("\n")
    }

    #[test]
    fn instance_variable() {
        assert_snapshot!(highlight(QueryConfig::default(), "@items", 0), @r"
        5:6-5:12 write
        9:6-9:12 read
        14:14-14:20 read
        ");
    }

    #[test]
    fn local_stays_in_its_method() {
        assert_snapshot!(highlight(QueryConfig::default(), "item", 1), @r"
        8:12-8:16 write
        9:18-9:22 read
        ");
        assert_snapshot!(highlight(QueryConfig::default(), "count", 1), @r"
        14:6-14:11 write
        15:6-15:11 read
        ");
    }

    #[test]
    fn method_call_and_definition() {
        assert_snapshot!(highlight(QueryConfig::default(), "total", 0), @r"
        10:6-10:11 read
        13:8-13:13 write
        ");
    }

    #[test]
    fn reads_only() {
        let config = QueryConfig {
            highlight_definitions: Some(false),
            ..QueryConfig::default()
        };
        assert_snapshot!(highlight(config, "@items", 0), @r"
        9:6-9:12 read
        14:14-14:20 read
        ");
    }

    const SHADOWED: &str = "\
class C
  x = 1
  def m
    x = 2
  end
  x
end
";

    fn shadowed_source() -> Source {
        use SyntaxKind::*;

        let f = Fixture::new(SHADOWED);
        let class = 0..SHADOWED.trim_end().len();
        let outer = f.find("x = 1");
        let def = f.block("def m", "end");
        let inner = f.find("x = 2");
        let read = f.ident(f.all(), "x", 2);

        let local = |kind, range: Range<usize>| {
            SyntaxNode::new(kind, range.clone()).with_name("x", range.start..range.start + 1)
        };
        let tree = SyntaxNode::new(Program, f.all()).with_children([SyntaxNode::new(
            ClassDef,
            class,
        )
        .with_name("C", f.find("C"))
        .with_slot(None)
        .with_children([
            local(LocalVarWrite, outer.clone())
                .with_children([SyntaxNode::new(Integer, f.find_in(outer, "1"))]),
            SyntaxNode::new(MethodDef, def.clone())
                .with_name("m", f.ident(def, "m", 0))
                .with_children([local(LocalVarWrite, inner.clone())
                    .with_children([SyntaxNode::new(Integer, f.find_in(inner, "2"))])]),
            local(LocalVarRead, read),
        ])]);

        Source::new("shadowed.rb", SHADOWED, tree)
    }

    fn highlight_shadowed(position: LspPosition) -> String {
        let mut ctx = AnalysisContext::new(QueryConfig::default());
        ctx.add_source(shadowed_source());

        let highlights = DocumentHighlightRequest {
            path: "shadowed.rb".into(),
            position,
        }
        .request(&ctx)
        .unwrap_or_default();
        highlights
            .into_iter()
            .map(|highlight| render_range(highlight.range))
            .join("\n")
    }

    #[test]
    fn local_skips_nested_method_bodies() {
        assert_snapshot!(highlight_shadowed(LspPosition::new(1, 2)), @r"
        1:2-1:3
        5:2-5:3
        ");
        assert_snapshot!(highlight_shadowed(LspPosition::new(5, 2)), @r"
        1:2-1:3
        5:2-5:3
        ");
        assert_snapshot!(highlight_shadowed(LspPosition::new(3, 4)), @"3:4-3:5");
    }

    #[test]
    fn nothing_to_highlight() {
        assert_eq!(highlight(QueryConfig::default(), "10", 0), "no highlights");
    }
}
