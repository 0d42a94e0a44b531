use crate::index::{defines_on_self, symbol_kind};
use crate::prelude::*;

/// The [`textDocument/documentSymbol`] request is sent from the client to the
/// server to return a flat list of all symbols found in a given text document.
///
/// The returned result is a nested hierarchy. Methods defined in a
/// `class << self` body are attached to the enclosing class and named
/// `self.name`.
///
/// [`textDocument/documentSymbol`]: https://microsoft.github.io/language-server-protocol/specification#textDocument_documentSymbol
#[derive(Debug, Clone)]
pub struct DocumentSymbolRequest {
    /// The path of the document to retrieve symbols from.
    pub path: EcoString,
}

impl SyntaxRequest for DocumentSymbolRequest {
    type Response = DocumentSymbolResponse;

    fn request(self, ctx: &AnalysisContext) -> Option<Self::Response> {
        let source = ctx.source_by_path(&self.path).ok()?;

        let mut worker = DocumentSymbolWorker::new(ctx, source);
        let mut dispatcher = Dispatcher::new();
        dispatcher.register_listener(&mut worker);
        dispatcher.visit(source.root());

        Some(DocumentSymbolResponse::Nested(worker.finish()))
    }
}

enum Frame {
    /// A symbol whose children are still being collected.
    Symbol(DocumentSymbol),
    /// A `class << self` body.
    Singleton,
    /// An unnamed definition.
    Anonymous,
}

struct DocumentSymbolWorker<'a> {
    ctx: &'a AnalysisContext,
    source: &'a Source,
    stack: Vec<Frame>,
    roots: Vec<DocumentSymbol>,
}

impl<'a> DocumentSymbolWorker<'a> {
    fn new(ctx: &'a AnalysisContext, source: &'a Source) -> Self {
        Self {
            ctx,
            source,
            stack: Vec::new(),
            roots: Vec::new(),
        }
    }

    #[allow(deprecated)]
    fn symbol(&self, node: &SyntaxNode) -> Option<DocumentSymbol> {
        let kind = symbol_kind(node.kind())?;
        let name = node.name()?;

        let in_singleton = matches!(self.stack.last(), Some(Frame::Singleton));
        let name = if node.kind() == SyntaxKind::MethodDef && (in_singleton || defines_on_self(node))
        {
            format!("self.{name}")
        } else {
            name.to_string()
        };

        Some(DocumentSymbol {
            name,
            detail: None,
            kind,
            tags: None,
            deprecated: None,
            range: self.ctx.to_lsp_range(node.range(), self.source),
            selection_range: self.ctx.to_lsp_range(node.name_range(), self.source),
            children: None,
        })
    }

    /// Attaches a finished symbol to the nearest open symbol.
    fn attach(&mut self, symbol: DocumentSymbol) {
        let parent = self.stack.iter_mut().rev().find_map(|frame| match frame {
            Frame::Symbol(parent) => Some(parent),
            Frame::Singleton | Frame::Anonymous => None,
        });

        match parent {
            Some(parent) => parent.children.get_or_insert_with(Vec::new).push(symbol),
            None => self.roots.push(symbol),
        }
    }
}

impl Listener for DocumentSymbolWorker<'_> {
    fn subscriptions(&self) -> Vec<Event> {
        let mut events = vec![Event::Enter(SyntaxKind::ConstWrite)];
        for kind in [
            SyntaxKind::ModuleDef,
            SyntaxKind::ClassDef,
            SyntaxKind::SingletonClass,
            SyntaxKind::MethodDef,
        ] {
            events.push(Event::Enter(kind));
            events.push(Event::Exit(kind));
        }
        events
    }

    fn on_event(&mut self, event: Event, node: &SyntaxNode) {
        match event {
            Event::Enter(SyntaxKind::SingletonClass) => self.stack.push(Frame::Singleton),
            Event::Enter(SyntaxKind::ConstWrite) => {
                if let Some(symbol) = self.symbol(node) {
                    self.attach(symbol);
                }
            }
            Event::Enter(..) => {
                // Unnamed definitions still open a frame to keep the stack
                // balanced with exits.
                let frame = match self.symbol(node) {
                    Some(symbol) => Frame::Symbol(symbol),
                    None => Frame::Anonymous,
                };
                self.stack.push(frame);
            }
            Event::Exit(..) => match self.stack.pop() {
                Some(Frame::Symbol(symbol)) => self.attach(symbol),
                Some(Frame::Singleton | Frame::Anonymous) | None => {}
            },
            Event::AnyNode => {}
        }
    }
}

impl Accumulator for DocumentSymbolWorker<'_> {
    type Output = Vec<DocumentSymbol>;

    fn finish(self) -> Self::Output {
        self.roots
    }
}
