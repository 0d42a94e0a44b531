use crate::index::{NamespaceStack, SymbolEntry, WorkspaceIndex, defines_on_self, qualify};
use crate::prelude::*;

/// The [`textDocument/definition`] request asks the server for the definition
/// location of a symbol at a given text document position.
///
/// Constants and method calls are resolved by name against the workspace
/// index. Candidate names are tried from the innermost enclosing namespace
/// outwards, and the first one defined anywhere in the workspace wins.
///
/// [`textDocument/definition`]: https://microsoft.github.io/language-server-protocol/specification#textDocument_definition
#[derive(Debug, Clone)]
pub struct GotoDefinitionRequest {
    /// The path of the document to request for.
    pub path: EcoString,
    /// The position of the document to request for.
    pub position: LspPosition,
}

impl SemanticRequest for GotoDefinitionRequest {
    type Response = GotoDefinitionResponse;

    fn request(self, ctx: &AnalysisContext) -> Option<Self::Response> {
        let source = ctx.source_by_path(&self.path).ok()?;
        let cursor = ctx.to_offset(self.position, source);

        let path = source.root().path_at(cursor);
        let (target, ancestors) = path.split_last()?;
        let scope = NamespaceStack::enclosing(ancestors);
        let in_singleton_method = scope.singleton()
            || ancestors
                .iter()
                .rev()
                .find(|node| node.kind() == SyntaxKind::MethodDef)
                .is_some_and(|def| defines_on_self(def));

        let mut worker = DefinitionListener {
            index: ctx.index(),
            namespaces: scope.namespaces().map(EcoString::from).collect(),
            singleton: in_singleton_method,
            definitions: Vec::new(),
        };
        let mut dispatcher = Dispatcher::new();
        dispatcher.register_listener(&mut worker);
        dispatcher.emit_for_target(target);

        let definitions = worker.finish();
        log::debug!(
            "goto definition at {}:{cursor}: {:?}",
            self.path,
            definitions.iter().map(|entry| &entry.name).collect_vec()
        );

        let locations = definitions
            .into_iter()
            .filter_map(|entry| ctx.to_lsp_location(entry))
            .collect_vec();
        (!locations.is_empty()).then_some(GotoDefinitionResponse::Array(locations))
    }
}

/// Resolves the constant or call it is emitted for.
struct DefinitionListener<'a> {
    index: &'a WorkspaceIndex,
    /// Enclosing namespaces, innermost first.
    namespaces: Vec<EcoString>,
    /// Whether `self` is the class object rather than an instance.
    singleton: bool,
    definitions: Vec<&'a SymbolEntry>,
}

impl<'a> DefinitionListener<'a> {
    /// The entries of the first candidate name that is defined.
    fn first_defined(&self, candidates: impl IntoIterator<Item = EcoString>) -> &'a [SymbolEntry] {
        let index = self.index;
        candidates
            .into_iter()
            .map(|name| index.resolve(&name))
            .find(|entries| !entries.is_empty())
            .unwrap_or_default()
    }

    /// Resolves a constant path to the fully qualified name it refers to.
    fn resolve_const(&self, name: &str) -> Option<EcoString> {
        let entries = if name.starts_with("::") {
            self.index.resolve(&qualify(None, name))
        } else {
            let scoped = self.namespaces.iter().map(|ns| qualify(Some(ns.as_str()), name));
            self.first_defined(scoped.chain([EcoString::from(name)]))
        };
        entries.first().map(|entry| entry.name.clone())
    }

    fn resolve_call(&self, node: &SyntaxNode) -> &'a [SymbolEntry] {
        let Some(method) = node.name() else {
            return &[];
        };

        match receiver(node) {
            None => self.resolve_on_self(method, self.singleton),
            Some(recv) if recv.kind() == SyntaxKind::SelfRef => {
                self.resolve_on_self(method, self.singleton)
            }
            Some(recv) if recv.kind() == SyntaxKind::ConstRead => {
                let Some(class) = recv.name().and_then(|name| self.resolve_const(name)) else {
                    return &[];
                };
                self.index.resolve(&eco_format!("{class}.{method}"))
            }
            // The class of other receivers is unknown without type inference.
            Some(_) => &[],
        }
    }

    fn resolve_on_self(&self, method: &str, singleton: bool) -> &'a [SymbolEntry] {
        let candidates = self.namespaces.iter().flat_map(|ns| {
            let instance = eco_format!("{ns}#{method}");
            let class = eco_format!("{ns}.{method}");
            if singleton {
                [class, instance]
            } else {
                [instance, class]
            }
        });
        self.first_defined(candidates.chain([EcoString::from(method)]))
    }
}

/// The explicit receiver of a call, which precedes its arguments.
fn receiver(call: &SyntaxNode) -> Option<&SyntaxNode> {
    call.children()
        .next()
        .filter(|first| !matches!(first.kind(), SyntaxKind::Args | SyntaxKind::Block))
}

impl Listener for DefinitionListener<'_> {
    fn subscriptions(&self) -> Vec<Event> {
        vec![
            Event::Enter(SyntaxKind::ConstRead),
            Event::Enter(SyntaxKind::Call),
        ]
    }

    fn on_event(&mut self, event: Event, node: &SyntaxNode) {
        let index = self.index;
        let definitions = match event {
            Event::Enter(SyntaxKind::ConstRead) => node
                .name()
                .and_then(|name| self.resolve_const(name))
                .map(|name| index.resolve(&name))
                .unwrap_or_default(),
            Event::Enter(SyntaxKind::Call) => self.resolve_call(node),
            _ => &[],
        };
        self.definitions.extend(definitions);
    }
}

impl<'a> Accumulator for DefinitionListener<'a> {
    type Output = Vec<&'a SymbolEntry>;

    fn finish(self) -> Self::Output {
        self.definitions
    }
}
