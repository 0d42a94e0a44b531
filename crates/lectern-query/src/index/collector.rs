use crate::prelude::*;

/// A symbol defined in a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolEntry {
    /// The fully qualified name, e.g. `Shop::Cart#add`.
    pub name: EcoString,
    /// The kind reported to the client.
    pub kind: SymbolKind,
    /// The file defining the symbol.
    pub path: EcoString,
    /// The byte range of the definition.
    pub range: Range<usize>,
    /// The byte range of the defined identifier.
    pub name_range: Range<usize>,
    /// The fully qualified name of the enclosing namespace.
    pub container: Option<EcoString>,
}

/// The kind of symbol a definition of `kind` introduces.
pub(crate) fn symbol_kind(kind: SyntaxKind) -> Option<SymbolKind> {
    Some(match kind {
        SyntaxKind::ModuleDef => SymbolKind::MODULE,
        SyntaxKind::ClassDef => SymbolKind::CLASS,
        SyntaxKind::MethodDef => SymbolKind::METHOD,
        SyntaxKind::ConstWrite => SymbolKind::CONSTANT,
        _ => return None,
    })
}

/// Qualifies a constant path relative to a namespace. A leading `::` anchors
/// the path at the top level.
pub(crate) fn qualify(namespace: Option<&str>, name: &str) -> EcoString {
    match (namespace, name.strip_prefix("::")) {
        (_, Some(absolute)) => absolute.into(),
        (Some(namespace), None) => eco_format!("{namespace}::{name}"),
        (None, None) => name.into(),
    }
}

/// Qualifies a method name. Singleton methods are joined with `.`, instance
/// methods with `#`. Top-level methods stay bare.
pub(crate) fn qualify_method(namespace: Option<&str>, singleton: bool, name: &str) -> EcoString {
    match namespace {
        Some(namespace) if singleton => eco_format!("{namespace}.{name}"),
        Some(namespace) => eco_format!("{namespace}#{name}"),
        None => name.into(),
    }
}

/// Whether a method definition is `def self.name`, whose receiver is the
/// first child.
pub(crate) fn defines_on_self(node: &SyntaxNode) -> bool {
    node.children()
        .next()
        .is_some_and(|first| first.kind() == SyntaxKind::SelfRef)
}

/// The naming context of one nesting level.
#[derive(Debug, Clone)]
pub(crate) struct Frame {
    /// The fully qualified namespace in effect.
    pub namespace: Option<EcoString>,
    /// Whether methods defined here are singleton methods.
    pub singleton: bool,
}

/// Tracks namespaces while walking definitions.
#[derive(Debug, Default, Clone)]
pub(crate) struct NamespaceStack {
    frames: Vec<Frame>,
}

impl NamespaceStack {
    /// Computes the namespaces enclosing the end of a node path.
    pub fn enclosing(path: &[&SyntaxNode]) -> Self {
        let mut stack = Self::default();
        for node in path {
            stack.enter(node);
        }
        stack
    }

    /// The innermost namespace.
    pub fn namespace(&self) -> Option<&str> {
        self.frames.last()?.namespace.as_deref()
    }

    /// Whether methods defined at this point are singleton methods.
    pub fn singleton(&self) -> bool {
        self.frames.last().is_some_and(|frame| frame.singleton)
    }

    /// Every namespace in effect, innermost first.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.frames
            .iter()
            .rev()
            .filter_map(|frame| frame.namespace.as_deref())
            .dedup()
    }

    /// Opens the frame of `node` if it is a namespace or singleton class and
    /// returns the name it defines.
    pub fn enter(&mut self, node: &SyntaxNode) -> Option<EcoString> {
        match node.kind() {
            SyntaxKind::ModuleDef | SyntaxKind::ClassDef => {
                let name = node.name().map(|name| qualify(self.namespace(), name));
                let frame = Frame {
                    namespace: name.clone().or_else(|| self.namespace().map(Into::into)),
                    singleton: false,
                };
                self.frames.push(frame);
                name
            }
            SyntaxKind::SingletonClass => {
                let frame = Frame {
                    namespace: self.namespace().map(Into::into),
                    singleton: true,
                };
                self.frames.push(frame);
                None
            }
            _ => None,
        }
    }

    /// Closes the innermost frame.
    pub fn exit(&mut self) {
        self.frames.pop();
    }
}

/// Collects the definitions of a file in one pass.
pub struct SymbolCollector {
    path: EcoString,
    stack: NamespaceStack,
    symbols: Vec<SymbolEntry>,
}

impl SymbolCollector {
    /// Creates a collector for definitions found in `path`.
    pub fn new(path: EcoString) -> Self {
        Self {
            path,
            stack: NamespaceStack::default(),
            symbols: Vec::new(),
        }
    }

    fn push(&mut self, name: EcoString, node: &SyntaxNode, container: Option<EcoString>) {
        let Some(kind) = symbol_kind(node.kind()) else {
            return;
        };

        self.symbols.push(SymbolEntry {
            name,
            kind,
            path: self.path.clone(),
            range: node.range(),
            name_range: node.name_range(),
            container,
        });
    }
}

impl Listener for SymbolCollector {
    fn subscriptions(&self) -> Vec<Event> {
        vec![
            Event::Enter(SyntaxKind::ModuleDef),
            Event::Exit(SyntaxKind::ModuleDef),
            Event::Enter(SyntaxKind::ClassDef),
            Event::Exit(SyntaxKind::ClassDef),
            Event::Enter(SyntaxKind::SingletonClass),
            Event::Exit(SyntaxKind::SingletonClass),
            Event::Enter(SyntaxKind::MethodDef),
            Event::Enter(SyntaxKind::ConstWrite),
        ]
    }

    fn on_event(&mut self, event: Event, node: &SyntaxNode) {
        let container = self.stack.namespace().map(EcoString::from);
        match event {
            Event::Enter(SyntaxKind::ModuleDef | SyntaxKind::ClassDef) => {
                if let Some(name) = self.stack.enter(node) {
                    self.push(name, node, container);
                }
            }
            Event::Enter(SyntaxKind::SingletonClass) => {
                self.stack.enter(node);
            }
            Event::Exit(..) => self.stack.exit(),
            Event::Enter(SyntaxKind::MethodDef) => {
                let Some(name) = node.name() else {
                    return;
                };
                let singleton = self.stack.singleton() || defines_on_self(node);
                let name = qualify_method(self.stack.namespace(), singleton, name);
                self.push(name, node, container);
            }
            Event::Enter(SyntaxKind::ConstWrite) => {
                let Some(name) = node.name() else {
                    return;
                };
                let name = qualify(self.stack.namespace(), name);
                self.push(name, node, container);
            }
            _ => {}
        }
    }
}

impl Accumulator for SymbolCollector {
    type Output = Vec<SymbolEntry>;

    fn finish(self) -> Self::Output {
        self.symbols
    }
}
