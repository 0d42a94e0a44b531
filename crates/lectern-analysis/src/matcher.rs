//! Classifies nodes as occurrences of the symbol a target node names.
//!
//! Two closed tables keyed by [`SyntaxKind`] drive the classification:
//! - [`identity_class`] tells which namespace the name of a node lives in,
//!   so that a local `foo` never matches a method `foo`.
//! - [`occurrence_class`] tells whether a node of the kind writes the symbol
//!   (definitions, parameters, assignments) or reads it (references, calls).
//!
//! A kind is matchable iff both tables know it.

use ecow::EcoString;
use strum::IntoEnumIterator;

use crate::syntax::{SyntaxKind, SyntaxNode};

/// The namespace a name lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentClass {
    /// A local variable or parameter.
    Local,
    /// An instance variable, `@foo`.
    Instance,
    /// A class variable, `@@foo`.
    ClassVar,
    /// A global variable, `$foo`.
    Global,
    /// A constant, class or module.
    Constant,
    /// A method.
    Method,
}

/// The normalized identity of the symbol a node names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    /// The namespace of the name.
    pub class: IdentClass,
    /// The normalized name.
    pub name: EcoString,
}

/// How a node uses the symbol it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occurrence {
    /// The node reads the symbol.
    Read,
    /// The node binds or assigns the symbol.
    Write,
}

impl From<Occurrence> for lsp_types::DocumentHighlightKind {
    fn from(occurrence: Occurrence) -> Self {
        match occurrence {
            Occurrence::Read => Self::READ,
            Occurrence::Write => Self::WRITE,
        }
    }
}

/// The namespace the name of a node of `kind` lives in, if nodes of the kind
/// name a symbol at all.
pub const fn identity_class(kind: SyntaxKind) -> Option<IdentClass> {
    use SyntaxKind::*;

    match kind {
        RequiredParam | OptionalParam | RestParam | KeywordParam | KeywordRestParam
        | BlockParam | LocalVarRead | LocalVarWrite => Some(IdentClass::Local),
        InstanceVarRead | InstanceVarWrite => Some(IdentClass::Instance),
        ClassVarRead | ClassVarWrite => Some(IdentClass::ClassVar),
        GlobalVarRead | GlobalVarWrite => Some(IdentClass::Global),
        ModuleDef | ClassDef | ConstRead | ConstWrite => Some(IdentClass::Constant),
        MethodDef | Call => Some(IdentClass::Method),

        Program | Statements | SingletonClass | Block | Lambda | Params | Args | SelfRef
        | If | Unless | Case | When | While | Until | For | Begin | Rescue | Return | Break
        | Next | Integer | Float | Str | Symbol | Array | Hash | Nil | True | False | Error => {
            None
        }
    }
}

/// Whether a node of `kind` writes or reads the symbol it names.
pub const fn occurrence_class(kind: SyntaxKind) -> Option<Occurrence> {
    use SyntaxKind::*;

    match kind {
        ModuleDef | ClassDef | MethodDef | RequiredParam | OptionalParam | RestParam
        | KeywordParam | KeywordRestParam | BlockParam | LocalVarWrite | InstanceVarWrite
        | ClassVarWrite | GlobalVarWrite | ConstWrite => Some(Occurrence::Write),
        LocalVarRead | InstanceVarRead | ClassVarRead | GlobalVarRead | ConstRead | Call => {
            Some(Occurrence::Read)
        }

        Program | Statements | SingletonClass | Block | Lambda | Params | Args | SelfRef
        | If | Unless | Case | When | While | Until | For | Begin | Rescue | Return | Break
        | Next | Integer | Float | Str | Symbol | Array | Hash | Nil | True | False | Error => {
            None
        }
    }
}

/// The kinds whose nodes can be occurrences of a symbol.
pub fn matchable_kinds() -> impl Iterator<Item = SyntaxKind> {
    SyntaxKind::iter().filter(|&kind| identity_class(kind).is_some())
}

/// Extracts the normalized identity of the symbol `node` names.
///
/// Constants drop a leading `::` (top-level lookup) and methods drop a
/// trailing `=` (setters), so `::Foo` matches `Foo` and `self.x = 1` matches
/// `def x=`. Compound names are kept whole.
pub fn identity(node: &SyntaxNode) -> Option<Identity> {
    let class = identity_class(node.kind())?;
    let name = node.name()?.as_str();

    let name = match class {
        IdentClass::Constant => name.strip_prefix("::").unwrap_or(name),
        IdentClass::Method => name.strip_suffix('=').unwrap_or(name),
        _ => name,
    };
    if name.is_empty() {
        return None;
    }

    Some(Identity {
        class,
        name: name.into(),
    })
}

/// Matches candidate nodes against the symbol of a target node.
#[derive(Debug, Clone)]
pub struct NodeMatcher {
    target: Identity,
}

impl NodeMatcher {
    /// Creates a matcher for the symbol `target` names, or `None` if the
    /// target names nothing.
    pub fn new(target: &SyntaxNode) -> Option<Self> {
        Some(Self {
            target: identity(target)?,
        })
    }

    /// The identity every candidate is compared with.
    pub fn target(&self) -> &Identity {
        &self.target
    }

    /// Classifies `candidate` as a read or write of the target symbol.
    pub fn classify(&self, candidate: &SyntaxNode) -> Option<Occurrence> {
        let identity = identity(candidate)?;
        if identity != self.target {
            return None;
        }
        occurrence_class(candidate.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(kind: SyntaxKind, name: &str) -> SyntaxNode {
        SyntaxNode::new(kind, 0..0).with_name(name, 0..0)
    }

    #[test]
    fn tables_cover_the_same_kinds() {
        for kind in SyntaxKind::iter() {
            assert_eq!(
                identity_class(kind).is_some(),
                occurrence_class(kind).is_some(),
                "{kind:?}"
            );
        }
        assert_eq!(matchable_kinds().count(), 20);
    }

    #[test]
    fn local_reads_and_writes() {
        let matcher = NodeMatcher::new(&named(SyntaxKind::LocalVarRead, "foo")).unwrap();

        assert_eq!(
            matcher.classify(&named(SyntaxKind::LocalVarWrite, "foo")),
            Some(Occurrence::Write)
        );
        assert_eq!(
            matcher.classify(&named(SyntaxKind::RequiredParam, "foo")),
            Some(Occurrence::Write)
        );
        assert_eq!(
            matcher.classify(&named(SyntaxKind::LocalVarRead, "foo")),
            Some(Occurrence::Read)
        );
        assert_eq!(matcher.classify(&named(SyntaxKind::LocalVarRead, "bar")), None);
    }

    #[test]
    fn namespaces_do_not_mix() {
        let matcher = NodeMatcher::new(&named(SyntaxKind::InstanceVarRead, "@foo")).unwrap();
        assert_eq!(matcher.classify(&named(SyntaxKind::Call, "@foo")), None);
        assert_eq!(
            matcher.classify(&named(SyntaxKind::ClassVarRead, "@foo")),
            None
        );

        let matcher = NodeMatcher::new(&named(SyntaxKind::Call, "foo")).unwrap();
        assert_eq!(
            matcher.classify(&named(SyntaxKind::LocalVarRead, "foo")),
            None
        );
        assert_eq!(
            matcher.classify(&named(SyntaxKind::MethodDef, "foo")),
            Some(Occurrence::Write)
        );
    }

    #[test]
    fn names_are_normalized() {
        let matcher = NodeMatcher::new(&named(SyntaxKind::ConstRead, "::Foo")).unwrap();
        assert_eq!(
            matcher.classify(&named(SyntaxKind::ClassDef, "Foo")),
            Some(Occurrence::Write)
        );
        assert_eq!(matcher.classify(&named(SyntaxKind::ConstRead, "Foo::Bar")), None);

        let matcher = NodeMatcher::new(&named(SyntaxKind::MethodDef, "name=")).unwrap();
        assert_eq!(matcher.target().name, "name");
        assert_eq!(
            matcher.classify(&named(SyntaxKind::Call, "name")),
            Some(Occurrence::Read)
        );
    }

    #[test]
    fn unnamed_or_unmatchable_targets() {
        assert!(NodeMatcher::new(&named(SyntaxKind::Str, "foo")).is_none());
        assert!(NodeMatcher::new(&SyntaxNode::new(SyntaxKind::LocalVarRead, 0..3)).is_none());
        assert!(NodeMatcher::new(&named(SyntaxKind::ConstRead, "::")).is_none());

        let matcher = NodeMatcher::new(&named(SyntaxKind::ClassDef, "Foo")).unwrap();
        assert_eq!(matcher.classify(&named(SyntaxKind::SelfRef, "Foo")), None);
    }
}
