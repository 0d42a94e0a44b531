use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoStaticStr};

/// The closed set of node categories a tree is made of.
///
/// Serialized by variant name, e.g. `"ClassDef"`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter,
    IntoStaticStr,
)]
pub enum SyntaxKind {
    /// The root of a file.
    Program,
    /// A sequence of statements.
    Statements,
    /// `module Foo ... end`
    ModuleDef,
    /// `class Foo < Bar ... end`
    ClassDef,
    /// `class << self ... end`
    SingletonClass,
    /// `def foo(a) ... end`
    MethodDef,
    /// `do |x| ... end` or `{ |x| ... }`
    Block,
    /// `->(x) { ... }`
    Lambda,

    /// The parameter list of a method, block or lambda.
    Params,
    /// `def foo(a)`
    ///          ^
    RequiredParam,
    /// `def foo(a = 1)`
    ///          ^
    OptionalParam,
    /// `def foo(*rest)`
    ///           ^^^^
    RestParam,
    /// `def foo(key:)`
    ///          ^^^
    KeywordParam,
    /// `def foo(**opts)`
    ///            ^^^^
    KeywordRestParam,
    /// `def foo(&blk)`
    ///           ^^^
    BlockParam,

    /// `foo`, a read of a local variable.
    LocalVarRead,
    /// `foo = 1`
    LocalVarWrite,
    /// `@foo`
    InstanceVarRead,
    /// `@foo = 1`
    InstanceVarWrite,
    /// `@@foo`
    ClassVarRead,
    /// `@@foo = 1`
    ClassVarWrite,
    /// `$foo`
    GlobalVarRead,
    /// `$foo = 1`
    GlobalVarWrite,
    /// `Foo` or `Foo::Bar`
    ConstRead,
    /// `FOO = 1`
    ConstWrite,

    /// `recv.foo(args)` or `foo(args)`
    Call,
    /// The argument list of a call.
    Args,
    /// `self`
    SelfRef,

    /// `if cond ... elsif ... else ... end`
    If,
    /// `unless cond ... end`
    Unless,
    /// `case subject ... end`
    Case,
    /// `when pattern ... `
    When,
    /// `while cond ... end`
    While,
    /// `until cond ... end`
    Until,
    /// `for x in xs ... end`
    For,
    /// `begin ... rescue ... ensure ... end`
    Begin,
    /// `rescue Error => e`
    Rescue,
    /// `return value`
    Return,
    /// `break`
    Break,
    /// `next`
    Next,

    /// `1`
    Integer,
    /// `1.0`
    Float,
    /// `"foo"`
    Str,
    /// `:foo`
    Symbol,
    /// `[1, 2]`
    Array,
    /// `{ a: 1 }`
    Hash,
    /// `nil`
    Nil,
    /// `true`
    True,
    /// `false`
    False,

    /// A region the parser failed to recognize.
    Error,
}

impl SyntaxKind {
    /// Whether nodes of this kind open a nested naming context. Only these
    /// kinds produce exit events during a traversal.
    pub const fn is_scope(self) -> bool {
        matches!(
            self,
            SyntaxKind::Program
                | SyntaxKind::ModuleDef
                | SyntaxKind::ClassDef
                | SyntaxKind::SingletonClass
                | SyntaxKind::MethodDef
                | SyntaxKind::Block
                | SyntaxKind::Lambda
        )
    }

    /// Whether nodes of this kind name a namespace.
    pub const fn is_namespace(self) -> bool {
        matches!(self, SyntaxKind::ModuleDef | SyntaxKind::ClassDef)
    }

    /// Whether nodes of this kind bind a parameter.
    pub const fn is_param(self) -> bool {
        matches!(
            self,
            SyntaxKind::RequiredParam
                | SyntaxKind::OptionalParam
                | SyntaxKind::RestParam
                | SyntaxKind::KeywordParam
                | SyntaxKind::KeywordRestParam
                | SyntaxKind::BlockParam
        )
    }

    /// The name of the kind, as used in serialized trees.
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn scopes() {
        let scopes = SyntaxKind::iter()
            .filter(|kind| kind.is_scope())
            .map(SyntaxKind::as_str)
            .collect::<Vec<_>>();
        assert_eq!(
            scopes,
            vec![
                "Program",
                "ModuleDef",
                "ClassDef",
                "SingletonClass",
                "MethodDef",
                "Block",
                "Lambda"
            ]
        );
    }

    #[test]
    fn serialized_by_variant_name() {
        let kind: SyntaxKind = serde_json::from_str(r#""InstanceVarWrite""#).unwrap();
        assert_eq!(kind, SyntaxKind::InstanceVarWrite);
        assert_eq!(
            serde_json::to_string(&SyntaxKind::ClassDef).unwrap(),
            r#""ClassDef""#
        );
    }
}
