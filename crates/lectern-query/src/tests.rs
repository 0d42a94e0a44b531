use std::ops::Range;

pub use insta::assert_snapshot;
pub use lectern_analysis::{LspPosition, LspRange};

use lectern_analysis::{Source, SyntaxKind, SyntaxNode};

use crate::{AnalysisContext, QueryConfig};

pub const CART_PATH: &str = "lib/shop/cart.rb";

pub const CART: &str = "\
module Shop
  class Cart
    LIMIT = 10

    def initialize(items)
      @items = items
    end # initialize

    def add(item)
      @items.push(item)
      total
    end # add

    def total
      count = @items.size
      count
    end # total

    class << self
      def empty
        new([])
      end # empty
    end # singleton
  end # Cart
end # Shop

Shop::Cart.empty
";

pub const REOPENED_PATH: &str = "lib/shop/cart/clear.rb";

pub const REOPENED: &str = "\
class Shop::Cart
  def clear
    @items = []
  end
end
";

/// Locates snippets of a fixture text by searching for them.
pub struct Fixture {
    text: &'static str,
}

impl Fixture {
    pub fn new(text: &'static str) -> Self {
        Self { text }
    }

    pub fn all(&self) -> Range<usize> {
        0..self.text.len()
    }

    /// The first occurrence of `needle` inside `outer`.
    pub fn find_in(&self, outer: Range<usize>, needle: &str) -> Range<usize> {
        let start = outer.start
            + self.text[outer.clone()]
                .find(needle)
                .unwrap_or_else(|| panic!("{needle:?} not found in {outer:?}"));
        start..start + needle.len()
    }

    /// The first occurrence of `needle` in the whole text.
    pub fn find(&self, needle: &str) -> Range<usize> {
        self.find_in(self.all(), needle)
    }

    /// From the start of `open` to the end of the first `close` after it.
    pub fn block(&self, open: &str, close: &str) -> Range<usize> {
        let open = self.find(open);
        let close = self.find_in(open.start..self.text.len(), close);
        open.start..close.end
    }

    /// The `nth` occurrence of the identifier `ident` inside `outer`, not
    /// counting occurrences embedded in longer identifiers.
    pub fn ident(&self, outer: Range<usize>, ident: &str, nth: usize) -> Range<usize> {
        let is_ident = |ch: char| ch.is_alphanumeric() || matches!(ch, '_' | '@' | '$');
        let text = &self.text[outer.clone()];
        text.match_indices(ident)
            .filter(|(idx, _)| {
                let before = text[..*idx].chars().next_back();
                let after = text[idx + ident.len()..].chars().next();
                !before.is_some_and(is_ident) && !after.is_some_and(is_ident)
            })
            .nth(nth)
            .map(|(idx, _)| outer.start + idx..outer.start + idx + ident.len())
            .unwrap_or_else(|| panic!("identifier {ident:?} #{nth} not found in {outer:?}"))
    }

    /// The position of the start of `range`, counting bytes.
    pub fn pos(&self, range: Range<usize>) -> LspPosition {
        let before = &self.text[..range.start];
        let line = before.matches('\n').count();
        let column = before.len() - before.rfind('\n').map_or(0, |idx| idx + 1);
        LspPosition::new(line as u32, column as u32)
    }
}

fn node(kind: SyntaxKind, range: Range<usize>) -> SyntaxNode {
    SyntaxNode::new(kind, range)
}

fn named(kind: SyntaxKind, range: Range<usize>, name: &str, name_range: Range<usize>) -> SyntaxNode {
    SyntaxNode::new(kind, range).with_name(name, name_range)
}

/// An identifier node whose range is its name.
fn ident(f: &Fixture, kind: SyntaxKind, outer: Range<usize>, name: &str, nth: usize) -> SyntaxNode {
    let range = f.ident(outer, name, nth);
    named(kind, range.clone(), name, range)
}

/// The tree of [`CART`], as a parser would produce it.
pub fn cart_tree() -> SyntaxNode {
    use SyntaxKind::*;

    let f = Fixture::new(CART);

    let shop = f.block("module Shop", "end # Shop");
    let cart = f.block("class Cart", "end # Cart");

    let limit = f.find("LIMIT = 10");
    let limit = named(ConstWrite, limit.clone(), "LIMIT", f.ident(limit.clone(), "LIMIT", 0))
        .with_children([node(Integer, f.ident(limit, "10", 0))]);

    let initialize = {
        let def = f.block("def initialize", "end # initialize");
        let params = f.find_in(def.clone(), "(items)");
        let assign = f.find_in(def.clone(), "@items = items");
        named(MethodDef, def.clone(), "initialize", f.ident(def, "initialize", 0)).with_children([
            node(Params, params.clone()).with_children([ident(
                &f,
                RequiredParam,
                params,
                "items",
                0,
            )]),
            named(InstanceVarWrite, assign.clone(), "@items", f.ident(assign.clone(), "@items", 0))
                .with_children([ident(&f, LocalVarRead, assign, "items", 0)]),
        ])
    };

    let add = {
        let def = f.block("def add", "end # add");
        let params = f.find_in(def.clone(), "(item)");
        let push = f.find_in(def.clone(), "@items.push(item)");
        let args = f.find_in(push.clone(), "(item)");
        named(MethodDef, def.clone(), "add", f.ident(def.clone(), "add", 0)).with_children([
            node(Params, params.clone())
                .with_children([ident(&f, RequiredParam, params, "item", 0)]),
            named(Call, push.clone(), "push", f.ident(push.clone(), "push", 0)).with_children([
                ident(&f, InstanceVarRead, push.clone(), "@items", 0),
                node(Args, args).with_children([ident(&f, LocalVarRead, push, "item", 0)]),
            ]),
            ident(&f, Call, def, "total", 0),
        ])
    };

    let total = {
        let def = f.block("def total", "end # total");
        let assign = f.find_in(def.clone(), "count = @items.size");
        let size = f.find_in(assign.clone(), "@items.size");
        named(MethodDef, def.clone(), "total", f.ident(def.clone(), "total", 0)).with_children([
            named(LocalVarWrite, assign.clone(), "count", f.ident(assign, "count", 0))
                .with_children([named(Call, size.clone(), "size", f.ident(size.clone(), "size", 0))
                    .with_children([ident(&f, InstanceVarRead, size, "@items", 0)])]),
            ident(&f, LocalVarRead, def, "count", 1),
        ])
    };

    let singleton = {
        let class = f.block("class << self", "end # singleton");
        let def = f.block("def empty", "end # empty");
        let call = f.find_in(def.clone(), "new([])");
        let args = f.find_in(call.clone(), "([])");
        node(SingletonClass, class.clone()).with_children([
            node(SelfRef, f.find_in(class, "self")),
            named(MethodDef, def.clone(), "empty", f.ident(def, "empty", 0)).with_children([named(
                Call,
                call.clone(),
                "new",
                f.ident(call.clone(), "new", 0),
            )
            .with_children([
                node(Args, args).with_children([node(Array, f.find_in(call, "[]"))])
            ])]),
        ])
    };

    let cart = named(ClassDef, cart.clone(), "Cart", f.ident(cart, "Cart", 0))
        .with_slot(None)
        .with_children([limit, initialize, add, total, singleton]);
    let shop = named(ModuleDef, shop.clone(), "Shop", f.ident(shop, "Shop", 0)).with_children([cart]);

    let empty = f.find("Shop::Cart.empty");
    let receiver = f.find_in(empty.clone(), "Shop::Cart");
    let empty = named(Call, empty.clone(), "empty", f.ident(empty, "empty", 0))
        .with_children([named(ConstRead, receiver.clone(), "Shop::Cart", receiver)]);

    node(Program, f.all()).with_children([shop, empty])
}

pub fn cart_source() -> Source {
    Source::new(CART_PATH, CART, cart_tree())
}

pub fn reopened_source() -> Source {
    use SyntaxKind::*;

    let f = Fixture::new(REOPENED);
    let class = f.all().start..REOPENED.trim_end().len();
    let def = f.block("def clear", "end");
    let assign = f.find_in(def.clone(), "@items = []");

    let tree = node(Program, f.all()).with_children([named(
        ClassDef,
        class,
        "Shop::Cart",
        f.find("Shop::Cart"),
    )
    .with_slot(None)
    .with_children([named(MethodDef, def.clone(), "clear", f.ident(def, "clear", 0))
        .with_children([named(
            InstanceVarWrite,
            assign.clone(),
            "@items",
            f.ident(assign.clone(), "@items", 0),
        )
        .with_children([node(Array, f.find_in(assign, "[]"))])])])]);

    Source::new(REOPENED_PATH, REOPENED, tree)
}

pub fn cart_context(config: QueryConfig) -> AnalysisContext {
    let mut ctx = AnalysisContext::new(config);
    ctx.add_source(cart_source());
    ctx.add_source(reopened_source());
    ctx
}

/// The LSP position of the `nth` occurrence of the identifier in [`CART`].
pub fn cart_pos(ident: &str, nth: usize) -> LspPosition {
    let f = Fixture::new(CART);
    f.pos(f.ident(f.all(), ident, nth))
}

pub fn render_range(range: LspRange) -> String {
    format!(
        "{}:{}-{}:{}",
        range.start.line, range.start.character, range.end.line, range.end.character
    )
}

#[test]
fn fixture_tree_is_well_formed() {
    fn check(node: &SyntaxNode, text: &str) {
        for child in node.children() {
            assert!(
                node.range().start <= child.range().start && child.range().end <= node.range().end,
                "{:?} {:?} escapes {:?} {:?}",
                child.kind(),
                child.range(),
                node.kind(),
                node.range()
            );
            check(child, text);
        }
        if let Some(name) = node.name() {
            assert_eq!(&text[node.name_range()], name.trim_start_matches("::"));
        }
    }

    check(&cart_tree(), CART);
    check(reopened_source().root(), REOPENED);
    assert_eq!(cart_pos("total", 0), LspPosition::new(10, 6));
}
