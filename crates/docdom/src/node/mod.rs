//! The strongly-typed node graph exposed through the bridge
//!
//! Nodes are produced by an external extraction stage. Each node
//! carries a discriminant naming its concrete type, which is what lets
//! a visitor re-type a base reference without the node set implementing
//! a shared mapping interface.

mod doc;
mod symbol;

pub use doc::{
    block_to_value, inline_to_value, CodeBlock, DocComment, Heading, Link, Paragraph, Styled,
    Style, Text,
};
pub use symbol::{FunctionSymbol, NamespaceSymbol, Param, RecordSymbol};

use std::fmt;

use crate::poly::{AsAny, PolyValue};
use crate::string::Str;

/// Identifies a symbol in a corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(u64);

impl SymbolId {
    /// Create an id from its raw representation.
    pub const fn new(raw: u64) -> Self {
        SymbolId(raw)
    }

    /// The raw representation.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Discriminant for symbol nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// A namespace
    Namespace,
    /// A record (class, struct, union)
    Record,
    /// A function
    Function,
}

impl SymbolKind {
    /// Lowercase name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Namespace => "namespace",
            SymbolKind::Record => "record",
            SymbolKind::Function => "function",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discriminant for documentation block nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// A paragraph of inline content
    Paragraph,
    /// A heading
    Heading,
    /// A literal code block
    Code,
}

impl BlockKind {
    /// Lowercase name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Paragraph => "paragraph",
            BlockKind::Heading => "heading",
            BlockKind::Code => "code",
        }
    }
}

/// Discriminant for documentation inline nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InlineKind {
    /// Plain text
    Text,
    /// Styled inline content
    Styled,
    /// A hyperlink
    Link,
}

impl InlineKind {
    /// Lowercase name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            InlineKind::Text => "text",
            InlineKind::Styled => "styled",
            InlineKind::Link => "link",
        }
    }
}

/// Base trait for symbol nodes.
pub trait Symbol: AsAny + Send + Sync + 'static {
    /// The symbol's id.
    fn id(&self) -> SymbolId;

    /// The symbol's name.
    fn name(&self) -> &Str;

    /// The discriminant of the concrete type.
    fn kind(&self) -> SymbolKind;

    /// The id of the enclosing symbol, if any.
    fn parent(&self) -> Option<SymbolId>;

    /// The attached documentation, if any.
    fn doc(&self) -> Option<&DocComment>;

    /// Deep copy into a fresh handle.
    fn clone_box(&self) -> PolyValue<dyn Symbol>;
}

crate::impl_poly_clone!(Symbol);

/// Base trait shared by every documentation node.
pub trait DocNode: AsAny + Send + Sync + 'static {
    /// Deep copy into a fresh handle.
    fn clone_node(&self) -> PolyValue<dyn DocNode>;
}

crate::impl_poly_clone!(DocNode, clone_node);

/// A block-level documentation node.
pub trait Block: DocNode {
    /// The discriminant of the concrete type.
    fn kind(&self) -> BlockKind;

    /// Deep copy into a fresh handle.
    fn clone_box(&self) -> PolyValue<dyn Block>;
}

crate::impl_poly_clone!(Block);

/// An inline documentation node.
pub trait Inline: DocNode {
    /// The discriminant of the concrete type.
    fn kind(&self) -> InlineKind;

    /// Deep copy into a fresh handle.
    fn clone_box(&self) -> PolyValue<dyn Inline>;
}

crate::impl_poly_clone!(Inline);

/// Upcast: a block handle is a doc-node handle over the same payload.
impl From<PolyValue<dyn Block>> for PolyValue<dyn DocNode> {
    fn from(value: PolyValue<dyn Block>) -> Self {
        PolyValue::from_box(value.into_box())
    }
}

/// Upcast: an inline handle is a doc-node handle over the same payload.
impl From<PolyValue<dyn Inline>> for PolyValue<dyn DocNode> {
    fn from(value: PolyValue<dyn Inline>) -> Self {
        PolyValue::from_box(value.into_box())
    }
}

// ═══════════════════════════════════════════════════════════════════
// Visitor dispatch
// ═══════════════════════════════════════════════════════════════════

/// Visitor over the concrete symbol types.
pub trait SymbolVisitor {
    /// The result produced per symbol.
    type Output;

    /// Visit a namespace.
    fn namespace(&mut self, sym: &NamespaceSymbol) -> Self::Output;

    /// Visit a record.
    fn record(&mut self, sym: &RecordSymbol) -> Self::Output;

    /// Visit a function.
    fn function(&mut self, sym: &FunctionSymbol) -> Self::Output;
}

/// Dispatch `sym` to the visitor arm matching its discriminant.
///
/// Panics if the discriminant does not match the concrete type, which
/// indicates a bug in the node type itself.
pub fn visit_symbol<V: SymbolVisitor>(sym: &dyn Symbol, visitor: &mut V) -> V::Output {
    match sym.kind() {
        SymbolKind::Namespace => visitor.namespace(concrete(sym.as_any())),
        SymbolKind::Record => visitor.record(concrete(sym.as_any())),
        SymbolKind::Function => visitor.function(concrete(sym.as_any())),
    }
}

/// Visitor over the concrete block types.
pub trait BlockVisitor {
    /// The result produced per block.
    type Output;

    /// Visit a paragraph.
    fn paragraph(&mut self, block: &Paragraph) -> Self::Output;

    /// Visit a heading.
    fn heading(&mut self, block: &Heading) -> Self::Output;

    /// Visit a code block.
    fn code(&mut self, block: &CodeBlock) -> Self::Output;
}

/// Dispatch `block` to the visitor arm matching its discriminant.
pub fn visit_block<V: BlockVisitor>(block: &dyn Block, visitor: &mut V) -> V::Output {
    match block.kind() {
        BlockKind::Paragraph => visitor.paragraph(concrete(block.as_any())),
        BlockKind::Heading => visitor.heading(concrete(block.as_any())),
        BlockKind::Code => visitor.code(concrete(block.as_any())),
    }
}

/// Visitor over the concrete inline types.
pub trait InlineVisitor {
    /// The result produced per inline.
    type Output;

    /// Visit plain text.
    fn text(&mut self, inline: &Text) -> Self::Output;

    /// Visit styled content.
    fn styled(&mut self, inline: &Styled) -> Self::Output;

    /// Visit a link.
    fn link(&mut self, inline: &Link) -> Self::Output;
}

/// Dispatch `inline` to the visitor arm matching its discriminant.
pub fn visit_inline<V: InlineVisitor>(inline: &dyn Inline, visitor: &mut V) -> V::Output {
    match inline.kind() {
        InlineKind::Text => visitor.text(concrete(inline.as_any())),
        InlineKind::Styled => visitor.styled(concrete(inline.as_any())),
        InlineKind::Link => visitor.link(concrete(inline.as_any())),
    }
}

fn concrete<T: 'static>(node: &dyn std::any::Any) -> &T {
    node.downcast_ref()
        .expect("node discriminant does not match its concrete type")
}
