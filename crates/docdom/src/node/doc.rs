//! Documentation comment nodes: blocks and inlines

use super::{
    visit_block, visit_inline, Block, BlockKind, BlockVisitor, DocNode, Inline, InlineKind,
    InlineVisitor,
};
use crate::object::Object;
use crate::poly::PolyValue;
use crate::string::Str;
use crate::value::Value;

/// A documentation comment: an ordered sequence of blocks.
///
/// The comment tree is owned by value inside its symbol. It is only
/// converted to dynamic values when a materialization pass reaches the
/// symbol's `doc` field, at which point the whole subtree is expanded
/// eagerly — comment trees are shallow, so symbol-level laziness is the
/// one that matters.
#[derive(Clone, Default)]
pub struct DocComment {
    /// The comment's blocks, in source order
    pub blocks: Vec<PolyValue<dyn Block>>,
}

impl DocComment {
    /// Create an empty comment.
    pub fn new() -> Self {
        DocComment { blocks: Vec::new() }
    }

    /// Create a comment from blocks.
    pub fn from_blocks(blocks: Vec<PolyValue<dyn Block>>) -> Self {
        DocComment { blocks }
    }

    /// Whether the comment has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The first paragraph's plain text, used as the brief description.
    pub fn brief(&self) -> Option<String> {
        self.blocks.iter().find_map(|b| {
            b.downcast_ref::<Paragraph>()
                .map(|p| plain_text(&p.children))
        })
    }

    /// Convert the whole comment tree to a dynamic value.
    pub fn to_value(&self) -> Value {
        let obj = Object::new();
        obj.set("brief", Value::from(self.brief()));
        obj.set(
            "blocks",
            Value::array(self.blocks.iter().map(|b| block_to_value(b.get())).collect()),
        );
        Value::Object(obj)
    }
}

/// A paragraph of inline content.
#[derive(Clone, Default)]
pub struct Paragraph {
    /// The paragraph's inline children
    pub children: Vec<PolyValue<dyn Inline>>,
}

impl DocNode for Paragraph {
    fn clone_node(&self) -> PolyValue<dyn DocNode> {
        PolyValue::from(self.clone())
    }
}

impl Block for Paragraph {
    fn kind(&self) -> BlockKind {
        BlockKind::Paragraph
    }

    fn clone_box(&self) -> PolyValue<dyn Block> {
        PolyValue::from(self.clone())
    }
}

/// A heading.
#[derive(Clone)]
pub struct Heading {
    /// Heading level, 1-based
    pub level: u8,

    /// The heading's inline children
    pub children: Vec<PolyValue<dyn Inline>>,
}

impl DocNode for Heading {
    fn clone_node(&self) -> PolyValue<dyn DocNode> {
        PolyValue::from(self.clone())
    }
}

impl Block for Heading {
    fn kind(&self) -> BlockKind {
        BlockKind::Heading
    }

    fn clone_box(&self) -> PolyValue<dyn Block> {
        PolyValue::from(self.clone())
    }
}

/// A literal code block.
#[derive(Clone)]
pub struct CodeBlock {
    /// Language tag, if declared
    pub language: Option<Str>,

    /// The literal text
    pub text: Str,
}

impl DocNode for CodeBlock {
    fn clone_node(&self) -> PolyValue<dyn DocNode> {
        PolyValue::from(self.clone())
    }
}

impl Block for CodeBlock {
    fn kind(&self) -> BlockKind {
        BlockKind::Code
    }

    fn clone_box(&self) -> PolyValue<dyn Block> {
        PolyValue::from(self.clone())
    }
}

/// Plain inline text.
#[derive(Clone)]
pub struct Text {
    /// The text content
    pub text: Str,
}

impl DocNode for Text {
    fn clone_node(&self) -> PolyValue<dyn DocNode> {
        PolyValue::from(self.clone())
    }
}

impl Inline for Text {
    fn kind(&self) -> InlineKind {
        InlineKind::Text
    }

    fn clone_box(&self) -> PolyValue<dyn Inline> {
        PolyValue::from(self.clone())
    }
}

/// Inline text style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Bold text
    Bold,
    /// Italic text
    Italic,
    /// Monospaced text
    Mono,
}

impl Style {
    /// Lowercase name of the style.
    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Bold => "bold",
            Style::Italic => "italic",
            Style::Mono => "mono",
        }
    }
}

/// Styled inline content.
#[derive(Clone)]
pub struct Styled {
    /// The applied style
    pub style: Style,

    /// The styled children
    pub children: Vec<PolyValue<dyn Inline>>,
}

impl DocNode for Styled {
    fn clone_node(&self) -> PolyValue<dyn DocNode> {
        PolyValue::from(self.clone())
    }
}

impl Inline for Styled {
    fn kind(&self) -> InlineKind {
        InlineKind::Styled
    }

    fn clone_box(&self) -> PolyValue<dyn Inline> {
        PolyValue::from(self.clone())
    }
}

/// A hyperlink.
#[derive(Clone)]
pub struct Link {
    /// The link target
    pub href: Str,

    /// The link's inline children
    pub children: Vec<PolyValue<dyn Inline>>,
}

impl DocNode for Link {
    fn clone_node(&self) -> PolyValue<dyn DocNode> {
        PolyValue::from(self.clone())
    }
}

impl Inline for Link {
    fn kind(&self) -> InlineKind {
        InlineKind::Link
    }

    fn clone_box(&self) -> PolyValue<dyn Inline> {
        PolyValue::from(self.clone())
    }
}

// ═══════════════════════════════════════════════════════════════════
// Conversion to dynamic values
// ═══════════════════════════════════════════════════════════════════

struct BlockToValue;

impl BlockVisitor for BlockToValue {
    type Output = Value;

    fn paragraph(&mut self, block: &Paragraph) -> Value {
        let obj = tagged("block", BlockKind::Paragraph.as_str());
        obj.set("children", inline_values(&block.children));
        Value::Object(obj)
    }

    fn heading(&mut self, block: &Heading) -> Value {
        let obj = tagged("block", BlockKind::Heading.as_str());
        obj.set("level", block.level as i64);
        obj.set("children", inline_values(&block.children));
        Value::Object(obj)
    }

    fn code(&mut self, block: &CodeBlock) -> Value {
        let obj = tagged("block", BlockKind::Code.as_str());
        obj.set("language", Value::from(block.language.clone()));
        obj.set("text", block.text.clone());
        Value::Object(obj)
    }
}

struct InlineToValue;

impl InlineVisitor for InlineToValue {
    type Output = Value;

    fn text(&mut self, inline: &Text) -> Value {
        let obj = tagged("inline", InlineKind::Text.as_str());
        obj.set("text", inline.text.clone());
        Value::Object(obj)
    }

    fn styled(&mut self, inline: &Styled) -> Value {
        let obj = tagged("inline", InlineKind::Styled.as_str());
        obj.set("style", inline.style.as_str());
        obj.set("children", inline_values(&inline.children));
        Value::Object(obj)
    }

    fn link(&mut self, inline: &Link) -> Value {
        let obj = tagged("inline", InlineKind::Link.as_str());
        obj.set("href", inline.href.clone());
        obj.set("children", inline_values(&inline.children));
        Value::Object(obj)
    }
}

fn tagged(class: &'static str, kind: &'static str) -> Object {
    let obj = Object::new();
    obj.set("class", class);
    obj.set("kind", kind);
    obj
}

fn inline_values(children: &[PolyValue<dyn Inline>]) -> Value {
    Value::array(children.iter().map(|c| inline_to_value(c.get())).collect())
}

/// Convert a block node to a dynamic value.
pub fn block_to_value(block: &dyn Block) -> Value {
    visit_block(block, &mut BlockToValue)
}

/// Convert an inline node to a dynamic value.
pub fn inline_to_value(inline: &dyn Inline) -> Value {
    visit_inline(inline, &mut InlineToValue)
}

fn plain_text(children: &[PolyValue<dyn Inline>]) -> String {
    struct Collect<'a> {
        out: &'a mut String,
    }

    impl InlineVisitor for Collect<'_> {
        type Output = ();

        fn text(&mut self, inline: &Text) {
            self.out.push_str(inline.text.as_str());
        }

        fn styled(&mut self, inline: &Styled) {
            for child in &inline.children {
                visit_inline(child.get(), self);
            }
        }

        fn link(&mut self, inline: &Link) {
            for child in &inline.children {
                visit_inline(child.get(), self);
            }
        }
    }

    let mut out = String::new();
    for child in children {
        visit_inline(child.get(), &mut Collect { out: &mut out });
    }
    out
}
