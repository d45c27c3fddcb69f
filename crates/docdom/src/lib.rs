//! # docdom
//!
//! A dynamic value bridge for documentation generators.
//!
//! An extraction stage produces a strongly-typed, recursively-linked
//! graph of nodes — symbols and documentation blocks/inlines. A
//! rendering stage wants uniform, format-agnostic access to that graph
//! without paying to convert all of it. `docdom` sits between the two:
//!
//! - **Value model**: a copy-cheap sum type over
//!   Null/Boolean/Integer/String/Array/Object, with shared handles
//!   behind the structured kinds.
//! - **Lazy backings**: arrays and objects whose contents are computed
//!   on demand. A lazy object materializes a node's declared fields at
//!   most once, safely under concurrent first access from multiple
//!   render workers.
//! - **Ownership**: [`PolyValue`] gives heap-held polymorphic nodes
//!   value semantics — deep copy on clone, allocation-reusing upcasts,
//!   discriminant-driven visitor dispatch.
//! - **Describe protocol**: each node type declares its named fields
//!   once; lazy objects consume the declaration uniformly.
//!
//! ## Architecture
//!
//! - **Extraction (external)**: parses sources and registers symbols
//!   into a [`Corpus`]
//! - **Bridge (this crate)**: wraps nodes in lazy values through a
//!   frozen [`DomCorpus`]
//! - **Rendering (external)**: reads values through the uniform
//!   [`Array`]/[`Object`] façades

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod array;
pub mod corpus;
pub mod describe;
pub mod error;
pub mod node;
pub mod object;
pub mod poly;
pub mod string;
pub mod value;

// Re-export main types
pub use array::{
    lazy_array, transform_array, Array, ArrayImpl, ArraySource, DefaultArrayImpl, LazyArrayImpl,
    Projected,
};
pub use corpus::{Corpus, CorpusRef, DomCorpus};
pub use describe::{Describe, Fields};
pub use error::{DomError, Result};
pub use node::{
    block_to_value, inline_to_value, visit_block, visit_inline, visit_symbol, Block, BlockKind,
    BlockVisitor, CodeBlock, DocComment, DocNode, FunctionSymbol, Heading, Inline, InlineKind,
    InlineVisitor, Link, NamespaceSymbol, Param, Paragraph, RecordSymbol, Style, Styled, Symbol,
    SymbolId, SymbolKind, SymbolVisitor, Text,
};
pub use object::{lazy_object, DefaultObjectImpl, LazyObjectImpl, Object, ObjectImpl};
pub use poly::{AsAny, PolyValue};
pub use string::Str;
pub use value::{stringify, Kind, Value};

/// docdom version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }
}
