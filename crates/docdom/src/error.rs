//! Error types for corpus construction

use thiserror::Error;

use crate::node::SymbolId;

/// Errors raised while assembling a corpus.
///
/// Lookups through the value façades never produce errors: a missing key
/// or out-of-range index yields [`Value::Null`](crate::Value::Null) so that
/// renderers can treat "absent" and "explicitly null" uniformly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// A symbol with the same id was already registered
    #[error("duplicate symbol id {0}")]
    DuplicateSymbol(SymbolId),

    /// The referenced symbol id is not part of the corpus
    #[error("unknown symbol id {0}")]
    UnknownSymbol(SymbolId),
}

/// Result type alias for corpus operations
pub type Result<T> = std::result::Result<T, DomError>;
