//! The describe protocol: per-node-type field declarations

use crate::corpus::CorpusRef;
use crate::string::Str;
use crate::value::Value;

/// Ordered field sink passed to [`Describe::describe`].
///
/// A describe implementation declares its fields in order, either as an
/// already-computed value with [`field`](Fields::field) or as a thunk
/// with [`defer`](Fields::defer). The sink is only ever driven by the
/// single materialization pass of a lazy object, so a deferred thunk
/// runs exactly once, during that pass, in declaration order.
///
/// Fields that are expensive to expand should not be deferred scalars;
/// they should produce a nested lazy object or array, which pushes the
/// skip-if-unused property one level down.
pub struct Fields {
    entries: Vec<(Str, Value)>,
}

impl Fields {
    pub(crate) fn new() -> Self {
        Fields {
            entries: Vec::new(),
        }
    }

    /// Declare a field with an eagerly computed value.
    ///
    /// Declaring a name twice overwrites the earlier value in place.
    pub fn field(&mut self, name: impl Into<Str>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Declare a field whose value is produced by a thunk.
    ///
    /// The thunk is invoked once, when the declaration sequence is run
    /// during materialization.
    pub fn defer<V: Into<Value>>(&mut self, name: impl Into<Str>, thunk: impl FnOnce() -> V) {
        self.field(name, thunk().into());
    }

    pub(crate) fn into_entries(self) -> Vec<(Str, Value)> {
        self.entries
    }
}

/// Per-node-type declaration of named fields.
///
/// Implementing `Describe` is the one customization point a node type
/// needs in order to be wrapped in a lazy object. The `dom` handle lets
/// implementations resolve cross-references (parent links, member ids)
/// into further lazy values without expanding them.
pub trait Describe: Send + Sync + 'static {
    /// Declare the node's fields on `io`, in order.
    fn describe(&self, io: &mut Fields, dom: &CorpusRef);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_order_is_preserved() {
        let mut io = Fields::new();
        io.field("b", 2);
        io.field("a", 1);
        io.defer("c", || 3);

        let entries = io.into_entries();
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["b", "a", "c"]);
    }

    #[test]
    fn test_duplicate_name_overwrites_in_place() {
        let mut io = Fields::new();
        io.field("a", 1);
        io.field("b", 2);
        io.field("a", 10);

        let entries = io.into_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "a");
        assert_eq!(entries[0].1, Value::from(10));
    }
}
