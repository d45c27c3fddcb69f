//! Symbol graph ownership and the render-stage object cache

use std::sync::{Arc, Weak};

use dashmap::DashMap;
use indexmap::IndexMap;

use crate::error::{DomError, Result};
use crate::node::{Symbol, SymbolId};
use crate::object::{lazy_object, Object};
use crate::poly::PolyValue;
use crate::value::Value;

/// The symbol graph, owned once and immutable after freezing.
///
/// The extraction stage registers each symbol exactly once, in
/// traversal order, then freezes the corpus into a [`DomCorpus`] for
/// the render stage. The table preserves registration order so that
/// whole-corpus enumeration is deterministic.
pub struct Corpus {
    symbols: IndexMap<SymbolId, Arc<PolyValue<dyn Symbol>>>,
    root: Option<SymbolId>,
}

impl Corpus {
    /// Create an empty corpus.
    pub fn new() -> Self {
        Corpus {
            symbols: IndexMap::new(),
            root: None,
        }
    }

    /// Register a symbol, keyed by its own id.
    pub fn register(&mut self, symbol: PolyValue<dyn Symbol>) -> Result<SymbolId> {
        let id = symbol.id();
        if self.symbols.contains_key(&id) {
            return Err(DomError::DuplicateSymbol(id));
        }
        self.symbols.insert(id, Arc::new(symbol));
        Ok(id)
    }

    /// Mark a registered symbol as the corpus root.
    pub fn set_root(&mut self, id: SymbolId) -> Result<()> {
        if !self.symbols.contains_key(&id) {
            return Err(DomError::UnknownSymbol(id));
        }
        self.root = Some(id);
        Ok(())
    }

    /// The root symbol's id, if one was set.
    pub fn root(&self) -> Option<SymbolId> {
        self.root
    }

    /// Number of registered symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether no symbols are registered.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Whether `id` is registered.
    pub fn contains(&self, id: SymbolId) -> bool {
        self.symbols.contains_key(&id)
    }

    /// The symbol registered under `id`.
    pub fn get(&self, id: SymbolId) -> Option<&Arc<PolyValue<dyn Symbol>>> {
        self.symbols.get(&id)
    }

    /// Registered ids, in registration order.
    pub fn ids(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.symbols.keys().copied()
    }

    /// Freeze into the shared, render-stage view.
    pub fn freeze(self) -> DomCorpus {
        DomCorpus {
            inner: Arc::new(DomCorpusInner {
                corpus: self,
                cache: DashMap::new(),
            }),
        }
    }
}

impl Default for Corpus {
    fn default() -> Self {
        Corpus::new()
    }
}

struct DomCorpusInner {
    corpus: Corpus,
    cache: DashMap<SymbolId, Object>,
}

impl DomCorpusInner {
    fn get(inner: &Arc<Self>, id: SymbolId) -> Value {
        if let Some(obj) = inner.cache.get(&id) {
            return Value::Object(obj.clone());
        }
        let Some(node) = inner.corpus.get(id) else {
            return Value::Null;
        };
        log::debug!("dom cache miss for symbol {id}");
        let obj = lazy_object(
            node.clone(),
            CorpusRef {
                inner: Arc::downgrade(inner),
            },
        );
        // Two threads may race to build the wrapper for the same id;
        // both wrap the same node, so the first insert wins and the
        // loser's wrapper is discarded before it ever materializes.
        let obj = inner.cache.entry(id).or_insert(obj).clone();
        Value::Object(obj)
    }
}

/// The render stage's shared view of a frozen corpus.
///
/// Wrapping a symbol produces a lazy [`Object`] that is cached and
/// shared, so every render worker touching the same symbol observes a
/// single materialization of its fields.
#[derive(Clone)]
pub struct DomCorpus {
    inner: Arc<DomCorpusInner>,
}

impl DomCorpus {
    /// The wrapped symbol object for `id`, or null for unknown ids.
    pub fn get(&self, id: SymbolId) -> Value {
        DomCorpusInner::get(&self.inner, id)
    }

    /// The wrapped root symbol, or null when no root was set.
    pub fn root(&self) -> Value {
        match self.inner.corpus.root() {
            Some(id) => self.get(id),
            None => Value::Null,
        }
    }

    /// The underlying symbol graph.
    pub fn corpus(&self) -> &Corpus {
        &self.inner.corpus
    }

    /// A weak handle for describe implementations.
    pub fn handle(&self) -> CorpusRef {
        CorpusRef {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

/// Weak corpus handle carried by lazy values.
///
/// Wrapped objects are stored inside the corpus's own cache, so they
/// hold their way back to it weakly to avoid keeping it alive through a
/// reference cycle. Resolving through a handle whose corpus is gone
/// yields null — render frames are expected not to outlive the corpus.
#[derive(Clone, Default)]
pub struct CorpusRef {
    inner: Weak<DomCorpusInner>,
}

impl CorpusRef {
    /// A handle attached to no corpus; every lookup yields null.
    ///
    /// Useful for wrapping nodes that do not resolve cross-references.
    pub fn detached() -> Self {
        CorpusRef { inner: Weak::new() }
    }

    /// The wrapped symbol object for `id`, or null.
    pub fn get(&self, id: SymbolId) -> Value {
        match self.inner.upgrade() {
            Some(inner) => DomCorpusInner::get(&inner, id),
            None => Value::Null,
        }
    }
}
