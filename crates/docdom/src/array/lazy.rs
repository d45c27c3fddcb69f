//! Lazy, read-only array backing over an externally owned range

use std::marker::PhantomData;
use std::sync::{Arc, RwLock};

use super::{Array, ArrayImpl};
use crate::value::Value;

/// Shared access to an externally owned random-access sequence.
///
/// A source is re-read on every access: the lazy backing never caches
/// elements, so mutating the underlying data between construction and a
/// read changes the result of that read.
pub trait ArraySource: Send + Sync + 'static {
    /// The element type produced by the source.
    type Item;

    /// Current number of elements.
    fn len(&self) -> usize;

    /// Whether the source currently has no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the element at `i`, if in range.
    fn with_item<R>(&self, i: usize, f: impl FnOnce(&Self::Item) -> R) -> Option<R>;
}

impl<T: Send + Sync + 'static> ArraySource for Arc<Vec<T>> {
    type Item = T;

    fn len(&self) -> usize {
        self.as_ref().len()
    }

    fn with_item<R>(&self, i: usize, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.as_ref().get(i).map(f)
    }
}

/// A locked source: every access takes the lock, so writers that hold
/// the same handle are observed by subsequent reads.
impl<T: Send + Sync + 'static> ArraySource for Arc<RwLock<Vec<T>>> {
    type Item = T;

    fn len(&self) -> usize {
        self.read().expect("array source poisoned").len()
    }

    fn with_item<R>(&self, i: usize, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.read().expect("array source poisoned").get(i).map(f)
    }
}

impl<T: Sync + 'static> ArraySource for &'static [T] {
    type Item = T;

    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn with_item<R>(&self, i: usize, f: impl FnOnce(&T) -> R) -> Option<R> {
        <[T]>::get(self, i).map(f)
    }
}

/// A source projecting a slice out of a shared owner on every access.
///
/// Useful when the sequence lives inside a larger shared structure, such
/// as a child list owned by a node.
pub struct Projected<O, T, P> {
    owner: Arc<O>,
    project: P,
    _marker: PhantomData<fn() -> T>,
}

impl<O, T, P> Projected<O, T, P>
where
    P: Fn(&O) -> &[T],
{
    /// Create a source projecting out of `owner` with `project`.
    pub fn new(owner: Arc<O>, project: P) -> Self {
        Projected {
            owner,
            project,
            _marker: PhantomData,
        }
    }
}

impl<O, T, P> ArraySource for Projected<O, T, P>
where
    O: Send + Sync + 'static,
    T: 'static,
    P: Fn(&O) -> &[T] + Send + Sync + 'static,
{
    type Item = T;

    fn len(&self) -> usize {
        (self.project)(&self.owner).len()
    }

    fn with_item<R>(&self, i: usize, f: impl FnOnce(&T) -> R) -> Option<R> {
        (self.project)(&self.owner).get(i).map(f)
    }
}

/// Lazy, read-only backing over an [`ArraySource`].
///
/// `get(i)` re-walks the source and re-runs the transform on every call;
/// there is no per-element memoization. The cost of `get` is therefore
/// bounded by the source's random-access cost, and repeated reads of the
/// same index repeat the work. `size` is as cheap as the source's `len`.
///
/// Writes are ignored, per the read-only backing contract.
pub struct LazyArrayImpl<S, F> {
    source: S,
    transform: F,
}

impl<S, F> LazyArrayImpl<S, F>
where
    S: ArraySource,
    F: Fn(&S::Item) -> Value + Send + Sync + 'static,
{
    /// Create a lazy backing over `source` with an element `transform`.
    pub fn new(source: S, transform: F) -> Self {
        LazyArrayImpl { source, transform }
    }
}

impl<S, F> ArrayImpl for LazyArrayImpl<S, F>
where
    S: ArraySource,
    F: Fn(&S::Item) -> Value + Send + Sync + 'static,
{
    fn type_key(&self) -> &'static str {
        "LazyArray"
    }

    fn size(&self) -> usize {
        self.source.len()
    }

    fn get(&self, i: usize) -> Value {
        self.source
            .with_item(i, |item| (self.transform)(item))
            .unwrap_or(Value::Null)
    }
}

/// Create a lazy array whose elements convert to values directly.
pub fn lazy_array<S>(source: S) -> Array
where
    S: ArraySource,
    S::Item: Clone + Into<Value>,
{
    Array::with_impl(LazyArrayImpl::new(source, |item: &S::Item| {
        item.clone().into()
    }))
}

/// Create a lazy array applying `transform` to each element on access.
pub fn transform_array<S, F>(source: S, transform: F) -> Array
where
    S: ArraySource,
    F: Fn(&S::Item) -> Value + Send + Sync + 'static,
{
    Array::with_impl(LazyArrayImpl::new(source, transform))
}
