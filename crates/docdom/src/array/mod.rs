//! Array façade and backing implementations

mod lazy;

pub use lazy::{lazy_array, transform_array, ArraySource, LazyArrayImpl, Projected};

use std::fmt;
use std::sync::{Arc, RwLock};

use crate::value::Value;

/// Backing storage contract for [`Array`].
///
/// Implementations decide how elements are stored and produced. Writes
/// are optional: the default `set`/`push` silently ignore the request,
/// which is the contract for read-only backings. Callers that need
/// mutation must use an array with the default backing.
pub trait ArrayImpl: Send + Sync + 'static {
    /// Identifies the backing in diagnostics.
    fn type_key(&self) -> &'static str {
        "Array"
    }

    /// Number of elements.
    fn size(&self) -> usize;

    /// Element at `i`, or [`Value::Null`] when out of range.
    fn get(&self, i: usize) -> Value;

    /// Replace the element at `i`. Read-only backings ignore writes.
    fn set(&self, _i: usize, _v: Value) {}

    /// Append an element. Read-only backings ignore writes.
    fn push(&self, _v: Value) {}
}

/// An ordered sequence of values behind a shared backing.
///
/// Copying an `Array` copies the handle: both copies observe the same
/// backing. Every read produces a fresh [`Value`] by value; iteration
/// calls [`get`](Array::get) per position rather than referencing
/// storage.
#[derive(Clone)]
pub struct Array {
    imp: Arc<dyn ArrayImpl>,
}

impl Array {
    /// Create an empty array with the default, mutable backing.
    pub fn new() -> Self {
        Array::from_vec(Vec::new())
    }

    /// Create an array with the default backing over `elements`.
    pub fn from_vec(elements: Vec<Value>) -> Self {
        Array::with_impl(DefaultArrayImpl::from_vec(elements))
    }

    /// Create an array over a custom backing.
    pub fn with_impl<T: ArrayImpl>(imp: T) -> Self {
        Array { imp: Arc::new(imp) }
    }

    /// Identifies the backing in diagnostics.
    pub fn type_key(&self) -> &'static str {
        self.imp.type_key()
    }

    /// Number of elements.
    pub fn size(&self) -> usize {
        self.imp.size()
    }

    /// Whether the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Element at `i`, or [`Value::Null`] when out of range.
    pub fn get(&self, i: usize) -> Value {
        self.imp.get(i)
    }

    /// Replace the element at `i`.
    ///
    /// On the default backing, setting past the end grows the array,
    /// padding intervening slots with null. Read-only backings ignore
    /// the write.
    pub fn set(&self, i: usize, v: impl Into<Value>) {
        self.imp.set(i, v.into());
    }

    /// Append an element. Read-only backings ignore the write.
    pub fn push(&self, v: impl Into<Value>) {
        self.imp.push(v.into());
    }

    /// Concatenate two arrays into a new, independently owned array.
    pub fn concat(&self, other: &Array) -> Array {
        let mut elements = Vec::with_capacity(self.size() + other.size());
        elements.extend(self.iter());
        elements.extend(other.iter());
        Array::from_vec(elements)
    }

    /// Iterate the elements, producing each by a fresh `get`.
    pub fn iter(&self) -> Iter<'_> {
        Iter { arr: self, i: 0 }
    }

    /// Whether two façades share the same backing.
    pub fn ptr_eq(&self, other: &Array) -> bool {
        Arc::ptr_eq(&self.imp, &other.imp)
    }

    pub(crate) fn impl_ptr(&self) -> *const () {
        Arc::as_ptr(&self.imp) as *const ()
    }
}

impl Default for Array {
    fn default() -> Self {
        Array::new()
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Elementwise equality through the façade, regardless of backing.
impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.imp, &other.imp) {
            return true;
        }
        if self.size() != other.size() {
            return false;
        }
        (0..self.size()).all(|i| self.get(i) == other.get(i))
    }
}

impl From<Vec<Value>> for Array {
    fn from(elements: Vec<Value>) -> Self {
        Array::from_vec(elements)
    }
}

impl FromIterator<Value> for Array {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Array::from_vec(iter.into_iter().collect())
    }
}

/// Iterator over an array's elements.
pub struct Iter<'a> {
    arr: &'a Array,
    i: usize,
}

impl Iterator for Iter<'_> {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        if self.i >= self.arr.size() {
            return None;
        }
        let v = self.arr.get(self.i);
        self.i += 1;
        Some(v)
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = Value;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

// ═══════════════════════════════════════════════════════════════════
// DefaultArrayImpl
// ═══════════════════════════════════════════════════════════════════

/// The default backing: an owned, mutable, ordered sequence.
///
/// Writes require only `&self`; the storage is guarded by a lock for
/// memory safety. Ordering under concurrent writers is unspecified —
/// callers that mutate from several threads must serialize externally.
pub struct DefaultArrayImpl {
    elements: RwLock<Vec<Value>>,
}

impl DefaultArrayImpl {
    /// Create an empty backing.
    pub fn new() -> Self {
        DefaultArrayImpl {
            elements: RwLock::new(Vec::new()),
        }
    }

    /// Create a backing owning `elements`.
    pub fn from_vec(elements: Vec<Value>) -> Self {
        DefaultArrayImpl {
            elements: RwLock::new(elements),
        }
    }
}

impl Default for DefaultArrayImpl {
    fn default() -> Self {
        DefaultArrayImpl::new()
    }
}

impl ArrayImpl for DefaultArrayImpl {
    fn size(&self) -> usize {
        self.elements.read().expect("array storage poisoned").len()
    }

    fn get(&self, i: usize) -> Value {
        self.elements
            .read()
            .expect("array storage poisoned")
            .get(i)
            .cloned()
            .unwrap_or(Value::Null)
    }

    fn set(&self, i: usize, v: Value) {
        let mut elements = self.elements.write().expect("array storage poisoned");
        if i >= elements.len() {
            elements.resize(i + 1, Value::Null);
        }
        elements[i] = v;
    }

    fn push(&self, v: Value) {
        self.elements
            .write()
            .expect("array storage poisoned")
            .push(v);
    }
}
