//! Object façade and backing implementations

mod lazy;

pub use lazy::{lazy_object, LazyObjectImpl};

use std::fmt;
use std::sync::{Arc, RwLock};

use crate::string::Str;
use crate::value::Value;

/// Backing storage contract for [`Object`].
///
/// An object is an ordered collection of key/value properties. The
/// enumeration order is backing-defined; the default backing preserves
/// insertion order.
pub trait ObjectImpl: Send + Sync + 'static {
    /// Identifies the backing in diagnostics.
    fn type_key(&self) -> &'static str {
        "Object"
    }

    /// Number of properties.
    fn size(&self) -> usize;

    /// Entry at enumeration position `ordinal`.
    fn get(&self, ordinal: usize) -> Option<(Str, Value)>;

    /// Value for `key`, or [`Value::Null`] when absent.
    fn find(&self, key: &str) -> Value;

    /// Insert or update a property.
    fn set(&self, key: Str, value: Value);

    /// Visit entries in enumeration order until `f` returns `false`.
    ///
    /// Returns `true` when every entry was visited, `false` when the
    /// visitor stopped early.
    fn visit(&self, f: &mut dyn FnMut(&Str, &Value) -> bool) -> bool;

    /// Whether a property with `key` exists.
    fn exists(&self, key: &str) -> bool {
        !self.visit(&mut |k, _| k.as_str() != key)
    }
}

/// A collection of key/value properties behind a shared backing.
///
/// Copying an `Object` copies the handle: both copies observe the same
/// backing. Consumers never need to know which backing variant is
/// underneath; the façade is uniform.
#[derive(Clone)]
pub struct Object {
    imp: Arc<dyn ObjectImpl>,
}

impl Object {
    /// Create an empty object with the default, mutable backing.
    pub fn new() -> Self {
        Object::with_impl(DefaultObjectImpl::new())
    }

    /// Create an object with the default backing over `entries`.
    pub fn from_entries(entries: Vec<(Str, Value)>) -> Self {
        Object::with_impl(DefaultObjectImpl::from_entries(entries))
    }

    /// Create an object over a custom backing.
    pub fn with_impl<T: ObjectImpl>(imp: T) -> Self {
        Object { imp: Arc::new(imp) }
    }

    /// Identifies the backing in diagnostics.
    pub fn type_key(&self) -> &'static str {
        self.imp.type_key()
    }

    /// Number of properties.
    pub fn size(&self) -> usize {
        self.imp.size()
    }

    /// Whether the object has no properties.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Entry at enumeration position `ordinal`.
    pub fn get_entry(&self, ordinal: usize) -> Option<(Str, Value)> {
        self.imp.get(ordinal)
    }

    /// Value for `key`, or [`Value::Null`] when absent.
    pub fn find(&self, key: &str) -> Value {
        self.imp.find(key)
    }

    /// Whether a property with `key` exists.
    pub fn exists(&self, key: &str) -> bool {
        self.imp.exists(key)
    }

    /// Insert or update a property.
    pub fn set(&self, key: impl Into<Str>, value: impl Into<Value>) {
        self.imp.set(key.into(), value.into());
    }

    /// Visit entries in enumeration order until `f` returns `false`.
    ///
    /// Returns `true` when every entry was visited.
    pub fn visit(&self, mut f: impl FnMut(&Str, &Value) -> bool) -> bool {
        self.imp.visit(&mut f)
    }

    /// Whether two façades share the same backing.
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.imp, &other.imp)
    }

    pub(crate) fn impl_ptr(&self) -> *const () {
        Arc::as_ptr(&self.imp) as *const ()
    }
}

impl Default for Object {
    fn default() -> Self {
        Object::new()
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for i in 0..self.size() {
            if let Some((k, v)) = self.get_entry(i) {
                map.entry(&k, &v);
            }
        }
        map.finish()
    }
}

/// Key-by-key equality through the façade, regardless of backing.
///
/// Two objects are equal when they have the same size and, for every
/// key of one, the other has the key with an equal value. There is no
/// structural identity shortcut beyond the same-backing fast path.
impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.imp, &other.imp) {
            return true;
        }
        if self.size() != other.size() {
            return false;
        }
        self.visit(|k, v| other.exists(k.as_str()) && other.find(k.as_str()) == *v)
    }
}

impl From<Vec<(Str, Value)>> for Object {
    fn from(entries: Vec<(Str, Value)>) -> Self {
        Object::from_entries(entries)
    }
}

// ═══════════════════════════════════════════════════════════════════
// DefaultObjectImpl
// ═══════════════════════════════════════════════════════════════════

/// The default backing: an owned, insertion-ordered property list.
///
/// Lookup is linear; per-node property counts are small enough that a
/// hash index would cost more than it saves. `set` on an existing key
/// overwrites in place, preserving the ordinal position and the size.
///
/// Writes require only `&self`; the storage is guarded by a lock for
/// memory safety. Ordering under concurrent writers is unspecified.
pub struct DefaultObjectImpl {
    entries: RwLock<Vec<(Str, Value)>>,
}

impl DefaultObjectImpl {
    /// Create an empty backing.
    pub fn new() -> Self {
        DefaultObjectImpl {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Create a backing owning `entries`.
    pub fn from_entries(entries: Vec<(Str, Value)>) -> Self {
        DefaultObjectImpl {
            entries: RwLock::new(entries),
        }
    }
}

impl Default for DefaultObjectImpl {
    fn default() -> Self {
        DefaultObjectImpl::new()
    }
}

impl ObjectImpl for DefaultObjectImpl {
    fn size(&self) -> usize {
        self.entries.read().expect("object storage poisoned").len()
    }

    fn get(&self, ordinal: usize) -> Option<(Str, Value)> {
        self.entries
            .read()
            .expect("object storage poisoned")
            .get(ordinal)
            .cloned()
    }

    fn find(&self, key: &str) -> Value {
        self.entries
            .read()
            .expect("object storage poisoned")
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v.clone())
            .unwrap_or(Value::Null)
    }

    fn set(&self, key: Str, value: Value) {
        let mut entries = self.entries.write().expect("object storage poisoned");
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => entries.push((key, value)),
        }
    }

    // Iterates a snapshot of the entries so the visitor may call back
    // into this object without deadlocking on the storage lock.
    fn visit(&self, f: &mut dyn FnMut(&Str, &Value) -> bool) -> bool {
        let snapshot = self
            .entries
            .read()
            .expect("object storage poisoned")
            .clone();
        for (k, v) in &snapshot {
            if !f(k, v) {
                return false;
            }
        }
        true
    }

    fn exists(&self, key: &str) -> bool {
        self.entries
            .read()
            .expect("object storage poisoned")
            .iter()
            .any(|(k, _)| k.as_str() == key)
    }
}
