//! Lazy object backing with once-only base materialization

use std::sync::{Arc, OnceLock};

use super::{DefaultObjectImpl, Object, ObjectImpl};
use crate::corpus::CorpusRef;
use crate::describe::{Describe, Fields};
use crate::string::Str;
use crate::value::Value;

/// Lazy backing over a node implementing [`Describe`].
///
/// The backing holds the node, an always-present mutable overlay, and a
/// base property table that is built at most once, on the first read
/// that needs it. Reads consult the overlay first; writes go only to
/// the overlay and never touch the node or the cached base.
///
/// Materialization is whole-object-at-once: the first read that reaches
/// the base runs the node's entire describe sequence, evaluating every
/// declared field (deferred thunks included) exactly once, and caches
/// the resulting table. Concurrent first reads are safe: a single
/// thread runs the describe pass, no thread observes a partial table,
/// and the others re-read the published result. Fields that would make
/// that single pass expensive must declare nested lazy values instead
/// of pre-expanded ones.
pub struct LazyObjectImpl<N: Describe> {
    node: Arc<N>,
    dom: CorpusRef,
    base: OnceLock<Vec<(Str, Value)>>,
    overlay: DefaultObjectImpl,
}

impl<N: Describe> LazyObjectImpl<N> {
    /// Create a lazy backing over `node`.
    pub fn new(node: Arc<N>, dom: CorpusRef) -> Self {
        LazyObjectImpl {
            node,
            dom,
            base: OnceLock::new(),
            overlay: DefaultObjectImpl::new(),
        }
    }

    /// The materialized base table, built on first use.
    fn base(&self) -> &[(Str, Value)] {
        self.base.get_or_init(|| {
            log::trace!("materializing lazy object base");
            let mut io = Fields::new();
            self.node.describe(&mut io, &self.dom);
            io.into_entries()
        })
    }

    fn base_has(base: &[(Str, Value)], key: &str) -> bool {
        base.iter().any(|(k, _)| k.as_str() == key)
    }
}

impl<N: Describe> ObjectImpl for LazyObjectImpl<N> {
    fn type_key(&self) -> &'static str {
        "LazyObject"
    }

    /// Materialized base keys plus overlay keys absent from the base.
    fn size(&self) -> usize {
        let base = self.base();
        let mut extra = 0;
        self.overlay.visit(&mut |k, _| {
            if !Self::base_has(base, k.as_str()) {
                extra += 1;
            }
            true
        });
        base.len() + extra
    }

    /// Enumeration order: base fields in declaration order (showing the
    /// overlay value where the key is overridden), then overlay-only
    /// keys in insertion order.
    fn get(&self, ordinal: usize) -> Option<(Str, Value)> {
        let base = self.base();
        if ordinal < base.len() {
            let (key, value) = &base[ordinal];
            if self.overlay.exists(key.as_str()) {
                return Some((key.clone(), self.overlay.find(key.as_str())));
            }
            return Some((key.clone(), value.clone()));
        }

        let mut remaining = ordinal - base.len();
        let mut found = None;
        self.overlay.visit(&mut |k, v| {
            if Self::base_has(base, k.as_str()) {
                return true;
            }
            if remaining == 0 {
                found = Some((k.clone(), v.clone()));
                return false;
            }
            remaining -= 1;
            true
        });
        found
    }

    fn find(&self, key: &str) -> Value {
        // The overlay wins without forcing materialization.
        if self.overlay.exists(key) {
            return self.overlay.find(key);
        }
        self.base()
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v.clone())
            .unwrap_or(Value::Null)
    }

    fn exists(&self, key: &str) -> bool {
        self.overlay.exists(key) || Self::base_has(self.base(), key)
    }

    /// Writes never mutate the node or the cached base.
    fn set(&self, key: Str, value: Value) {
        self.overlay.set(key, value);
    }

    fn visit(&self, f: &mut dyn FnMut(&Str, &Value) -> bool) -> bool {
        let base = self.base();
        for (key, value) in base {
            let more = if self.overlay.exists(key.as_str()) {
                let shadowed = self.overlay.find(key.as_str());
                f(key, &shadowed)
            } else {
                f(key, value)
            };
            if !more {
                return false;
            }
        }
        self.overlay.visit(&mut |k, v| {
            if Self::base_has(base, k.as_str()) {
                return true;
            }
            f(k, v)
        })
    }
}

/// Create an [`Object`] with a lazy backing over `node`.
pub fn lazy_object<N: Describe>(node: Arc<N>, dom: CorpusRef) -> Object {
    Object::with_impl(LazyObjectImpl::new(node, dom))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::corpus::CorpusRef;

    struct Probe {
        describes: AtomicUsize,
        thunks: AtomicUsize,
    }

    impl Probe {
        fn new() -> Self {
            Probe {
                describes: AtomicUsize::new(0),
                thunks: AtomicUsize::new(0),
            }
        }
    }

    impl Describe for Probe {
        fn describe(&self, io: &mut Fields, _dom: &CorpusRef) {
            self.describes.fetch_add(1, Ordering::SeqCst);
            io.field("a", 1);
            io.defer("b", || {
                self.thunks.fetch_add(1, Ordering::SeqCst);
                Value::from(2)
            });
            io.field("c", 3);
        }
    }

    fn probe_object() -> (Arc<Probe>, Object) {
        let node = Arc::new(Probe::new());
        let obj = lazy_object(node.clone(), CorpusRef::detached());
        (node, obj)
    }

    #[test]
    fn test_construction_does_not_materialize() {
        let (node, _obj) = probe_object();
        assert_eq!(node.describes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_one_read_runs_the_whole_pass_once() {
        let (node, obj) = probe_object();

        // Whole-object granularity: finding "a" also runs the thunk
        // declared for "b".
        assert_eq!(obj.find("a"), Value::from(1));
        assert_eq!(node.describes.load(Ordering::SeqCst), 1);
        assert_eq!(node.thunks.load(Ordering::SeqCst), 1);

        obj.find("b");
        obj.find("c");
        assert_eq!(obj.size(), 3);
        assert_eq!(node.describes.load(Ordering::SeqCst), 1);
        assert_eq!(node.thunks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_overlay_read_skips_materialization() {
        let (node, obj) = probe_object();
        obj.set("extra", 9);
        assert_eq!(obj.find("extra"), Value::from(9));
        assert_eq!(node.describes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_set_on_base_key_shadows_without_resizing() {
        let (_node, obj) = probe_object();
        assert_eq!(obj.size(), 3);

        obj.set("a", 100);
        assert_eq!(obj.size(), 3);
        assert_eq!(obj.find("a"), Value::from(100));

        obj.set("d", 4);
        assert_eq!(obj.size(), 4);
    }

    #[test]
    fn test_enumeration_order() {
        let (_node, obj) = probe_object();
        obj.set("a", 100);
        obj.set("d", 4);

        let mut entries = Vec::new();
        obj.visit(|k, v| {
            entries.push((k.to_string(), v.clone()));
            true
        });
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["a", "b", "c", "d"]);
        assert_eq!(entries[0].1, Value::from(100));

        let (key, value) = obj.get_entry(3).expect("entry missing");
        assert_eq!(key, "d");
        assert_eq!(value, Value::from(4));
    }
}
