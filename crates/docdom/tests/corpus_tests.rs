//! End-to-end tests: a symbol graph exposed through the bridge

use std::sync::{Arc, Barrier};
use std::thread;

use docdom::*;

/// A small graph:
///
/// ```text
/// ns app (root)
/// ├── record Widget : Base
/// │   └── fn paint(surface: Surface) -> ()
/// └── record Base
/// ```
fn sample_corpus() -> Corpus {
    let ns = SymbolId::new(1);
    let widget = SymbolId::new(2);
    let base = SymbolId::new(3);
    let paint = SymbolId::new(4);

    let mut corpus = Corpus::new();

    let mut app = NamespaceSymbol::new(ns, "app");
    app.members = vec![widget, base];
    corpus.register(app.into()).expect("register failed");

    let mut widget_sym = RecordSymbol::new(widget, "Widget");
    widget_sym.parent = Some(ns);
    widget_sym.bases = vec![base];
    widget_sym.members = vec![paint];
    widget_sym.doc = Some(DocComment::from_blocks(vec![Paragraph {
        children: vec![Text {
            text: Str::from_static("A drawable widget."),
        }
        .into()],
    }
    .into()]));
    corpus.register(widget_sym.into()).expect("register failed");

    let mut base_sym = RecordSymbol::new(base, "Base");
    base_sym.parent = Some(ns);
    corpus.register(base_sym.into()).expect("register failed");

    let mut paint_sym = FunctionSymbol::new(paint, "paint");
    paint_sym.parent = Some(widget);
    paint_sym.params.push(Param::new("surface", "Surface"));
    paint_sym.return_type = Str::from_static("()");
    corpus.register(paint_sym.into()).expect("register failed");

    corpus.set_root(ns).expect("set_root failed");
    corpus
}

#[test]
fn test_navigate_root_to_leaf() {
    let dom = sample_corpus().freeze();
    let root = dom.root();

    assert_eq!(root.get("kind").as_str(), Some("namespace"));
    assert_eq!(root.get("name").as_str(), Some("app"));

    let members = root.get("members");
    assert_eq!(members.size(), 2);

    let widget = members.get_index(0);
    assert_eq!(widget.get("name").as_str(), Some("Widget"));
    assert_eq!(widget.get("kind").as_str(), Some("record"));

    let paint = widget.get("members").get_index(0);
    assert_eq!(paint.get("name").as_str(), Some("paint"));
    assert_eq!(paint.get("returnType").as_str(), Some("()"));
    assert_eq!(
        paint.lookup("params").get_index(0).get("type").as_str(),
        Some("Surface")
    );
}

#[test]
fn test_parent_links_resolve() {
    let dom = sample_corpus().freeze();
    let widget = dom.get(SymbolId::new(2));

    let parent = widget.get("parent");
    assert_eq!(parent.get("name").as_str(), Some("app"));

    // Parent and the directly fetched namespace share one wrapper.
    let ns = dom.get(SymbolId::new(1));
    let parent = parent.as_object().expect("not an object");
    let ns = ns.as_object().expect("not an object");
    assert!(parent.ptr_eq(ns));
}

#[test]
fn test_doc_comment_exposed() {
    let dom = sample_corpus().freeze();
    let widget = dom.get(SymbolId::new(2));

    let doc = widget.get("doc");
    assert_eq!(doc.get("brief").as_str(), Some("A drawable widget."));
    assert_eq!(
        doc.lookup("blocks").get_index(0).get("kind").as_str(),
        Some("paragraph")
    );

    // Symbols without docs simply lack the field.
    let base = dom.get(SymbolId::new(3));
    assert_eq!(base.get("doc"), Value::Null);
}

#[test]
fn test_member_resolution_is_lazy() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    // A member list resolves ids through the corpus only when indexed:
    // materializing the namespace must not materialize its members.
    static MATERIALIZED: AtomicUsize = AtomicUsize::new(0);

    struct Counting {
        inner: NamespaceSymbol,
    }

    impl Describe for Counting {
        fn describe(&self, io: &mut Fields, dom: &CorpusRef) {
            MATERIALIZED.fetch_add(1, Ordering::SeqCst);
            self.inner.describe(io, dom);
        }
    }

    let dom = sample_corpus().freeze();
    let handle = dom.handle();

    let mut counted = NamespaceSymbol::new(SymbolId::new(99), "counted");
    counted.members = vec![SymbolId::new(2), SymbolId::new(3)];
    let obj = lazy_object(Arc::new(Counting { inner: counted }), handle);

    MATERIALIZED.store(0, Ordering::SeqCst);
    let members = obj.find("members");
    assert_eq!(MATERIALIZED.load(Ordering::SeqCst), 1);

    // The member array exists, but its elements are untouched symbol
    // wrappers; indexing one resolves it on the spot.
    assert_eq!(members.size(), 2);
    let widget = members.get_index(0);
    assert_eq!(widget.get("name").as_str(), Some("Widget"));
}

#[test]
fn test_overlay_decorates_shared_wrapper() {
    let dom = sample_corpus().freeze();

    // A generator decorates the wrapped symbol with its own state.
    let widget = dom.get(SymbolId::new(2));
    let obj = widget.as_object().expect("not an object");
    let base_size = obj.size();
    obj.set("anchor", "widget.html#abc");

    assert_eq!(obj.size(), base_size + 1);
    assert_eq!(obj.find("anchor").as_str(), Some("widget.html#abc"));

    // The wrapper is shared, so another fetch sees the decoration; the
    // node itself was never mutated.
    let again = dom.get(SymbolId::new(2));
    assert_eq!(again.get("anchor").as_str(), Some("widget.html#abc"));
    assert_eq!(again.get("name").as_str(), Some("Widget"));
}

#[test]
fn test_concurrent_workers_share_one_materialization() {
    const THREADS: usize = 32;

    for _ in 0..20 {
        let dom = sample_corpus().freeze();
        let barrier = Barrier::new(THREADS);

        thread::scope(|scope| {
            for t in 0..THREADS {
                let dom = dom.clone();
                let barrier = &barrier;
                scope.spawn(move || {
                    barrier.wait();
                    // Every worker walks into the same symbols.
                    let id = SymbolId::new(1 + (t as u64 % 4));
                    let sym = dom.get(id);
                    assert!(sym.is_object());
                    assert!(sym.get("kind").is_string());
                    let root = dom.root();
                    assert_eq!(root.get("members").size(), 2);
                });
            }
        });

        // All workers resolved through one cache entry per symbol.
        let a = dom.get(SymbolId::new(1));
        let b = dom.get(SymbolId::new(1));
        let a = a.as_object().expect("not an object");
        let b = b.as_object().expect("not an object");
        assert!(a.ptr_eq(b));
    }
}

#[test]
fn test_stringify_terminates_on_cyclic_graph() {
    let dom = sample_corpus().freeze();
    let widget = dom.get(SymbolId::new(2));

    // widget -> parent -> members -> widget is a cycle through the
    // corpus cache; stringify must cut it rather than recurse forever.
    let json = stringify(&widget);
    assert!(json.contains("\"name\":\"Widget\""));
    assert!(json.contains("[circular]"));
}

#[test]
fn test_corpus_enumeration_is_registration_ordered() {
    let corpus = sample_corpus();
    let ids: Vec<u64> = corpus.ids().map(SymbolId::raw).collect();
    assert_eq!(ids, [1, 2, 3, 4]);
}
