//! Tests for the polymorphic value handle over the node hierarchy

use docdom::*;

fn sample_record() -> PolyValue<dyn Symbol> {
    let mut record = RecordSymbol::new(SymbolId::new(10), "Widget");
    record.bases.push(SymbolId::new(2));
    record.into()
}

#[test]
fn test_clone_round_trip_is_content_equal() {
    let p = sample_record();
    let q = p.clone();

    let (p_rec, q_rec) = (
        p.downcast_ref::<RecordSymbol>().expect("not a record"),
        q.downcast_ref::<RecordSymbol>().expect("not a record"),
    );
    assert_eq!(p_rec.id, q_rec.id);
    assert_eq!(p_rec.name, q_rec.name);
    assert_eq!(p_rec.bases, q_rec.bases);
}

#[test]
fn test_clone_is_deep_not_shared() {
    let p = sample_record();
    let mut q = p.clone();

    q.downcast_mut::<RecordSymbol>()
        .expect("not a record")
        .bases
        .push(SymbolId::new(99));

    let p_bases = &p.downcast_ref::<RecordSymbol>().expect("not a record").bases;
    let q_bases = &q.downcast_ref::<RecordSymbol>().expect("not a record").bases;
    assert_eq!(p_bases.len(), 1);
    assert_eq!(q_bases.len(), 2);
}

#[test]
fn test_dispatch_reaches_concrete_type() {
    let p = sample_record();
    assert_eq!(p.kind(), SymbolKind::Record);
    assert!(p.is::<RecordSymbol>());
    assert!(!p.is::<NamespaceSymbol>());
}

#[test]
fn test_upcast_reuses_allocation() {
    let block: PolyValue<dyn Block> = Paragraph { children: vec![] }.into();
    let payload_before = block
        .downcast_ref::<Paragraph>()
        .expect("not a paragraph") as *const Paragraph;

    let node: PolyValue<dyn DocNode> = block.into();
    let payload_after = node
        .downcast_ref::<Paragraph>()
        .expect("not a paragraph") as *const Paragraph;

    // The upcast rewraps the same heap object; nothing is copied.
    assert_eq!(payload_before, payload_after);
}

#[test]
fn test_upcast_preserves_dispatch() {
    let block: PolyValue<dyn Block> = Paragraph { children: vec![] }.into();
    let node: PolyValue<dyn DocNode> = block.into();

    // The discriminant-recovering downcast still reaches the original
    // concrete type through the wider base.
    assert!(node.is::<Paragraph>());
    assert!(!node.is::<CodeBlock>());

    // And a clone through the wider base is still a working block.
    let copy = node.clone();
    let para = copy.downcast_ref::<Paragraph>().expect("not a paragraph");
    assert!(para.children.is_empty());
}

#[test]
fn test_visitor_dispatch_on_base_reference() {
    struct KindName;

    impl BlockVisitor for KindName {
        type Output = &'static str;

        fn paragraph(&mut self, _: &Paragraph) -> &'static str {
            "paragraph"
        }

        fn heading(&mut self, _: &Heading) -> &'static str {
            "heading"
        }

        fn code(&mut self, _: &CodeBlock) -> &'static str {
            "code"
        }
    }

    let blocks: Vec<PolyValue<dyn Block>> = vec![
        Paragraph { children: vec![] }.into(),
        Heading {
            level: 2,
            children: vec![],
        }
        .into(),
        CodeBlock {
            language: None,
            text: Str::from_static("x"),
        }
        .into(),
    ];

    let names: Vec<&str> = blocks
        .iter()
        .map(|b| visit_block(b.get(), &mut KindName))
        .collect();
    assert_eq!(names, ["paragraph", "heading", "code"]);
}
