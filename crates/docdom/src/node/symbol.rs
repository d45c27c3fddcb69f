//! Symbol nodes and their describe implementations

use std::sync::Arc;

use super::{visit_symbol, DocComment, Symbol, SymbolId, SymbolKind, SymbolVisitor};
use crate::array::transform_array;
use crate::corpus::CorpusRef;
use crate::describe::{Describe, Fields};
use crate::object::Object;
use crate::poly::PolyValue;
use crate::string::Str;
use crate::value::Value;

/// A namespace symbol.
#[derive(Clone)]
pub struct NamespaceSymbol {
    /// The symbol's id
    pub id: SymbolId,

    /// The symbol's name
    pub name: Str,

    /// The enclosing symbol, if any
    pub parent: Option<SymbolId>,

    /// Ids of the symbols declared inside this namespace
    pub members: Vec<SymbolId>,

    /// Attached documentation
    pub doc: Option<DocComment>,
}

impl NamespaceSymbol {
    /// Create an empty namespace.
    pub fn new(id: SymbolId, name: impl Into<Str>) -> Self {
        NamespaceSymbol {
            id,
            name: name.into(),
            parent: None,
            members: Vec::new(),
            doc: None,
        }
    }
}

impl Symbol for NamespaceSymbol {
    fn id(&self) -> SymbolId {
        self.id
    }

    fn name(&self) -> &Str {
        &self.name
    }

    fn kind(&self) -> SymbolKind {
        SymbolKind::Namespace
    }

    fn parent(&self) -> Option<SymbolId> {
        self.parent
    }

    fn doc(&self) -> Option<&DocComment> {
        self.doc.as_ref()
    }

    fn clone_box(&self) -> PolyValue<dyn Symbol> {
        PolyValue::from(self.clone())
    }
}

impl Describe for NamespaceSymbol {
    fn describe(&self, io: &mut Fields, dom: &CorpusRef) {
        describe_common(self, io, dom);
        io.defer("members", || member_array(&self.members, dom));
    }
}

/// A record symbol: a class, struct or union.
#[derive(Clone)]
pub struct RecordSymbol {
    /// The symbol's id
    pub id: SymbolId,

    /// The symbol's name
    pub name: Str,

    /// The enclosing symbol, if any
    pub parent: Option<SymbolId>,

    /// Ids of the record's direct base records
    pub bases: Vec<SymbolId>,

    /// Ids of the symbols declared inside the record
    pub members: Vec<SymbolId>,

    /// Attached documentation
    pub doc: Option<DocComment>,
}

impl RecordSymbol {
    /// Create an empty record.
    pub fn new(id: SymbolId, name: impl Into<Str>) -> Self {
        RecordSymbol {
            id,
            name: name.into(),
            parent: None,
            bases: Vec::new(),
            members: Vec::new(),
            doc: None,
        }
    }
}

impl Symbol for RecordSymbol {
    fn id(&self) -> SymbolId {
        self.id
    }

    fn name(&self) -> &Str {
        &self.name
    }

    fn kind(&self) -> SymbolKind {
        SymbolKind::Record
    }

    fn parent(&self) -> Option<SymbolId> {
        self.parent
    }

    fn doc(&self) -> Option<&DocComment> {
        self.doc.as_ref()
    }

    fn clone_box(&self) -> PolyValue<dyn Symbol> {
        PolyValue::from(self.clone())
    }
}

impl Describe for RecordSymbol {
    fn describe(&self, io: &mut Fields, dom: &CorpusRef) {
        describe_common(self, io, dom);
        io.defer("bases", || member_array(&self.bases, dom));
        io.defer("members", || member_array(&self.members, dom));
    }
}

/// A function parameter.
#[derive(Clone)]
pub struct Param {
    /// Parameter name
    pub name: Str,

    /// Spelled type
    pub type_name: Str,
}

impl Param {
    /// Create a parameter.
    pub fn new(name: impl Into<Str>, type_name: impl Into<Str>) -> Self {
        Param {
            name: name.into(),
            type_name: type_name.into(),
        }
    }

    fn to_value(&self) -> Value {
        let obj = Object::new();
        obj.set("name", self.name.clone());
        obj.set("type", self.type_name.clone());
        Value::Object(obj)
    }
}

/// A function symbol.
#[derive(Clone)]
pub struct FunctionSymbol {
    /// The symbol's id
    pub id: SymbolId,

    /// The symbol's name
    pub name: Str,

    /// The enclosing symbol, if any
    pub parent: Option<SymbolId>,

    /// The function's parameters, in declaration order
    pub params: Vec<Param>,

    /// Spelled return type
    pub return_type: Str,

    /// Attached documentation
    pub doc: Option<DocComment>,
}

impl FunctionSymbol {
    /// Create a function with no parameters.
    pub fn new(id: SymbolId, name: impl Into<Str>) -> Self {
        FunctionSymbol {
            id,
            name: name.into(),
            parent: None,
            params: Vec::new(),
            return_type: Str::from_static("void"),
            doc: None,
        }
    }
}

impl Symbol for FunctionSymbol {
    fn id(&self) -> SymbolId {
        self.id
    }

    fn name(&self) -> &Str {
        &self.name
    }

    fn kind(&self) -> SymbolKind {
        SymbolKind::Function
    }

    fn parent(&self) -> Option<SymbolId> {
        self.parent
    }

    fn doc(&self) -> Option<&DocComment> {
        self.doc.as_ref()
    }

    fn clone_box(&self) -> PolyValue<dyn Symbol> {
        PolyValue::from(self.clone())
    }
}

impl Describe for FunctionSymbol {
    fn describe(&self, io: &mut Fields, dom: &CorpusRef) {
        describe_common(self, io, dom);
        io.field("returnType", self.return_type.clone());
        io.defer("params", || {
            let params = Arc::new(self.params.clone());
            Value::Array(transform_array(params, |p: &Param| p.to_value()))
        });
    }
}

/// Fields shared by every symbol kind, declared first.
fn describe_common<S: Symbol>(sym: &S, io: &mut Fields, dom: &CorpusRef) {
    io.field("class", "symbol");
    io.field("kind", sym.kind().as_str());
    io.field("id", sym.id().to_string());
    if !sym.name().is_empty() {
        io.field("name", sym.name().clone());
    }
    if let Some(parent) = sym.parent() {
        let dom = dom.clone();
        io.defer("parent", move || dom.get(parent));
    }
    if let Some(doc) = sym.doc() {
        io.defer("doc", || doc.to_value());
    }
}

/// Resolve a list of symbol ids into a lazy array of symbol objects.
///
/// Only the id list is copied; each element resolves through the corpus
/// when it is first indexed, so touching the array does not expand its
/// symbols.
fn member_array(ids: &[SymbolId], dom: &CorpusRef) -> Value {
    let ids = Arc::new(ids.to_vec());
    let dom = dom.clone();
    Value::Array(transform_array(ids, move |id: &SymbolId| dom.get(*id)))
}

/// Describe through the owning handle by dispatching on the
/// discriminant, so a corpus can wrap any symbol uniformly.
impl Describe for PolyValue<dyn Symbol> {
    fn describe(&self, io: &mut Fields, dom: &CorpusRef) {
        struct Dispatch<'a, 'b> {
            io: &'a mut Fields,
            dom: &'b CorpusRef,
        }

        impl SymbolVisitor for Dispatch<'_, '_> {
            type Output = ();

            fn namespace(&mut self, sym: &NamespaceSymbol) {
                sym.describe(self.io, self.dom);
            }

            fn record(&mut self, sym: &RecordSymbol) {
                sym.describe(self.io, self.dom);
            }

            fn function(&mut self, sym: &FunctionSymbol) {
                sym.describe(self.io, self.dom);
            }
        }

        visit_symbol(self.get(), &mut Dispatch { io, dom });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::object::lazy_object;

    #[test]
    fn test_describe_field_order() {
        let mut sym = FunctionSymbol::new(SymbolId::new(1), "run");
        sym.return_type = Str::from_static("int");
        sym.params.push(Param::new("count", "usize"));

        let obj = lazy_object(Arc::new(sym), CorpusRef::detached());
        let mut keys = Vec::new();
        obj.visit(|k, _| {
            keys.push(k.to_string());
            true
        });
        assert_eq!(keys, ["class", "kind", "id", "name", "returnType", "params"]);
    }

    #[test]
    fn test_function_fields() {
        let mut sym = FunctionSymbol::new(SymbolId::new(2), "max");
        sym.return_type = Str::from_static("i64");
        sym.params.push(Param::new("a", "i64"));
        sym.params.push(Param::new("b", "i64"));

        let obj = lazy_object(Arc::new(sym), CorpusRef::detached());
        assert_eq!(obj.find("kind").as_str(), Some("function"));
        assert_eq!(obj.find("returnType").as_str(), Some("i64"));

        let params = obj.find("params");
        assert_eq!(params.size(), 2);
        assert_eq!(params.get_index(1).get("name").as_str(), Some("b"));
        assert_eq!(params.get_index(1).get("type").as_str(), Some("i64"));
    }

    #[test]
    fn test_unnamed_symbol_omits_name() {
        let sym = NamespaceSymbol::new(SymbolId::new(3), "");
        let obj = lazy_object(Arc::new(sym), CorpusRef::detached());
        assert!(!obj.exists("name"));
        assert_eq!(obj.find("name"), Value::Null);
    }

    #[test]
    fn test_dispatch_through_poly_handle() {
        let sym: PolyValue<dyn Symbol> = RecordSymbol::new(SymbolId::new(4), "Widget").into();
        let obj = lazy_object(Arc::new(sym), CorpusRef::detached());
        assert_eq!(obj.find("kind").as_str(), Some("record"));
        assert_eq!(obj.find("class").as_str(), Some("symbol"));
    }
}
