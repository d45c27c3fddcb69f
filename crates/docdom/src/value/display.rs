//! Display, Debug and JSON serialization for Value

use std::fmt;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use super::Value;
use crate::string::Str;

impl fmt::Display for Value {
    /// Renders the value the way a template engine would coerce it to
    /// text: null and booleans by name, integers in decimal, strings as
    /// their raw content, arrays as their comma-joined elements, objects
    /// as the opaque `[object Object]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::String(s) => f.write_str(s.as_str()),
            Value::Array(a) => {
                for (i, item) in a.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            Value::Object(_) => f.write_str("[object Object]"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Int(n) => write!(f, "Int({})", n),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::Array(a) => fmt::Debug::fmt(a, f),
            Value::Object(o) => fmt::Debug::fmt(o, f),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// Serde integration
// ═══════════════════════════════════════════════════════════════════

impl Serialize for Str {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Structural serialization.
///
/// Arrays and objects are read through their façades, so lazily backed
/// values are materialized as they are reached. The graph must be a tree:
/// cyclic references (such as parent links resolved through a corpus)
/// recurse without limit here — use [`stringify`] for those.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::String(s) => s.serialize(serializer),
            Value::Array(a) => {
                let mut seq = serializer.serialize_seq(Some(a.size()))?;
                for item in a.iter() {
                    seq.serialize_element(&item)?;
                }
                seq.end()
            }
            Value::Object(o) => {
                let mut map = serializer.serialize_map(Some(o.size()))?;
                for i in 0..o.size() {
                    if let Some((key, value)) = o.get_entry(i) {
                        map.serialize_entry(&key, &value)?;
                    }
                }
                map.end()
            }
        }
    }
}

/// Serialize a value as JSON.
///
/// Unlike the [`Serialize`] implementation, `stringify` detects shared
/// backings already on the path from the root and emits the placeholder
/// string `"[circular]"` for them, so symbol graphs with parent/member
/// cycles terminate.
pub fn stringify(value: &Value) -> String {
    let mut out = String::new();
    let mut path = Vec::new();
    write_json(value, &mut out, &mut path);
    out
}

fn write_json(value: &Value, out: &mut String, path: &mut Vec<*const ()>) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Int(n) => {
            out.push_str(&n.to_string());
        }
        Value::String(s) => write_json_str(s.as_str(), out),
        Value::Array(a) => {
            let id = a.impl_ptr();
            if path.contains(&id) {
                out.push_str("\"[circular]\"");
                return;
            }
            path.push(id);
            out.push('[');
            for (i, item) in a.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_json(&item, out, path);
            }
            out.push(']');
            path.pop();
        }
        Value::Object(o) => {
            let id = o.impl_ptr();
            if path.contains(&id) {
                out.push_str("\"[circular]\"");
                return;
            }
            path.push(id);
            out.push('{');
            let mut first = true;
            for i in 0..o.size() {
                if let Some((key, item)) = o.get_entry(i) {
                    if !first {
                        out.push(',');
                    }
                    first = false;
                    write_json_str(key.as_str(), out);
                    out.push(':');
                    write_json(&item, out, path);
                }
            }
            out.push('}');
            path.pop();
        }
    }
}

fn write_json_str(s: &str, out: &mut String) {
    match serde_json::to_string(s) {
        Ok(quoted) => out.push_str(&quoted),
        // Serializing a string slice cannot fail; keep the output valid
        // JSON if it somehow does.
        Err(_) => out.push_str("\"\""),
    }
}
