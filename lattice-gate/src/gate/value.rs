//! Dynamic Values
//!
//! `Value` is a tagged union for callers whose inputs are not statically
//! typed: data decoded from JSON, script bindings, or UI state that mixes
//! kinds. Truthiness is an explicit match over the variants.
//!
//! Arrays and objects are reference-counted. Cloning a `Value` shares the
//! allocation, so a conjunction tuple holds the *same* object it was given;
//! [`Value::is_same`] checks that identity.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use indexmap::IndexMap;

use super::truthy::Truthy;

/// A dynamically typed value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    /// Arbitrary-precision integer, bounded to 128 bits.
    BigInt(i128),
    String(String),
    Symbol(Symbol),
    Array(Arc<Vec<Value>>),
    Object(Arc<IndexMap<String, Value>>),
    Date(SystemTime),
    RegExp(RegExp),
}

impl Value {
    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(Arc::new(items.into_iter().collect()))
    }

    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Object(Arc::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// Name of the variant's kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Date(_) => "date",
            Value::RegExp(_) => "regexp",
        }
    }

    /// Identity comparison: arrays and objects compare by allocation,
    /// numbers treat `NaN` as equal to itself, everything else by value.
    pub fn is_same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Array(a), Value::Array(b)) => Arc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Number(a), Value::Number(b)) => (a.is_nan() && b.is_nan()) || a == b,
            _ => self == other,
        }
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }
}

impl Truthy for Value {
    type Present = Value;

    fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::BigInt(n) => *n != 0,
            Value::String(s) => !s.is_empty(),
            Value::Symbol(_)
            | Value::Array(_)
            | Value::Object(_)
            | Value::Date(_)
            | Value::RegExp(_) => true,
        }
    }

    fn into_present(self) -> Option<Value> {
        self.is_truthy().then_some(self)
    }
}

/// A unique token. Two symbols are equal only if one is a clone of the other.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    id: u64,
    description: Option<Arc<str>>,
}

impl Symbol {
    pub fn new(description: Option<&str>) -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self {
            id: COUNTER.fetch_add(1, Ordering::Relaxed),
            description: description.map(Arc::from),
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description().unwrap_or_default())
    }
}

/// A regular expression literal, kept as source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegExp {
    pub source: String,
    pub flags: String,
}

impl RegExp {
    pub fn new(source: impl Into<String>, flags: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            flags: flags.into(),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i128> for Value {
    fn from(n: i128) -> Self {
        Value::BigInt(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Symbol> for Value {
    fn from(s: Symbol) -> Self {
        Value::Symbol(s)
    }
}

impl From<SystemTime> for Value {
    fn from(t: SystemTime) -> Self {
        Value::Date(t)
    }
}

impl From<RegExp> for Value {
    fn from(r: RegExp) -> Self {
        Value::RegExp(r)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::array(items.into_iter().map(Value::from)),
            Json::Object(map) => Value::object(map.into_iter().map(|(k, v)| (k, Value::from(v)))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn falsy_values() {
        let falsy = [
            Value::Undefined,
            Value::Null,
            Value::Bool(false),
            Value::Number(0.0),
            Value::Number(-0.0),
            Value::Number(f64::NAN),
            Value::BigInt(0),
            Value::from(""),
        ];

        for value in falsy {
            assert!(!value.is_truthy(), "{value:?} should be falsy");
        }
    }

    #[test]
    fn truthy_values() {
        let truthy = [
            Value::Bool(true),
            Value::Number(f64::INFINITY),
            Value::Number(f64::NEG_INFINITY),
            Value::Number(-1.5),
            Value::BigInt(1),
            Value::BigInt(-1),
            Value::from("false"),
            Value::from("0"),
            Value::array([]),
            Value::object::<&str>([]),
            Value::Date(SystemTime::UNIX_EPOCH),
            Value::RegExp(RegExp::new("a+", "g")),
            Value::Symbol(Symbol::new(None)),
        ];

        for value in truthy {
            assert!(value.is_truthy(), "{value:?} should be truthy");
        }
    }

    #[test]
    fn symbols_are_unique() {
        let a = Symbol::new(Some("id"));
        let b = Symbol::new(Some("id"));

        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert_eq!(format!("{a:?}"), "Symbol(id)");
    }

    #[test]
    fn same_compares_identity_for_objects() {
        let obj = Value::object([("x", Value::from(1))]);
        let twin = Value::object([("x", Value::from(1))]);

        assert!(obj.is_same(&obj.clone()));
        assert!(!obj.is_same(&twin));
        assert_eq!(obj, twin);
        assert!(Value::Number(f64::NAN).is_same(&Value::Number(f64::NAN)));
    }

    #[test]
    fn converts_from_json() {
        let value = Value::from(json!({"name": "ada", "tags": [], "age": 0, "note": null}));

        let Value::Object(map) = value else {
            panic!("expected object");
        };
        assert_eq!(map["name"], Value::from("ada"));
        assert!(map["tags"].is_truthy());
        assert!(!map["age"].is_truthy());
        assert_eq!(map["note"].kind(), "null");
    }
}
