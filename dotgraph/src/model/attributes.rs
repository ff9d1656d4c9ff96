//! Ordered attribute collections.

use crate::gv::parser::ast::AttributeKind;
use indexmap::IndexMap;

/// The value of an attribute. Strings are quoted when printed (unless they
/// look like HTML), everything else is printed as a bare token.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Str(x) => write!(f, "{}", x),
            Self::Int(x) => write!(f, "{}", x),
            Self::Float(x) => write!(f, "{}", x),
            Self::Bool(x) => write!(f, "{}", x),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(x: &str) -> Self {
        Self::Str(x.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(x: String) -> Self {
        Self::Str(x)
    }
}

impl From<&String> for AttributeValue {
    fn from(x: &String) -> Self {
        Self::Str(x.clone())
    }
}

impl From<i64> for AttributeValue {
    fn from(x: i64) -> Self {
        Self::Int(x)
    }
}

impl From<i32> for AttributeValue {
    fn from(x: i32) -> Self {
        Self::Int(x as i64)
    }
}

impl From<u32> for AttributeValue {
    fn from(x: u32) -> Self {
        Self::Int(x as i64)
    }
}

impl From<f64> for AttributeValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for AttributeValue {
    fn from(x: bool) -> Self {
        Self::Bool(x)
    }
}

/// A key to value mapping that keeps the insertion order, which is also the
/// order in which the attributes are printed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    map: IndexMap<String, AttributeValue>,
}

impl Attributes {
    pub fn new() -> Self {
        Self {
            map: IndexMap::new(),
        }
    }

    /// Sets \p key. An existing key keeps its position.
    pub fn set<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<AttributeValue>,
    {
        self.map.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.map.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Removes \p key, keeping the order of the remaining keys.
    pub fn delete(&mut self, key: &str) -> Option<AttributeValue> {
        self.map.shift_remove(key)
    }

    /// Sets every pair of \p attrs, in order.
    pub fn apply<I, K, V>(&mut self, attrs: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttributeValue>,
    {
        for (k, v) in attrs {
            self.set(k, v);
        }
        self
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(|k| k.as_str())
    }
}

/// The defaults that a `graph`, `node` or `edge` statement applies to the
/// elements that follow it.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeList {
    kind: AttributeKind,
    pub attributes: Attributes,
    pub comment: Option<String>,
}

impl AttributeList {
    pub fn new(kind: AttributeKind) -> Self {
        Self {
            kind,
            attributes: Attributes::new(),
            comment: None,
        }
    }

    pub fn kind(&self) -> AttributeKind {
        self.kind
    }

    pub fn set<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<AttributeValue>,
    {
        self.attributes.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

#[test]
fn test_attribute_order() {
    let mut attrs = Attributes::new();
    attrs.set("b", 1).set("a", "x").set("c", true);
    attrs.set("b", 2.5);
    let keys: Vec<&str> = attrs.keys().collect();
    assert_eq!(keys, vec!["b", "a", "c"]);
    assert_eq!(attrs.get("b"), Some(&AttributeValue::Float(2.5)));

    attrs.delete("a");
    let keys: Vec<&str> = attrs.keys().collect();
    assert_eq!(keys, vec!["b", "c"]);
    attrs.clear();
    assert!(attrs.is_empty());
}
