// Variable values supplied at expansion time

use std::collections::{BTreeMap, HashMap};

use serde_json::Value as JsonValue;

/// A value bound to a template variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Undefined,
    String(String),
    List(Vec<String>),
    /// Key/value pairs in insertion order
    AssocArray(Vec<(String, String)>),
}

impl Value {
    /// Undefined values and empty composites contribute nothing to an expansion
    pub fn is_defined(&self) -> bool {
        match self {
            Value::Undefined => false,
            Value::String(_) => true,
            Value::List(items) => !items.is_empty(),
            Value::AssocArray(pairs) => !pairs.is_empty(),
        }
    }

    /// Convert a JSON value, stringifying numbers and booleans.
    ///
    /// Arrays become lists, objects become associative arrays (in the map's
    /// iteration order), and `null` is undefined. Nested composites are
    /// written out as JSON text.
    pub fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => Value::Undefined,
            JsonValue::Array(items) => Value::List(items.iter().map(json_scalar).collect()),
            JsonValue::Object(map) => Value::AssocArray(
                map.iter()
                    .map(|(key, value)| (key.clone(), json_scalar(value)))
                    .collect(),
            ),
            other => Value::String(json_scalar(other)),
        }
    }
}

fn json_scalar(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

impl From<Vec<&str>> for Value {
    fn from(items: Vec<&str>) -> Self {
        Value::List(items.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<(String, String)>> for Value {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Value::AssocArray(pairs)
    }
}

impl From<Vec<(&str, &str)>> for Value {
    fn from(pairs: Vec<(&str, &str)>) -> Self {
        Value::AssocArray(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Undefined)
    }
}

/// Read-only lookup of variable values during one expansion
pub trait VariableSource {
    fn lookup(&self, name: &str) -> Option<&Value>;
}

impl VariableSource for HashMap<String, Value> {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl VariableSource for BTreeMap<String, Value> {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl<S: VariableSource + ?Sized> VariableSource for &S {
    fn lookup(&self, name: &str) -> Option<&Value> {
        (**self).lookup(name)
    }
}

/// Owned variable binding with a builder-style API
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables {
    values: HashMap<String, Value>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build a binding from the members of a JSON object.
    ///
    /// Returns `None` when `value` is not an object.
    pub fn from_json(value: &JsonValue) -> Option<Self> {
        let map = value.as_object()?;
        Some(Self {
            values: map
                .iter()
                .map(|(name, value)| (name.clone(), Value::from_json(value)))
                .collect(),
        })
    }
}

impl VariableSource for Variables {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Variables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut vars = Variables::new();
        for (name, value) in iter {
            vars.insert(name, value);
        }
        vars
    }
}
