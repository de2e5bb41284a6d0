//! Field Identifiers and Setter Arguments

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

/// Identifier of one output field of a feature
///
/// Indices order before names; the display form is the column name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldId {
    Index(usize),
    Name(String),
}

impl FieldId {
    /// Turn a digit-only name into the matching index
    pub fn normalize_index(self) -> Self {
        match self {
            FieldId::Name(name) if !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()) => {
                match name.parse() {
                    Ok(index) => FieldId::Index(index),
                    Err(_) => FieldId::Name(name),
                }
            }
            other => other,
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldId::Index(index) => write!(f, "{}", index),
            FieldId::Name(name) => f.write_str(name),
        }
    }
}

impl From<usize> for FieldId {
    fn from(index: usize) -> Self {
        FieldId::Index(index)
    }
}

impl From<&str> for FieldId {
    fn from(name: &str) -> Self {
        FieldId::Name(name.to_string())
    }
}

impl From<String> for FieldId {
    fn from(name: String) -> Self {
        FieldId::Name(name)
    }
}

/// Ordered, de-duplicated set of fixed fields
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSet {
    fields: Vec<FieldId>,
    positions: HashMap<FieldId, usize>,
    indexed: bool,
}

impl FieldSet {
    /// Build from fields in column order, keeping the first of any duplicates
    pub fn new(fields: impl IntoIterator<Item = FieldId>) -> Self {
        let mut ordered = Vec::new();
        let mut positions = HashMap::new();
        for field in fields {
            if !positions.contains_key(&field) {
                positions.insert(field.clone(), ordered.len());
                ordered.push(field);
            }
        }
        let indexed = !ordered.is_empty() && ordered.iter().all(|f| matches!(f, FieldId::Index(_)));
        Self {
            fields: ordered,
            positions,
            indexed,
        }
    }

    /// Fields `0..count`
    pub fn count(count: usize) -> Self {
        Self::new((0..count).map(FieldId::Index))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Every field is an index
    pub fn is_indexed(&self) -> bool {
        self.indexed
    }

    pub fn contains(&self, field: &FieldId) -> bool {
        self.positions.contains_key(field)
    }

    /// Column position of a field
    pub fn position(&self, field: &FieldId) -> Option<usize> {
        self.positions.get(field).copied()
    }

    /// Map digit-only names onto indices when the set is all-index
    pub fn normalize(&self, field: FieldId) -> FieldId {
        if self.indexed {
            field.normalize_index()
        } else {
            field
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldId> {
        self.fields.iter()
    }

    pub fn as_slice(&self) -> &[FieldId] {
        &self.fields
    }
}

impl FromIterator<FieldId> for FieldSet {
    fn from_iter<I: IntoIterator<Item = FieldId>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// One positional argument passed through `set`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    /// Field addressed by this argument
    ///
    /// Only non-negative integral numbers name an index.
    pub fn to_field(&self) -> Option<FieldId> {
        match self {
            Value::Number(n) if n.is_finite() && *n >= 0.0 && n.fract() == 0.0 => {
                Some(FieldId::Index(*n as usize))
            }
            Value::Number(_) => None,
            Value::Text(text) => Some(FieldId::Name(text.clone())),
        }
    }

    /// String form fed to a hash function
    pub fn token(&self) -> Cow<'_, str> {
        match self {
            Value::Number(n) => Cow::Owned(n.to_string()),
            Value::Text(text) => Cow::Borrowed(text),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<&FieldId> for Value {
    fn from(field: &FieldId) -> Self {
        match field {
            FieldId::Index(index) => Value::from(*index),
            FieldId::Name(name) => Value::from(name.as_str()),
        }
    }
}
