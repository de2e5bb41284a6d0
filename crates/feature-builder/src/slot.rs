//! Per-Row Value Slot

use crate::field::{FieldId, FieldSet};
use std::collections::BTreeMap;
use std::sync::Arc;

/// In-progress values of one feature for the current row
///
/// Writes are stored unchecked; membership in the fixed field set is checked
/// by [`RowSlot::validate`] when the row is pushed.
#[derive(Debug, Clone, Default)]
pub struct RowSlot {
    fields: Option<Arc<FieldSet>>,
    values: BTreeMap<FieldId, f64>,
}

impl RowSlot {
    /// Create an empty slot, optionally bound to a fixed field set
    pub fn new(fields: Option<Arc<FieldSet>>) -> Self {
        Self {
            fields,
            values: BTreeMap::new(),
        }
    }

    fn key(&self, key: FieldId) -> FieldId {
        match &self.fields {
            Some(fields) => fields.normalize(key),
            None => key,
        }
    }

    /// Store `value` under `key`, replacing any earlier value
    pub fn set(&mut self, key: impl Into<FieldId>, value: f64) {
        let key = self.key(key.into());
        self.values.insert(key, value);
    }

    pub fn get(&self, key: impl Into<FieldId>) -> Option<f64> {
        let key = self.key(key.into());
        self.values.get(&key).copied()
    }

    pub fn contains(&self, key: impl Into<FieldId>) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldId, f64)> {
        self.values.iter().map(|(k, v)| (k, *v))
    }

    /// First written key outside the fixed field set
    pub fn validate(&self) -> Result<(), FieldId> {
        match &self.fields {
            Some(fields) => match self.values.keys().find(|key| !fields.contains(key)) {
                Some(unknown) => Err(unknown.clone()),
                None => Ok(()),
            },
            None => Ok(()),
        }
    }

    /// Take the written values, leaving the slot empty
    pub fn take(&mut self) -> BTreeMap<FieldId, f64> {
        std::mem::take(&mut self.values)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}
