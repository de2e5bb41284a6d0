//! Feature Trait and Row History

use crate::error::FeatureError;
use crate::field::{FieldId, FieldSet, Value};
use crate::slot::RowSlot;
use feature_table::Table;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use tracing::warn;

/// A leaf producing named numeric fields for every row
///
/// Implementations translate `set` arguments into slot writes. Field
/// membership is checked when the row is pushed, not here.
pub trait Feature {
    /// Short name used in error messages
    fn kind(&self) -> &'static str {
        "custom"
    }

    /// Fixed output fields in column order, or `None` to discover them
    fn fields(&self) -> Option<Vec<FieldId>> {
        None
    }

    /// Record values for the current row
    fn set(&mut self, slot: &mut RowSlot, args: &[Value]) -> Result<(), FeatureError>;
}

/// A feature together with its current slot and finalized rows
pub struct Leaf {
    feature: Box<dyn Feature>,
    fields: Option<Arc<FieldSet>>,
    slot: RowSlot,
    rows: Vec<BTreeMap<FieldId, f64>>,
}

impl Leaf {
    pub fn new(feature: impl Feature + 'static) -> Self {
        Self::from_boxed(Box::new(feature))
    }

    /// An empty fixed field list means the fields are discovered
    pub fn from_boxed(feature: Box<dyn Feature>) -> Self {
        let fields = feature
            .fields()
            .filter(|f| !f.is_empty())
            .map(|f| Arc::new(FieldSet::new(f)));
        Self {
            slot: RowSlot::new(fields.clone()),
            fields,
            feature,
            rows: Vec::new(),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.feature.kind()
    }

    /// Forward arguments to the feature's setter
    pub fn set(&mut self, args: &[Value]) -> Result<(), FeatureError> {
        self.feature.set(&mut self.slot, args)
    }

    /// Values written for the current row so far
    pub fn slot(&self) -> &RowSlot {
        &self.slot
    }

    /// Check the current slot against the fixed field set
    pub fn validate(&self, name: &str) -> Result<(), FeatureError> {
        self.slot
            .validate()
            .map_err(|field| FeatureError::UnknownField {
                feature: name.to_string(),
                field,
            })
    }

    /// Finalize the current slot as a row without checking it
    pub(crate) fn commit(&mut self) {
        let values = self.slot.take();
        self.rows.push(values);
    }

    /// Validate and finalize the current row
    pub fn push(&mut self, name: &str) -> Result<(), FeatureError> {
        self.validate(name)?;
        self.commit();
        Ok(())
    }

    /// Drop the values written since the last push
    pub fn discard(&mut self) {
        self.slot.clear();
    }

    /// Append empty rows so a late-added leaf lines up with its group
    pub(crate) fn backfill(&mut self, rows: usize) {
        while self.rows.len() < rows {
            self.rows.push(BTreeMap::new());
        }
    }

    /// Number of finalized rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Output fields: the fixed set, or the sorted union of every observed field
    pub fn fields(&self) -> Vec<FieldId> {
        match &self.fields {
            Some(fields) => fields.as_slice().to_vec(),
            None => {
                let observed: BTreeSet<&FieldId> = self.rows.iter().flat_map(|r| r.keys()).collect();
                observed.into_iter().cloned().collect()
            }
        }
    }

    /// Assemble the row history into a table, missing values as 0.0
    pub fn table(&self, name: &str) -> Result<Table, FeatureError> {
        let fields = self.fields();
        if fields.is_empty() && !self.rows.is_empty() {
            warn!("Feature '{}' produced no fields over {} rows", name, self.rows.len());
        }

        let positions: HashMap<&FieldId, usize> =
            fields.iter().enumerate().map(|(i, f)| (f, i)).collect();

        let mut table = Table::with_columns(fields.iter().map(ToString::to_string))?;
        for row in &self.rows {
            let mut values = vec![0.0; fields.len()];
            for (field, value) in row {
                if let Some(&idx) = positions.get(field) {
                    values[idx] = *value;
                }
            }
            table.append_row(values)?;
        }
        Ok(table)
    }
}

impl std::fmt::Debug for Leaf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Leaf")
            .field("kind", &self.kind())
            .field("fields", &self.fields)
            .field("rows", &self.rows.len())
            .finish()
    }
}
