//! One-Hot Categorical Feature

use crate::error::FeatureError;
use crate::feature::Feature;
use crate::field::{FieldId, FieldSet, Value};
use crate::slot::RowSlot;
use tracing::trace;

/// One-hot encoding over a fixed vocabulary
///
/// Fields are the sorted distinct values. `set(token)` writes 1.0 to the
/// token's field, `set(token, weight)` writes `weight`. Tokens outside the
/// vocabulary are ignored.
#[derive(Debug, Clone)]
pub struct Categorical {
    values: FieldSet,
}

impl Categorical {
    pub fn new<I, F>(values: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<FieldId>,
    {
        let mut values: Vec<FieldId> = values.into_iter().map(Into::into).collect();
        values.sort();
        values.dedup();
        Self {
            values: FieldSet::new(values),
        }
    }

    /// Vocabulary in column order
    pub fn values(&self) -> &[FieldId] {
        self.values.as_slice()
    }
}

impl Feature for Categorical {
    fn kind(&self) -> &'static str {
        "categorical"
    }

    fn fields(&self) -> Option<Vec<FieldId>> {
        Some(self.values.as_slice().to_vec())
    }

    fn set(&mut self, slot: &mut RowSlot, args: &[Value]) -> Result<(), FeatureError> {
        let (token, weight) = match args {
            [token] => (token, 1.0),
            [token, weight] => {
                let weight = weight.as_number().ok_or_else(|| {
                    FeatureError::invalid_arguments("categorical", format!("weight '{}' is not a number", weight))
                })?;
                (token, weight)
            }
            _ => {
                return Err(FeatureError::invalid_arguments(
                    "categorical",
                    format!("expected 1 or 2 arguments, got {}", args.len()),
                ))
            }
        };

        match token.to_field().map(|f| self.values.normalize(f)) {
            Some(field) if self.values.contains(&field) => slot.set(field, weight),
            _ => trace!("Ignoring unknown categorical token '{}'", token),
        }
        Ok(())
    }
}
