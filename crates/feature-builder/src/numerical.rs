//! Plain Numeric Feature

use crate::error::FeatureError;
use crate::feature::Feature;
use crate::field::{FieldId, Value};
use crate::slot::RowSlot;

/// Stores numbers as-is
///
/// `set(value)` writes field `0`, `set(field, value)` writes an explicit field.
#[derive(Debug, Clone)]
pub struct Numerical {
    fields: Vec<FieldId>,
}

impl Numerical {
    /// A single field named `0`
    pub fn new() -> Self {
        Self::with_fields(1)
    }

    /// Fields `0..count`
    pub fn with_fields(count: usize) -> Self {
        Self {
            fields: (0..count).map(FieldId::Index).collect(),
        }
    }

    /// Explicitly named fields such as `["x", "y", "z"]`
    pub fn named<I, F>(fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<FieldId>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for Numerical {
    fn default() -> Self {
        Self::new()
    }
}

impl Feature for Numerical {
    fn kind(&self) -> &'static str {
        "numerical"
    }

    fn fields(&self) -> Option<Vec<FieldId>> {
        Some(self.fields.clone())
    }

    fn set(&mut self, slot: &mut RowSlot, args: &[Value]) -> Result<(), FeatureError> {
        let (field, value) = match args {
            [value] => (FieldId::Index(0), value),
            [field, value] => {
                let field = field.to_field().ok_or_else(|| {
                    FeatureError::invalid_arguments("numerical", format!("'{}' is not a field", field))
                })?;
                (field, value)
            }
            _ => {
                return Err(FeatureError::invalid_arguments(
                    "numerical",
                    format!("expected 1 or 2 arguments, got {}", args.len()),
                ))
            }
        };
        let value = value.as_number().ok_or_else(|| {
            FeatureError::invalid_arguments("numerical", format!("'{}' is not a number", value))
        })?;
        slot.set(field, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldSet;
    use std::sync::Arc;

    fn slot_for(feature: &Numerical) -> RowSlot {
        RowSlot::new(feature.fields().map(|f| Arc::new(FieldSet::new(f))))
    }

    #[test]
    fn test_single_value_writes_field_zero() {
        let mut feature = Numerical::new();
        let mut slot = slot_for(&feature);
        feature.set(&mut slot, &[Value::from(4.5f64)]).unwrap();
        assert_eq!(slot.get(0usize), Some(4.5));
    }

    #[test]
    fn test_explicit_index() {
        let mut feature = Numerical::with_fields(3);
        let mut slot = slot_for(&feature);
        feature
            .set(&mut slot, &[Value::from(2usize), Value::from(7.0f64)])
            .unwrap();
        feature
            .set(&mut slot, &["1".into(), Value::from(8.0f64)])
            .unwrap();
        assert_eq!(slot.get(2usize), Some(7.0));
        assert_eq!(slot.get(1usize), Some(8.0));
        assert!(slot.validate().is_ok());
    }

    #[test]
    fn test_named_fields() {
        let mut feature = Numerical::named(["x", "y", "z"]);
        let mut slot = slot_for(&feature);
        feature.set(&mut slot, &["y".into(), Value::from(1.0f64)]).unwrap();
        assert_eq!(slot.get("y"), Some(1.0));
        // Field 0 does not exist on a named feature
        feature.set(&mut slot, &[Value::from(1.0f64)]).unwrap();
        assert_eq!(slot.validate(), Err(FieldId::Index(0)));
    }

    #[test]
    fn test_invalid_arguments() {
        let mut feature = Numerical::new();
        let mut slot = slot_for(&feature);
        assert!(matches!(
            feature.set(&mut slot, &["abc".into()]),
            Err(FeatureError::InvalidArguments { kind: "numerical", .. })
        ));
        assert!(feature.set(&mut slot, &[]).is_err());
        assert!(feature
            .set(&mut slot, &[Value::from(0.5f64), Value::from(1.0f64)])
            .is_err());
    }
}
