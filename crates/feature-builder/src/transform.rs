//! Table Transforms
//!
//! Transforms rewrite an assembled table before a group returns it, which is
//! where a group hands its features to a model. They may reshape columns
//! freely but must keep the row count.

use crate::error::FeatureError;
use feature_table::Table;
use ndarray::Array2;
use std::fmt;
use tracing::debug;

/// One stage applied to an assembled table
pub trait Transform {
    fn transform(&self, table: Table) -> Result<Table, FeatureError>;
}

impl<F> Transform for F
where
    F: Fn(Table) -> Result<Table, FeatureError>,
{
    fn transform(&self, table: Table) -> Result<Table, FeatureError> {
        self(table)
    }
}

/// Ordered chain of transform stages
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Transform>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, stage: impl Transform + 'static) {
        self.stages.push(Box::new(stage));
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every stage in order
    pub fn apply(&self, mut table: Table) -> Result<Table, FeatureError> {
        for (i, stage) in self.stages.iter().enumerate() {
            let expected = table.len();
            table = stage.transform(table)?;
            if table.len() != expected {
                return Err(FeatureError::TransformRowCount {
                    expected,
                    actual: table.len(),
                });
            }
            debug!("Transform stage {} produced {} columns", i, table.width());
        }
        Ok(table)
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stages.len())
            .finish()
    }
}

/// A model that maps a feature matrix to an output matrix
///
/// Implemented by adapters around prediction or fitted-transform calls of
/// an external numeric library.
pub trait Model {
    fn run(&self, input: &Array2<f64>) -> Result<Array2<f64>, FeatureError>;
}

/// Runs a [`Model`] on the assembled table
#[derive(Debug, Clone)]
pub struct ModelTransform<M> {
    model: M,
    columns: Option<Vec<String>>,
}

impl<M: Model> ModelTransform<M> {
    /// Output columns are numbered
    pub fn new(model: M) -> Self {
        Self {
            model,
            columns: None,
        }
    }

    /// Name the model's output columns
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = Some(columns);
        self
    }

    pub fn model(&self) -> &M {
        &self.model
    }
}

impl<M: Model> Transform for ModelTransform<M> {
    fn transform(&self, table: Table) -> Result<Table, FeatureError> {
        let input = table.to_array2()?;
        let output = self.model.run(&input)?;
        Ok(Table::from_array2(&output, self.columns.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::Group;
    use crate::numerical::Numerical;
    use ndarray::Axis;

    fn pair() -> Group {
        Group::new()
            .with_feature("a", Numerical::new())
            .with_feature("b", Numerical::new())
    }

    fn push_rows(mut group: Group, rows: usize) -> Group {
        for i in 0..rows {
            group.at("a").value(i as f64).unwrap();
            group.at("b").value(1.0).unwrap();
            group.push().unwrap();
        }
        group
    }

    #[test]
    fn test_reshaping_transform() {
        let widen = |table: Table| -> Result<Table, FeatureError> {
            let mut out = Table::with_columns(["a", "b", "c", "d"])?;
            for _ in table.rows() {
                out.append_row(vec![1.0, 2.0, 3.0, 4.0])?;
            }
            Ok(out)
        };
        let group = push_rows(pair().with_transform(widen), 10);
        let table = group.array().unwrap();
        assert_eq!(table.shape(), (10, 4));
        assert_eq!(table.columns(), &["a", "b", "c", "d"]);
    }

    #[test]
    fn test_stages_run_in_order() {
        let double = |table: Table| -> Result<Table, FeatureError> {
            let rows: Vec<Vec<f64>> = table.rows().map(|r| r.iter().map(|v| v * 2.0).collect()).collect();
            Ok(Table::from_rows(rows)?)
        };
        let plus_one = |table: Table| -> Result<Table, FeatureError> {
            let rows: Vec<Vec<f64>> = table.rows().map(|r| r.iter().map(|v| v + 1.0).collect()).collect();
            Ok(Table::from_rows(rows)?)
        };
        let mut group = Group::new()
            .with_feature("a", Numerical::new())
            .with_transform(double)
            .with_transform(plus_one);
        group.at("a").value(3.0).unwrap();
        group.push().unwrap();
        assert_eq!(group.array().unwrap().row(0), Some(&[7.0][..]));
        assert_eq!(group.transforms().len(), 2);
    }

    #[test]
    fn test_row_count_must_be_kept() {
        let drop_rows = |_: Table| -> Result<Table, FeatureError> { Ok(Table::new()) };
        let group = push_rows(pair().with_transform(drop_rows), 3);
        assert!(matches!(
            group.array(),
            Err(FeatureError::TransformRowCount { expected: 3, actual: 0 })
        ));
    }

    #[test]
    fn test_failing_transform() {
        let fail = |_: Table| -> Result<Table, FeatureError> {
            Err(FeatureError::Transform("model not fitted".into()))
        };
        let group = push_rows(pair().with_transform(fail), 2);
        assert!(matches!(group.array(), Err(FeatureError::Transform(_))));
    }

    /// Sums each row into a single output
    struct RowSum;

    impl Model for RowSum {
        fn run(&self, input: &Array2<f64>) -> Result<Array2<f64>, FeatureError> {
            Ok(input.sum_axis(Axis(1)).insert_axis(Axis(1)))
        }
    }

    #[test]
    fn test_model_transform() {
        let model = ModelTransform::new(RowSum).with_columns(vec!["score".into()]);
        let group = push_rows(pair().with_transform(model), 4);
        let table = group.array().unwrap();
        assert_eq!(table.columns(), &["score"]);
        assert_eq!(table.column("score"), Some(vec![1.0, 2.0, 3.0, 4.0]));
    }

    #[test]
    fn test_model_transform_numbered_columns() {
        let group = push_rows(pair().with_transform(ModelTransform::new(RowSum)), 2);
        assert_eq!(group.array().unwrap().columns(), &["0"]);
    }
}
