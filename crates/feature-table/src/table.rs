//! Named-Column Numeric Table

use crate::error::TableError;
use ndarray::Array2;
use serde::Serialize;
use std::collections::HashSet;
use tracing::trace;

/// Default column names `"0".."width-1"`
pub fn numbered_columns(width: usize) -> Vec<String> {
    (0..width).map(|i| i.to_string()).collect()
}

/// Row-major numeric table with ordered, unique column names
///
/// Every row holds exactly `width()` values. Tables returned by feature
/// assembly are independent snapshots, so mutating one never reaches back
/// into the rows it was built from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    /// Column names in insertion order
    columns: Vec<String>,
    /// Row values, one inner vector per row
    data: Vec<Vec<f64>>,
}

impl Table {
    /// Create an empty table without rows or columns
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table with `length` empty rows and no columns
    ///
    /// This is the base that column blocks get concatenated onto.
    pub fn with_rows(length: usize) -> Self {
        Self {
            columns: Vec::new(),
            data: vec![Vec::new(); length],
        }
    }

    /// Create an empty table with fixed column names
    pub fn with_columns<I, S>(columns: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(TableError::ColumnNameCollision(column.clone()));
            }
        }
        Ok(Self {
            columns,
            data: Vec::new(),
        })
    }

    /// Create a table from rows, naming the columns `"0".."width-1"`
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, TableError> {
        let mut table = Self::new();
        for row in rows {
            table.append_row(row)?;
        }
        Ok(table)
    }

    /// Append one row
    ///
    /// The first row appended to a table without columns establishes the
    /// width and the default numbered column names.
    pub fn append_row(&mut self, values: Vec<f64>) -> Result<(), TableError> {
        if self.columns.is_empty() && self.data.is_empty() {
            self.columns = numbered_columns(values.len());
        }
        if values.len() != self.columns.len() {
            return Err(TableError::RowWidthMismatch {
                expected: self.columns.len(),
                actual: values.len(),
            });
        }
        self.data.push(values);
        Ok(())
    }

    /// Append all columns of `other` to `self`
    ///
    /// With a non-empty `prefix` every incoming column is renamed to
    /// `"{prefix}_{name}"`. Fails without modifying `self` when the row
    /// counts differ or any resulting name already exists.
    pub fn concat(&mut self, other: &Table, prefix: Option<&str>) -> Result<(), TableError> {
        if self.columns.is_empty() && self.data.is_empty() {
            self.data = vec![Vec::new(); other.len()];
        }
        if self.len() != other.len() {
            return Err(TableError::RowLengthMismatch {
                expected: self.len(),
                actual: other.len(),
            });
        }

        let incoming: Vec<String> = match prefix {
            Some(prefix) if !prefix.is_empty() => other
                .columns
                .iter()
                .map(|name| format!("{}_{}", prefix, name))
                .collect(),
            _ => other.columns.clone(),
        };

        let existing: HashSet<&str> = self.columns.iter().map(String::as_str).collect();
        if let Some(clash) = incoming.iter().find(|name| existing.contains(name.as_str())) {
            return Err(TableError::ColumnNameCollision(clash.clone()));
        }

        trace!(
            "Concatenating {} columns onto {}x{} table",
            incoming.len(),
            self.len(),
            self.width()
        );

        self.columns.extend(incoming);
        for (row, extra) in self.data.iter_mut().zip(&other.data) {
            row.extend_from_slice(extra);
        }
        Ok(())
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.len(), self.width())
    }

    /// Column names in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of a named column
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Copy of one column's values
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.column_index(name)?;
        Some(self.data.iter().map(|row| row[idx]).collect())
    }

    /// Single row by position
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.data.get(index).map(Vec::as_slice)
    }

    /// Value at a row and named column
    pub fn get(&self, row: usize, column: &str) -> Option<f64> {
        let idx = self.column_index(column)?;
        self.data.get(row).map(|r| r[idx])
    }

    /// Iterate over rows
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.iter().map(Vec::as_slice)
    }

    /// Split into column names and row data
    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<f64>>) {
        (self.columns, self.data)
    }

    /// Copy into a dense `(rows, columns)` ndarray
    pub fn to_array2(&self) -> Result<Array2<f64>, TableError> {
        let flat: Vec<f64> = self.data.iter().flatten().copied().collect();
        Array2::from_shape_vec(self.shape(), flat).map_err(|e| TableError::Shape(e.to_string()))
    }

    /// Build a table from a dense ndarray
    ///
    /// Without explicit names the columns are numbered.
    pub fn from_array2(
        array: &Array2<f64>,
        columns: Option<Vec<String>>,
    ) -> Result<Self, TableError> {
        let columns = columns.unwrap_or_else(|| numbered_columns(array.ncols()));
        if columns.len() != array.ncols() {
            return Err(TableError::Shape(format!(
                "{} column names for {} columns",
                columns.len(),
                array.ncols()
            )));
        }
        let mut table = Self::with_columns(columns)?;
        table.data = array.rows().into_iter().map(|row| row.to_vec()).collect();
        Ok(table)
    }
}
