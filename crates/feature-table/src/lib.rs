//! Feature Table
//!
//! Provides the rectangular, named-column numeric table produced by feature
//! assembly, with collision-checked horizontal concatenation.

mod error;
mod table;

pub use error::TableError;
pub use table::{numbered_columns, Table};
