//! Feature Builder
//!
//! Declare named numerical features, record their values row by row and
//! assemble every recorded row into a single named-column [`Table`].
//!
//! ```
//! use feature_builder::{Categorical, Group, Numerical};
//!
//! let mut group = Group::new()
//!     .with_feature("age", Numerical::new())
//!     .with_feature("color", Categorical::new(["red", "green"]));
//!
//! group.at("age").value(31.0)?;
//! group.at("color").token("red")?;
//! group.push()?;
//!
//! let table = group.array()?;
//! assert_eq!(table.columns(), &["age_0", "color_green", "color_red"]);
//! assert_eq!(table.row(0), Some(&[31.0, 0.0, 1.0][..]));
//! # Ok::<(), feature_builder::FeatureError>(())
//! ```

mod categorical;
mod error;
mod feature;
mod field;
mod group;
mod hash;
mod hashed;
mod numerical;
mod schema;
mod slot;
mod transform;

pub use categorical::Categorical;
pub use error::FeatureError;
pub use feature::{Feature, Leaf};
pub use field::{FieldId, FieldSet, Value};
pub use group::{Group, Node, Setter};
pub use hash::{fnv1a32, HashFn};
pub use hashed::{CollisionPolicy, Hashed, DEFAULT_BUCKETS};
pub use numerical::Numerical;
pub use schema::{CollisionConfig, FieldsConfig, GroupConfig, NodeConfig, SchemaFormat};
pub use slot::RowSlot;
pub use transform::{Model, ModelTransform, Pipeline, Transform};

pub use feature_table::{Table, TableError};
