//! Feature Error Types

use crate::field::FieldId;
use feature_table::TableError;
use thiserror::Error;

/// Errors raised while recording or assembling features
#[derive(Debug, Error)]
pub enum FeatureError {
    /// A row wrote a field outside the feature's fixed field set
    #[error("Field '{field}' is not a member of the fields of feature '{feature}'")]
    UnknownField { feature: String, field: FieldId },

    /// No child with this name
    #[error("No feature or group named '{0}'")]
    UnknownFeature(String),

    /// A group with several children was addressed without a name
    #[error("Feature name required: group has more than one child")]
    MissingName,

    /// Setter arguments do not fit the feature
    #[error("Invalid arguments for {kind} feature: {reason}")]
    InvalidArguments { kind: &'static str, reason: String },

    /// Table assembly failed
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    /// A transform stage failed
    #[error("Transform failed: {0}")]
    Transform(String),

    /// An inserted child already holds more rows than its new parent
    #[error("Child '{name}' has {actual} rows but the group has only {expected}")]
    ChildRowCount {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// A transform stage changed the number of rows
    #[error("Transform changed row count: expected {expected}, got {actual}")]
    TransformRowCount { expected: usize, actual: usize },

    /// Group definition could not be loaded or built
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for FeatureError {
    fn from(err: toml::de::Error) -> Self {
        FeatureError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for FeatureError {
    fn from(err: serde_json::Error) -> Self {
        FeatureError::Config(err.to_string())
    }
}

impl FeatureError {
    pub(crate) fn invalid_arguments(kind: &'static str, reason: impl Into<String>) -> Self {
        FeatureError::InvalidArguments {
            kind,
            reason: reason.into(),
        }
    }
}
