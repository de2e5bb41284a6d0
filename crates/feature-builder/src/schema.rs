//! Declarative Group Definitions
//!
//! Groups can be described in TOML or JSON. Feature names are kept exactly as
//! written, since they address the child and prefix its columns:
//!
//! ```toml
//! [features.age]
//! kind = "numerical"
//!
//! [features.words]
//! kind = "hashed"
//! buckets = 16
//! collision = "sum"
//! ```

use crate::categorical::Categorical;
use crate::error::FeatureError;
use crate::feature::Leaf;
use crate::field::FieldId;
use crate::group::{Group, Node};
use crate::hashed::{CollisionPolicy, Hashed, DEFAULT_BUCKETS};
use crate::numerical::Numerical;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;

fn default_buckets() -> usize {
    DEFAULT_BUCKETS
}

/// Source format of an inline definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    Toml,
    Json,
}

impl SchemaFormat {
    /// Format implied by a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(SchemaFormat::Toml),
            "json" => Some(SchemaFormat::Json),
            _ => None,
        }
    }
}

/// Field declaration of a numerical feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldsConfig {
    Count(usize),
    Named(Vec<FieldId>),
}

/// Built-in collision policies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionConfig {
    Sum,
    Max,
}

impl From<CollisionConfig> for CollisionPolicy {
    fn from(config: CollisionConfig) -> Self {
        match config {
            CollisionConfig::Sum => CollisionPolicy::Sum,
            CollisionConfig::Max => CollisionPolicy::Max,
        }
    }
}

/// One child of a group definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeConfig {
    Numerical {
        #[serde(default)]
        fields: Option<FieldsConfig>,
    },
    Categorical {
        values: Vec<FieldId>,
    },
    Hashed {
        #[serde(default = "default_buckets")]
        buckets: usize,
        #[serde(default)]
        collision: Option<CollisionConfig>,
        #[serde(default)]
        random_sign: bool,
    },
    Group {
        #[serde(default)]
        features: BTreeMap<String, NodeConfig>,
    },
}

impl NodeConfig {
    pub fn build(&self) -> Result<Node, FeatureError> {
        let node = match self {
            NodeConfig::Numerical { fields } => {
                let feature = match fields {
                    None => Numerical::new(),
                    Some(FieldsConfig::Count(count)) => Numerical::with_fields(*count),
                    Some(FieldsConfig::Named(names)) => Numerical::named(names.iter().cloned()),
                };
                Node::Leaf(Leaf::new(feature))
            }
            NodeConfig::Categorical { values } => {
                Node::Leaf(Leaf::new(Categorical::new(values.iter().cloned())))
            }
            NodeConfig::Hashed {
                buckets,
                collision,
                random_sign,
            } => {
                let mut feature = Hashed::try_new(*buckets)?.with_random_sign(*random_sign);
                if let Some(collision) = collision {
                    feature = feature.with_collision((*collision).into());
                }
                Node::Leaf(Leaf::new(feature))
            }
            NodeConfig::Group { features } => Node::Group(build_group(features)?),
        };
        Ok(node)
    }
}

fn build_group(features: &BTreeMap<String, NodeConfig>) -> Result<Group, FeatureError> {
    let mut group = Group::new();
    for (name, node) in features {
        group.insert(name.clone(), node.build()?)?;
    }
    Ok(group)
}

/// Top-level group definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupConfig {
    #[serde(default)]
    pub features: BTreeMap<String, NodeConfig>,
}

impl GroupConfig {
    /// Load from a file, picking the format from its extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FeatureError> {
        let path = path.as_ref();
        let format = SchemaFormat::from_path(path).ok_or_else(|| {
            FeatureError::Config(format!("unsupported definition file '{}'", path.display()))
        })?;
        let source = fs::read_to_string(path)
            .map_err(|e| FeatureError::Config(format!("reading '{}': {}", path.display(), e)))?;
        Self::parse(&source, format)
    }

    /// Parse an inline definition
    pub fn parse(source: &str, format: SchemaFormat) -> Result<Self, FeatureError> {
        let config: Self = match format {
            SchemaFormat::Toml => toml::from_str(source)?,
            SchemaFormat::Json => serde_json::from_str(source)?,
        };
        Ok(config)
    }

    pub fn build(&self) -> Result<Group, FeatureError> {
        let group = build_group(&self.features)?;
        info!("Built feature group with {} top-level children", group.len());
        Ok(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Value;
    use std::io::Write;

    const DEFINITION: &str = r#"
[features.age]
kind = "numerical"

[features.pos]
kind = "numerical"
fields = ["x", "y"]

[features.color]
kind = "categorical"
values = ["red", "green", "blue"]

[features.words]
kind = "hashed"
buckets = 8
collision = "sum"

[features.meta]
kind = "group"

[features.meta.features.score]
kind = "numerical"
fields = 2
"#;

    #[test]
    fn test_parse_toml() {
        let config = GroupConfig::parse(DEFINITION, SchemaFormat::Toml).unwrap();
        assert_eq!(config.features.len(), 5);
        assert_eq!(
            config.features["words"],
            NodeConfig::Hashed {
                buckets: 8,
                collision: Some(CollisionConfig::Sum),
                random_sign: false,
            }
        );
        assert_eq!(
            config.features["pos"],
            NodeConfig::Numerical {
                fields: Some(FieldsConfig::Named(vec!["x".into(), "y".into()])),
            }
        );
    }

    #[test]
    fn test_build_and_fill() {
        let mut group = GroupConfig::parse(DEFINITION, SchemaFormat::Toml)
            .unwrap()
            .build()
            .unwrap();

        group.at("age").value(40.0).unwrap();
        group.set_path("pos", &["y".into(), Value::Number(2.0)]).unwrap();
        group.at("color").token("green").unwrap();
        group.at("words").token("hello").unwrap();
        group.at("words").token("hello").unwrap();
        group.set_path("meta.score", &[Value::from(1usize), Value::Number(0.5)]).unwrap();
        group.push().unwrap();

        let table = group.array().unwrap();
        // age 1 + color 3 + meta 2 + pos 2 + words 8
        assert_eq!(table.shape(), (1, 16));
        assert_eq!(table.get(0, "age_0"), Some(40.0));
        assert_eq!(table.get(0, "pos_y"), Some(2.0));
        assert_eq!(table.get(0, "color_green"), Some(1.0));
        assert_eq!(table.get(0, "meta_score_1"), Some(0.5));
        let words: f64 = (0..8)
            .filter_map(|i| table.get(0, &format!("words_{}", i)))
            .sum();
        assert_eq!(words, 2.0);
    }

    #[test]
    fn test_parse_json() {
        let source = r#"{"features": {"h": {"kind": "hashed"}}}"#;
        let config = GroupConfig::parse(source, SchemaFormat::Json).unwrap();
        assert_eq!(
            config.features["h"],
            NodeConfig::Hashed {
                buckets: DEFAULT_BUCKETS,
                collision: None,
                random_sign: false,
            }
        );
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(DEFINITION.as_bytes()).unwrap();
        let config = GroupConfig::load(file.path()).unwrap();
        assert!(config.features.contains_key("meta"));
    }

    #[test]
    fn test_zero_buckets_rejected() {
        let source = "[features.h]\nkind = \"hashed\"\nbuckets = 0\n";
        let config = GroupConfig::parse(source, SchemaFormat::Toml).unwrap();
        assert!(matches!(
            config.build(),
            Err(FeatureError::InvalidArguments { kind: "hashed", .. })
        ));
    }

    #[test]
    fn test_feature_names_keep_their_case() {
        let source = r#"
[features.Age]
kind = "numerical"

[features.Color]
kind = "categorical"
values = ["Red", "blue"]
"#;
        let config = GroupConfig::parse(source, SchemaFormat::Toml).unwrap();
        assert_eq!(config.features.keys().collect::<Vec<_>>(), ["Age", "Color"]);

        let mut group = config.build().unwrap();
        group.at("Age").value(31.0).unwrap();
        group.at("Color").token("Red").unwrap();
        group.push().unwrap();

        let table = group.array().unwrap();
        assert_eq!(table.columns(), &["Age_0", "Color_Red", "Color_blue"]);
        assert_eq!(table.row(0), Some(&[31.0, 1.0, 0.0][..]));
    }

    #[test]
    fn test_load_json_file_keeps_case() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(br#"{"features": {"Score": {"kind": "numerical", "fields": 2}}}"#)
            .unwrap();
        let config = GroupConfig::load(file.path()).unwrap();
        assert!(config.features.contains_key("Score"));
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        assert!(matches!(GroupConfig::load(file.path()), Err(FeatureError::Config(_))));
    }

    #[test]
    fn test_zero_fields_discovers_dynamically() {
        let source = "[features.n]\nkind = \"numerical\"\nfields = []\n";
        let mut group = GroupConfig::parse(source, SchemaFormat::Toml)
            .unwrap()
            .build()
            .unwrap();
        group.set_path("n", &["x".into(), Value::Number(2.0)]).unwrap();
        group.push().unwrap();
        assert_eq!(group.array().unwrap().columns(), &["n_x"]);
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let source = "[features.h]\nkind = \"embedding\"\n";
        assert!(matches!(
            GroupConfig::parse(source, SchemaFormat::Toml),
            Err(FeatureError::Config(_))
        ));
    }

    #[test]
    fn test_empty_definition() {
        let config = GroupConfig::parse("", SchemaFormat::Toml).unwrap();
        let group = config.build().unwrap();
        assert!(group.is_empty());
        assert_eq!(group.array().unwrap().shape(), (0, 0));
    }
}
