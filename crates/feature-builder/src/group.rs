//! Feature Groups
//!
//! A [`Group`] is the composite node of a feature tree. It routes `set`
//! calls to its children by name, advances every leaf in lock-step on
//! `push` and assembles all children into one table on `array`, with each
//! child's columns prefixed by the child's name. Children are kept sorted
//! by name so the column order is reproducible.

use crate::error::FeatureError;
use crate::feature::{Feature, Leaf};
use crate::field::Value;
use crate::transform::{Pipeline, Transform};
use feature_table::Table;
use std::collections::BTreeMap;
use tracing::debug;

/// A child of a group
#[derive(Debug)]
pub enum Node {
    Leaf(Leaf),
    Group(Group),
}

impl Node {
    /// Route `args` along the remaining `path`
    pub fn set(&mut self, path: &[&str], args: &[Value]) -> Result<(), FeatureError> {
        match self {
            Node::Leaf(leaf) => match path.first() {
                Some(name) => Err(FeatureError::UnknownFeature((*name).to_string())),
                None => leaf.set(args),
            },
            Node::Group(group) => group.set(path, args),
        }
    }

    /// Number of finalized rows
    pub fn len(&self) -> usize {
        match self {
            Node::Leaf(leaf) => leaf.len(),
            Node::Group(group) => group.rows(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Assemble this node's table; `name` is its dotted path
    pub fn array(&self, name: &str) -> Result<Table, FeatureError> {
        match self {
            Node::Leaf(leaf) => leaf.table(name),
            Node::Group(group) => group.array(),
        }
    }

    fn validate(&self, name: &str) -> Result<(), FeatureError> {
        match self {
            Node::Leaf(leaf) => leaf.validate(name),
            Node::Group(group) => group.validate(name),
        }
    }

    fn commit(&mut self) {
        match self {
            Node::Leaf(leaf) => leaf.commit(),
            Node::Group(group) => group.commit(),
        }
    }

    fn discard(&mut self) {
        match self {
            Node::Leaf(leaf) => leaf.discard(),
            Node::Group(group) => group.discard(),
        }
    }

    fn backfill(&mut self, rows: usize) {
        match self {
            Node::Leaf(leaf) => leaf.backfill(rows),
            Node::Group(group) => group.backfill(rows),
        }
    }
}

impl From<Leaf> for Node {
    fn from(leaf: Leaf) -> Self {
        Node::Leaf(leaf)
    }
}

impl From<Group> for Node {
    fn from(group: Group) -> Self {
        Node::Group(group)
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

/// Named children assembled into one table
#[derive(Debug, Default)]
pub struct Group {
    children: BTreeMap<String, Node>,
    transforms: Pipeline,
    rows: usize,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a leaf feature
    pub fn with_feature(mut self, name: impl Into<String>, feature: impl Feature + 'static) -> Self {
        self.attach(name.into(), Leaf::new(feature).into());
        self
    }

    /// Add a nested group
    pub fn with_group(mut self, name: impl Into<String>, group: Group) -> Result<Self, FeatureError> {
        self.insert(name, group)?;
        Ok(self)
    }

    /// Append a transform stage run on every assembled table
    pub fn with_transform(mut self, transform: impl Transform + 'static) -> Self {
        self.transforms.push(transform);
        self
    }

    /// Insert or replace a child
    ///
    /// A child added after rows were pushed is padded with empty rows. A
    /// child holding more rows than the group is rejected.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        node: impl Into<Node>,
    ) -> Result<Option<Node>, FeatureError> {
        let name = name.into();
        let node = node.into();
        if node.len() > self.rows {
            return Err(FeatureError::ChildRowCount {
                name,
                expected: self.rows,
                actual: node.len(),
            });
        }
        Ok(self.attach(name, node))
    }

    fn attach(&mut self, name: String, mut node: Node) -> Option<Node> {
        node.backfill(self.rows);
        self.children.insert(name, node)
    }

    /// Child names in column order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of pushed rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn transforms(&self) -> &Pipeline {
        &self.transforms
    }

    /// Record values for the current row
    ///
    /// `path` names the child, then its children, down to a leaf; `args`
    /// go to the leaf's setter. A group with exactly one child may be
    /// addressed without naming it.
    pub fn set(&mut self, path: &[&str], args: &[Value]) -> Result<(), FeatureError> {
        let single = self.children.len() == 1;
        match path.split_first() {
            Some((name, rest)) if self.children.contains_key(*name) => {
                debug!("Routing set to '{}'", name);
                match self.children.get_mut(*name) {
                    Some(child) => child.set(rest, args),
                    None => Err(FeatureError::UnknownFeature((*name).to_string())),
                }
            }
            _ if single => match self.children.values_mut().next() {
                Some(child) => child.set(path, args),
                None => Err(FeatureError::MissingName),
            },
            Some((name, _)) => Err(FeatureError::UnknownFeature((*name).to_string())),
            None => Err(FeatureError::MissingName),
        }
    }

    /// [`Group::set`] with a dotted path such as `"a.b.c"`
    pub fn set_path(&mut self, path: &str, args: &[Value]) -> Result<(), FeatureError> {
        let segments: Vec<&str> = path.split('.').filter(|s| !s.is_empty()).collect();
        self.set(&segments, args)
    }

    /// Fluent setter for a dotted path
    pub fn at<'g, 'p>(&'g mut self, path: &'p str) -> Setter<'g, 'p> {
        Setter { group: self, path }
    }

    /// Finalize the current row of every leaf in the tree
    ///
    /// Every slot is validated before any leaf advances, so a failed push
    /// leaves all row counts unchanged and the pending values in place.
    pub fn push(&mut self) -> Result<(), FeatureError> {
        self.validate("")?;
        self.commit();
        debug!("Pushed row {}", self.rows);
        Ok(())
    }

    /// Drop every value written since the last push
    pub fn discard(&mut self) {
        for child in self.children.values_mut() {
            child.discard();
        }
    }

    /// Assemble all pushed rows into a fresh table
    ///
    /// Does not consume the row history; repeated calls return equal tables.
    pub fn array(&self) -> Result<Table, FeatureError> {
        let mut result = Table::with_rows(self.rows);
        for (name, child) in &self.children {
            let part = child.array(name)?;
            result.concat(&part, Some(name))?;
        }
        debug!(
            "Assembled {}x{} table from {} children",
            result.len(),
            result.width(),
            self.children.len()
        );
        self.transforms.apply(result)
    }

    fn validate(&self, prefix: &str) -> Result<(), FeatureError> {
        for (name, child) in &self.children {
            child.validate(&join(prefix, name))?;
        }
        Ok(())
    }

    fn commit(&mut self) {
        for child in self.children.values_mut() {
            child.commit();
        }
        self.rows += 1;
    }

    fn backfill(&mut self, rows: usize) {
        for child in self.children.values_mut() {
            child.backfill(rows);
        }
        self.rows = self.rows.max(rows);
    }
}

/// Writes values to one dotted path of a group
pub struct Setter<'g, 'p> {
    group: &'g mut Group,
    path: &'p str,
}

impl Setter<'_, '_> {
    pub fn value(self, value: f64) -> Result<(), FeatureError> {
        self.args(&[Value::Number(value)])
    }

    pub fn token(self, token: impl Into<Value>) -> Result<(), FeatureError> {
        self.args(&[token.into()])
    }

    pub fn weighted(self, token: impl Into<Value>, weight: f64) -> Result<(), FeatureError> {
        self.args(&[token.into(), Value::Number(weight)])
    }

    pub fn args(self, args: &[Value]) -> Result<(), FeatureError> {
        self.group.set_path(self.path, args)
    }
}
