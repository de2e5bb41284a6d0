//! Record Feeding
//!
//! A record is a JSON object keyed by feature path. Nested objects extend
//! the path, scalars become one `set` call, arrays one call per element and
//! an inner array is the argument list of a single call.

use anyhow::{bail, Context, Result};
use feature_builder::{Group, Value};
use serde_json::Value as Json;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Read a JSON array of records
pub fn read(path: &Path) -> Result<Vec<Json>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading records {}", path.display()))?;
    let records: Vec<Json> = serde_json::from_str(&text)
        .with_context(|| format!("parsing records {}", path.display()))?;
    Ok(records)
}

fn to_arg(value: &Json) -> Option<Value> {
    match value {
        Json::Number(n) => n.as_f64().map(Value::Number),
        Json::String(s) => Some(Value::Text(s.clone())),
        Json::Bool(b) => Some(Value::Number(if *b { 1.0 } else { 0.0 })),
        _ => None,
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

/// Expand one entry into `(path, args)` calls
fn collect_calls(path: &str, value: &Json, calls: &mut Vec<(String, Vec<Value>)>) -> Result<()> {
    match value {
        Json::Null => {}
        Json::Object(map) => {
            for (key, inner) in map {
                collect_calls(&join(path, key), inner, calls)?;
            }
        }
        Json::Array(items) => {
            for item in items {
                match item {
                    Json::Null => {}
                    Json::Array(args) => {
                        let args = args
                            .iter()
                            .map(|a| to_arg(a).with_context(|| format!("'{}': argument {} is not a scalar", path, a)))
                            .collect::<Result<Vec<_>>>()?;
                        calls.push((path.to_string(), args));
                    }
                    Json::Object(_) => bail!("'{}': objects are not allowed inside arrays", path),
                    scalar => {
                        if let Some(arg) = to_arg(scalar) {
                            calls.push((path.to_string(), vec![arg]));
                        }
                    }
                }
            }
        }
        scalar => {
            if let Some(arg) = to_arg(scalar) {
                calls.push((path.to_string(), vec![arg]));
            }
        }
    }
    Ok(())
}

/// Record every entry and push one row per record
pub fn feed(group: &mut Group, records: &[Json]) -> Result<usize> {
    for (i, record) in records.iter().enumerate() {
        if !record.is_object() {
            bail!("record {} is not a JSON object", i);
        }
        let mut calls = Vec::new();
        collect_calls("", record, &mut calls)?;
        debug!("Record {}: {} set calls", i, calls.len());

        for (path, args) in &calls {
            group
                .set_path(path, args)
                .with_context(|| format!("record {}: setting '{}'", i, path))?;
        }
        group.push().with_context(|| format!("record {}: finalizing row", i))?;
    }
    Ok(records.len())
}
