//! Artifact inventory assembly and CSV export
//!
//! Joins the repository listing with the per-repository artifact listings
//! into one flat table: every artifact row is tagged with its repository
//! name and, optionally, carries the repository metadata under prefixed
//! columns. Nested objects are flattened to dot-joined columns and the
//! result is written as CSV with a header built from the union of row keys.

use std::io::Write;

use regex::Regex;
use serde_json::{Map, Value};

use super::lookup::lookup_str;
use crate::error::Result;

/// Candidate keys for the repository name; deployments differ here too.
const REPO_NAME_KEYS: &[&str] = &["repo", "name", "key"];

/// A repository selected for the inventory walk.
#[derive(Debug, Clone)]
pub struct RepoEntry {
    pub name: String,
    pub meta: Value,
}

/// Resolve the repository name from whichever field the server used.
pub fn repo_name(repo: &Value) -> Option<&str> {
    lookup_str(repo, REPO_NAME_KEYS)
}

/// Select the repositories to walk. Entries without a recognizable name are
/// skipped; an optional pattern narrows by name (substring search, not a
/// full-string match).
pub fn select_repos(repos: &[Value], pattern: Option<&Regex>) -> Vec<RepoEntry> {
    repos
        .iter()
        .filter_map(|repo| {
            let name = repo_name(repo)?;
            if pattern.is_some_and(|p| !p.is_match(name)) {
                return None;
            }
            Some(RepoEntry {
                name: name.to_string(),
                meta: repo.clone(),
            })
        })
        .collect()
}

/// Tag each artifact row with its repository and, when requested, copy the
/// repository metadata in under `repo_`-prefixed keys so nothing collides
/// with the artifact's own fields. Name fields are not duplicated.
pub fn inventory_rows(
    artifacts: Vec<Value>,
    entry: &RepoEntry,
    include_repo_metadata: bool,
) -> Vec<Value> {
    artifacts
        .into_iter()
        .map(|artifact| {
            let mut row = match artifact {
                Value::Object(map) => map,
                other => {
                    let mut map = Map::new();
                    map.insert("value".to_string(), other);
                    map
                }
            };
            row.insert("repo".to_string(), Value::String(entry.name.clone()));
            if include_repo_metadata {
                if let Value::Object(meta) = &entry.meta {
                    for (key, value) in meta {
                        if REPO_NAME_KEYS.contains(&key.as_str()) {
                            continue;
                        }
                        row.insert(format!("repo_{key}"), value.clone());
                    }
                }
            }
            Value::Object(row)
        })
        .collect()
}

/// Flatten nested objects into dot-joined columns. Arrays and scalars stay
/// as cell values.
pub fn flatten(row: &Value) -> Map<String, Value> {
    let mut out = Map::new();
    flatten_into(&mut out, "", row);
    out
}

fn flatten_into(out: &mut Map<String, Value>, prefix: &str, value: &Value) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                let column = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_into(out, &column, nested);
            }
        }
        other => {
            out.insert(prefix.to_string(), other.clone());
        }
    }
}

/// Header columns: the union of row keys in first-seen order.
pub fn column_union(rows: &[Map<String, Value>]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !columns.iter().any(|column| column == key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

/// Write the flattened rows as CSV. Cells missing from a row are empty;
/// non-string values are rendered as compact JSON.
pub fn write_csv<W: Write>(
    writer: W,
    columns: &[String],
    rows: &[Map<String, Value>],
) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(columns)?;
    for row in rows {
        let record: Vec<String> = columns.iter().map(|column| cell(row.get(column))).collect();
        out.write_record(&record)?;
    }
    out.flush()?;
    Ok(())
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
