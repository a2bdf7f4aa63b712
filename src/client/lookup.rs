//! Ordered candidate-path lookup over dynamic JSON
//!
//! Xray deployments differ in how they shape some responses (`data` vs
//! `repos`, `overall.status` vs top-level `status`). Call sites pass an
//! ordered list of dotted candidate paths; the first path that resolves to a
//! non-null value wins. New shapes are added by extending the list.

use serde_json::Value;

/// Try each dotted path in order, returning the first non-null match.
pub fn lookup<'a>(value: &'a Value, paths: &[&str]) -> Option<&'a Value> {
    paths.iter().find_map(|path| {
        let found = path
            .split('.')
            .try_fold(value, |current, segment| current.get(segment))?;
        (!found.is_null()).then_some(found)
    })
}

/// Like [`lookup`], narrowed to string values.
pub fn lookup_str<'a>(value: &'a Value, paths: &[&str]) -> Option<&'a str> {
    lookup(value, paths).and_then(Value::as_str)
}
