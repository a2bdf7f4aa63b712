//! Ignore-rule request building
//!
//! Creation payloads and list filters are validated locally so a malformed
//! request never leaves the process.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};

use crate::error::{Error, Result};

/// Build the creation request body for an ignore rule.
///
/// Requires a non-blank note and at least one filter; `expires_at`, when
/// given, must be an ISO-8601 timestamp and is normalized to UTC.
pub fn build_create_payload(
    note: &str,
    watches: &[String],
    cves: &[String],
    vulns: &[String],
    licenses: &[String],
    expires_at: Option<&str>,
) -> Result<Value> {
    if note.trim().is_empty() {
        return Err(Error::Validation("--note must not be empty".to_string()));
    }

    let mut filters = Map::new();
    if !watches.is_empty() {
        filters.insert("watches".to_string(), json!(watches));
    }
    if !cves.is_empty() {
        filters.insert("cves".to_string(), json!(cves));
    }
    if !vulns.is_empty() {
        filters.insert("vulnerabilities".to_string(), json!(vulns));
    }
    if !licenses.is_empty() {
        filters.insert("licenses".to_string(), json!(licenses));
    }
    if filters.is_empty() {
        return Err(Error::Validation(
            "provide at least one filter: --watch/--cve/--vuln/--license".to_string(),
        ));
    }

    let mut payload = json!({
        "notes": note,
        "ignore_filters": Value::Object(filters),
    });

    if let Some(raw) = expires_at {
        let parsed = DateTime::parse_from_rfc3339(raw).map_err(|e| {
            Error::Validation(format!(
                "--expires-at must be an ISO-8601 timestamp (e.g. 2026-01-01T00:00:00Z): {e}"
            ))
        })?;
        payload["expires_at"] = json!(parsed
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Secs, true));
    }

    Ok(payload)
}

/// Filters and paging for `GET /ignore_rules`.
///
/// Only supplied values become query parameters; `page_num` and `num_of_rows`
/// are always present. Parameter names follow the REST API documentation.
#[derive(Debug, Clone)]
pub struct ListRulesParams {
    pub watch: Option<String>,
    pub policy: Option<String>,
    pub vulnerability: Option<String>,
    pub cve: Option<String>,
    pub license: Option<String>,
    pub component_name: Option<String>,
    pub component_version: Option<String>,
    pub page: u32,
    pub rows: u32,
    pub order_by: Option<String>,
    pub direction: Option<String>,
    pub expires_before: Option<String>,
    pub expires_after: Option<String>,
}

impl Default for ListRulesParams {
    fn default() -> Self {
        Self {
            watch: None,
            policy: None,
            vulnerability: None,
            cve: None,
            license: None,
            component_name: None,
            component_version: None,
            page: 1,
            rows: 50,
            order_by: None,
            direction: None,
            expires_before: None,
            expires_after: None,
        }
    }
}

impl ListRulesParams {
    pub fn validate(&self) -> Result<()> {
        if self.page < 1 {
            return Err(Error::Validation("--page must be >= 1".to_string()));
        }
        if self.rows < 1 {
            return Err(Error::Validation("--rows must be >= 1".to_string()));
        }
        Ok(())
    }

    /// Single source for both the query string and the echoed summary.
    fn entries(&self, page: u32) -> Vec<(&'static str, Value)> {
        let mut entries = vec![
            ("page_num", json!(page)),
            ("num_of_rows", json!(self.rows)),
        ];

        let optional = [
            ("order_by", &self.order_by),
            ("direction", &self.direction),
            ("watch", &self.watch),
            ("policy", &self.policy),
            ("vulnerability", &self.vulnerability),
            ("cve", &self.cve),
            ("license", &self.license),
            ("component_name", &self.component_name),
            ("component_version", &self.component_version),
            ("expires_before", &self.expires_before),
            ("expires_after", &self.expires_after),
        ];
        for (key, value) in optional {
            if let Some(v) = value {
                entries.push((key, json!(v)));
            }
        }

        entries
    }

    /// Query parameters for the configured page.
    pub fn to_query(&self) -> Vec<(String, String)> {
        self.query_for_page(self.page)
    }

    /// Query parameters with the page number swapped in (auto-pagination).
    pub fn query_for_page(&self, page: u32) -> Vec<(String, String)> {
        self.entries(page)
            .into_iter()
            .map(|(key, value)| {
                let rendered = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (key.to_string(), rendered)
            })
            .collect()
    }

    /// The parameter mapping echoed back in command output.
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.entries(self.page)
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_payload_requires_note() {
        let watches = vec!["w1".to_string()];
        let err = build_create_payload("   ", &watches, &[], &[], &[], None).unwrap_err();
        assert!(err.to_string().contains("--note"));
    }

    #[test]
    fn test_create_payload_requires_a_filter() {
        let err = build_create_payload("dev approved", &[], &[], &[], &[], None).unwrap_err();
        assert!(err.to_string().contains("at least one filter"));
    }

    #[test]
    fn test_create_payload_shape() {
        let payload = build_create_payload(
            "accepted risk until Q2",
            &["build-watch".to_string()],
            &["CVE-2024-1234".to_string()],
            &[],
            &[],
            None,
        )
        .unwrap();

        assert_eq!(payload["notes"], json!("accepted risk until Q2"));
        assert_eq!(payload["ignore_filters"]["watches"], json!(["build-watch"]));
        assert_eq!(payload["ignore_filters"]["cves"], json!(["CVE-2024-1234"]));
        assert!(payload["ignore_filters"].get("licenses").is_none());
        assert!(payload.get("expires_at").is_none());
    }

    #[test]
    fn test_create_payload_normalizes_expiry_to_utc() {
        let payload = build_create_payload(
            "temp waiver",
            &["w".to_string()],
            &[],
            &[],
            &[],
            Some("2026-01-01T02:00:00+02:00"),
        )
        .unwrap();
        assert_eq!(payload["expires_at"], json!("2026-01-01T00:00:00Z"));
    }

    #[test]
    fn test_create_payload_rejects_bad_expiry() {
        let err = build_create_payload(
            "note",
            &["w".to_string()],
            &[],
            &[],
            &[],
            Some("next tuesday"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("--expires-at"));
    }

    #[test]
    fn test_list_params_defaults_only_paging_keys() {
        let params = ListRulesParams {
            watch: Some("w1".to_string()),
            ..ListRulesParams::default()
        };
        let query = params.to_query();
        assert_eq!(
            query,
            vec![
                ("page_num".to_string(), "1".to_string()),
                ("num_of_rows".to_string(), "50".to_string()),
                ("watch".to_string(), "w1".to_string()),
            ]
        );
    }

    #[test]
    fn test_list_params_omit_unset_filters() {
        let params = ListRulesParams::default();
        let query = params.to_query();
        assert_eq!(query.len(), 2);
        assert!(query.iter().all(|(_, v)| !v.is_empty()));
    }

    #[test]
    fn test_list_params_validation() {
        let params = ListRulesParams {
            rows: 0,
            ..ListRulesParams::default()
        };
        assert!(params.validate().unwrap_err().to_string().contains("--rows"));

        let params = ListRulesParams {
            page: 0,
            ..ListRulesParams::default()
        };
        assert!(params.validate().unwrap_err().to_string().contains("--page"));
    }

    #[test]
    fn test_query_for_page_swaps_page_number() {
        let params = ListRulesParams::default();
        let query = params.query_for_page(7);
        assert!(query.contains(&("page_num".to_string(), "7".to_string())));
    }

    #[test]
    fn test_to_value_matches_query_keys() {
        let params = ListRulesParams {
            cve: Some("CVE-2023-9".to_string()),
            direction: Some("desc".to_string()),
            ..ListRulesParams::default()
        };
        let value = params.to_value();
        assert_eq!(value["page_num"], json!(1));
        assert_eq!(value["num_of_rows"], json!(50));
        assert_eq!(value["cve"], json!("CVE-2023-9"));
        assert_eq!(value["direction"], json!("desc"));
        assert!(value.get("watch").is_none());
    }
}
