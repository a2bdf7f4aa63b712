//! Xray API client implementation

use std::time::Duration;

use log::debug;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client as HttpClient, Method};
use serde_json::{json, Value};

use crate::error::{Error, Result};

/// Path prefix shared by every Xray v1 endpoint.
const API_PREFIX: &str = "/xray/api/v1";

/// Xray API client. Constructed once per command invocation; holds no state
/// beyond its connection settings.
pub struct XrayClient {
    http: HttpClient,
    base_url: String,
    token: String,
    project: Option<String>,
}

impl XrayClient {
    /// Create a client against `base_url` with the given bearer token.
    pub fn new(
        base_url: &str,
        token: &str,
        timeout_secs: u64,
        project: Option<String>,
    ) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            project,
        })
    }

    /// Project key this client is scoped to, if any.
    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    /// Execute one request against the Xray API.
    ///
    /// The response body is parsed as JSON with a raw-text fallback. A status
    /// of 400 or above becomes [`Error::Http`] carrying the server message
    /// (body `error` or `message` field) and the full body. One round trip,
    /// no retries.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        query: &[(String, String)],
    ) -> Result<Value> {
        let url = format!("{}{}{}", self.base_url, API_PREFIX, path);
        debug!("{} {}", method, url);

        let mut request = self
            .http
            .request(method, &url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        let data = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));

        if status >= 400 {
            let message = data
                .get("error")
                .and_then(Value::as_str)
                .or_else(|| data.get("message").and_then(Value::as_str))
                .map(str::to_owned)
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(Error::Http {
                status,
                message,
                body: data,
            });
        }

        Ok(data)
    }

    /// Connectivity/auth check.
    pub async fn ping(&self) -> Result<Value> {
        self.request(Method::GET, "/system/ping", None, &[]).await
    }

    /// One page of repositories known to Xray.
    pub async fn list_repos(
        &self,
        offset: i64,
        num_of_rows: u32,
        search: Option<&str>,
    ) -> Result<Value> {
        let mut query = vec![
            ("offset".to_string(), offset.to_string()),
            ("num_of_rows".to_string(), num_of_rows.to_string()),
        ];
        if let Some(search) = search {
            query.push(("search".to_string(), search.to_string()));
        }
        self.request(Method::GET, "/repos", None, &query).await
    }

    /// One page of artifacts within a repository.
    pub async fn list_artifacts(&self, repo: &str, offset: i64, num_of_rows: u32) -> Result<Value> {
        let query = vec![
            ("repo".to_string(), repo.to_string()),
            ("offset".to_string(), offset.to_string()),
            ("num_of_rows".to_string(), num_of_rows.to_string()),
        ];
        self.request(Method::GET, "/artifacts", None, &query).await
    }

    /// Trigger an on-demand scan for a component.
    pub async fn scan_artifact(&self, component_id: &str) -> Result<Value> {
        let payload = json!({"componentID": component_id});
        self.request(Method::POST, "/scanArtifact", Some(&payload), &[])
            .await
    }

    /// Scan status for an artifact, keyed by repo and path.
    pub async fn artifact_status(&self, repo: &str, path: &str) -> Result<Value> {
        let mut payload = json!({"repo": repo, "path": path});
        if let Some(project) = self.project() {
            payload["project"] = json!(project);
        }
        self.request(Method::POST, "/artifact/status", Some(&payload), &[])
            .await
    }

    pub async fn create_ignore_rule(&self, payload: &Value) -> Result<Value> {
        self.request(
            Method::POST,
            "/ignore_rules",
            Some(payload),
            &self.project_query(),
        )
        .await
    }

    pub async fn list_ignore_rules(&self, query: &[(String, String)]) -> Result<Value> {
        let mut query = query.to_vec();
        query.extend(self.project_query());
        self.request(Method::GET, "/ignore_rules", None, &query)
            .await
    }

    pub async fn get_ignore_rule(&self, rule_id: &str) -> Result<Value> {
        self.request(
            Method::GET,
            &format!("/ignore_rules/{rule_id}"),
            None,
            &self.project_query(),
        )
        .await
    }

    /// Ignore-rule endpoints scope by project through a query parameter.
    fn project_query(&self) -> Vec<(String, String)> {
        self.project()
            .map(|project| vec![("projectKey".to_string(), project.to_string())])
            .unwrap_or_default()
    }
}
