//! Outbound HTTP client for the remote provider.
//!
//! One shared connection pool for the life of the process, safe for
//! concurrent use by in-flight tool invocations. Every call is a single
//! attempt with the fixed startup timeout; failures map onto the
//! [`ToolError`] taxonomy and are never retried here.

use std::sync::atomic::{AtomicBool, Ordering};

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::{json, Value};
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::ToolError;

const USER_AGENT: &str = concat!("linearb-mcp/", env!("CARGO_PKG_VERSION"));

pub struct LinearbClient {
    http: reqwest::Client,
    base_url: String,
    closed: AtomicBool,
}

impl LinearbClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_str(&config.api_key)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            closed: AtomicBool::new(false),
        })
    }

    pub async fn get(&self, endpoint: &str, query: &[(String, String)]) -> Result<Value, ToolError> {
        let request = self.http.get(self.url(endpoint)).query(query);
        self.execute("GET", endpoint, request).await
    }

    pub async fn post(
        &self,
        endpoint: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value, ToolError> {
        let mut request = self.http.post(self.url(endpoint)).query(query);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute("POST", endpoint, request).await
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn execute(
        &self,
        method: &str,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<Value, ToolError> {
        debug!(method, endpoint, "forwarding request");
        let response = request.send().await.map_err(|e| {
            error!(method, endpoint, error = %e, "request failed");
            ToolError::Network(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(method, endpoint, status = status.as_u16(), "API error response");
            return Err(ToolError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ToolError::Network(e.to_string()))?;
        if status.as_u16() == 204 || body.is_empty() {
            return Ok(json!({
                "status": "success",
                "message": "Operation completed successfully",
            }));
        }
        serde_json::from_slice(&body)
            .map_err(|e| ToolError::Network(format!("invalid response body: {e}")))
    }

    /// Release the connection pool. Idempotent; called on every shutdown
    /// path including termination signals.
    pub fn shutdown(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            info!("HTTP connection pool released");
        }
    }
}

impl Drop for LinearbClient {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_config() -> Config {
        Config {
            api_key: "test-key".to_string(),
            base_url: "https://public-api.linearb.io/".to_string(),
            timeout: Duration::from_secs(5),
            log_level: "info".to_string(),
            spec_path: "openAPI.json".into(),
            docs_dir: "docs".into(),
        }
    }

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let client = LinearbClient::new(&test_config()).unwrap();
        assert_eq!(
            client.url("/api/v1/health"),
            "https://public-api.linearb.io/api/v1/health"
        );
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let client = LinearbClient::new(&test_config()).unwrap();
        client.shutdown();
        client.shutdown();
        assert!(client.closed.load(Ordering::SeqCst));
    }
}
