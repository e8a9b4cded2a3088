//! Operation layer shared by every tool handler.
//!
//! Holds the read-only in-memory model (endpoint model, reference tables
//! are module statics) and the outbound HTTP client. Each method performs
//! the per-operation validation and clamping, then either answers from
//! memory or forwards a single request to the provider.

use std::path::PathBuf;

use anyhow::Result;
use serde_json::{json, Map, Value};

use crate::client::LinearbClient;
use crate::config::Config;
use crate::discovery;
use crate::error::ToolError;
use crate::openapi::{self, ApiModel};
use crate::catalog::{metrics, teams};

/// Page-size ceiling on the v2 teams and v1 users endpoints.
const PAGE_SIZE_MAX: i64 = 50;
/// Result-count ceiling on deployments and incident search.
const LIMIT_MAX: i64 = 100;

#[derive(Debug, Default)]
pub struct DeploymentFilter {
    pub repository_id: Option<i64>,
    pub after: Option<String>,
    pub before: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub stage: Option<String>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
    pub commit_sha: Option<String>,
}

#[derive(Debug, Default)]
pub struct TeamSearch {
    pub offset: Option<i64>,
    pub page_size: Option<i64>,
    pub search_term: Option<String>,
    pub nonmerged_members_only: bool,
}

#[derive(Debug, Default)]
pub struct UserSearch {
    pub offset: Option<i64>,
    pub page_size: Option<i64>,
    pub order_by: Option<String>,
    pub order_dir: Option<String>,
    pub search_by_field: Option<String>,
    pub search_term: Option<String>,
    pub user_role: Option<String>,
    pub include_user_children: bool,
}

#[derive(Debug, Default)]
pub struct IncidentSearch {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub status: Option<String>,
    pub severity: Option<String>,
    pub after: Option<String>,
    pub before: Option<String>,
}

#[derive(Debug)]
pub struct MeasurementRequest {
    pub group_by: String,
    pub roll_up: String,
    pub requested_metrics: Vec<Value>,
    pub time_ranges: Vec<Value>,
    pub repository_ids: Option<Vec<i64>>,
    pub team_ids: Option<Vec<i64>>,
}

impl MeasurementRequest {
    fn validate(&self) -> Result<(), ToolError> {
        if self.group_by.trim().is_empty() {
            return Err(ToolError::InvalidArgument("group_by is required".into()));
        }
        if self.roll_up.trim().is_empty() {
            return Err(ToolError::InvalidArgument("roll_up is required".into()));
        }
        if self.requested_metrics.is_empty() {
            return Err(ToolError::InvalidArgument(
                "requested_metrics is required and cannot be empty".into(),
            ));
        }
        if self.time_ranges.is_empty() {
            return Err(ToolError::InvalidArgument(
                "time_ranges is required and cannot be empty".into(),
            ));
        }
        Ok(())
    }

    fn payload(&self) -> Value {
        let mut payload = json!({
            "group_by": self.group_by,
            "roll_up": self.roll_up,
            "requested_metrics": self.requested_metrics,
            "time_ranges": self.time_ranges,
        });
        if let Some(ids) = &self.repository_ids {
            payload["repository_ids"] = json!(ids);
        }
        if let Some(ids) = &self.team_ids {
            payload["team_ids"] = json!(ids);
        }
        payload
    }
}

pub struct LinearbEngine {
    client: LinearbClient,
    model: Option<ApiModel>,
    base_url: String,
    docs_dir: PathBuf,
}

impl LinearbEngine {
    pub fn new(config: &Config, model: Option<ApiModel>) -> Result<Self> {
        Ok(Self {
            client: LinearbClient::new(config)?,
            model,
            base_url: config.base_url.clone(),
            docs_dir: config.docs_dir.clone(),
        })
    }

    pub fn has_specification(&self) -> bool {
        self.model.is_some()
    }

    /// Release the outbound connection pool; idempotent.
    pub fn shutdown(&self) {
        self.client.shutdown();
    }

    // ===== Discovery =====

    pub fn discover_api(&self) -> Result<String> {
        let Some(model) = &self.model else {
            return render(&json!({
                "error": "OpenAPI specification not available",
                "available_tools": openapi::fallback_tools(),
            }));
        };

        let mut endpoints = Map::new();
        for endpoint in model.endpoints() {
            endpoints.insert(endpoint.key(), serde_json::to_value(endpoint)?);
        }
        render(&json!({
            "api_info": model.info.clone(),
            "base_url": model.base_url.clone().unwrap_or_else(|| self.base_url.clone()),
            "endpoints": endpoints,
            "categories": model.categories(),
        }))
    }

    pub fn endpoint_details(&self, path: &str, method: &str) -> Result<String> {
        let Some(model) = &self.model else {
            return render(&json!({"error": "OpenAPI specification not available"}));
        };

        if !model.contains_path(path) {
            return render(&json!({
                "error": format!("Endpoint '{path}' not found"),
                "available_endpoints": model.paths(),
            }));
        }
        let Some(endpoint) = model.endpoint(path, method) else {
            return render(&json!({
                "error": format!("Method '{}' not available for '{path}'", method.to_uppercase()),
                "available_methods": model.methods_for(path).unwrap_or_default(),
            }));
        };

        let mut details = serde_json::to_value(endpoint)?;
        details["endpoint"] = json!(endpoint.key());
        render(&details)
    }

    pub fn api_categories(&self) -> Result<String> {
        render(&discovery::api_categories())
    }

    pub fn usage_examples(&self, category: Option<&str>, tool_name: Option<&str>) -> Result<String> {
        render(&discovery::usage_examples(category, tool_name))
    }

    pub fn documentation_files(&self) -> Result<String> {
        render(&discovery::documentation_files(&self.docs_dir))
    }

    // ===== Metric reference =====

    pub fn supported_metrics(&self) -> Result<String> {
        render(&metrics::list_response())
    }

    pub fn metrics_by_category(&self, category: Option<&str>) -> Result<String> {
        render(&metrics::by_category_response(category))
    }

    pub fn search_metrics(
        &self,
        term: &str,
        category: Option<&str>,
        has_aggregation: Option<bool>,
    ) -> Result<String> {
        render(&metrics::search_response(term, category, has_aggregation)?)
    }

    pub fn metric_examples(&self) -> Result<String> {
        render(&discovery::metric_examples())
    }

    // ===== Team reference =====

    pub fn active_teams(&self) -> Result<String> {
        render(&teams::list_response())
    }

    pub fn teams_by_type(&self, team_type: Option<&str>) -> Result<String> {
        render(&teams::by_type_response(team_type))
    }

    pub fn comparable_teams(&self) -> Result<String> {
        render(&teams::comparable_response())
    }

    pub fn search_teams_by_focus(
        &self,
        term: &str,
        team_type: Option<&str>,
        comparable_only: bool,
    ) -> Result<String> {
        render(&teams::search_response(term, team_type, comparable_only)?)
    }

    // ===== Remote calls =====

    pub async fn list_deployments(&self, filter: DeploymentFilter) -> Result<String> {
        let params = deployment_params(&filter);
        let response = self.client.get("/api/v1/deployments", &params).await?;
        render(&response)
    }

    pub async fn search_teams(&self, search: TeamSearch) -> Result<String> {
        let params = team_search_params(&search)?;
        let response = self.client.get("/api/v2/teams", &params).await?;
        render(&response)
    }

    pub async fn search_users(&self, search: UserSearch) -> Result<String> {
        let params = user_search_params(&search)?;
        let response = self.client.get("/api/v1/users", &params).await?;
        render(&response)
    }

    pub async fn get_services(&self, repository_id: Option<i64>) -> Result<String> {
        let mut params = Vec::new();
        push_opt(&mut params, "repository_id", repository_id);
        let response = self.client.get("/api/v1/services/", &params).await?;
        render(&response)
    }

    pub async fn get_service(&self, service_id: i64) -> Result<String> {
        if service_id <= 0 {
            return Err(
                ToolError::InvalidArgument("service_id must be a positive integer".into()).into(),
            );
        }
        let endpoint = format!("/api/v1/services/{service_id}");
        let response = self.client.get(&endpoint, &[]).await?;
        render(&response)
    }

    pub async fn get_incident(&self, provider_id: &str) -> Result<String> {
        let provider_id = provider_id.trim();
        if provider_id.is_empty() {
            return Err(ToolError::InvalidArgument(
                "provider_id is required and cannot be empty".into(),
            )
            .into());
        }
        let endpoint = format!("/api/v1/incidents/{provider_id}");
        let response = self.client.get(&endpoint, &[]).await?;
        render(&response)
    }

    pub async fn search_incidents(&self, search: IncidentSearch) -> Result<String> {
        let payload = incident_search_payload(&search);
        let response = self
            .client
            .post("/api/v1/incidents/search", &[], Some(&payload))
            .await?;
        render(&response)
    }

    pub async fn post_metrics(&self, request: MeasurementRequest) -> Result<String> {
        request.validate()?;
        let response = self
            .client
            .post("/api/v2/measurements", &[], Some(&request.payload()))
            .await?;
        render(&response)
    }

    pub async fn export_metrics(&self, request: MeasurementRequest, file_format: &str) -> Result<String> {
        if !matches!(file_format, "csv" | "json") {
            return Err(
                ToolError::InvalidArgument("file_format must be 'csv' or 'json'".into()).into(),
            );
        }
        request.validate()?;
        let params = vec![("file_format".to_string(), file_format.to_string())];
        let response = self
            .client
            .post("/api/v2/measurements/export", &params, Some(&request.payload()))
            .await?;
        render(&response)
    }

    pub async fn health_check(&self) -> Result<String> {
        let response = self.client.get("/api/v1/health", &[]).await?;
        render(&response)
    }
}

fn render(value: &Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn push<T: ToString>(params: &mut Vec<(String, String)>, key: &str, value: T) {
    params.push((key.to_string(), value.to_string()));
}

fn push_opt<T: ToString>(params: &mut Vec<(String, String)>, key: &str, value: Option<T>) {
    if let Some(value) = value {
        push(params, key, value);
    }
}

/// Keep an enum-valued parameter only when it is in the allowed set;
/// out-of-set values are dropped from the outgoing request, not rejected.
fn allowed_enum(value: Option<&str>, allowed: &[&str]) -> Option<String> {
    value
        .filter(|v| allowed.contains(v))
        .map(|v| v.to_string())
}

/// 1–100 characters after trimming; blank terms are dropped entirely.
fn optional_search_term(term: Option<&str>) -> Result<Option<String>, ToolError> {
    let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    if term.len() > 100 {
        return Err(ToolError::InvalidArgument(
            "search_term must be between 1 and 100 characters".into(),
        ));
    }
    Ok(Some(term.to_string()))
}

fn deployment_params(filter: &DeploymentFilter) -> Vec<(String, String)> {
    let mut params = Vec::new();
    push_opt(&mut params, "repository_id", filter.repository_id);
    push_opt(&mut params, "after", filter.after.as_deref());
    push_opt(&mut params, "before", filter.before.as_deref());
    push(&mut params, "limit", filter.limit.unwrap_or(10).clamp(1, LIMIT_MAX));
    push(&mut params, "offset", filter.offset.unwrap_or(0).max(0));
    push_opt(&mut params, "stage", filter.stage.as_deref());
    push(&mut params, "sort_by", filter.sort_by.as_deref().unwrap_or("published_at"));
    push(&mut params, "sort_dir", filter.sort_dir.as_deref().unwrap_or("desc"));
    push_opt(&mut params, "commit_sha", filter.commit_sha.as_deref());
    params
}

fn team_search_params(search: &TeamSearch) -> Result<Vec<(String, String)>, ToolError> {
    let mut params = Vec::new();
    push(&mut params, "offset", search.offset.unwrap_or(0).max(0));
    push(
        &mut params,
        "page_size",
        search.page_size.unwrap_or(PAGE_SIZE_MAX).clamp(1, PAGE_SIZE_MAX),
    );
    push(&mut params, "nonmerged_members_only", search.nonmerged_members_only);
    push_opt(
        &mut params,
        "search_term",
        optional_search_term(search.search_term.as_deref())?,
    );
    Ok(params)
}

fn user_search_params(search: &UserSearch) -> Result<Vec<(String, String)>, ToolError> {
    let mut params = Vec::new();
    push(&mut params, "offset", search.offset.unwrap_or(0).max(0));
    push(
        &mut params,
        "page_size",
        search.page_size.unwrap_or(PAGE_SIZE_MAX).clamp(1, PAGE_SIZE_MAX),
    );
    push(&mut params, "include_user_children", search.include_user_children);
    push_opt(
        &mut params,
        "order_by",
        allowed_enum(search.order_by.as_deref(), &["name", "email"]),
    );
    push_opt(
        &mut params,
        "order_dir",
        allowed_enum(search.order_dir.as_deref(), &["ASC", "DESC"]),
    );
    push_opt(
        &mut params,
        "search_by_field",
        allowed_enum(search.search_by_field.as_deref(), &["name", "email"]),
    );
    push_opt(
        &mut params,
        "search_term",
        optional_search_term(search.search_term.as_deref())?,
    );
    push_opt(
        &mut params,
        "user_role",
        allowed_enum(
            search.user_role.as_deref(),
            &["admin", "editor", "viewer", "external", "basic"],
        ),
    );
    Ok(params)
}

fn incident_search_payload(search: &IncidentSearch) -> Value {
    let mut payload = json!({
        "limit": search.limit.unwrap_or(10).clamp(1, LIMIT_MAX),
        "offset": search.offset.unwrap_or(0).max(0),
    });
    if let Some(status) = &search.status {
        payload["status"] = json!(status);
    }
    if let Some(severity) = &search.severity {
        payload["severity"] = json!(severity);
    }
    if let Some(after) = &search.after {
        payload["after"] = json!(after);
    }
    if let Some(before) = &search.before {
        payload["before"] = json!(before);
    }
    payload
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_deployment_limit_clamped_into_range() {
        let params = deployment_params(&DeploymentFilter {
            limit: Some(500),
            offset: Some(-3),
            ..Default::default()
        });
        assert_eq!(param(&params, "limit"), Some("100"));
        assert_eq!(param(&params, "offset"), Some("0"));
        assert_eq!(param(&params, "sort_by"), Some("published_at"));
        assert_eq!(param(&params, "sort_dir"), Some("desc"));
        assert_eq!(param(&params, "repository_id"), None);

        let params = deployment_params(&DeploymentFilter {
            limit: Some(0),
            ..Default::default()
        });
        assert_eq!(param(&params, "limit"), Some("1"));
    }

    #[test]
    fn test_team_search_page_size_and_term() {
        let params = team_search_params(&TeamSearch {
            page_size: Some(999),
            search_term: Some("  backend  ".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(param(&params, "page_size"), Some("50"));
        assert_eq!(param(&params, "search_term"), Some("backend"));
        assert_eq!(param(&params, "nonmerged_members_only"), Some("false"));
    }

    #[test]
    fn test_blank_search_term_dropped_and_long_term_rejected() {
        let params = team_search_params(&TeamSearch {
            search_term: Some("   ".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(param(&params, "search_term"), None);

        let result = team_search_params(&TeamSearch {
            search_term: Some("x".repeat(101)),
            ..Default::default()
        });
        assert!(matches!(result, Err(ToolError::InvalidArgument(_))));
    }

    #[test]
    fn test_user_search_drops_out_of_set_enums() {
        let params = user_search_params(&UserSearch {
            order_by: Some("height".into()),
            order_dir: Some("DESC".into()),
            user_role: Some("superuser".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(param(&params, "order_by"), None);
        assert_eq!(param(&params, "order_dir"), Some("DESC"));
        assert_eq!(param(&params, "user_role"), None);
    }

    #[test]
    fn test_incident_payload_strips_unset_fields() {
        let payload = incident_search_payload(&IncidentSearch {
            status: Some("open".into()),
            ..Default::default()
        });
        assert_eq!(payload["limit"], json!(10));
        assert_eq!(payload["status"], json!("open"));
        assert!(payload.get("severity").is_none());
        assert!(payload.get("after").is_none());
    }

    #[test]
    fn test_measurement_request_validation() {
        let request = MeasurementRequest {
            group_by: "team".into(),
            roll_up: "1w".into(),
            requested_metrics: vec![],
            time_ranges: vec![json!({"after": "2023-01-01", "before": "2023-01-31"})],
            repository_ids: None,
            team_ids: None,
        };
        assert!(matches!(
            request.validate(),
            Err(ToolError::InvalidArgument(_))
        ));

        let request = MeasurementRequest {
            requested_metrics: vec![json!({"name": "pr.merged"})],
            ..request
        };
        assert!(request.validate().is_ok());
        let payload = request.payload();
        assert!(payload.get("repository_ids").is_none());
        assert_eq!(payload["group_by"], json!("team"));
    }
}
