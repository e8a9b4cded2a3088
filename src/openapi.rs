//! OpenAPI specification loader and normalized endpoint model.
//!
//! The specification document is read once at startup. Absence or a parse
//! failure degrades discovery to a static capability list; it never fails
//! startup. The loaded document is normalized into one
//! [`EndpointDescriptor`] per `(method, path)` pair and is read-only
//! afterward.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{info, warn};

/// Statically-known mapping from `(method, path)` to the tool that
/// forwards to it. Only read-only operations appear here; endpoints
/// without an entry are reported with a null tool name, never an error.
const TOOL_ENDPOINTS: [(&str, &str, &str); 10] = [
    ("GET", "/api/v1/deployments", "list_deployments"),
    ("GET", "/api/v2/teams", "search_teams_v2"),
    ("GET", "/api/v1/users", "search_users"),
    ("GET", "/api/v1/services/", "get_services"),
    ("GET", "/api/v1/services/{service_id}", "get_service"),
    ("GET", "/api/v1/incidents/{provider_id}", "get_incident"),
    ("GET", "/api/v1/health", "health_check"),
    ("POST", "/api/v1/incidents/search", "search_incidents"),
    ("POST", "/api/v2/measurements", "post_metrics"),
    ("POST", "/api/v2/measurements/export", "export_metrics"),
];

/// Tag keyword → category bucket, tested in priority order. Within one
/// tag only the first matching bucket wins; a tag matching none of the
/// keywords is not categorized.
const TAG_BUCKETS: [(&str, &[&str]); 6] = [
    ("deployments", &["deployment"]),
    ("teams", &["team"]),
    ("services", &["service"]),
    ("incidents", &["incident"]),
    ("measurements", &["measurement", "metric"]),
    ("health", &["health"]),
];

pub fn tool_name_for(method: &str, path: &str) -> Option<&'static str> {
    TOOL_ENDPOINTS
        .iter()
        .find(|(m, p, _)| m.eq_ignore_ascii_case(method) && *p == path)
        .map(|(_, _, tool)| *tool)
}

/// Remote-call tool names served when the specification is unavailable.
pub fn fallback_tools() -> Vec<&'static str> {
    TOOL_ENDPOINTS.iter().map(|(_, _, tool)| *tool).collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct ParameterDescriptor {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub param_type: String,
    pub required: bool,
    pub description: String,
    pub default: Value,
    #[serde(rename = "enum")]
    pub allowed_values: Value,
    pub minimum: Value,
    pub maximum: Value,
}

/// Endpoint parameters partitioned by location. Parameters declaring an
/// unrecognized location are kept under `query`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParameterSet {
    pub query: Vec<ParameterDescriptor>,
    pub path: Vec<ParameterDescriptor>,
    pub header: Vec<ParameterDescriptor>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestBodyDescriptor {
    pub required: bool,
    pub content_type: &'static str,
    pub schema: Value,
    pub examples: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseDescriptor {
    pub description: String,
    pub schema: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct EndpointDescriptor {
    pub path: String,
    pub method: String,
    pub summary: String,
    pub description: String,
    pub tags: Vec<String>,
    pub parameters: ParameterSet,
    pub request_body: Option<RequestBodyDescriptor>,
    pub responses: BTreeMap<String, ResponseDescriptor>,
    pub operation_id: String,
    pub mcp_tool_name: Option<&'static str>,
}

impl EndpointDescriptor {
    /// Map key used by discovery enumeration, e.g. `"GET /api/v1/health"`.
    pub fn key(&self) -> String {
        format!("{} {}", self.method, self.path)
    }

    fn from_operation(path: &str, method: &str, operation: &Value) -> Self {
        let method = method.to_uppercase();

        let mut parameters = ParameterSet::default();
        if let Some(params) = operation.get("parameters").and_then(Value::as_array) {
            for param in params {
                let descriptor = ParameterDescriptor {
                    name: param.get("name").and_then(Value::as_str).map(String::from),
                    param_type: param
                        .pointer("/schema/type")
                        .and_then(Value::as_str)
                        .unwrap_or("string")
                        .to_string(),
                    required: param.get("required").and_then(Value::as_bool).unwrap_or(false),
                    description: param
                        .get("description")
                        .and_then(Value::as_str)
                        .unwrap_or("")
                        .to_string(),
                    default: param.pointer("/schema/default").cloned().unwrap_or(Value::Null),
                    allowed_values: param.pointer("/schema/enum").cloned().unwrap_or(Value::Null),
                    minimum: param.pointer("/schema/minimum").cloned().unwrap_or(Value::Null),
                    maximum: param.pointer("/schema/maximum").cloned().unwrap_or(Value::Null),
                };
                match param.get("in").and_then(Value::as_str).unwrap_or("query") {
                    "path" => parameters.path.push(descriptor),
                    "header" => parameters.header.push(descriptor),
                    _ => parameters.query.push(descriptor),
                }
            }
        }

        let request_body = operation.get("requestBody").map(|body| {
            let json_content = body.pointer("/content/application~1json");
            RequestBodyDescriptor {
                required: body.get("required").and_then(Value::as_bool).unwrap_or(false),
                content_type: "application/json",
                schema: json_content
                    .and_then(|c| c.get("schema"))
                    .cloned()
                    .unwrap_or_else(|| json!({})),
                examples: json_content
                    .and_then(|c| c.get("examples"))
                    .cloned()
                    .unwrap_or_else(|| json!({})),
            }
        });

        let mut responses = BTreeMap::new();
        if let Some(response_map) = operation.get("responses").and_then(Value::as_object) {
            for (status, response) in response_map {
                responses.insert(
                    status.clone(),
                    ResponseDescriptor {
                        description: response
                            .get("description")
                            .and_then(Value::as_str)
                            .unwrap_or("")
                            .to_string(),
                        schema: response
                            .pointer("/content/application~1json/schema")
                            .cloned()
                            .unwrap_or_else(|| json!({})),
                    },
                );
            }
        }

        let mcp_tool_name = tool_name_for(&method, path);
        EndpointDescriptor {
            path: path.to_string(),
            summary: operation
                .get("summary")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string(),
            description: operation
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string(),
            tags: operation
                .get("tags")
                .and_then(Value::as_array)
                .map(|tags| {
                    tags.iter()
                        .filter_map(Value::as_str)
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            parameters,
            request_body,
            responses,
            operation_id: operation
                .get("operationId")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string(),
            method,
            mcp_tool_name,
        }
    }
}

/// Normalized, read-only model of the loaded specification.
#[derive(Debug, Clone)]
pub struct ApiModel {
    pub info: Value,
    pub base_url: Option<String>,
    paths: BTreeMap<String, BTreeMap<String, EndpointDescriptor>>,
}

impl ApiModel {
    pub fn from_document(document: &Value) -> Self {
        let mut paths: BTreeMap<String, BTreeMap<String, EndpointDescriptor>> = BTreeMap::new();
        if let Some(path_map) = document.get("paths").and_then(Value::as_object) {
            for (path, methods) in path_map {
                let Some(methods) = methods.as_object() else {
                    continue;
                };
                let entry = paths.entry(path.clone()).or_default();
                for (method, operation) in methods {
                    let descriptor = EndpointDescriptor::from_operation(path, method, operation);
                    entry.insert(descriptor.method.clone(), descriptor);
                }
            }
        }

        ApiModel {
            info: document.get("info").cloned().unwrap_or_else(|| json!({})),
            base_url: document
                .pointer("/servers/0/url")
                .and_then(Value::as_str)
                .map(String::from),
            paths,
        }
    }

    pub fn endpoints(&self) -> impl Iterator<Item = &EndpointDescriptor> {
        self.paths.values().flat_map(|methods| methods.values())
    }

    pub fn endpoint_count(&self) -> usize {
        self.paths.values().map(|methods| methods.len()).sum()
    }

    /// Look up one endpoint; method matching is case-insensitive.
    pub fn endpoint(&self, path: &str, method: &str) -> Option<&EndpointDescriptor> {
        self.paths.get(path)?.get(&method.to_uppercase())
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.paths.contains_key(path)
    }

    pub fn paths(&self) -> Vec<&str> {
        self.paths.keys().map(String::as_str).collect()
    }

    /// Methods defined for a path, upper-cased.
    pub fn methods_for(&self, path: &str) -> Option<Vec<&str>> {
        self.paths
            .get(path)
            .map(|methods| methods.keys().map(String::as_str).collect())
    }

    /// Coarse tag-derived categorization of all endpoints. Distinct from
    /// the curated browsing taxonomy and allowed to diverge from it.
    pub fn categories(&self) -> Value {
        let mut buckets: Vec<Vec<String>> = vec![Vec::new(); TAG_BUCKETS.len()];
        for endpoint in self.endpoints() {
            for tag in &endpoint.tags {
                let tag = tag.to_lowercase();
                let bucket = TAG_BUCKETS
                    .iter()
                    .position(|(_, keywords)| keywords.iter().any(|k| tag.contains(k)));
                if let Some(index) = bucket {
                    buckets[index].push(endpoint.key());
                }
            }
        }

        let mut map = Map::new();
        for ((name, _), members) in TAG_BUCKETS.iter().zip(buckets) {
            map.insert(name.to_string(), json!(members));
        }
        Value::Object(map)
    }
}

/// Load and normalize the specification document, degrading to `None` on
/// absence or parse failure.
pub fn load_model(path: &Path) -> Option<ApiModel> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "OpenAPI specification file not found");
            return None;
        }
    };
    match serde_json::from_str::<Value>(&text) {
        Ok(document) => {
            let model = ApiModel::from_document(&document);
            info!(endpoints = model.endpoint_count(), "OpenAPI specification loaded");
            Some(model)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to parse OpenAPI specification");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> Value {
        json!({
            "info": {"title": "LinearB Public API", "version": "1.0"},
            "servers": [{"url": "https://public-api.linearb.io"}],
            "paths": {
                "/api/v1/deployments": {
                    "get": {
                        "summary": "List deployments",
                        "tags": ["Deployments"],
                        "operationId": "listDeployments",
                        "parameters": [
                            {
                                "name": "limit",
                                "in": "query",
                                "schema": {"type": "integer", "default": 10, "minimum": 1, "maximum": 100}
                            },
                            {
                                "name": "x-api-key",
                                "in": "header",
                                "required": true,
                                "schema": {"type": "string"}
                            }
                        ],
                        "responses": {
                            "200": {"description": "OK"}
                        }
                    },
                    "post": {
                        "summary": "Create a deployment",
                        "tags": ["Deployments"],
                        "requestBody": {
                            "required": true,
                            "content": {"application/json": {"schema": {"type": "object"}}}
                        }
                    }
                },
                "/api/v2/measurements": {
                    "post": {
                        "summary": "Query measurements",
                        "tags": ["Measurements"]
                    }
                }
            }
        })
    }

    #[test]
    fn test_model_normalizes_endpoints() {
        let model = ApiModel::from_document(&sample_document());
        assert_eq!(model.endpoint_count(), 3);
        assert_eq!(model.base_url.as_deref(), Some("https://public-api.linearb.io"));

        let endpoint = model.endpoint("/api/v1/deployments", "get").unwrap();
        assert_eq!(endpoint.method, "GET");
        assert_eq!(endpoint.summary, "List deployments");
        assert_eq!(endpoint.parameters.query.len(), 1);
        assert_eq!(endpoint.parameters.header.len(), 1);
        assert_eq!(endpoint.parameters.query[0].param_type, "integer");
        assert_eq!(endpoint.parameters.query[0].default, json!(10));
        assert_eq!(endpoint.mcp_tool_name, Some("list_deployments"));
    }

    #[test]
    fn test_unimplemented_endpoints_have_no_tool_name() {
        let model = ApiModel::from_document(&sample_document());
        let endpoint = model.endpoint("/api/v1/deployments", "POST").unwrap();
        assert_eq!(endpoint.mcp_tool_name, None);
        assert!(endpoint.request_body.as_ref().unwrap().required);
    }

    #[test]
    fn test_tag_categorization_buckets() {
        let model = ApiModel::from_document(&sample_document());
        let categories = model.categories();
        let deployments = categories["deployments"].as_array().unwrap();
        assert_eq!(deployments.len(), 2);
        assert!(deployments.contains(&json!("GET /api/v1/deployments")));
        let measurements = categories["measurements"].as_array().unwrap();
        assert_eq!(measurements, &vec![json!("POST /api/v2/measurements")]);
        assert!(categories["health"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_tool_name_lookup_is_method_case_insensitive() {
        assert_eq!(tool_name_for("get", "/api/v1/health"), Some("health_check"));
        assert_eq!(tool_name_for("DELETE", "/api/v1/health"), None);
        assert_eq!(fallback_tools().len(), 10);
    }
}
