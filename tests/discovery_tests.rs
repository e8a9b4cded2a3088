/// Tests for the discovery query engine: endpoint model lookups, the
/// degraded no-specification mode, the curated taxonomy and the
/// documentation listing.
use std::path::PathBuf;
use std::time::Duration;

use serde_json::{json, Value};

use linearb_mcp::config::Config;
use linearb_mcp::engine::LinearbEngine;
use linearb_mcp::openapi::ApiModel;

fn test_config(docs_dir: PathBuf) -> Config {
    Config {
        api_key: "test-key".to_string(),
        base_url: "https://public-api.linearb.io".to_string(),
        timeout: Duration::from_secs(5),
        log_level: "info".to_string(),
        spec_path: PathBuf::from("openAPI.json"),
        docs_dir,
    }
}

fn sample_document() -> Value {
    json!({
        "info": {"title": "LinearB Public API", "version": "2.0"},
        "servers": [{"url": "https://public-api.linearb.io"}],
        "paths": {
            "/api/v1/deployments": {
                "get": {
                    "summary": "List deployments",
                    "description": "Returns deployments for the organization",
                    "tags": ["Deployments"],
                    "operationId": "listDeployments",
                    "parameters": [
                        {"name": "limit", "in": "query", "schema": {"type": "integer", "default": 10}},
                        {"name": "offset", "in": "query", "schema": {"type": "integer"}}
                    ],
                    "responses": {"200": {"description": "OK"}}
                }
            },
            "/api/v1/health": {
                "get": {
                    "summary": "Health check",
                    "tags": ["Health"],
                    "responses": {"200": {"description": "healthy"}}
                }
            },
            "/api/v2/measurements": {
                "post": {
                    "summary": "Query measurements",
                    "tags": ["Measurements"],
                    "requestBody": {
                        "required": true,
                        "content": {"application/json": {"schema": {"type": "object"}}}
                    },
                    "responses": {"200": {"description": "OK"}}
                }
            }
        }
    })
}

fn engine_with_model() -> LinearbEngine {
    let model = ApiModel::from_document(&sample_document());
    LinearbEngine::new(&test_config(PathBuf::from("docs")), Some(model)).unwrap()
}

fn engine_without_model() -> LinearbEngine {
    LinearbEngine::new(&test_config(PathBuf::from("docs")), None).unwrap()
}

fn parse(result: String) -> Value {
    serde_json::from_str(&result).expect("tool results are JSON")
}

#[test]
fn test_endpoint_details_reports_tool_name() {
    let engine = engine_with_model();
    let details = parse(engine.endpoint_details("/api/v1/deployments", "GET").unwrap());
    assert_eq!(details["mcp_tool_name"], json!("list_deployments"));
    assert_eq!(details["endpoint"], json!("GET /api/v1/deployments"));
    assert_eq!(details["summary"], json!("List deployments"));
    assert_eq!(details["parameters"]["query"].as_array().unwrap().len(), 2);
}

#[test]
fn test_endpoint_details_method_matching_is_case_insensitive() {
    let engine = engine_with_model();
    let details = parse(engine.endpoint_details("/api/v1/deployments", "get").unwrap());
    assert!(details.get("error").is_none());
    assert_eq!(details["method"], json!("GET"));
}

#[test]
fn test_unknown_method_lists_available_methods() {
    let engine = engine_with_model();
    let result = parse(engine.endpoint_details("/api/v1/deployments", "DELETE").unwrap());
    assert!(result["error"]
        .as_str()
        .unwrap()
        .contains("Method 'DELETE' not available"));
    assert_eq!(result["available_methods"], json!(["GET"]));
}

#[test]
fn test_unknown_path_lists_available_paths() {
    let engine = engine_with_model();
    let result = parse(engine.endpoint_details("/api/v1/nonexistent", "GET").unwrap());
    assert!(result["error"].as_str().unwrap().contains("not found"));
    let available = result["available_endpoints"].as_array().unwrap();
    assert!(available.contains(&json!("/api/v1/health")));
}

#[test]
fn test_discover_api_round_trips_through_endpoint_details() {
    let engine = engine_with_model();
    let discovered = parse(engine.discover_api().unwrap());
    let endpoints = discovered["endpoints"].as_object().unwrap();
    assert_eq!(endpoints.len(), 3);

    for (key, endpoint) in endpoints {
        let (method, path) = key.split_once(' ').expect("keys are 'METHOD path'");
        let details = parse(engine.endpoint_details(path, method).unwrap());
        assert!(
            details.get("error").is_none(),
            "round-trip lookup failed for {key}"
        );
        assert_eq!(details["summary"], endpoint["summary"]);
        assert_eq!(details["tags"], endpoint["tags"]);
    }
}

#[test]
fn test_discover_api_tag_categorization() {
    let engine = engine_with_model();
    let discovered = parse(engine.discover_api().unwrap());
    let categories = &discovered["categories"];
    assert_eq!(categories["deployments"], json!(["GET /api/v1/deployments"]));
    assert_eq!(categories["measurements"], json!(["POST /api/v2/measurements"]));
    assert_eq!(categories["health"], json!(["GET /api/v1/health"]));
    assert_eq!(categories["teams"], json!([]));
}

#[test]
fn test_degraded_discovery_serves_fallback_tools() {
    let engine = engine_without_model();
    assert!(!engine.has_specification());

    let result = parse(engine.discover_api().unwrap());
    assert!(result.get("error").is_some());
    let tools = result["available_tools"].as_array().unwrap();
    assert_eq!(tools.len(), 10);
    assert!(tools.contains(&json!("list_deployments")));
    assert!(tools.contains(&json!("health_check")));
    // The fallback lists read-only capabilities only.
    for tool in tools {
        let name = tool.as_str().unwrap();
        assert!(!name.starts_with("create_"));
        assert!(!name.starts_with("update_"));
        assert!(!name.starts_with("delete_"));
    }

    let details = parse(engine.endpoint_details("/api/v1/health", "GET").unwrap());
    assert!(details.get("error").is_some());
}

#[test]
fn test_degraded_mode_keeps_reference_tables_available() {
    let engine = engine_without_model();
    let metrics = parse(engine.supported_metrics().unwrap());
    assert_eq!(metrics["total_metrics"], json!(22));

    let categories = parse(engine.api_categories().unwrap());
    assert_eq!(categories["total_categories"], json!(8));
}

#[test]
fn test_curated_taxonomy_diverges_from_derived_categorization() {
    // The curated view lists users/metrics/discovery buckets that the
    // tag-derived view never produces; both stay independent.
    let engine = engine_with_model();
    let curated = parse(engine.api_categories().unwrap());
    assert!(curated["categories"].get("users").is_some());
    assert!(curated["categories"].get("discovery").is_some());

    let discovered = parse(engine.discover_api().unwrap());
    assert!(discovered["categories"].get("users").is_none());
    assert!(discovered["categories"].get("discovery").is_none());
}

#[test]
fn test_usage_examples_lookup() {
    let engine = engine_with_model();

    let by_tool = parse(engine.usage_examples(None, Some("get_incident")).unwrap());
    assert_eq!(by_tool["category"], json!("incidents"));

    let by_category = parse(engine.usage_examples(Some("metrics_discovery"), None).unwrap());
    assert!(by_category["tools"].get("search_metrics").is_some());

    let unknown = parse(engine.usage_examples(None, Some("create_incident")).unwrap());
    assert!(unknown.get("error").is_some());
}

#[test]
fn test_documentation_files_listing() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Teams - Active Roster.pdf"), b"pdf").unwrap();
    std::fs::write(dir.path().join("API - Getting Started.pdf"), b"pdf").unwrap();
    std::fs::write(dir.path().join("CHANGELOG.md"), b"md").unwrap();

    let engine =
        LinearbEngine::new(&test_config(dir.path().to_path_buf()), None).unwrap();
    let listing = parse(engine.documentation_files().unwrap());
    assert_eq!(listing["total_files"], json!(2));
    let files = listing["files"].as_array().unwrap();
    // Sorted by derived category.
    assert_eq!(files[0]["category"], json!("API"));
    assert_eq!(files[1]["category"], json!("Teams"));

    let missing = LinearbEngine::new(
        &test_config(dir.path().join("nope")),
        None,
    )
    .unwrap();
    let result = parse(missing.documentation_files().unwrap());
    assert!(result.get("error").is_some());
}
