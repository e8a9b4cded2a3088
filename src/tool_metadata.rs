//! Static tool metadata registry.
//!
//! One entry per registered tool: stable name, short description and the
//! JSON schema of its input record. Built once at startup and served
//! verbatim by `tools/list`. Every entry is read-only; nothing in this
//! table (or anywhere else) describes a create/update/delete capability.

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Clone, Serialize)]
pub struct ToolMetadata {
    /// Tool name as it appears on the protocol surface.
    pub name: &'static str,

    /// Human-readable description.
    pub description: &'static str,

    /// Functional grouping, for listings and tests.
    pub category: ToolCategory,

    /// JSON schema for input parameters.
    pub input_schema: serde_json::Value,

    /// Whether the tool only reads state. Always true in this server.
    pub read_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ToolCategory {
    Discovery,
    Metrics,
    Teams,
    Api,
}

impl std::fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolCategory::Discovery => write!(f, "Discovery"),
            ToolCategory::Metrics => write!(f, "Metrics"),
            ToolCategory::Teams => write!(f, "Teams"),
            ToolCategory::Api => write!(f, "API"),
        }
    }
}

lazy_static! {
    /// Static registry of all tool metadata.
    pub static ref TOOL_METADATA: HashMap<&'static str, ToolMetadata> = {
        let mut map = HashMap::new();

        // ===== Discovery tools =====

        map.insert("discover_api", ToolMetadata {
            name: "discover_api",
            description: "Get comprehensive API information and available endpoints",
            category: ToolCategory::Discovery,
            input_schema: json!({"type": "object", "properties": {}, "required": []}),
            read_only: true,
        });

        map.insert("get_endpoint_details", ToolMetadata {
            name: "get_endpoint_details",
            description: "Get detailed information about a specific API endpoint",
            category: ToolCategory::Discovery,
            input_schema: json!({
                "type": "object",
                "properties": {
                    "endpoint_path": {"type": "string", "description": "The API endpoint path (e.g., '/api/v1/deployments')"},
                    "method": {"type": "string", "description": "HTTP method (default: GET)", "default": "GET"}
                },
                "required": ["endpoint_path"]
            }),
            read_only: true,
        });

        map.insert("get_api_categories", ToolMetadata {
            name: "get_api_categories",
            description: "Get API endpoints organized by categories",
            category: ToolCategory::Discovery,
            input_schema: json!({"type": "object", "properties": {}, "required": []}),
            read_only: true,
        });

        map.insert("get_usage_examples", ToolMetadata {
            name: "get_usage_examples",
            description: "Get usage examples for API endpoints",
            category: ToolCategory::Discovery,
            input_schema: json!({
                "type": "object",
                "properties": {
                    "category": {"type": "string", "description": "Filter examples by category (deployments, teams, services, incidents, metrics, health)"},
                    "tool_name": {"type": "string", "description": "Get examples for a specific tool name"}
                },
                "required": []
            }),
            read_only: true,
        });

        map.insert("get_documentation_files", ToolMetadata {
            name: "get_documentation_files",
            description: "List available documentation files",
            category: ToolCategory::Discovery,
            input_schema: json!({"type": "object", "properties": {}, "required": []}),
            read_only: true,
        });

        // ===== Metric reference tools =====

        map.insert("get_supported_metrics", ToolMetadata {
            name: "get_supported_metrics",
            description: "Get comprehensive list of supported LinearB metrics",
            category: ToolCategory::Metrics,
            input_schema: json!({"type": "object", "properties": {}, "required": []}),
            read_only: true,
        });

        map.insert("get_metrics_by_category", ToolMetadata {
            name: "get_metrics_by_category",
            description: "Get metrics organized by category",
            category: ToolCategory::Metrics,
            input_schema: json!({
                "type": "object",
                "properties": {
                    "category": {
                        "type": "string",
                        "description": "Optional category name",
                        "enum": ["cycle_time", "pull_requests", "commits", "releases", "activity", "branches", "incidents"]
                    }
                },
                "required": []
            }),
            read_only: true,
        });

        map.insert("search_metrics", ToolMetadata {
            name: "search_metrics",
            description: "Search metrics by name or description",
            category: ToolCategory::Metrics,
            input_schema: json!({
                "type": "object",
                "properties": {
                    "search_term": {"type": "string", "description": "Search term to match against metric names and descriptions"},
                    "category": {"type": "string", "description": "Optional category filter"},
                    "has_aggregation": {"type": "boolean", "description": "Optional filter for metrics that support aggregation (p75, p50, avg)"}
                },
                "required": ["search_term"]
            }),
            read_only: true,
        });

        map.insert("get_metric_examples", ToolMetadata {
            name: "get_metric_examples",
            description: "Get usage examples for metrics queries",
            category: ToolCategory::Metrics,
            input_schema: json!({"type": "object", "properties": {}, "required": []}),
            read_only: true,
        });

        // ===== Team reference tools =====

        map.insert("get_active_teams", ToolMetadata {
            name: "get_active_teams",
            description: "Get list of active teams for analysis",
            category: ToolCategory::Teams,
            input_schema: json!({"type": "object", "properties": {}, "required": []}),
            read_only: true,
        });

        map.insert("get_teams_by_type", ToolMetadata {
            name: "get_teams_by_type",
            description: "Get teams filtered by type",
            category: ToolCategory::Teams,
            input_schema: json!({
                "type": "object",
                "properties": {
                    "team_type": {
                        "type": "string",
                        "description": "Optional team type filter",
                        "enum": ["engineering", "qa"]
                    }
                },
                "required": []
            }),
            read_only: true,
        });

        map.insert("get_comparable_teams", ToolMetadata {
            name: "get_comparable_teams",
            description: "Get teams that can be compared for analysis",
            category: ToolCategory::Teams,
            input_schema: json!({"type": "object", "properties": {}, "required": []}),
            read_only: true,
        });

        map.insert("search_teams_by_focus", ToolMetadata {
            name: "search_teams_by_focus",
            description: "Search teams by focus area or name",
            category: ToolCategory::Teams,
            input_schema: json!({
                "type": "object",
                "properties": {
                    "search_term": {"type": "string", "description": "Search term to match against team names, descriptions, or focus areas"},
                    "team_type": {"type": "string", "description": "Optional team type filter", "enum": ["engineering", "qa"]},
                    "comparable_only": {"type": "boolean", "description": "If true, only return comparable teams", "default": false}
                },
                "required": ["search_term"]
            }),
            read_only: true,
        });

        // ===== Remote API tools =====

        map.insert("list_deployments", ToolMetadata {
            name: "list_deployments",
            description: "List deployments with optional filtering parameters",
            category: ToolCategory::Api,
            input_schema: json!({
                "type": "object",
                "properties": {
                    "repository_id": {"type": "integer", "description": "Filter by repository ID"},
                    "after": {"type": "string", "description": "Filter deployments after this date (ISO format)"},
                    "before": {"type": "string", "description": "Filter deployments before this date (ISO format)"},
                    "limit": {"type": "integer", "description": "Maximum number of results (1-100, default: 10)"},
                    "offset": {"type": "integer", "description": "Number of results to skip (default: 0)"},
                    "stage": {"type": "string", "description": "Filter by deployment stage"},
                    "sort_by": {"type": "string", "description": "Sort field (default: published_at)"},
                    "sort_dir": {"type": "string", "description": "Sort direction (asc/desc, default: desc)"},
                    "commit_sha": {"type": "string", "description": "Filter by specific commit SHA"}
                },
                "required": []
            }),
            read_only: true,
        });

        map.insert("search_teams_v2", ToolMetadata {
            name: "search_teams_v2",
            description: "Search teams with pagination (V2 API)",
            category: ToolCategory::Api,
            input_schema: json!({
                "type": "object",
                "properties": {
                    "offset": {"type": "integer", "description": "Pagination offset (default: 0)"},
                    "page_size": {"type": "integer", "description": "Number of teams per page (1-50, default: 50)"},
                    "search_term": {"type": "string", "description": "Search term to filter teams (1-100 characters)"},
                    "nonmerged_members_only": {"type": "boolean", "description": "If true, returns only contributors without parent contributors", "default": false}
                },
                "required": []
            }),
            read_only: true,
        });

        map.insert("search_users", ToolMetadata {
            name: "search_users",
            description: "Search users with pagination and filtering",
            category: ToolCategory::Api,
            input_schema: json!({
                "type": "object",
                "properties": {
                    "offset": {"type": "integer", "description": "Pagination offset (default: 0)"},
                    "page_size": {"type": "integer", "description": "Number of users per page (1-50, default: 50)"},
                    "order_by": {"type": "string", "description": "Field to order by", "enum": ["name", "email"]},
                    "order_dir": {"type": "string", "description": "Order direction", "enum": ["ASC", "DESC"]},
                    "search_by_field": {"type": "string", "description": "Field to search by", "enum": ["name", "email"]},
                    "search_term": {"type": "string", "description": "Search term (1-100 characters)"},
                    "user_role": {"type": "string", "description": "User role filter", "enum": ["admin", "editor", "viewer", "external", "basic"]},
                    "include_user_children": {"type": "boolean", "description": "Include user children in response", "default": false}
                },
                "required": []
            }),
            read_only: true,
        });

        map.insert("get_services", ToolMetadata {
            name: "get_services",
            description: "Get all services, optionally filtered by repository",
            category: ToolCategory::Api,
            input_schema: json!({
                "type": "object",
                "properties": {
                    "repository_id": {"type": "integer", "description": "Optional repository ID to filter services"}
                },
                "required": []
            }),
            read_only: true,
        });

        map.insert("get_service", ToolMetadata {
            name: "get_service",
            description: "Get a specific service by ID",
            category: ToolCategory::Api,
            input_schema: json!({
                "type": "object",
                "properties": {
                    "service_id": {"type": "integer", "description": "The service ID to retrieve"}
                },
                "required": ["service_id"]
            }),
            read_only: true,
        });

        map.insert("get_incident", ToolMetadata {
            name: "get_incident",
            description: "Get a specific incident by provider ID",
            category: ToolCategory::Api,
            input_schema: json!({
                "type": "object",
                "properties": {
                    "provider_id": {"type": "string", "description": "The incident provider ID to retrieve"}
                },
                "required": ["provider_id"]
            }),
            read_only: true,
        });

        map.insert("search_incidents", ToolMetadata {
            name: "search_incidents",
            description: "Search incidents with filtering",
            category: ToolCategory::Api,
            input_schema: json!({
                "type": "object",
                "properties": {
                    "limit": {"type": "integer", "description": "Maximum number of results (default: 10)"},
                    "offset": {"type": "integer", "description": "Number of results to skip (default: 0)"},
                    "status": {"type": "string", "description": "Filter by incident status"},
                    "severity": {"type": "string", "description": "Filter by incident severity"},
                    "after": {"type": "string", "description": "Filter incidents after this date (ISO format)"},
                    "before": {"type": "string", "description": "Filter incidents before this date (ISO format)"}
                },
                "required": []
            }),
            read_only: true,
        });

        map.insert("post_metrics", ToolMetadata {
            name: "post_metrics",
            description: "Query metrics data from LinearB",
            category: ToolCategory::Api,
            input_schema: json!({
                "type": "object",
                "properties": {
                    "group_by": {"type": "string", "description": "Grouping level (e.g., 'organization', 'team', 'repository')"},
                    "roll_up": {"type": "string", "description": "Time aggregation (e.g., '1d', '1w', '1mo', 'custom')"},
                    "requested_metrics": {
                        "type": "array",
                        "items": {"type": "object"},
                        "description": "List of metrics with optional aggregation (e.g., [{\"name\": \"branch.computed.cycle_time\", \"agg\": \"p75\"}])"
                    },
                    "time_ranges": {
                        "type": "array",
                        "items": {"type": "object"},
                        "description": "List of time ranges (e.g., [{\"after\": \"2023-01-01\", \"before\": \"2023-01-31\"}])"
                    },
                    "repository_ids": {"type": "array", "items": {"type": "integer"}, "description": "Optional list of repository IDs to filter"},
                    "team_ids": {"type": "array", "items": {"type": "integer"}, "description": "Optional list of team IDs to filter"}
                },
                "required": ["group_by", "roll_up", "requested_metrics", "time_ranges"]
            }),
            read_only: true,
        });

        map.insert("export_metrics", ToolMetadata {
            name: "export_metrics",
            description: "Export metrics data in CSV or JSON format",
            category: ToolCategory::Api,
            input_schema: json!({
                "type": "object",
                "properties": {
                    "group_by": {"type": "string", "description": "Grouping level (e.g., 'organization', 'team', 'repository')"},
                    "roll_up": {"type": "string", "description": "Time aggregation (e.g., '1d', '1w', '1mo', 'custom')"},
                    "requested_metrics": {"type": "array", "items": {"type": "object"}, "description": "List of metrics with optional aggregation"},
                    "time_ranges": {"type": "array", "items": {"type": "object"}, "description": "List of time ranges"},
                    "file_format": {"type": "string", "description": "Export format", "enum": ["csv", "json"], "default": "csv"},
                    "repository_ids": {"type": "array", "items": {"type": "integer"}, "description": "Optional list of repository IDs to filter"},
                    "team_ids": {"type": "array", "items": {"type": "integer"}, "description": "Optional list of team IDs to filter"}
                },
                "required": ["group_by", "roll_up", "requested_metrics", "time_ranges"]
            }),
            read_only: true,
        });

        map.insert("health_check", ToolMetadata {
            name: "health_check",
            description: "Check API health status",
            category: ToolCategory::Api,
            input_schema: json!({"type": "object", "properties": {}, "required": []}),
            read_only: true,
        });

        map
    };
}
