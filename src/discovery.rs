//! Hand-authored discovery reference data and documentation enumeration.
//!
//! The browsing taxonomy and the usage-example corpus are curated
//! independently of the OpenAPI specification: they stay available when
//! the specification fails to load, and they are allowed to diverge from
//! the tag-derived categorization in [`crate::openapi`].

use std::path::Path;

use lazy_static::lazy_static;
use serde_json::{json, Value};

lazy_static! {
    /// Curated taxonomy for human browsing: category → tool entries.
    static ref API_CATEGORIES: Value = json!({
        "deployments": {
            "description": "View deployment information (read-only)",
            "endpoints": [
                {"tool": "list_deployments", "method": "GET", "path": "/api/v1/deployments", "description": "List deployments with filtering"}
            ]
        },
        "teams": {
            "description": "View team information using V2 API (read-only)",
            "endpoints": [
                {"tool": "search_teams_v2", "method": "GET", "path": "/api/v2/teams", "description": "Search teams with pagination"}
            ]
        },
        "users": {
            "description": "View user information (read-only)",
            "endpoints": [
                {"tool": "search_users", "method": "GET", "path": "/api/v1/users", "description": "Search users with pagination"}
            ]
        },
        "services": {
            "description": "Retrieve service information",
            "endpoints": [
                {"tool": "get_services", "method": "GET", "path": "/api/v1/services/", "description": "Get all services"},
                {"tool": "get_service", "method": "GET", "path": "/api/v1/services/{service_id}", "description": "Get specific service by ID"}
            ]
        },
        "incidents": {
            "description": "View incident information (read-only)",
            "endpoints": [
                {"tool": "get_incident", "method": "GET", "path": "/api/v1/incidents/{provider_id}", "description": "Get specific incident"},
                {"tool": "search_incidents", "method": "POST", "path": "/api/v1/incidents/search", "description": "Search incidents with filtering"}
            ]
        },
        "metrics": {
            "description": "Query and export metrics data (read-only)",
            "endpoints": [
                {"tool": "post_metrics", "method": "POST", "path": "/api/v2/measurements", "description": "Query metrics data"},
                {"tool": "export_metrics", "method": "POST", "path": "/api/v2/measurements/export", "description": "Export metrics in CSV/JSON"}
            ]
        },
        "health": {
            "description": "Monitor API health",
            "endpoints": [
                {"tool": "health_check", "method": "GET", "path": "/api/v1/health", "description": "Check API health status"}
            ]
        },
        "discovery": {
            "description": "API discovery and reference tools",
            "endpoints": [
                {"tool": "discover_api", "method": "N/A", "path": "N/A", "description": "Get comprehensive API information"},
                {"tool": "get_endpoint_details", "method": "N/A", "path": "N/A", "description": "Get detailed endpoint information"},
                {"tool": "get_api_categories", "method": "N/A", "path": "N/A", "description": "Get API endpoints by categories"},
                {"tool": "get_usage_examples", "method": "N/A", "path": "N/A", "description": "Get usage examples"},
                {"tool": "get_documentation_files", "method": "N/A", "path": "N/A", "description": "List documentation files"},
                {"tool": "get_supported_metrics", "method": "N/A", "path": "N/A", "description": "Get all supported metrics"},
                {"tool": "get_metrics_by_category", "method": "N/A", "path": "N/A", "description": "Get metrics by category"},
                {"tool": "search_metrics", "method": "N/A", "path": "N/A", "description": "Search metrics by name/description"},
                {"tool": "get_metric_examples", "method": "N/A", "path": "N/A", "description": "Get metric usage examples"},
                {"tool": "get_active_teams", "method": "N/A", "path": "N/A", "description": "Get all active teams"},
                {"tool": "get_teams_by_type", "method": "N/A", "path": "N/A", "description": "Get teams by type (engineering/qa)"},
                {"tool": "get_comparable_teams", "method": "N/A", "path": "N/A", "description": "Get comparable engineering teams"},
                {"tool": "search_teams_by_focus", "method": "N/A", "path": "N/A", "description": "Search teams by focus area"}
            ]
        }
    });

    /// Curated usage-example corpus: category → tool → examples.
    static ref USAGE_EXAMPLES: Value = json!({
        "deployments": {
            "list_deployments": {
                "description": "List recent deployments with filtering (read-only)",
                "examples": [
                    {
                        "title": "List 10 most recent deployments",
                        "code": "list_deployments(limit=10, sort_dir='desc')",
                        "parameters": {"limit": 10, "sort_dir": "desc"}
                    },
                    {
                        "title": "List deployments for specific repository",
                        "code": "list_deployments(repository_id=12345, limit=20)",
                        "parameters": {"repository_id": 12345, "limit": 20}
                    },
                    {
                        "title": "List deployments in date range",
                        "code": "list_deployments(after='2023-01-01', before='2023-12-31')",
                        "parameters": {"after": "2023-01-01", "before": "2023-12-31"}
                    }
                ]
            }
        },
        "teams": {
            "search_teams_v2": {
                "description": "Search teams with V2 API (read-only)",
                "examples": [
                    {
                        "title": "Search all teams",
                        "code": "search_teams_v2(page_size=50)",
                        "parameters": {"page_size": 50}
                    },
                    {
                        "title": "Search teams by name",
                        "code": "search_teams_v2(search_term='backend', page_size=20)",
                        "parameters": {"search_term": "backend", "page_size": 20}
                    }
                ]
            }
        },
        "users": {
            "search_users": {
                "description": "Search users with filtering (read-only)",
                "examples": [
                    {
                        "title": "Search all users",
                        "code": "search_users(page_size=50)",
                        "parameters": {"page_size": 50}
                    },
                    {
                        "title": "Search users by name",
                        "code": "search_users(search_by_field='name', search_term='john', order_by='name')",
                        "parameters": {"search_by_field": "name", "search_term": "john", "order_by": "name"}
                    }
                ]
            }
        },
        "metrics": {
            "post_metrics": {
                "description": "Query metrics data",
                "examples": [
                    {
                        "title": "Get cycle time metrics",
                        "code": "post_metrics(group_by='organization', roll_up='1w', requested_metrics=[{'name': 'branch.computed.cycle_time', 'agg': 'p75'}], time_ranges=[{'after': '2023-01-01', 'before': '2023-01-31'}])",
                        "parameters": {
                            "group_by": "organization",
                            "roll_up": "1w",
                            "requested_metrics": [{"name": "branch.computed.cycle_time", "agg": "p75"}],
                            "time_ranges": [{"after": "2023-01-01", "before": "2023-01-31"}]
                        }
                    }
                ]
            }
        },
        "incidents": {
            "search_incidents": {
                "description": "Search incidents with filtering (read-only)",
                "examples": [
                    {
                        "title": "Search recent incidents",
                        "code": "search_incidents(limit=20, after='2023-01-01')",
                        "parameters": {"limit": 20, "after": "2023-01-01"}
                    },
                    {
                        "title": "Search incidents by status",
                        "code": "search_incidents(status='open', limit=10)",
                        "parameters": {"status": "open", "limit": 10}
                    }
                ]
            },
            "get_incident": {
                "description": "Get specific incident details (read-only)",
                "examples": [
                    {
                        "title": "Get incident by provider ID",
                        "code": "get_incident(provider_id='INC-001')",
                        "parameters": {"provider_id": "INC-001"}
                    }
                ]
            }
        },
        "metrics_discovery": {
            "get_supported_metrics": {
                "description": "Get comprehensive metrics reference",
                "examples": [
                    {
                        "title": "Get all supported metrics",
                        "code": "get_supported_metrics()",
                        "parameters": {}
                    }
                ]
            },
            "search_metrics": {
                "description": "Search for specific metrics",
                "examples": [
                    {
                        "title": "Search cycle time metrics",
                        "code": "search_metrics('cycle', category='cycle_time')",
                        "parameters": {"search_term": "cycle", "category": "cycle_time"}
                    },
                    {
                        "title": "Find metrics with aggregation support",
                        "code": "search_metrics('time', has_aggregation=True)",
                        "parameters": {"search_term": "time", "has_aggregation": true}
                    }
                ]
            },
            "get_metrics_by_category": {
                "description": "Get metrics organized by category",
                "examples": [
                    {
                        "title": "Get all pull request metrics",
                        "code": "get_metrics_by_category('pull_requests')",
                        "parameters": {"category": "pull_requests"}
                    },
                    {
                        "title": "Get all categories overview",
                        "code": "get_metrics_by_category()",
                        "parameters": {}
                    }
                ]
            }
        },
        "teams_discovery": {
            "get_active_teams": {
                "description": "Get comprehensive active teams reference",
                "examples": [
                    {
                        "title": "Get all active teams",
                        "code": "get_active_teams()",
                        "parameters": {}
                    }
                ]
            },
            "get_comparable_teams": {
                "description": "Get teams suitable for comparison",
                "examples": [
                    {
                        "title": "Get engineering teams for comparison",
                        "code": "get_comparable_teams()",
                        "parameters": {}
                    }
                ]
            },
            "search_teams_by_focus": {
                "description": "Search teams by focus area",
                "examples": [
                    {
                        "title": "Find integration teams",
                        "code": "search_teams_by_focus('integration', comparable_only=True)",
                        "parameters": {"search_term": "integration", "comparable_only": true}
                    },
                    {
                        "title": "Find QA teams",
                        "code": "search_teams_by_focus('automation', team_type='qa')",
                        "parameters": {"search_term": "automation", "team_type": "qa"}
                    }
                ]
            }
        }
    });

    /// Metric-query recipes with an aggregation guide, curated alongside
    /// the metric reference table.
    static ref METRIC_EXAMPLES: Value = json!({
        "examples": {
            "cycle_time_analysis": {
                "description": "Analyze development cycle time with different aggregations",
                "code": "post_metrics(group_by='team', roll_up='1w', requested_metrics=[{'name': 'branch.computed.cycle_time', 'agg': 'p75'}, {'name': 'branch.time_to_pr', 'agg': 'p50'}, {'name': 'branch.review_time', 'agg': 'avg'}], time_ranges=[{'after': '2023-01-01', 'before': '2023-01-31'}])",
                "metrics_used": ["branch.computed.cycle_time", "branch.time_to_pr", "branch.review_time"]
            },
            "pr_quality_metrics": {
                "description": "Analyze pull request quality and review patterns",
                "code": "post_metrics(group_by='repository', roll_up='1mo', requested_metrics=[{'name': 'pr.merged'}, {'name': 'pr.review_depth'}, {'name': 'pr.merged.without.review.count'}, {'name': 'pr.merged.size', 'agg': 'p75'}], time_ranges=[{'after': '2023-01-01', 'before': '2023-12-31'}])",
                "metrics_used": ["pr.merged", "pr.review_depth", "pr.merged.without.review.count", "pr.merged.size"]
            },
            "activity_overview": {
                "description": "Get overview of development activity",
                "code": "post_metrics(group_by='organization', roll_up='1d', requested_metrics=[{'name': 'commit.total.count'}, {'name': 'pr.new'}, {'name': 'pr.reviews'}, {'name': 'commit.activity_days'}], time_ranges=[{'after': '2023-12-01', 'before': '2023-12-31'}])",
                "metrics_used": ["commit.total.count", "pr.new", "pr.reviews", "commit.activity_days"]
            },
            "code_quality_analysis": {
                "description": "Analyze code quality through rework and refactor metrics",
                "code": "post_metrics(group_by='team', roll_up='1w', requested_metrics=[{'name': 'commit.activity.new_work.count'}, {'name': 'commit.activity.rework.count'}, {'name': 'commit.activity.refactor.count'}, {'name': 'commit.total_changes'}], time_ranges=[{'after': '2023-01-01', 'before': '2023-03-31'}])",
                "metrics_used": ["commit.activity.new_work.count", "commit.activity.rework.count", "commit.activity.refactor.count", "commit.total_changes"]
            },
            "reliability_metrics": {
                "description": "Monitor system reliability and incident metrics",
                "code": "post_metrics(group_by='organization', roll_up='1mo', requested_metrics=[{'name': 'pm.mttr'}, {'name': 'pm.cfr.issues.done'}, {'name': 'releases.count'}], time_ranges=[{'after': '2023-01-01', 'before': '2023-12-31'}])",
                "metrics_used": ["pm.mttr", "pm.cfr.issues.done", "releases.count"]
            }
        },
        "aggregation_guide": {
            "p75": "75th percentile - good for understanding typical high-end performance",
            "p50": "50th percentile (median) - represents typical performance",
            "avg": "Average - useful for overall trends but can be skewed by outliers"
        },
        "best_practices": [
            "Use p75 for cycle time metrics to understand realistic delivery times",
            "Use p50 for median performance analysis",
            "Combine count metrics with time-based metrics for comprehensive analysis",
            "Use appropriate roll_up periods: 1d for detailed analysis, 1w for trends, 1mo for high-level overview"
        ]
    });
}

/// The curated taxonomy with total counts. Always available, independent
/// of specification-load success.
pub fn api_categories() -> Value {
    let categories = API_CATEGORIES
        .as_object()
        .expect("curated taxonomy is an object");
    let total_endpoints: usize = categories
        .values()
        .filter_map(|c| c.get("endpoints").and_then(Value::as_array))
        .map(Vec::len)
        .sum();
    json!({
        "total_categories": categories.len(),
        "total_endpoints": total_endpoints,
        "categories": API_CATEGORIES.clone(),
    })
}

/// Usage-example lookup. A tool name is searched across every category's
/// tool map first; otherwise a category selects its tool map; with
/// neither, the full corpus index is returned.
pub fn usage_examples(category: Option<&str>, tool_name: Option<&str>) -> Value {
    let corpus = USAGE_EXAMPLES
        .as_object()
        .expect("usage-example corpus is an object");

    if let Some(tool_name) = tool_name {
        for (category, tools) in corpus {
            if let Some(examples) = tools.get(tool_name) {
                return json!({
                    "tool": tool_name,
                    "category": category,
                    "examples": examples,
                });
            }
        }
        return json!({"error": format!("No examples found for tool '{tool_name}'")});
    }

    if let Some(category) = category {
        if let Some(tools) = corpus.get(category) {
            return json!({
                "category": category,
                "tools": tools,
            });
        }
        return json!({
            "error": format!("Category '{category}' not found"),
            "available_categories": corpus.keys().collect::<Vec<_>>(),
        });
    }

    json!({
        "all_categories": corpus.keys().collect::<Vec<_>>(),
        "examples": USAGE_EXAMPLES.clone(),
    })
}

/// Metric-query recipes, aggregation guide and best practices.
pub fn metric_examples() -> Value {
    METRIC_EXAMPLES.clone()
}

/// Enumerate `.pdf` files under the documentation directory, deriving
/// each file's category from the stem portion before a literal " - "
/// separator. Files are sorted by derived category.
pub fn documentation_files(dir: &Path) -> Value {
    if !dir.is_dir() {
        return json!({"error": "Documentation directory not found"});
    }

    let mut files: Vec<(String, String)> = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("pdf") {
                continue;
            }
            let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(filename);
            let category = stem.split(" - ").next().unwrap_or(stem);
            files.push((category.to_string(), filename.to_string()));
        }
    }
    files.sort();

    let listed: Vec<Value> = files
        .iter()
        .map(|(category, filename)| {
            json!({
                "filename": filename,
                "category": category,
                "path": dir.join(filename).to_string_lossy(),
            })
        })
        .collect();

    json!({
        "documentation_path": dir.to_string_lossy(),
        "total_files": listed.len(),
        "files": listed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_categories_counts() {
        let categories = api_categories();
        assert_eq!(categories["total_categories"], json!(8));
        let total = categories["total_endpoints"].as_u64().unwrap();
        assert!(total >= 23, "curated taxonomy lists every tool, got {total}");
    }

    #[test]
    fn test_usage_examples_tool_lookup_wins_over_category() {
        let result = usage_examples(Some("deployments"), Some("search_metrics"));
        assert_eq!(result["tool"], json!("search_metrics"));
        assert_eq!(result["category"], json!("metrics_discovery"));
    }

    #[test]
    fn test_usage_examples_unknown_category_lists_alternatives() {
        let result = usage_examples(Some("nonsense"), None);
        assert!(result.get("error").is_some());
        assert!(result["available_categories"]
            .as_array()
            .unwrap()
            .contains(&json!("deployments")));
    }

    #[test]
    fn test_usage_examples_full_index() {
        let result = usage_examples(None, None);
        assert_eq!(result["all_categories"].as_array().unwrap().len(), 7);
    }

    #[test]
    fn test_no_write_tools_in_taxonomy() {
        let rendered = serde_json::to_string(&api_categories()).unwrap();
        for forbidden in ["create_", "update_", "delete_", "remove_"] {
            assert!(
                !rendered.contains(forbidden),
                "write-capable tool name leaked into the curated taxonomy: {forbidden}"
            );
        }
    }

    #[test]
    fn test_documentation_files_missing_dir() {
        let result = documentation_files(Path::new("/nonexistent/docs"));
        assert_eq!(result["error"], json!("Documentation directory not found"));
    }

    #[test]
    fn test_documentation_files_categories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Metrics - Reference.pdf"), b"x").unwrap();
        std::fs::write(dir.path().join("Overview.pdf"), b"x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let result = documentation_files(dir.path());
        assert_eq!(result["total_files"], json!(2));
        let files = result["files"].as_array().unwrap();
        assert_eq!(files[0]["category"], json!("Metrics"));
        assert_eq!(files[1]["category"], json!("Overview"));
    }
}
