//! Supported-metrics reference table.
//!
//! Every metric the provider's measurements endpoints accept, annotated
//! with its supported aggregations, units and category. The category index
//! is derived from the descriptor table at startup.

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::Serialize;
use serde_json::{json, Map, Value};

use super::normalize_search_term;
use crate::error::ToolError;

/// Statistical reduction mode applicable to certain metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    P75,
    P50,
    Avg,
}

const ALL_AGGREGATIONS: &[Aggregation] = &[Aggregation::P75, Aggregation::P50, Aggregation::Avg];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricCategory {
    CycleTime,
    PullRequests,
    Commits,
    Releases,
    Activity,
    Branches,
    Incidents,
}

impl MetricCategory {
    pub const ALL: [MetricCategory; 7] = [
        MetricCategory::CycleTime,
        MetricCategory::PullRequests,
        MetricCategory::Commits,
        MetricCategory::Releases,
        MetricCategory::Activity,
        MetricCategory::Branches,
        MetricCategory::Incidents,
    ];

    pub fn id(self) -> &'static str {
        match self {
            MetricCategory::CycleTime => "cycle_time",
            MetricCategory::PullRequests => "pull_requests",
            MetricCategory::Commits => "commits",
            MetricCategory::Releases => "releases",
            MetricCategory::Activity => "activity",
            MetricCategory::Branches => "branches",
            MetricCategory::Incidents => "incidents",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.id() == id)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            MetricCategory::CycleTime => "Cycle Time Metrics",
            MetricCategory::PullRequests => "Pull Request Metrics",
            MetricCategory::Commits => "Commit Metrics",
            MetricCategory::Releases => "Release Metrics",
            MetricCategory::Activity => "Activity Metrics",
            MetricCategory::Branches => "Branch Metrics",
            MetricCategory::Incidents => "Incident Metrics",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            MetricCategory::CycleTime => "Metrics related to development cycle time and flow",
            MetricCategory::PullRequests => "Metrics related to pull requests and code reviews",
            MetricCategory::Commits => "Metrics related to commits and code changes",
            MetricCategory::Releases => "Metrics related to software releases",
            MetricCategory::Activity => "Metrics related to developer activity",
            MetricCategory::Branches => "Metrics related to branch states",
            MetricCategory::Incidents => "Metrics related to incidents and reliability",
        }
    }
}

impl std::fmt::Display for MetricCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricDescriptor {
    pub name: &'static str,
    pub aggregations: &'static [Aggregation],
    pub description: &'static str,
    pub units: &'static str,
    pub category: MetricCategory,
}

impl MetricDescriptor {
    pub fn has_aggregation(&self) -> bool {
        !self.aggregations.is_empty()
    }
}

/// The full metric reference table.
pub static METRICS: [MetricDescriptor; 22] = [
    MetricDescriptor {
        name: "branch.computed.cycle_time",
        aggregations: ALL_AGGREGATIONS,
        description: "Full cycle time (Coding time + Pickup time + Review time + Time to production)",
        units: "min",
        category: MetricCategory::CycleTime,
    },
    MetricDescriptor {
        name: "branch.time_to_pr",
        aggregations: ALL_AGGREGATIONS,
        description: "Coding time (Time to PR)",
        units: "min",
        category: MetricCategory::CycleTime,
    },
    MetricDescriptor {
        name: "branch.time_to_review",
        aggregations: ALL_AGGREGATIONS,
        description: "Pickup time (Time to review)",
        units: "min",
        category: MetricCategory::CycleTime,
    },
    MetricDescriptor {
        name: "branch.review_time",
        aggregations: ALL_AGGREGATIONS,
        description: "Review time",
        units: "min",
        category: MetricCategory::CycleTime,
    },
    MetricDescriptor {
        name: "branch.time_to_prod",
        aggregations: ALL_AGGREGATIONS,
        description: "Time to production (Time to deploy)",
        units: "min",
        category: MetricCategory::CycleTime,
    },
    MetricDescriptor {
        name: "pr.merged.size",
        aggregations: ALL_AGGREGATIONS,
        description: "The sum of PR sizes of merged PRs",
        units: "lines of code",
        category: MetricCategory::PullRequests,
    },
    MetricDescriptor {
        name: "pr.merged",
        aggregations: &[],
        description: "The number of PRs that got merged",
        units: "count",
        category: MetricCategory::PullRequests,
    },
    MetricDescriptor {
        name: "pr.review_depth",
        aggregations: &[],
        description: "The sum of comments divided by the sum of PRs",
        units: "lines of comments",
        category: MetricCategory::PullRequests,
    },
    MetricDescriptor {
        name: "commit.activity.new_work.count",
        aggregations: &[],
        description: "The total new lines of code",
        units: "count",
        category: MetricCategory::Commits,
    },
    MetricDescriptor {
        name: "commit.total_changes",
        aggregations: &[],
        description: "The total lines of code that have been replaced",
        units: "lines of code",
        category: MetricCategory::Commits,
    },
    MetricDescriptor {
        name: "commit.activity.refactor.count",
        aggregations: &[],
        description: "The total lines of code that have been replaced that are older then 25 days",
        units: "lines of code",
        category: MetricCategory::Commits,
    },
    MetricDescriptor {
        name: "commit.activity.rework.count",
        aggregations: &[],
        description: "The total lines of code that have replaced code written within the last 25 days, but outside this branch",
        units: "lines of code",
        category: MetricCategory::Commits,
    },
    MetricDescriptor {
        name: "pr.merged.without.review.count",
        aggregations: &[],
        description: "The number of PRs that got merged without review",
        units: "count",
        category: MetricCategory::PullRequests,
    },
    MetricDescriptor {
        name: "commit.total.count",
        aggregations: &[],
        description: "The sum of commits",
        units: "count",
        category: MetricCategory::Commits,
    },
    MetricDescriptor {
        name: "pr.new",
        aggregations: &[],
        description: "The number of opened PRs",
        units: "count",
        category: MetricCategory::PullRequests,
    },
    MetricDescriptor {
        name: "pr.reviews",
        aggregations: &[],
        description: "The number of reviews on all PRs",
        units: "count",
        category: MetricCategory::PullRequests,
    },
    MetricDescriptor {
        name: "releases.count",
        aggregations: &[],
        description: "The number of releases",
        units: "count",
        category: MetricCategory::Releases,
    },
    MetricDescriptor {
        name: "commit.activity_days",
        aggregations: &[],
        description: "The amount of day of developer activity (commit/comment/PR/merge/review)",
        units: "days",
        category: MetricCategory::Activity,
    },
    MetricDescriptor {
        name: "branch.state.computed.done",
        aggregations: &[],
        description: "Number of branches that reached state done",
        units: "count",
        category: MetricCategory::Branches,
    },
    MetricDescriptor {
        name: "branch.state.active",
        aggregations: &[],
        description: "Number of active branches",
        units: "count",
        category: MetricCategory::Branches,
    },
    MetricDescriptor {
        name: "pm.mttr",
        aggregations: &[],
        description: "Mean time to repair",
        units: "min",
        category: MetricCategory::Incidents,
    },
    MetricDescriptor {
        name: "pm.cfr.issues.done",
        aggregations: &[],
        description: "The sum of issues that are considered as incidents that reached a done state",
        units: "count",
        category: MetricCategory::Incidents,
    },
];

lazy_static! {
    /// Category → member metric names, grouped from the descriptor table.
    static ref CATEGORY_MEMBERS: HashMap<MetricCategory, Vec<&'static str>> = {
        let mut members: HashMap<MetricCategory, Vec<&'static str>> = MetricCategory::ALL
            .iter()
            .map(|c| (*c, Vec::new()))
            .collect();
        for metric in METRICS.iter() {
            members
                .get_mut(&metric.category)
                .expect("grouping covers every category")
                .push(metric.name);
        }
        members
    };
}

pub fn all() -> &'static [MetricDescriptor] {
    &METRICS
}

pub fn find(name: &str) -> Option<&'static MetricDescriptor> {
    METRICS.iter().find(|m| m.name == name)
}

/// Member metric names of a category, in table order.
pub fn members(category: MetricCategory) -> &'static [&'static str] {
    &CATEGORY_MEMBERS[&category]
}

/// Free-text search over metric names and descriptions, with optional
/// category and aggregation-support filters applied after the match.
pub fn search(
    term: &str,
    category: Option<&str>,
    has_aggregation: Option<bool>,
) -> Result<Vec<&'static MetricDescriptor>, ToolError> {
    let term = normalize_search_term(term)?;
    Ok(METRICS
        .iter()
        .filter(|m| {
            m.name.to_lowercase().contains(&term) || m.description.to_lowercase().contains(&term)
        })
        .filter(|m| category.map_or(true, |c| m.category.id() == c))
        .filter(|m| has_aggregation.map_or(true, |want| want == m.has_aggregation()))
        .collect())
}

fn metrics_map<'a, I>(metrics: I) -> Value
where
    I: IntoIterator<Item = &'a MetricDescriptor>,
{
    let mut map = Map::new();
    for metric in metrics {
        map.insert(
            metric.name.to_string(),
            serde_json::to_value(metric).expect("metric descriptors serialize"),
        );
    }
    Value::Object(map)
}

fn categories_info() -> Value {
    let mut map = Map::new();
    for category in MetricCategory::ALL {
        map.insert(
            category.id().to_string(),
            json!({
                "name": category.display_name(),
                "description": category.description(),
                "metrics": members(category),
            }),
        );
    }
    Value::Object(map)
}

/// Full metrics reference: every descriptor plus the category index.
pub fn list_response() -> Value {
    json!({
        "total_metrics": METRICS.len(),
        "categories": MetricCategory::ALL.len(),
        "metrics": metrics_map(METRICS.iter()),
        "categories_info": categories_info(),
        "usage_note": "Use these metric names in post_metrics() calls. Specify aggregation (p75, p50, avg) where supported.",
    })
}

/// One category's metrics, or an index of all categories with member
/// counts. Unknown category ids yield a structured not-found result
/// enumerating the valid ids.
pub fn by_category_response(category: Option<&str>) -> Value {
    let Some(requested) = category else {
        let mut categories = Map::new();
        for category in MetricCategory::ALL {
            categories.insert(
                category.id().to_string(),
                json!({
                    "name": category.display_name(),
                    "description": category.description(),
                    "metric_count": members(category).len(),
                    "metrics": members(category),
                }),
            );
        }
        return json!({
            "total_categories": MetricCategory::ALL.len(),
            "categories": categories,
        });
    };

    let Some(category) = MetricCategory::from_id(requested) else {
        return json!({
            "error": format!("Category '{requested}' not found"),
            "available_categories": MetricCategory::ALL.iter().map(|c| c.id()).collect::<Vec<_>>(),
        });
    };

    let names = members(category);
    json!({
        "category": category.id(),
        "name": category.display_name(),
        "description": category.description(),
        "total_metrics": names.len(),
        "metrics": metrics_map(names.iter().filter_map(|name| find(name))),
    })
}

/// Search result with the applied filters echoed back.
pub fn search_response(
    term: &str,
    category: Option<&str>,
    has_aggregation: Option<bool>,
) -> Result<Value, ToolError> {
    let matches = search(term, category, has_aggregation)?;
    Ok(json!({
        "search_term": normalize_search_term(term)?,
        "filters": {
            "category": category,
            "has_aggregation": has_aggregation,
        },
        "total_matches": matches.len(),
        "metrics": metrics_map(matches),
    }))
}
