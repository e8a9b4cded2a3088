/// Tests for the static reference tables (metrics and teams).
///
/// These verify the structural consistency of the derived groupings, the
/// search semantics shared by both tables, and the immutability of the
/// responses.
use linearb_mcp::catalog::metrics::{self, MetricCategory};
use linearb_mcp::catalog::teams::{self, TeamType};
use linearb_mcp::error::ToolError;

#[test]
fn test_metric_table_size() {
    assert_eq!(metrics::all().len(), 22);
}

#[test]
fn test_metric_category_index_is_bidirectionally_consistent() {
    for category in MetricCategory::ALL {
        let members = metrics::members(category);

        // Every listed member reports this category.
        for name in members {
            let metric = metrics::find(name).expect("member names resolve");
            assert_eq!(metric.category, category);
        }

        // Every metric reporting this category is listed.
        for metric in metrics::all() {
            if metric.category == category {
                assert!(members.contains(&metric.name));
            }
        }
    }

    let total: usize = MetricCategory::ALL
        .iter()
        .map(|c| metrics::members(*c).len())
        .sum();
    assert_eq!(total, metrics::all().len());
}

#[test]
fn test_team_type_index_is_bidirectionally_consistent() {
    for team_type in TeamType::ALL {
        let members = teams::members(team_type);
        for id in members {
            let team = teams::find(id).expect("member ids resolve");
            assert_eq!(team.team_type, team_type);
        }
        for team in teams::all() {
            if team.team_type == team_type {
                assert!(members.contains(&team.id));
            }
        }
    }

    let total: usize = TeamType::ALL.iter().map(|t| teams::members(*t).len()).sum();
    assert_eq!(total, teams::all().len());
}

#[test]
fn test_filtered_search_is_subset_of_unfiltered() {
    let unfiltered = metrics::search("time", None, None).unwrap();
    let filtered = metrics::search("time", Some("cycle_time"), None).unwrap();

    assert!(!filtered.is_empty());
    for metric in &filtered {
        assert!(unfiltered.iter().any(|m| m.name == metric.name));
        assert!(metrics::members(MetricCategory::CycleTime).contains(&metric.name));
    }
    assert!(filtered.len() <= unfiltered.len());
}

#[test]
fn test_search_cycle_with_aggregation_returns_exactly_one_metric() {
    let matches = metrics::search("cycle", None, Some(true)).unwrap();
    let names: Vec<&str> = matches.iter().map(|m| m.name).collect();
    assert_eq!(names, vec!["branch.computed.cycle_time"]);
}

#[test]
fn test_search_cy_includes_cycle_time() {
    let matches = metrics::search("cy", None, None).unwrap();
    assert!(matches.iter().any(|m| m.name == "branch.computed.cycle_time"));
}

#[test]
fn test_single_character_term_is_invalid_argument() {
    assert!(matches!(
        metrics::search("a", None, None),
        Err(ToolError::InvalidArgument(_))
    ));
    assert!(matches!(
        teams::search(" x ", None, false),
        Err(ToolError::InvalidArgument(_))
    ));
}

#[test]
fn test_comparable_partition() {
    let comparable: Vec<_> = teams::all().iter().filter(|t| t.comparable).collect();
    let excluded: Vec<_> = teams::all().iter().filter(|t| !t.comparable).collect();

    assert_eq!(comparable.len(), 6);
    assert_eq!(excluded.len(), 1);
    assert_eq!(excluded[0].id, "qa_automation");
    assert_eq!(excluded[0].team_type, TeamType::Qa);
    assert!(comparable.iter().all(|t| t.team_type == TeamType::Engineering));
}

#[test]
fn test_comparable_response_partition_shape() {
    let response = teams::comparable_response();
    assert_eq!(response["total_comparable_teams"], serde_json::json!(6));
    let included = response["teams"].as_object().unwrap();
    let excluded = response["excluded_teams"].as_object().unwrap();
    assert_eq!(included.len() + excluded.len(), 7);
    for id in included.keys() {
        assert!(!excluded.contains_key(id), "partition must be disjoint");
    }
}

#[test]
fn test_repeated_reads_are_identical() {
    let first = serde_json::to_string(&metrics::list_response()).unwrap();
    let second = serde_json::to_string(&metrics::list_response()).unwrap();
    assert_eq!(first, second);

    let first = serde_json::to_string(&teams::list_response()).unwrap();
    let second = serde_json::to_string(&teams::list_response()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_unknown_lookups_enumerate_alternatives() {
    let response = metrics::by_category_response(Some("velocity"));
    assert!(response["error"]
        .as_str()
        .unwrap()
        .contains("'velocity' not found"));
    assert_eq!(
        response["available_categories"].as_array().unwrap().len(),
        7
    );

    let response = teams::by_type_response(Some("design"));
    assert!(response["error"].as_str().unwrap().contains("'design' not found"));
    assert_eq!(response["available_types"].as_array().unwrap().len(), 2);
}

#[test]
fn test_search_term_is_normalized_before_matching() {
    let matches = metrics::search("  CYCLE  ", None, None).unwrap();
    assert!(matches.iter().any(|m| m.name == "branch.computed.cycle_time"));

    let response = metrics::search_response("  CYCLE  ", None, None).unwrap();
    assert_eq!(response["search_term"], serde_json::json!("cycle"));
}
