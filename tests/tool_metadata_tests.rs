/// Tests for the tool metadata registry.
///
/// These verify that all 23 tools have complete metadata, that every
/// entry is read-only, and that no write-capable tool name exists
/// anywhere in the registry.
use linearb_mcp::tool_metadata::{ToolCategory, TOOL_METADATA};

#[test]
fn test_tool_metadata_complete() {
    assert_eq!(
        TOOL_METADATA.len(),
        23,
        "Expected 23 tools to have metadata"
    );

    for (name, meta) in TOOL_METADATA.iter() {
        assert_eq!(
            meta.name, *name,
            "Tool name in metadata should match registry key"
        );
        assert!(
            !meta.description.is_empty(),
            "Tool {} should have a description",
            name
        );
        assert!(
            meta.input_schema.is_object(),
            "Tool {} input schema should be an object",
            name
        );
        let schema = meta.input_schema.as_object().unwrap();
        assert!(
            schema.contains_key("type"),
            "Tool {} schema should have 'type' field",
            name
        );
        assert!(
            schema.contains_key("properties"),
            "Tool {} schema should have 'properties' field",
            name
        );
    }
}

#[test]
fn test_all_tools_are_read_only() {
    for (name, meta) in TOOL_METADATA.iter() {
        assert!(meta.read_only, "Tool {} must be read-only", name);
    }
}

#[test]
fn test_no_write_capable_tool_names() {
    for prefix in ["create_", "update_", "delete_", "remove_", "add_"] {
        for name in TOOL_METADATA.keys() {
            assert!(
                !name.starts_with(prefix),
                "write-capable tool name registered: {}",
                name
            );
        }
    }
}

#[test]
fn test_tool_categories_complete() {
    let discovery = TOOL_METADATA
        .values()
        .filter(|m| m.category == ToolCategory::Discovery)
        .count();
    let metrics = TOOL_METADATA
        .values()
        .filter(|m| m.category == ToolCategory::Metrics)
        .count();
    let teams = TOOL_METADATA
        .values()
        .filter(|m| m.category == ToolCategory::Teams)
        .count();
    let api = TOOL_METADATA
        .values()
        .filter(|m| m.category == ToolCategory::Api)
        .count();

    assert_eq!(discovery, 5);
    assert_eq!(metrics, 4);
    assert_eq!(teams, 4);
    assert_eq!(api, 10);
}

#[test]
fn test_search_tools_require_a_term() {
    for name in ["search_metrics", "search_teams_by_focus"] {
        let meta = &TOOL_METADATA[name];
        let required = meta.input_schema["required"].as_array().unwrap();
        assert!(
            required.contains(&serde_json::json!("search_term")),
            "{} must require search_term",
            name
        );
    }
}
