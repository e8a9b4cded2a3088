//! Team reference tool handlers.

use anyhow::Result;
use serde_json::Value;

use super::{ArgExtractor, ToolHandler};
use crate::engine::LinearbEngine;

/// Handler for get_active_teams tool
pub struct GetActiveTeamsHandler;

#[async_trait::async_trait]
impl ToolHandler for GetActiveTeamsHandler {
    fn name(&self) -> &'static str {
        "get_active_teams"
    }

    async fn execute(&self, engine: &LinearbEngine, _args: Value) -> Result<String> {
        engine.active_teams()
    }
}

/// Handler for get_teams_by_type tool
pub struct GetTeamsByTypeHandler;

#[async_trait::async_trait]
impl ToolHandler for GetTeamsByTypeHandler {
    fn name(&self) -> &'static str {
        "get_teams_by_type"
    }

    async fn execute(&self, engine: &LinearbEngine, args: Value) -> Result<String> {
        engine.teams_by_type(args.get_str("team_type"))
    }
}

/// Handler for get_comparable_teams tool
pub struct GetComparableTeamsHandler;

#[async_trait::async_trait]
impl ToolHandler for GetComparableTeamsHandler {
    fn name(&self) -> &'static str {
        "get_comparable_teams"
    }

    async fn execute(&self, engine: &LinearbEngine, _args: Value) -> Result<String> {
        engine.comparable_teams()
    }
}

/// Handler for search_teams_by_focus tool
pub struct SearchTeamsByFocusHandler;

#[async_trait::async_trait]
impl ToolHandler for SearchTeamsByFocusHandler {
    fn name(&self) -> &'static str {
        "search_teams_by_focus"
    }

    async fn execute(&self, engine: &LinearbEngine, args: Value) -> Result<String> {
        engine.search_teams_by_focus(
            args.get_str("search_term").unwrap_or(""),
            args.get_str("team_type"),
            args.get_bool_or("comparable_only", false),
        )
    }
}
