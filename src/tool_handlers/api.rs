//! Remote-call tool handlers. Every operation here is a read or query;
//! the server exposes no create, update or delete capability.

use anyhow::Result;
use serde_json::Value;

use super::{ArgExtractor, ToolHandler};
use crate::engine::{
    DeploymentFilter, IncidentSearch, LinearbEngine, MeasurementRequest, TeamSearch, UserSearch,
};
use crate::error::ToolError;

fn measurement_request(args: &Value) -> Result<MeasurementRequest, ToolError> {
    let group_by = args
        .get_string("group_by")
        .ok_or_else(|| ToolError::InvalidArgument("group_by is required".into()))?;
    let roll_up = args
        .get_string("roll_up")
        .ok_or_else(|| ToolError::InvalidArgument("roll_up is required".into()))?;
    Ok(MeasurementRequest {
        group_by,
        roll_up,
        requested_metrics: args.get_array("requested_metrics").cloned().unwrap_or_default(),
        time_ranges: args.get_array("time_ranges").cloned().unwrap_or_default(),
        repository_ids: args.get_i64_array("repository_ids").filter(|ids| !ids.is_empty()),
        team_ids: args.get_i64_array("team_ids").filter(|ids| !ids.is_empty()),
    })
}

/// Handler for list_deployments tool
pub struct ListDeploymentsHandler;

#[async_trait::async_trait]
impl ToolHandler for ListDeploymentsHandler {
    fn name(&self) -> &'static str {
        "list_deployments"
    }

    async fn execute(&self, engine: &LinearbEngine, args: Value) -> Result<String> {
        let filter = DeploymentFilter {
            repository_id: args.get_i64("repository_id"),
            after: args.get_string("after"),
            before: args.get_string("before"),
            limit: args.get_i64("limit"),
            offset: args.get_i64("offset"),
            stage: args.get_string("stage"),
            sort_by: args.get_string("sort_by"),
            sort_dir: args.get_string("sort_dir"),
            commit_sha: args.get_string("commit_sha"),
        };
        engine.list_deployments(filter).await
    }
}

/// Handler for search_teams_v2 tool
pub struct SearchTeamsV2Handler;

#[async_trait::async_trait]
impl ToolHandler for SearchTeamsV2Handler {
    fn name(&self) -> &'static str {
        "search_teams_v2"
    }

    async fn execute(&self, engine: &LinearbEngine, args: Value) -> Result<String> {
        let search = TeamSearch {
            offset: args.get_i64("offset"),
            page_size: args.get_i64("page_size"),
            search_term: args.get_string("search_term"),
            nonmerged_members_only: args.get_bool_or("nonmerged_members_only", false),
        };
        engine.search_teams(search).await
    }
}

/// Handler for search_users tool
pub struct SearchUsersHandler;

#[async_trait::async_trait]
impl ToolHandler for SearchUsersHandler {
    fn name(&self) -> &'static str {
        "search_users"
    }

    async fn execute(&self, engine: &LinearbEngine, args: Value) -> Result<String> {
        let search = UserSearch {
            offset: args.get_i64("offset"),
            page_size: args.get_i64("page_size"),
            order_by: args.get_string("order_by"),
            order_dir: args.get_string("order_dir"),
            search_by_field: args.get_string("search_by_field"),
            search_term: args.get_string("search_term"),
            user_role: args.get_string("user_role"),
            include_user_children: args.get_bool_or("include_user_children", false),
        };
        engine.search_users(search).await
    }
}

/// Handler for get_services tool
pub struct GetServicesHandler;

#[async_trait::async_trait]
impl ToolHandler for GetServicesHandler {
    fn name(&self) -> &'static str {
        "get_services"
    }

    async fn execute(&self, engine: &LinearbEngine, args: Value) -> Result<String> {
        engine.get_services(args.get_i64("repository_id")).await
    }
}

/// Handler for get_service tool
pub struct GetServiceHandler;

#[async_trait::async_trait]
impl ToolHandler for GetServiceHandler {
    fn name(&self) -> &'static str {
        "get_service"
    }

    async fn execute(&self, engine: &LinearbEngine, args: Value) -> Result<String> {
        let service_id = args
            .get_i64("service_id")
            .ok_or_else(|| ToolError::InvalidArgument("service_id is required".into()))?;
        engine.get_service(service_id).await
    }
}

/// Handler for get_incident tool
pub struct GetIncidentHandler;

#[async_trait::async_trait]
impl ToolHandler for GetIncidentHandler {
    fn name(&self) -> &'static str {
        "get_incident"
    }

    async fn execute(&self, engine: &LinearbEngine, args: Value) -> Result<String> {
        engine
            .get_incident(args.get_str("provider_id").unwrap_or(""))
            .await
    }
}

/// Handler for search_incidents tool
pub struct SearchIncidentsHandler;

#[async_trait::async_trait]
impl ToolHandler for SearchIncidentsHandler {
    fn name(&self) -> &'static str {
        "search_incidents"
    }

    async fn execute(&self, engine: &LinearbEngine, args: Value) -> Result<String> {
        let search = IncidentSearch {
            limit: args.get_i64("limit"),
            offset: args.get_i64("offset"),
            status: args.get_string("status"),
            severity: args.get_string("severity"),
            after: args.get_string("after"),
            before: args.get_string("before"),
        };
        engine.search_incidents(search).await
    }
}

/// Handler for post_metrics tool
pub struct PostMetricsHandler;

#[async_trait::async_trait]
impl ToolHandler for PostMetricsHandler {
    fn name(&self) -> &'static str {
        "post_metrics"
    }

    async fn execute(&self, engine: &LinearbEngine, args: Value) -> Result<String> {
        let request = measurement_request(&args)?;
        engine.post_metrics(request).await
    }
}

/// Handler for export_metrics tool
pub struct ExportMetricsHandler;

#[async_trait::async_trait]
impl ToolHandler for ExportMetricsHandler {
    fn name(&self) -> &'static str {
        "export_metrics"
    }

    async fn execute(&self, engine: &LinearbEngine, args: Value) -> Result<String> {
        let request = measurement_request(&args)?;
        let file_format = args.get_str("file_format").unwrap_or("csv");
        engine.export_metrics(request, file_format).await
    }
}

/// Handler for health_check tool
pub struct HealthCheckHandler;

#[async_trait::async_trait]
impl ToolHandler for HealthCheckHandler {
    fn name(&self) -> &'static str {
        "health_check"
    }

    async fn execute(&self, engine: &LinearbEngine, _args: Value) -> Result<String> {
        engine.health_check().await
    }
}
