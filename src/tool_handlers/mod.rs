//! Tool handlers for the MCP protocol surface.
//!
//! Each tool is a unit struct implementing [`ToolHandler`]; the
//! [`ToolRegistry`] maps stable tool names to handlers and is built once
//! at startup. Only read-only operations are ever registered: write
//! capabilities have no handler, no registry entry and no schema.

use anyhow::Result;
use serde_json::Value;
use std::collections::HashMap;

use crate::engine::LinearbEngine;

mod api;
mod discovery;
mod metrics;
mod teams;

/// Trait for implementing tool handlers.
///
/// Each handler extracts its arguments from JSON and calls the
/// appropriate engine method, returning the result as a string.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// Returns the tool name as it appears in the MCP protocol.
    fn name(&self) -> &'static str;

    /// Execute the tool with the given arguments.
    async fn execute(&self, engine: &LinearbEngine, args: Value) -> Result<String>;
}

/// Registry for tool handlers: name → handler dispatch.
pub struct ToolRegistry {
    handlers: HashMap<&'static str, Box<dyn ToolHandler>>,
}

impl ToolRegistry {
    /// Create a new registry with every standard handler registered.
    pub fn new() -> Self {
        let mut registry = Self {
            handlers: HashMap::new(),
        };

        // Discovery handlers
        registry.register(Box::new(discovery::DiscoverApiHandler));
        registry.register(Box::new(discovery::GetEndpointDetailsHandler));
        registry.register(Box::new(discovery::GetApiCategoriesHandler));
        registry.register(Box::new(discovery::GetUsageExamplesHandler));
        registry.register(Box::new(discovery::GetDocumentationFilesHandler));

        // Metric reference handlers
        registry.register(Box::new(metrics::GetSupportedMetricsHandler));
        registry.register(Box::new(metrics::GetMetricsByCategoryHandler));
        registry.register(Box::new(metrics::SearchMetricsHandler));
        registry.register(Box::new(metrics::GetMetricExamplesHandler));

        // Team reference handlers
        registry.register(Box::new(teams::GetActiveTeamsHandler));
        registry.register(Box::new(teams::GetTeamsByTypeHandler));
        registry.register(Box::new(teams::GetComparableTeamsHandler));
        registry.register(Box::new(teams::SearchTeamsByFocusHandler));

        // Remote API handlers (read-only)
        registry.register(Box::new(api::ListDeploymentsHandler));
        registry.register(Box::new(api::SearchTeamsV2Handler));
        registry.register(Box::new(api::SearchUsersHandler));
        registry.register(Box::new(api::GetServicesHandler));
        registry.register(Box::new(api::GetServiceHandler));
        registry.register(Box::new(api::GetIncidentHandler));
        registry.register(Box::new(api::SearchIncidentsHandler));
        registry.register(Box::new(api::PostMetricsHandler));
        registry.register(Box::new(api::ExportMetricsHandler));
        registry.register(Box::new(api::HealthCheckHandler));

        registry
    }

    fn register(&mut self, handler: Box<dyn ToolHandler>) {
        self.handlers.insert(handler.name(), handler);
    }

    /// Dispatch a tool call to the appropriate handler.
    pub async fn dispatch(
        &self,
        name: &str,
        engine: &LinearbEngine,
        args: Value,
    ) -> Result<String> {
        self.handlers
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown tool: {}", name))?
            .execute(engine, args)
            .await
    }

    /// Check if a tool exists.
    pub fn has_tool(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Get all registered tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        self.handlers.keys().copied().collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper trait for extracting arguments from JSON.
pub trait ArgExtractor {
    fn get_str(&self, key: &str) -> Option<&str>;
    fn get_string(&self, key: &str) -> Option<String>;
    fn get_i64(&self, key: &str) -> Option<i64>;
    fn get_bool(&self, key: &str) -> Option<bool>;
    fn get_bool_or(&self, key: &str, default: bool) -> bool;
    fn get_array(&self, key: &str) -> Option<&Vec<Value>>;
    fn get_i64_array(&self, key: &str) -> Option<Vec<i64>>;
}

impl ArgExtractor for Value {
    fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.as_str())
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.get_str(key).map(String::from)
    }

    fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| v.as_i64())
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.as_bool())
    }

    fn get_bool_or(&self, key: &str, default: bool) -> bool {
        self.get_bool(key).unwrap_or(default)
    }

    fn get_array(&self, key: &str) -> Option<&Vec<Value>> {
        self.get(key).and_then(|v| v.as_array())
    }

    fn get_i64_array(&self, key: &str) -> Option<Vec<i64>> {
        self.get_array(key)
            .map(|values| values.iter().filter_map(Value::as_i64).collect())
    }
}
