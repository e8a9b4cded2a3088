//! Metric reference tool handlers.

use anyhow::Result;
use serde_json::Value;

use super::{ArgExtractor, ToolHandler};
use crate::engine::LinearbEngine;

/// Handler for get_supported_metrics tool
pub struct GetSupportedMetricsHandler;

#[async_trait::async_trait]
impl ToolHandler for GetSupportedMetricsHandler {
    fn name(&self) -> &'static str {
        "get_supported_metrics"
    }

    async fn execute(&self, engine: &LinearbEngine, _args: Value) -> Result<String> {
        engine.supported_metrics()
    }
}

/// Handler for get_metrics_by_category tool
pub struct GetMetricsByCategoryHandler;

#[async_trait::async_trait]
impl ToolHandler for GetMetricsByCategoryHandler {
    fn name(&self) -> &'static str {
        "get_metrics_by_category"
    }

    async fn execute(&self, engine: &LinearbEngine, args: Value) -> Result<String> {
        engine.metrics_by_category(args.get_str("category"))
    }
}

/// Handler for search_metrics tool
pub struct SearchMetricsHandler;

#[async_trait::async_trait]
impl ToolHandler for SearchMetricsHandler {
    fn name(&self) -> &'static str {
        "search_metrics"
    }

    async fn execute(&self, engine: &LinearbEngine, args: Value) -> Result<String> {
        engine.search_metrics(
            args.get_str("search_term").unwrap_or(""),
            args.get_str("category"),
            args.get_bool("has_aggregation"),
        )
    }
}

/// Handler for get_metric_examples tool
pub struct GetMetricExamplesHandler;

#[async_trait::async_trait]
impl ToolHandler for GetMetricExamplesHandler {
    fn name(&self) -> &'static str {
        "get_metric_examples"
    }

    async fn execute(&self, engine: &LinearbEngine, _args: Value) -> Result<String> {
        engine.metric_examples()
    }
}
