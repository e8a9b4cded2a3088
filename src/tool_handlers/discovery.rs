//! Discovery and reference tool handlers.

use anyhow::Result;
use serde_json::Value;

use super::{ArgExtractor, ToolHandler};
use crate::engine::LinearbEngine;
use crate::error::ToolError;

/// Handler for discover_api tool
pub struct DiscoverApiHandler;

#[async_trait::async_trait]
impl ToolHandler for DiscoverApiHandler {
    fn name(&self) -> &'static str {
        "discover_api"
    }

    async fn execute(&self, engine: &LinearbEngine, _args: Value) -> Result<String> {
        engine.discover_api()
    }
}

/// Handler for get_endpoint_details tool
pub struct GetEndpointDetailsHandler;

#[async_trait::async_trait]
impl ToolHandler for GetEndpointDetailsHandler {
    fn name(&self) -> &'static str {
        "get_endpoint_details"
    }

    async fn execute(&self, engine: &LinearbEngine, args: Value) -> Result<String> {
        let path = args
            .get_str("endpoint_path")
            .ok_or_else(|| ToolError::InvalidArgument("endpoint_path is required".into()))?;
        let method = args.get_str("method").unwrap_or("GET");
        engine.endpoint_details(path, method)
    }
}

/// Handler for get_api_categories tool
pub struct GetApiCategoriesHandler;

#[async_trait::async_trait]
impl ToolHandler for GetApiCategoriesHandler {
    fn name(&self) -> &'static str {
        "get_api_categories"
    }

    async fn execute(&self, engine: &LinearbEngine, _args: Value) -> Result<String> {
        engine.api_categories()
    }
}

/// Handler for get_usage_examples tool
pub struct GetUsageExamplesHandler;

#[async_trait::async_trait]
impl ToolHandler for GetUsageExamplesHandler {
    fn name(&self) -> &'static str {
        "get_usage_examples"
    }

    async fn execute(&self, engine: &LinearbEngine, args: Value) -> Result<String> {
        engine.usage_examples(args.get_str("category"), args.get_str("tool_name"))
    }
}

/// Handler for get_documentation_files tool
pub struct GetDocumentationFilesHandler;

#[async_trait::async_trait]
impl ToolHandler for GetDocumentationFilesHandler {
    fn name(&self) -> &'static str {
        "get_documentation_files"
    }

    async fn execute(&self, engine: &LinearbEngine, _args: Value) -> Result<String> {
        engine.documentation_files()
    }
}
