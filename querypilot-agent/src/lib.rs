pub mod config;
pub mod sql_generation;

use async_trait::async_trait;
use querypilot_llm::tools::Tool;
use querypilot_tools::types::{
    GetSchemaContextRequest, RunSqlQueryRequest, ToolRequest, ToolResponse,
};

/// Represents the tools exposed to a calling framework
#[derive(Debug, Clone, PartialEq)]
pub enum AgentTool {
    GetSchemaContext,
    RunSqlQuery,
}

impl AgentTool {
    /// Returns the tool name as used in ToolRequest
    pub fn name(&self) -> &'static str {
        match self {
            AgentTool::GetSchemaContext => "get_schema_context",
            AgentTool::RunSqlQuery => "run_sql_query",
        }
    }

    /// Convert AgentTool to a querypilot-llm Tool definition
    pub fn to_tool_definition(&self) -> Tool {
        match self {
            AgentTool::GetSchemaContext => Tool::from_type::<GetSchemaContextRequest>()
                .name(self.name())
                .description(
                    "Retrieve the entire sql schema base as a formatted string. \
                     Returns structured db metadata for the configured schema.",
                )
                .build(),
            AgentTool::RunSqlQuery => Tool::from_type::<RunSqlQueryRequest>()
                .name(self.name())
                .description(
                    "Execute one sql statement and return the result rows or \
                     execution status as formatted JSON.",
                )
                .build(),
        }
    }

    /// Parse a framework tool call into a typed ToolRequest
    pub fn parse_tool_call(
        name: &str,
        arguments: serde_json::Value,
    ) -> anyhow::Result<ToolRequest> {
        let request = match name {
            "get_schema_context" => {
                let req: GetSchemaContextRequest = serde_json::from_value(arguments)?;
                ToolRequest::GetSchemaContext(req)
            }
            "run_sql_query" => {
                let req: RunSqlQueryRequest = serde_json::from_value(arguments)?;
                ToolRequest::RunSqlQuery(req)
            }
            _ => anyhow::bail!("Unknown tool: {}", name),
        };

        Ok(request)
    }
}

/// Format a ToolResponse for display to a model or a human
pub fn format_tool_response(response: &ToolResponse) -> String {
    match response {
        ToolResponse::SchemaContext(r) => format!(
            "Schema context for '{}' ({} tables):\n{}",
            r.schema_name,
            r.tables.len(),
            r.schema_json
        ),
        ToolResponse::SqlQuery(r) => format!("Executed: {}\n{}", r.query, r.result_json),
        ToolResponse::Error(e) => format!("Error: {}", e.message),
    }
}

/// Trait defining the structure and behavior of an agent
#[async_trait]
pub trait Agent: Send + Sync {
    /// Returns the agent's clear objective
    fn objective(&self) -> &str;

    /// Returns the system prompt for the agent
    fn system_prompt(&self) -> String;

    /// Returns the list of tools available to this agent
    fn tools(&self) -> Vec<AgentTool>;

    /// Execute the agent with the given user prompt
    async fn execute(&self, user_prompt: &str) -> anyhow::Result<String>;
}
