use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Tool request enum containing all exposed tool operations
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum ToolRequest {
    #[serde(rename = "get_schema_context")]
    GetSchemaContext(super::schema_context::GetSchemaContextRequest),
    #[serde(rename = "run_sql_query")]
    RunSqlQuery(super::sql_runner::RunSqlQueryRequest),
}

impl ToolRequest {
    /// Returns the tool name this request targets
    pub fn tool_name(&self) -> &'static str {
        match self {
            ToolRequest::GetSchemaContext(_) => "get_schema_context",
            ToolRequest::RunSqlQuery(_) => "run_sql_query",
        }
    }
}

/// Tool response enum containing all possible tool results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolResponse {
    #[serde(rename = "schema_context")]
    SchemaContext(super::schema_context::SchemaContextResponse),
    #[serde(rename = "sql_query")]
    SqlQuery(super::sql_runner::RunSqlQueryResponse),
    #[serde(rename = "error")]
    Error(ToolErrorResponse),
}

/// Error envelope for tool execution failures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolErrorResponse {
    pub tool: String,
    pub error: String,
    pub message: String,
}
