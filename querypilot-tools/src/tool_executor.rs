use crate::config::DatabaseConfig;
use crate::schema_context;
use crate::sql_runner;
use crate::tool_error::ToolError;
use crate::types::{SchemaContextResponse, ToolErrorResponse, ToolRequest, ToolResponse};
use serde_json::Value;

/// Dispatches tool requests against one configured database.
///
/// Both operations are stateless; every call opens and fully releases its own
/// connection, so an executor can be shared freely across requests.
pub struct ToolExecutor {
    db: DatabaseConfig,
}

impl ToolExecutor {
    pub fn new(db: DatabaseConfig) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &DatabaseConfig {
        &self.db
    }

    /// Execute a tool request and return a tool response
    pub async fn execute(&self, request: ToolRequest) -> Result<ToolResponse, ToolError> {
        match request {
            ToolRequest::GetSchemaContext(req) => {
                let schema_name = req
                    .schema_name
                    .unwrap_or_else(|| self.db.schema.clone());

                let rows = schema_context::fetch_schema_rows(&self.db, &schema_name).await?;
                let tables = schema_context::structure_table_metadata(&rows);
                let schema_json = schema_context::serialize_schema_context(&tables)?;

                Ok(ToolResponse::SchemaContext(SchemaContextResponse {
                    schema_name,
                    tables,
                    schema_json,
                }))
            }
            ToolRequest::RunSqlQuery(req) => {
                let response = sql_runner::run_sql_query(&self.db, &req.query).await?;
                Ok(ToolResponse::SqlQuery(response))
            }
        }
    }

    /// Execute a tool request arriving as raw JSON from an external caller.
    ///
    /// Failures are folded into the error envelope instead of propagating, so
    /// a framework boundary always receives a serializable response.
    pub async fn execute_from_json(&self, json_request: Value) -> Value {
        let request: ToolRequest = match serde_json::from_value(json_request) {
            Ok(request) => request,
            Err(e) => return error_envelope("unknown", "invalid_request", &e.to_string()),
        };

        let tool = request.tool_name();
        match self.execute(request).await {
            Ok(response) => serde_json::to_value(&response)
                .unwrap_or_else(|e| error_envelope(tool, "serialization", &e.to_string())),
            Err(e) => error_envelope(tool, e.kind(), &e.to_string()),
        }
    }
}

fn error_envelope(tool: &str, error: &str, message: &str) -> Value {
    let response = ToolResponse::Error(ToolErrorResponse {
        tool: tool.to_string(),
        error: error.to_string(),
        message: message.to_string(),
    });
    // The envelope itself is plain strings and cannot fail to serialize
    serde_json::to_value(&response).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn executor() -> ToolExecutor {
        ToolExecutor::new(DatabaseConfig {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "test".to_string(),
            user: "test".to_string(),
            password: "test".to_string(),
            schema: "public".to_string(),
        })
    }

    #[test]
    fn test_tool_request_round_trips_through_tagged_json() {
        let json = serde_json::json!({
            "type": "run_sql_query",
            "query": "SELECT 1",
        });

        let request: ToolRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.tool_name(), "run_sql_query");

        let json = serde_json::json!({
            "type": "get_schema_context",
        });

        let request: ToolRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.tool_name(), "get_schema_context");
    }

    #[tokio::test]
    async fn test_unknown_tool_becomes_error_envelope() {
        let value = executor()
            .execute_from_json(serde_json::json!({"type": "drop_database"}))
            .await;

        assert_eq!(value["type"], serde_json::json!("error"));
        assert_eq!(value["error"], serde_json::json!("invalid_request"));
    }
}
