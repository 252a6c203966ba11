use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RunSqlQueryRequest {
    #[schemars(
        description = "SQL statement to execute. A raw model response is accepted: the first ```sql fenced block is extracted and flattened to one line before execution."
    )]
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RunSqlQueryResponse {
    /// The statement actually executed, after extraction and flattening
    pub query: String,

    /// JSON-serialized result: `{"rows": [...]}` for statements that produce
    /// output, `{"status": "Query executed successfully"}` otherwise
    pub result_json: String,
}
