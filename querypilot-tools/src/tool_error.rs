use thiserror::Error;

/// Errors surfaced by the database-facing tools.
#[derive(Error, Debug)]
pub enum ToolError {
    /// Tool arguments or configuration were rejected before touching the database
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The database was unreachable or the introspection query failed
    #[error("Schema introspection failed: {0}")]
    SchemaFetch(String),

    /// An introspection row was missing expected fields or could not be decoded
    #[error("Malformed introspection row: {0}")]
    MalformedRow(String),

    /// A statement failed at the database
    #[error("Query execution failed: {0}")]
    QueryExecution(String),
}

impl ToolError {
    /// Stable machine-readable kind, used in error envelopes.
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::InvalidInput(_) => "invalid_input",
            ToolError::SchemaFetch(_) => "schema_fetch",
            ToolError::MalformedRow(_) => "malformed_row",
            ToolError::QueryExecution(_) => "query_execution",
        }
    }
}
