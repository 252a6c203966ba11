//! Single-statement query execution with one normalized output contract.
//!
//! Statements that produce a row descriptor (`SELECT`, `... RETURNING`) come
//! back as `{"rows": [...]}`, each row a mapping from column name to JSON
//! value. Statements without one (DDL/DML) come back as
//! `{"status": "Query executed successfully"}`. Every failure is caught at
//! this boundary and reported as [`ToolError::QueryExecution`].

use crate::config::DatabaseConfig;
use crate::tool_error::ToolError;
use crate::types::RunSqlQueryResponse;
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::postgres::{PgConnection, PgRow};
use sqlx::{Column, Connection, Executor, Row, TypeInfo};

pub mod extract;

pub use extract::extract_sql_oneline;

/// Normalized result of one statement execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryOutput {
    Rows { rows: Vec<Map<String, Value>> },
    Status { status: String },
}

/// Execute one SQL statement and serialize its normalized result.
///
/// The input may be a raw model response; the first fenced ```sql block is
/// extracted and flattened first (a no-op on plain single-line SQL). One
/// dedicated connection is opened for this call and closed on every exit
/// path; there is no pooling and no reuse across requests.
pub async fn run_sql_query(
    config: &DatabaseConfig,
    query: &str,
) -> Result<RunSqlQueryResponse, ToolError> {
    let statement = extract_sql_oneline(query);
    tracing::info!(sql = %statement, "Running sql statement");

    if statement.trim().is_empty() {
        return Err(ToolError::QueryExecution(
            "Cannot execute an empty statement".to_string(),
        ));
    }

    let mut conn = config
        .connect()
        .await
        .map_err(|e| ToolError::QueryExecution(format!("Failed to connect to database: {}", e)))?;

    let result = execute_statement(&mut conn, &statement).await;

    if let Err(e) = conn.close().await {
        tracing::debug!("Error closing query connection: {}", e);
    }

    let output = result.map_err(|e| {
        tracing::warn!(sql = %statement, error = %e, "Statement failed");
        e
    })?;

    let result_json = serde_json::to_string_pretty(&output)
        .map_err(|e| ToolError::QueryExecution(format!("Failed to serialize result: {}", e)))?;

    Ok(RunSqlQueryResponse {
        query: statement,
        result_json,
    })
}

async fn execute_statement(
    conn: &mut PgConnection,
    statement: &str,
) -> Result<QueryOutput, ToolError> {
    // The statement descriptor tells row-producing statements apart from
    // acknowledgement-only ones before anything runs.
    let describe = (&mut *conn)
        .describe(statement)
        .await
        .map_err(|e| ToolError::QueryExecution(e.to_string()))?;

    if describe.columns().is_empty() {
        sqlx::query(statement)
            .execute(&mut *conn)
            .await
            .map_err(|e| ToolError::QueryExecution(e.to_string()))?;

        return Ok(QueryOutput::Status {
            status: "Query executed successfully".to_string(),
        });
    }

    let rows: Vec<PgRow> = sqlx::query(statement)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| ToolError::QueryExecution(e.to_string()))?;

    let mapped = rows.iter().map(row_to_map).collect();
    Ok(QueryOutput::Rows { rows: mapped })
}

fn row_to_map(row: &PgRow) -> Map<String, Value> {
    let mut map = Map::new();
    for (index, column) in row.columns().iter().enumerate() {
        let value = decode_value(row, index, column.type_info().name());
        map.insert(column.name().to_string(), value);
    }
    map
}

/// Decode one PostgreSQL value into JSON, falling back to a string rendering
/// for types without a native JSON shape.
fn decode_value(row: &PgRow, index: usize, type_name: &str) -> Value {
    match type_name {
        "BOOL" => row
            .try_get::<Option<bool>, _>(index)
            .ok()
            .flatten()
            .map(Value::Bool)
            .unwrap_or(Value::Null),
        "INT2" | "SMALLINT" => row
            .try_get::<Option<i16>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::Number(v.into()))
            .unwrap_or(Value::Null),
        "INT4" | "INT" | "INTEGER" => row
            .try_get::<Option<i32>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::Number(v.into()))
            .unwrap_or(Value::Null),
        "INT8" | "BIGINT" => row
            .try_get::<Option<i64>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::Number(v.into()))
            .unwrap_or(Value::Null),
        "FLOAT4" | "REAL" => row
            .try_get::<Option<f32>, _>(index)
            .ok()
            .flatten()
            .and_then(|v| serde_json::Number::from_f64(v as f64))
            .map(Value::Number)
            .unwrap_or(Value::Null),
        "FLOAT8" | "DOUBLE PRECISION" => row
            .try_get::<Option<f64>, _>(index)
            .ok()
            .flatten()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        "TEXT" | "VARCHAR" | "CHAR" | "NAME" => row
            .try_get::<Option<String>, _>(index)
            .ok()
            .flatten()
            .map(Value::String)
            .unwrap_or(Value::Null),
        "JSON" | "JSONB" => row
            .try_get::<Option<Value>, _>(index)
            .ok()
            .flatten()
            .unwrap_or(Value::Null),
        _ => row
            .try_get::<Option<String>, _>(index)
            .ok()
            .flatten()
            .map(Value::String)
            .unwrap_or(Value::Null),
    }
}
