//! Schema introspection and structuring.
//!
//! One introspection query per named schema returns flat column/constraint
//! rows; [`structure_table_metadata`] folds those into one entry per table
//! with ordered columns, primary-key flags, and foreign-key references. The
//! structured context is serialized to JSON and embedded verbatim into the
//! model prompt, so column order is significant end-to-end.
//!
//! The context is rebuilt from the database on every call; the live schema is
//! authoritative and nothing is cached.

use crate::config::DatabaseConfig;
use crate::tool_error::ToolError;
use crate::types::{ColumnSchema, ForeignKeyRef, TableSchema};
use sqlx::postgres::{PgConnection, PgRow};
use sqlx::{Connection, Row};
use std::collections::HashMap;

pub mod filter;

pub use filter::{extract_foreign_keys, extract_relevant_foreign_keys, extract_required_tables};

/// Column, constraint, and foreign key info for one schema, one row per
/// column/constraint pairing, ordered by table name and ordinal position.
const SCHEMA_ROWS_QUERY: &str = "
SELECT DISTINCT
    c.table_schema,
    c.table_name,
    c.column_name,
    c.data_type,
    c.ordinal_position,
    tc.constraint_type,
    kcu.constraint_name,
    ccu.table_name AS foreign_table_name,
    ccu.column_name AS foreign_column_name
FROM information_schema.columns c
LEFT JOIN information_schema.key_column_usage kcu
    ON c.table_name = kcu.table_name
    AND c.column_name = kcu.column_name
    AND c.table_schema = kcu.table_schema
LEFT JOIN information_schema.table_constraints tc
    ON kcu.constraint_name = tc.constraint_name
    AND kcu.table_schema = tc.table_schema
LEFT JOIN information_schema.constraint_column_usage ccu
    ON tc.constraint_name = ccu.constraint_name
    AND tc.table_schema = ccu.table_schema
WHERE c.table_schema = $1
ORDER BY c.table_name, c.ordinal_position
";

/// One raw introspection row. Constraint fields are null for columns that
/// carry no constraint.
#[derive(Debug, Clone)]
pub struct SchemaRow {
    pub table_schema: String,
    pub table_name: String,
    pub column_name: String,
    pub data_type: String,
    pub ordinal_position: i32,
    pub constraint_type: Option<String>,
    pub constraint_name: Option<String>,
    pub foreign_table_name: Option<String>,
    pub foreign_column_name: Option<String>,
}

impl SchemaRow {
    fn from_pg_row(row: &PgRow) -> Result<Self, ToolError> {
        fn get<'r, T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>>(
            row: &'r PgRow,
            name: &str,
        ) -> Result<T, ToolError> {
            row.try_get(name)
                .map_err(|e| ToolError::MalformedRow(format!("{}: {}", name, e)))
        }

        Ok(Self {
            table_schema: get(row, "table_schema")?,
            table_name: get(row, "table_name")?,
            column_name: get(row, "column_name")?,
            data_type: get(row, "data_type")?,
            ordinal_position: get(row, "ordinal_position")?,
            constraint_type: get(row, "constraint_type")?,
            constraint_name: get(row, "constraint_name")?,
            foreign_table_name: get(row, "foreign_table_name")?,
            foreign_column_name: get(row, "foreign_column_name")?,
        })
    }
}

/// Fetch raw column, constraint, and foreign key info for one schema.
///
/// Opens one dedicated connection for this call and closes it on every exit
/// path.
pub async fn fetch_schema_rows(
    config: &DatabaseConfig,
    schema_name: &str,
) -> Result<Vec<SchemaRow>, ToolError> {
    let mut conn = config
        .connect()
        .await
        .map_err(|e| ToolError::SchemaFetch(format!("Failed to connect to database: {}", e)))?;

    let result = fetch_rows_inner(&mut conn, schema_name).await;

    if let Err(e) = conn.close().await {
        tracing::debug!("Error closing introspection connection: {}", e);
    }

    result
}

async fn fetch_rows_inner(
    conn: &mut PgConnection,
    schema_name: &str,
) -> Result<Vec<SchemaRow>, ToolError> {
    let rows = sqlx::query(SCHEMA_ROWS_QUERY)
        .bind(schema_name)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| ToolError::SchemaFetch(format!("Introspection query failed: {}", e)))?;

    rows.iter().map(SchemaRow::from_pg_row).collect()
}

/// Fold raw introspection rows into one entry per table, columns in input
/// order.
///
/// Tables are keyed by their schema-qualified name, so same-named tables in
/// different schemas stay separate. `PRIMARY KEY` rows flag the column,
/// `FOREIGN KEY` rows attach the qualified reference, and rows with no
/// constraint contribute a plain column.
pub fn structure_table_metadata(rows: &[SchemaRow]) -> Vec<TableSchema> {
    let mut order: Vec<String> = Vec::new();
    let mut tables: HashMap<String, TableSchema> = HashMap::new();

    for row in rows {
        let qualified = format!("{}.{}", row.table_schema, row.table_name);

        let mut column = ColumnSchema::plain(row.column_name.clone(), row.data_type.clone());
        match row.constraint_type.as_deref() {
            Some("PRIMARY KEY") => column.primary_key = Some(true),
            Some("FOREIGN KEY") => {
                if let (Some(foreign_table), Some(foreign_column)) = (
                    row.foreign_table_name.as_deref(),
                    row.foreign_column_name.as_deref(),
                ) {
                    column.foreign_key = Some(ForeignKeyRef {
                        table: format!("{}.{}", row.table_schema, foreign_table),
                        column: foreign_column.to_string(),
                    });
                }
            }
            _ => {}
        }

        let entry = tables.entry(qualified.clone()).or_insert_with(|| {
            order.push(qualified.clone());
            TableSchema {
                table: qualified.clone(),
                columns: Vec::new(),
            }
        });
        entry.columns.push(column);
    }

    order
        .into_iter()
        .filter_map(|key| tables.remove(&key))
        .collect()
}

/// Serialize a structured schema context the way it is embedded into prompts.
pub fn serialize_schema_context(tables: &[TableSchema]) -> Result<String, ToolError> {
    serde_json::to_string_pretty(tables)
        .map_err(|e| ToolError::SchemaFetch(format!("Failed to serialize schema context: {}", e)))
}

/// Returns the final JSON schema context string for one schema.
pub async fn get_schema_context(
    config: &DatabaseConfig,
    schema_name: &str,
) -> Result<String, ToolError> {
    let rows = fetch_schema_rows(config, schema_name).await?;
    let structured = structure_table_metadata(&rows);
    serialize_schema_context(&structured)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        schema: &str,
        table: &str,
        column: &str,
        data_type: &str,
        ordinal: i32,
        constraint: Option<&str>,
    ) -> SchemaRow {
        SchemaRow {
            table_schema: schema.to_string(),
            table_name: table.to_string(),
            column_name: column.to_string(),
            data_type: data_type.to_string(),
            ordinal_position: ordinal,
            constraint_type: constraint.map(|s| s.to_string()),
            constraint_name: constraint.map(|_| "c".to_string()),
            foreign_table_name: None,
            foreign_column_name: None,
        }
    }

    fn fk_row(
        schema: &str,
        table: &str,
        column: &str,
        ordinal: i32,
        foreign_table: &str,
        foreign_column: &str,
    ) -> SchemaRow {
        SchemaRow {
            foreign_table_name: Some(foreign_table.to_string()),
            foreign_column_name: Some(foreign_column.to_string()),
            ..row(schema, table, column, "integer", ordinal, Some("FOREIGN KEY"))
        }
    }

    #[test]
    fn test_one_entry_per_table_in_input_order() {
        let rows = vec![
            row("auth", "sessions", "id", "uuid", 1, Some("PRIMARY KEY")),
            row("auth", "sessions", "token", "text", 2, None),
            row("auth", "users", "id", "uuid", 1, Some("PRIMARY KEY")),
            row("auth", "users", "email", "text", 2, None),
            row("auth", "users", "created_at", "timestamp", 3, None),
        ];

        let tables = structure_table_metadata(&rows);

        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].table, "auth.sessions");
        assert_eq!(tables[1].table, "auth.users");

        let names: Vec<&str> = tables[1].columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "email", "created_at"]);
    }

    #[test]
    fn test_primary_key_never_carries_foreign_key() {
        let rows = vec![
            row("auth", "users", "id", "uuid", 1, Some("PRIMARY KEY")),
            fk_row("auth", "orders", "user_id", 1, "users", "id"),
            row("auth", "orders", "note", "text", 2, None),
        ];

        let tables = structure_table_metadata(&rows);

        for table in &tables {
            for column in &table.columns {
                assert!(
                    !(column.primary_key == Some(true) && column.foreign_key.is_some()),
                    "column {} has both flags",
                    column.name
                );
            }
        }

        let pk = &tables[0].columns[0];
        assert_eq!(pk.primary_key, Some(true));
        assert!(pk.foreign_key.is_none());

        let fk = &tables[1].columns[0];
        assert!(fk.primary_key.is_none());
        assert_eq!(
            fk.foreign_key,
            Some(ForeignKeyRef {
                table: "auth.users".to_string(),
                column: "id".to_string(),
            })
        );
    }

    #[test]
    fn test_plain_column_has_no_flags() {
        let rows = vec![row("public", "notes", "body", "text", 1, None)];
        let tables = structure_table_metadata(&rows);

        let column = &tables[0].columns[0];
        assert!(column.primary_key.is_none());
        assert!(column.foreign_key.is_none());
    }

    #[test]
    fn test_same_table_name_in_two_schemas_stays_separate() {
        let rows = vec![
            row("auth", "users", "id", "uuid", 1, Some("PRIMARY KEY")),
            row("crm", "users", "id", "bigint", 1, Some("PRIMARY KEY")),
        ];

        let tables = structure_table_metadata(&rows);

        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].table, "auth.users");
        assert_eq!(tables[1].table, "crm.users");
    }

    #[test]
    fn test_foreign_key_row_without_reference_becomes_plain_column() {
        let mut incomplete = row("auth", "orders", "user_id", "integer", 1, Some("FOREIGN KEY"));
        incomplete.foreign_table_name = None;

        let tables = structure_table_metadata(&[incomplete]);
        assert!(tables[0].columns[0].foreign_key.is_none());
    }

    #[test]
    fn test_serialized_context_omits_absent_flags() {
        let rows = vec![
            row("auth", "users", "id", "uuid", 1, Some("PRIMARY KEY")),
            row("auth", "users", "email", "text", 2, None),
        ];
        let json = serialize_schema_context(&structure_table_metadata(&rows)).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let columns = value[0]["columns"].as_array().unwrap();
        assert_eq!(columns[0]["primary_key"], serde_json::json!(true));
        assert!(columns[1].get("primary_key").is_none());
        assert!(columns[1].get("foreign_key").is_none());
        assert_eq!(columns[1]["type"], serde_json::json!("text"));
    }
}
