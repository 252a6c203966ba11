//! Foreign-key relevance filters over an already-structured schema context.
//!
//! `extract_required_tables` and `extract_foreign_keys` accept per-table
//! serialized entries as they arrive from a tool-call boundary; entries that
//! do not parse as tables are skipped with a diagnostic so one bad record
//! never aborts the batch.

use crate::types::{ColumnSchema, RelevantColumns, TableForeignKeys, TableSchema};

/// Keep only the serialized table entries whose qualified name is in
/// `required_tables`. Input order is preserved; names absent from the input
/// are silently omitted.
pub fn extract_required_tables(entries: &[String], required_tables: &[String]) -> Vec<TableSchema> {
    let mut filtered = Vec::new();

    for entry in entries {
        match serde_json::from_str::<TableSchema>(entry) {
            Ok(table) => {
                if required_tables.iter().any(|name| name == &table.table) {
                    filtered.push(table);
                }
            }
            Err(e) => tracing::warn!("Skipping invalid table entry: {}", e),
        }
    }

    filtered
}

/// For each table, keep only the columns carrying a foreign key. Tables with
/// zero foreign-key columns are omitted entirely.
pub fn extract_foreign_keys(entries: &[String]) -> Vec<TableForeignKeys> {
    let mut foreign_key_tables = Vec::new();

    for entry in entries {
        match serde_json::from_str::<TableSchema>(entry) {
            Ok(table) => {
                let fk_columns: Vec<ColumnSchema> = table
                    .columns
                    .into_iter()
                    .filter(|col| col.foreign_key.is_some())
                    .collect();

                if !fk_columns.is_empty() {
                    foreign_key_tables.push(TableForeignKeys {
                        table: table.table,
                        foreign_keys: fk_columns,
                    });
                }
            }
            Err(e) => tracing::warn!("Skipping invalid table entry: {}", e),
        }
    }

    foreign_key_tables
}

/// For each table, collect the columns whose foreign key references
/// `(target_table, target_column)` together with the table's primary-key
/// columns, which are kept unconditionally. Tables contributing no qualifying
/// column are omitted.
pub fn extract_relevant_foreign_keys(
    tables: &[TableSchema],
    target_table: &str,
    target_column: &str,
) -> Vec<RelevantColumns> {
    let mut result = Vec::new();

    for table in tables {
        let columns: Vec<ColumnSchema> = table
            .columns
            .iter()
            .filter(|col| match &col.foreign_key {
                Some(fk) => fk.table == target_table && fk.column == target_column,
                None => col.primary_key == Some(true),
            })
            .cloned()
            .collect();

        if !columns.is_empty() {
            result.push(RelevantColumns {
                table: table.table.clone(),
                columns,
            });
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ForeignKeyRef;

    fn users_table() -> TableSchema {
        TableSchema {
            table: "auth.users".to_string(),
            columns: vec![
                ColumnSchema {
                    primary_key: Some(true),
                    ..ColumnSchema::plain("id", "uuid")
                },
                ColumnSchema::plain("email", "text"),
            ],
        }
    }

    fn orders_table() -> TableSchema {
        TableSchema {
            table: "auth.orders".to_string(),
            columns: vec![
                ColumnSchema {
                    primary_key: Some(true),
                    ..ColumnSchema::plain("id", "bigint")
                },
                ColumnSchema {
                    foreign_key: Some(ForeignKeyRef {
                        table: "auth.users".to_string(),
                        column: "id".to_string(),
                    }),
                    ..ColumnSchema::plain("user_id", "uuid")
                },
                ColumnSchema::plain("total", "numeric"),
            ],
        }
    }

    fn notes_table() -> TableSchema {
        TableSchema {
            table: "auth.notes".to_string(),
            columns: vec![ColumnSchema::plain("body", "text")],
        }
    }

    fn serialize(tables: &[TableSchema]) -> Vec<String> {
        tables
            .iter()
            .map(|t| serde_json::to_string(t).unwrap())
            .collect()
    }

    #[test]
    fn test_extract_required_tables_preserves_order_and_omits_missing() {
        let entries = serialize(&[users_table(), orders_table(), notes_table()]);
        let required = vec![
            "auth.notes".to_string(),
            "auth.users".to_string(),
            "auth.missing".to_string(),
        ];

        let filtered = extract_required_tables(&entries, &required);

        let names: Vec<&str> = filtered.iter().map(|t| t.table.as_str()).collect();
        assert_eq!(names, vec!["auth.users", "auth.notes"]);
    }

    #[test]
    fn test_extract_required_tables_skips_invalid_entries() {
        let mut entries = serialize(&[users_table()]);
        entries.insert(0, "not json at all".to_string());
        entries.push("{\"unexpected\": 1}".to_string());

        let filtered = extract_required_tables(&entries, &["auth.users".to_string()]);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].table, "auth.users");
    }

    #[test]
    fn test_extract_foreign_keys_omits_tables_without_any() {
        let entries = serialize(&[users_table(), orders_table(), notes_table()]);

        let fk_tables = extract_foreign_keys(&entries);

        assert_eq!(fk_tables.len(), 1);
        assert_eq!(fk_tables[0].table, "auth.orders");
        assert_eq!(fk_tables[0].foreign_keys.len(), 1);
        assert_eq!(fk_tables[0].foreign_keys[0].name, "user_id");
    }

    #[test]
    fn test_extract_relevant_foreign_keys_keeps_match_plus_primary_keys() {
        let tables = vec![users_table(), orders_table(), notes_table()];

        let relevant = extract_relevant_foreign_keys(&tables, "auth.users", "id");

        // users contributes its primary key, orders its pk and the matching fk,
        // notes contributes nothing and is absent
        assert_eq!(relevant.len(), 2);

        assert_eq!(relevant[0].table, "auth.users");
        assert_eq!(relevant[0].columns.len(), 1);
        assert_eq!(relevant[0].columns[0].name, "id");

        assert_eq!(relevant[1].table, "auth.orders");
        let names: Vec<&str> = relevant[1].columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "user_id"]);
    }

    #[test]
    fn test_extract_relevant_foreign_keys_ignores_other_targets() {
        let tables = vec![orders_table()];

        let relevant = extract_relevant_foreign_keys(&tables, "auth.products", "id");

        // the fk does not match, but the primary key still qualifies the table
        assert_eq!(relevant.len(), 1);
        assert_eq!(relevant[0].columns.len(), 1);
        assert_eq!(relevant[0].columns[0].name, "id");
    }
}
