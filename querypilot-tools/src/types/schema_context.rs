use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A foreign key reference carried by a column.
///
/// `table` is schema-qualified (`"<schema>.<table>"`). The pair is expected
/// to resolve to a column elsewhere in a fetched schema context; the filter
/// operations do not validate this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ForeignKeyRef {
    pub table: String,
    pub column: String,
}

/// One column of a structured table.
///
/// `primary_key` and `foreign_key` are mutually exclusive; the structurer
/// never sets both, and both are omitted from the serialized form when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<ForeignKeyRef>,
}

impl ColumnSchema {
    /// A plain column with neither constraint flag set.
    pub fn plain<S: Into<String>, T: Into<String>>(name: S, data_type: T) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            primary_key: None,
            foreign_key: None,
        }
    }
}

/// One table of a schema context. `table` is schema-qualified and `columns`
/// keeps the ordinal order of the source schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TableSchema {
    pub table: String,
    pub columns: Vec<ColumnSchema>,
}

/// Foreign-key-only view of a table, produced by `extract_foreign_keys`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableForeignKeys {
    pub table: String,
    pub foreign_keys: Vec<ColumnSchema>,
}

/// Columns of one table relevant to a join target, produced by
/// `extract_relevant_foreign_keys`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevantColumns {
    pub table: String,
    pub columns: Vec<ColumnSchema>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct GetSchemaContextRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(
        description = "Optional: schema to introspect. Defaults to the configured default schema."
    )]
    pub schema_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SchemaContextResponse {
    /// Schema that was introspected
    pub schema_name: String,

    /// Structured tables, one entry per table, columns in ordinal order
    pub tables: Vec<TableSchema>,

    /// JSON-serialized schema context, exactly as embedded into model prompts
    pub schema_json: String,
}
