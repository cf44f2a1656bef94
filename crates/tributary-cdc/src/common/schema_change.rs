//! # Schema Change Events
//!
//! Table-structure changes in the pipeline event model. Connectors that can
//! derive them from their schema-change records emit these through a
//! [`SchemaChangeParser`](crate::common::SchemaChangeParser); the MySQL
//! connector does not derive any yet.

use crate::common::table_id::TableId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Type of schema change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchemaChangeType {
    CreateTable,
    AddColumn,
    DropColumn,
    RenameColumn,
    AlterColumnType,
}

impl SchemaChangeType {
    /// Get a human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            SchemaChangeType::CreateTable => "CREATE TABLE",
            SchemaChangeType::AddColumn => "ADD COLUMN",
            SchemaChangeType::DropColumn => "DROP COLUMN",
            SchemaChangeType::RenameColumn => "RENAME COLUMN",
            SchemaChangeType::AlterColumnType => "ALTER COLUMN TYPE",
        }
    }
}

impl std::fmt::Display for SchemaChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Column definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Database-native type (e.g. "varchar(255)", "int")
    pub type_name: String,
    /// Is nullable
    pub nullable: bool,
    /// Column comment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Column {
    /// Create a nullable column.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            nullable: true,
            comment: None,
        }
    }

    /// Set nullable.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Set comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Where an added column goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnPosition {
    First,
    Last,
    After(String),
}

/// A column added by [`SchemaChangeEvent::AddColumn`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedColumn {
    pub column: Column,
    pub position: ColumnPosition,
}

/// Schema change event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchemaChangeEvent {
    CreateTable {
        table_id: TableId,
        columns: Vec<Column>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        primary_keys: Vec<String>,
    },
    AddColumn {
        table_id: TableId,
        columns: Vec<AddedColumn>,
    },
    DropColumn {
        table_id: TableId,
        columns: Vec<String>,
    },
    /// Old name to new name
    RenameColumn {
        table_id: TableId,
        renames: BTreeMap<String, String>,
    },
    /// Column name to new type
    AlterColumnType {
        table_id: TableId,
        type_mapping: BTreeMap<String, String>,
    },
}

impl SchemaChangeEvent {
    pub fn table_id(&self) -> &TableId {
        match self {
            SchemaChangeEvent::CreateTable { table_id, .. }
            | SchemaChangeEvent::AddColumn { table_id, .. }
            | SchemaChangeEvent::DropColumn { table_id, .. }
            | SchemaChangeEvent::RenameColumn { table_id, .. }
            | SchemaChangeEvent::AlterColumnType { table_id, .. } => table_id,
        }
    }

    pub fn change_type(&self) -> SchemaChangeType {
        match self {
            SchemaChangeEvent::CreateTable { .. } => SchemaChangeType::CreateTable,
            SchemaChangeEvent::AddColumn { .. } => SchemaChangeType::AddColumn,
            SchemaChangeEvent::DropColumn { .. } => SchemaChangeType::DropColumn,
            SchemaChangeEvent::RenameColumn { .. } => SchemaChangeType::RenameColumn,
            SchemaChangeEvent::AlterColumnType { .. } => SchemaChangeType::AlterColumnType,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_type() {
        let event = SchemaChangeEvent::DropColumn {
            table_id: TableId::new("inventory", "orders"),
            columns: vec!["legacy_flag".to_string()],
        };
        assert_eq!(event.change_type(), SchemaChangeType::DropColumn);
        assert_eq!(event.change_type().to_string(), "DROP COLUMN");
        assert_eq!(event.table_id().table_name, "orders");
    }

    #[test]
    fn test_serialization_tag() {
        let event = SchemaChangeEvent::AddColumn {
            table_id: TableId::new("inventory", "orders"),
            columns: vec![AddedColumn {
                column: Column::new("note", "varchar(64)").with_comment("free text"),
                position: ColumnPosition::After("qty".to_string()),
            }],
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "add_column");
        assert_eq!(json["columns"][0]["column"]["name"], "note");
        assert_eq!(json["columns"][0]["position"]["after"], "qty");

        let parsed: SchemaChangeEvent = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_column_builder() {
        let column = Column::new("id", "bigint").with_nullable(false);
        assert!(!column.nullable);
        assert!(column.comment.is_none());
    }
}
