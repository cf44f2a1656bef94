//! Pipeline event model
//!
//! Unified events handed to downstream operators, regardless of which
//! connector produced the source record.

use crate::common::schema_change::SchemaChangeEvent;
use crate::common::table_id::TableId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Row-level operation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationType {
    /// Row inserted (or read during snapshot)
    Insert,
    /// Row updated
    Update,
    /// Row deleted
    Delete,
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationType::Insert => write!(f, "INSERT"),
            OperationType::Update => write!(f, "UPDATE"),
            OperationType::Delete => write!(f, "DELETE"),
        }
    }
}

/// A row-level change on one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataChangeEvent {
    /// Table the row belongs to
    pub table_id: TableId,
    /// Operation type
    pub op: OperationType,
    /// Row image before the change (UPDATE in `All` mode, DELETE)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,
    /// Row image after the change (INSERT, UPDATE)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,
    /// Connector-specific metadata
    #[serde(default)]
    pub meta: HashMap<String, String>,
}

impl DataChangeEvent {
    /// Create an INSERT event
    pub fn insert(
        table_id: TableId,
        after: serde_json::Value,
        meta: HashMap<String, String>,
    ) -> Self {
        Self {
            table_id,
            op: OperationType::Insert,
            before: None,
            after: Some(after),
            meta,
        }
    }

    /// Create an UPDATE event
    pub fn update(
        table_id: TableId,
        before: Option<serde_json::Value>,
        after: serde_json::Value,
        meta: HashMap<String, String>,
    ) -> Self {
        Self {
            table_id,
            op: OperationType::Update,
            before,
            after: Some(after),
            meta,
        }
    }

    /// Create a DELETE event
    pub fn delete(
        table_id: TableId,
        before: serde_json::Value,
        meta: HashMap<String, String>,
    ) -> Self {
        Self {
            table_id,
            op: OperationType::Delete,
            before: Some(before),
            after: None,
            meta,
        }
    }
}

/// Event emitted by the envelope deserializer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    DataChange(DataChangeEvent),
    SchemaChange(SchemaChangeEvent),
}

impl Event {
    /// Table this event applies to.
    pub fn table_id(&self) -> &TableId {
        match self {
            Event::DataChange(e) => &e.table_id,
            Event::SchemaChange(e) => e.table_id(),
        }
    }

    /// True for row-level events.
    pub fn is_data_change(&self) -> bool {
        matches!(self, Event::DataChange(_))
    }

    /// The row-level event, if this is one.
    pub fn as_data_change(&self) -> Option<&DataChangeEvent> {
        match self {
            Event::DataChange(e) => Some(e),
            Event::SchemaChange(_) => None,
        }
    }
}
