//! Structural record classification
//!
//! Classification looks at the shape of a record (which parts are present,
//! which schema names and fields they declare), never at row contents.

use crate::common::record::{envelope, SourceRecord};
use serde::{Deserialize, Serialize};

/// What kind of change a record carries.
///
/// Variants are mutually exclusive. When a record structurally matches both
/// the schema-change and the data-change shape, the key schema name wins and
/// the record is a [`RecordKind::SchemaChange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Row-level insert/update/delete/read
    DataChange,
    /// Table structure change
    SchemaChange,
    /// Anything else (heartbeats, tombstones, transaction markers)
    Unrecognized,
}

impl RecordKind {
    /// Metric-safe label.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::DataChange => "data_change",
            RecordKind::SchemaChange => "schema_change",
            RecordKind::Unrecognized => "unrecognized",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// True when the record value declares and carries a string `op` field.
///
/// Requires a non-null value, a non-null value schema, an `op` field in that
/// schema, and a non-null string under `op` in the value.
pub fn has_operation_field(record: &SourceRecord) -> bool {
    record.value().is_some()
        && record
            .value_schema()
            .is_some_and(|schema| schema.field(envelope::OPERATION).is_some())
        && record.value_string(envelope::OPERATION).is_some()
}

/// True when the key schema name equals `expected`, ignoring ASCII case.
pub fn key_schema_name_matches(record: &SourceRecord, expected: &str) -> bool {
    record
        .key_schema()
        .and_then(|schema| schema.name())
        .is_some_and(|name| name.eq_ignore_ascii_case(expected))
}

/// Combine both predicates into a single outcome, schema change first.
pub fn classify_with(is_schema_change: bool, is_data_change: bool) -> RecordKind {
    if is_schema_change {
        RecordKind::SchemaChange
    } else if is_data_change {
        RecordKind::DataChange
    } else {
        RecordKind::Unrecognized
    }
}
