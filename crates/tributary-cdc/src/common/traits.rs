//! Traits for connector-specific deserialization
//!
//! [`EventDeserializationStrategy`] is the capability set a connector plugs
//! into the [`EnvelopeDeserializer`](crate::common::EnvelopeDeserializer):
//! classify a record, then extract what the pipeline needs from it.
//! [`MetadataProvider`] and [`SchemaChangeParser`] are the seams strategies
//! use for the parts that are not derived yet.

use crate::common::classify::{classify_with, RecordKind};
use crate::common::record::SourceRecord;
use crate::common::schema_change::SchemaChangeEvent;
use crate::common::table_id::TableId;
use crate::common::Result;
use std::collections::HashMap;
use tracing::trace;

/// Connector-specific classification and extraction.
pub trait EventDeserializationStrategy: Send + Sync {
    /// Source type name (e.g. "mysql")
    fn source_type(&self) -> &'static str;

    /// Does the record carry a row-level change?
    fn is_data_change_record(&self, record: &SourceRecord) -> bool;

    /// Does the record carry a table-structure change?
    fn is_schema_change_record(&self, record: &SourceRecord) -> bool;

    /// Classify the record. Schema change takes precedence over data change.
    fn classify(&self, record: &SourceRecord) -> RecordKind {
        classify_with(
            self.is_schema_change_record(record),
            self.is_data_change_record(record),
        )
    }

    /// Table the record belongs to, `None` when it cannot be derived.
    fn table_id(&self, record: &SourceRecord) -> Result<Option<TableId>>;

    /// Metadata to attach to the record's data-change event. Never fails.
    fn metadata(&self, record: &SourceRecord) -> HashMap<String, String>;

    /// Schema change events derived from a schema-change record.
    fn schema_change_events(&self, record: &SourceRecord) -> Result<Vec<SchemaChangeEvent>>;
}

/// Supplies metadata for data-change events.
pub trait MetadataProvider: Send + Sync {
    fn metadata(&self, record: &SourceRecord) -> HashMap<String, String>;
}

/// Metadata provider that attaches nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyMetadata;

impl MetadataProvider for EmptyMetadata {
    fn metadata(&self, _record: &SourceRecord) -> HashMap<String, String> {
        HashMap::new()
    }
}

/// Builds schema change events from schema-change records.
pub trait SchemaChangeParser: Send + Sync {
    fn parse(&self, record: &SourceRecord) -> Result<Vec<SchemaChangeEvent>>;
}

/// Schema change parser for connectors that cannot derive table-structure
/// changes yet. Every record yields no events.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedSchemaChanges;

impl SchemaChangeParser for UnsupportedSchemaChanges {
    fn parse(&self, record: &SourceRecord) -> Result<Vec<SchemaChangeEvent>> {
        // TODO: derive create/alter/rename events from the historyRecord DDL in the value
        trace!(topic = record.topic(), "Schema change record skipped: no parser available");
        Ok(Vec::new())
    }
}
