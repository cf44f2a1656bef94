//! MySQL event deserialization strategy

use crate::common::{
    has_operation_field, key_schema_name_matches, DeserializerConfig, EmptyMetadata,
    EnvelopeDeserializer, EventDeserializationStrategy, MetadataProvider, RecordKind, Result,
    SchemaChangeEvent, SchemaChangeParser, SourceRecord, TableId, UnsupportedSchemaChanges,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// Key schema name of MySQL schema-change records.
pub const SCHEMA_CHANGE_EVENT_KEY_NAME: &str = "io.debezium.connector.mysql.SchemaChangeKey";

/// Classifier and extractor for Debezium MySQL change records.
///
/// Stateless apart from its construction-time settings, so one instance can
/// serve any number of threads.
#[derive(Clone)]
pub struct MySqlEventDeserializer {
    include_schema_changes: bool,
    schema_changes: Arc<dyn SchemaChangeParser>,
    metadata: Arc<dyn MetadataProvider>,
}

impl MySqlEventDeserializer {
    /// Create a strategy with empty metadata and no schema change parsing.
    pub fn new(include_schema_changes: bool) -> Self {
        Self {
            include_schema_changes,
            schema_changes: Arc::new(UnsupportedSchemaChanges),
            metadata: Arc::new(EmptyMetadata),
        }
    }

    /// Replace the schema change parser.
    pub fn with_schema_change_parser(mut self, parser: Arc<dyn SchemaChangeParser>) -> Self {
        self.schema_changes = parser;
        self
    }

    /// Replace the metadata provider.
    pub fn with_metadata_provider(mut self, provider: Arc<dyn MetadataProvider>) -> Self {
        self.metadata = provider;
        self
    }

    /// Whether schema change records produce events.
    pub fn include_schema_changes(&self) -> bool {
        self.include_schema_changes
    }
}

impl std::fmt::Debug for MySqlEventDeserializer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlEventDeserializer")
            .field("include_schema_changes", &self.include_schema_changes)
            .finish_non_exhaustive()
    }
}

impl EventDeserializationStrategy for MySqlEventDeserializer {
    fn source_type(&self) -> &'static str {
        "mysql"
    }

    fn is_data_change_record(&self, record: &SourceRecord) -> bool {
        has_operation_field(record)
    }

    fn is_schema_change_record(&self, record: &SourceRecord) -> bool {
        key_schema_name_matches(record, SCHEMA_CHANGE_EVENT_KEY_NAME)
    }

    fn table_id(&self, record: &SourceRecord) -> Result<Option<TableId>> {
        if self.classify(record) == RecordKind::DataChange {
            return TableId::from_topic(record.topic()).map(Some);
        }
        // Schema change records name the database in their key; the table only
        // appears inside the DDL, which is not parsed yet.
        trace!(topic = record.topic(), "No table id for non data change record");
        Ok(None)
    }

    fn metadata(&self, record: &SourceRecord) -> HashMap<String, String> {
        self.metadata.metadata(record)
    }

    fn schema_change_events(&self, record: &SourceRecord) -> Result<Vec<SchemaChangeEvent>> {
        if !self.include_schema_changes {
            return Ok(Vec::new());
        }
        self.schema_changes.parse(record)
    }
}

impl EnvelopeDeserializer<MySqlEventDeserializer> {
    /// Envelope deserializer for the MySQL connector.
    pub fn mysql(config: DeserializerConfig) -> Result<Self> {
        let strategy = MySqlEventDeserializer::new(config.include_schema_changes);
        Self::new(strategy, config)
    }
}
