//! # Envelope Deserializer
//!
//! Turns connector change records into pipeline [`Event`]s. The connector
//! decides what a record is through its [`EventDeserializationStrategy`]; the
//! deserializer owns everything that is the same across connectors: operation
//! code mapping, row image conversion, changelog mode and statistics.
//!
//! ```text
//! SourceRecord ─► classify ─┬─ DataChange   ─► DataChangeEvent
//!                           ├─ SchemaChange ─► SchemaChangeEvent*
//!                           └─ Unrecognized ─► (nothing)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tributary_cdc::common::{DeserializerConfig, EnvelopeDeserializer};
//! use tributary_cdc::mysql::MySqlEventDeserializer;
//!
//! let config = DeserializerConfig::default();
//! let deserializer = EnvelopeDeserializer::new(
//!     MySqlEventDeserializer::new(config.include_schema_changes),
//!     config,
//! )?;
//!
//! for event in deserializer.deserialize(&record)? {
//!     println!("{:?}", event);
//! }
//! ```

use crate::common::classify::RecordKind;
use crate::common::config::{ChangelogMode, DeserializerConfig};
use crate::common::converter::RowConverter;
use crate::common::event::{DataChangeEvent, Event};
use crate::common::record::{envelope, EnvelopeOperation, SourceRecord};
use crate::common::traits::EventDeserializationStrategy;
use crate::common::{CdcError, Result};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace, warn};

/// Envelope deserializer, generic over the connector strategy.
pub struct EnvelopeDeserializer<S> {
    strategy: S,
    config: DeserializerConfig,
    converter: RowConverter,
    stats: DeserializerStats,
}

impl<S: EventDeserializationStrategy> EnvelopeDeserializer<S> {
    /// Create a deserializer. Fails if the configuration is invalid.
    pub fn new(strategy: S, config: DeserializerConfig) -> Result<Self> {
        let converter = RowConverter::new(config.time_zone()?);
        Ok(Self {
            strategy,
            config,
            converter,
            stats: DeserializerStats::new(),
        })
    }

    /// The connector strategy.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// The active configuration.
    pub fn config(&self) -> &DeserializerConfig {
        &self.config
    }

    /// Deserialization statistics.
    pub fn stats(&self) -> &DeserializerStats {
        &self.stats
    }

    /// Classify a record without deserializing it.
    pub fn classify(&self, record: &SourceRecord) -> RecordKind {
        self.strategy.classify(record)
    }

    /// Deserialize one record into zero or more events.
    pub fn deserialize(&self, record: &SourceRecord) -> Result<Vec<Event>> {
        let kind = self.strategy.classify(record);
        trace!(topic = record.topic(), kind = %kind, "Classified change record");

        let result = match kind {
            RecordKind::SchemaChange => {
                debug!(topic = record.topic(), "Deserializing schema change record");
                self.strategy
                    .schema_change_events(record)
                    .map(|events| events.into_iter().map(Event::SchemaChange).collect())
            }
            RecordKind::DataChange => self
                .deserialize_data_change(record)
                .map(|event| vec![Event::DataChange(event)]),
            RecordKind::Unrecognized => {
                debug!(topic = record.topic(), "Ignoring unrecognized change record");
                Ok(Vec::new())
            }
        };

        match &result {
            Ok(events) => self.stats.record(self.strategy.source_type(), kind, events.len()),
            Err(e) => {
                warn!(topic = record.topic(), error = %e, "Failed to deserialize change record");
                self.stats.record_error(self.strategy.source_type(), e);
            }
        }
        result
    }

    fn deserialize_data_change(&self, record: &SourceRecord) -> Result<DataChangeEvent> {
        let code = record
            .value_string(envelope::OPERATION)
            .ok_or_else(|| CdcError::invalid_state("data change record without operation code"))?;
        let op = EnvelopeOperation::from_code(code).ok_or_else(|| {
            CdcError::unsupported_operation(format!("unknown operation code '{}'", code))
        })?;

        let table_id = self.strategy.table_id(record)?.ok_or_else(|| {
            CdcError::invalid_state(format!(
                "no table id for data change record on topic '{}'",
                record.topic()
            ))
        })?;
        let meta = self.strategy.metadata(record);

        match op {
            EnvelopeOperation::Create | EnvelopeOperation::Read => {
                let after = self.row(record, envelope::AFTER)?.ok_or_else(|| {
                    CdcError::schema(format!("'{}' event on {} has no after image", op, table_id))
                })?;
                Ok(DataChangeEvent::insert(table_id, after, meta))
            }
            EnvelopeOperation::Update => {
                let after = self.row(record, envelope::AFTER)?.ok_or_else(|| {
                    CdcError::schema(format!("update event on {} has no after image", table_id))
                })?;
                let before = match self.config.changelog_mode {
                    ChangelogMode::All => self.row(record, envelope::BEFORE)?,
                    ChangelogMode::Upsert => None,
                };
                Ok(DataChangeEvent::update(table_id, before, after, meta))
            }
            EnvelopeOperation::Delete => {
                let before = self.row(record, envelope::BEFORE)?.ok_or_else(|| {
                    CdcError::schema(format!("delete event on {} has no before image", table_id))
                })?;
                Ok(DataChangeEvent::delete(table_id, before, meta))
            }
            EnvelopeOperation::Truncate | EnvelopeOperation::Message => {
                Err(CdcError::unsupported_operation(format!(
                    "'{}' on {} has no row-level change",
                    op, table_id
                )))
            }
        }
    }

    fn row(&self, record: &SourceRecord, field: &str) -> Result<Option<serde_json::Value>> {
        let image = record.value_struct().and_then(|v| v.get(field));
        self.converter
            .convert_row(record.value_field_schema(field), image)
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for EnvelopeDeserializer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvelopeDeserializer")
            .field("strategy", &self.strategy)
            .field("config", &self.config)
            .finish()
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// Deserialization statistics.
#[derive(Debug, Default)]
pub struct DeserializerStats {
    /// Records seen
    pub records: AtomicU64,
    /// Records classified as data changes
    pub data_changes: AtomicU64,
    /// Records classified as schema changes
    pub schema_changes: AtomicU64,
    /// Records ignored
    pub unrecognized: AtomicU64,
    /// Events emitted
    pub events_emitted: AtomicU64,
    /// Records that failed
    pub errors: AtomicU64,
}

impl DeserializerStats {
    /// Create zeroed statistics.
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, source: &'static str, kind: RecordKind, events: usize) {
        self.records.fetch_add(1, Ordering::Relaxed);
        match kind {
            RecordKind::DataChange => self.data_changes.fetch_add(1, Ordering::Relaxed),
            RecordKind::SchemaChange => self.schema_changes.fetch_add(1, Ordering::Relaxed),
            RecordKind::Unrecognized => self.unrecognized.fetch_add(1, Ordering::Relaxed),
        };
        self.events_emitted.fetch_add(events as u64, Ordering::Relaxed);

        metrics::counter!(
            "tributary_cdc_records_total",
            "source" => source,
            "kind" => kind.as_str()
        )
        .increment(1);
        metrics::counter!("tributary_cdc_events_total", "source" => source)
            .increment(events as u64);
    }

    fn record_error(&self, source: &'static str, error: &CdcError) {
        self.records.fetch_add(1, Ordering::Relaxed);
        self.errors.fetch_add(1, Ordering::Relaxed);

        metrics::counter!(
            "tributary_cdc_errors_total",
            "source" => source,
            "code" => error.error_code()
        )
        .increment(1);
    }

    /// Get snapshot of statistics.
    pub fn snapshot(&self) -> DeserializerStatsSnapshot {
        DeserializerStatsSnapshot {
            records: self.records.load(Ordering::Relaxed),
            data_changes: self.data_changes.load(Ordering::Relaxed),
            schema_changes: self.schema_changes.load(Ordering::Relaxed),
            unrecognized: self.unrecognized.load(Ordering::Relaxed),
            events_emitted: self.events_emitted.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of deserialization statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeserializerStatsSnapshot {
    pub records: u64,
    pub data_changes: u64,
    pub schema_changes: u64,
    pub unrecognized: u64,
    pub events_emitted: u64,
    pub errors: u64,
}
