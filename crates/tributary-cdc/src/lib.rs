//! # tributary-cdc - Change record deserialization for Tributary
//!
//! Classifies Debezium-style change records and turns them into pipeline
//! events: row-level data changes, table schema changes, or nothing.
//!
//! ## Features
//!
//! - `mysql` - Debezium MySQL connector records (default)
//! - `full` - All connectors
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │          Debezium connector (key + value + schemas)      │
//! └─────────────────────────────┬────────────────────────────┘
//!                               ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │  EnvelopeDeserializer<S: EventDeserializationStrategy>   │
//! │    classify → table id + metadata → op + row images      │
//! └─────────────────────────────┬────────────────────────────┘
//!                               ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │        Event::DataChange | Event::SchemaChange           │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # #[cfg(feature = "mysql")]
//! # fn example(key: &[u8], value: &[u8]) -> tributary_cdc::Result<()> {
//! use tributary_cdc::{DeserializerConfig, EnvelopeDeserializer, SourceRecord};
//!
//! let deserializer = EnvelopeDeserializer::mysql(DeserializerConfig::default())?;
//! let record = SourceRecord::from_json("mysql_server.inventory.orders", Some(key), Some(value))?;
//!
//! for event in deserializer.deserialize(&record)? {
//!     println!("{} {:?}", event.table_id(), event);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Public API Organization
//!
//! ### Tier 1: Core Types (crate root)
//! Records, classification, events, the deserializer and its configuration.
//!
//! ### Tier 2: Advanced Types (`common` module)
//! Extension traits, row conversion and statistics for custom connectors.

// Common module - always available
pub mod common;

// =============================================================================
// TIER 1: Core Types
// =============================================================================

pub use common::{
    // Error handling
    CdcError,
    ChangelogMode,
    DataChangeEvent,
    DeserializerConfig,
    EnvelopeDeserializer,
    ErrorCategory,
    Event,
    EventDeserializationStrategy,
    OperationType,
    RecordKind,
    Result,
    SchemaChangeEvent,
    SourceRecord,
    TableId,
};

// MySQL - feature-gated
#[cfg(feature = "mysql")]
pub mod mysql;
