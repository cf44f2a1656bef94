//! # Common CDC Types and Traits
//!
//! Connector-agnostic building blocks for change-record deserialization:
//!
//! - [`SourceRecord`] - Change record wire model (key/value + Connect schemas)
//! - [`RecordKind`] - Data change / schema change / unrecognized
//! - [`TableId`] - Table identity parsed from topic names
//! - [`EventDeserializationStrategy`] - Connector plug-in trait
//! - [`EnvelopeDeserializer`] - Record to [`Event`] dispatch
//! - [`RowConverter`] - Temporal logical type conversion
//! - [`DeserializerConfig`] - Changelog mode, server time zone, schema changes
//! - [`CdcError`] - Error type
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Common Module                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  SourceRecord   ←─── Envelope from the log-tailing connector│
//! │  Strategy trait ←─── MySqlEventDeserializer implements      │
//! │  Envelope       ←─── Op codes, row images, changelog mode   │
//! │  RowConverter   ←─── Debezium temporal types, server zone   │
//! │  Event          ←─── DataChangeEvent | SchemaChangeEvent    │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod classify;
mod config;
pub mod converter;
mod deserializer;
mod error;
mod event;
pub mod record;
pub mod schema_change;
mod table_id;
mod traits;

pub use classify::*;
pub use config::*;
pub use converter::RowConverter;
pub use deserializer::*;
pub use error::*;
pub use event::*;
pub use record::{ConnectField, ConnectSchema, EnvelopeOperation, SchemaType, SourceRecord};
pub use schema_change::{
    AddedColumn, Column, ColumnPosition, SchemaChangeEvent, SchemaChangeType,
};
pub use table_id::*;
pub use traits::*;
