//! MySQL change record deserialization
//!
//! Classifies records produced by the Debezium MySQL connector:
//! - Data changes: value carries an `op` field, topic `<server>.<database>.<table>`
//! - Schema changes: key schema named `io.debezium.connector.mysql.SchemaChangeKey`
//!
//! # Example
//!
//! ```rust,no_run
//! use tributary_cdc::common::{DeserializerConfig, EnvelopeDeserializer, SourceRecord};
//!
//! # fn example(record: SourceRecord) -> tributary_cdc::Result<()> {
//! let deserializer = EnvelopeDeserializer::mysql(DeserializerConfig::default())?;
//! let events = deserializer.deserialize(&record)?;
//! # Ok(())
//! # }
//! ```

mod deserializer;

pub use deserializer::*;
