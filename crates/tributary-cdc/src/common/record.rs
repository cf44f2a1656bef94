//! Change record wire model
//!
//! A [`SourceRecord`] is what a Debezium-style connector hands to the pipeline:
//! a topic plus a key part and a value part, each with its own Kafka Connect
//! schema. Records can be built directly or parsed from JSON converter
//! envelopes (`schemas.enable=true`):
//!
//! ```json
//! { "schema": { "type": "struct", "name": "...Envelope", "fields": [...] },
//!   "payload": { "before": null, "after": {...}, "op": "c", ... } }
//! ```
//!
//! Records are read-only once built; classification never mutates them.

use crate::common::{CdcError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field names of the Debezium change envelope.
pub mod envelope {
    /// Operation code (`c`, `u`, `d`, `r`, `t`, `m`)
    pub const OPERATION: &str = "op";
    /// Row image before the change
    pub const BEFORE: &str = "before";
    /// Row image after the change
    pub const AFTER: &str = "after";
}

/// Kafka Connect schema type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Int8,
    Int16,
    Int32,
    Int64,
    Float,
    Double,
    Boolean,
    String,
    Bytes,
    Array,
    Map,
    Struct,
}

/// Schema of a record key, record value, or nested field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectSchema {
    /// Physical type
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    /// Whether null is a valid value
    #[serde(default)]
    pub optional: bool,
    /// Logical or record name (e.g. `io.debezium.time.Timestamp`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Schema version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i32>,
    /// Struct fields, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<ConnectField>,
    /// Element schema for arrays
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ConnectSchema>>,
}

impl ConnectSchema {
    /// Create an unnamed schema of the given type.
    pub fn new(schema_type: SchemaType) -> Self {
        Self {
            schema_type,
            optional: false,
            name: None,
            version: None,
            fields: Vec::new(),
            items: None,
        }
    }

    /// Create an empty struct schema.
    pub fn structure() -> Self {
        Self::new(SchemaType::Struct)
    }

    /// Set the schema name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Mark the schema optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Append a struct field.
    pub fn with_field(mut self, name: impl Into<String>, schema: ConnectSchema) -> Self {
        self.fields.push(ConnectField {
            name: name.into(),
            schema,
        });
        self
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&ConnectField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Schema name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// A named field inside a struct schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectField {
    /// Field name
    #[serde(rename = "field")]
    pub name: String,
    /// Field schema
    #[serde(flatten)]
    pub schema: ConnectSchema,
}

/// JSON converter envelope: schema and payload side by side.
#[derive(Debug, Deserialize)]
struct JsonEnvelope {
    #[serde(default)]
    schema: Option<ConnectSchema>,
    payload: Value,
}

/// Key of the payload member in a JSON converter envelope.
const PAYLOAD: &str = "payload";

/// Debezium operation code carried in the `op` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnvelopeOperation {
    /// `c`
    Create,
    /// `r` (snapshot read)
    Read,
    /// `u`
    Update,
    /// `d`
    Delete,
    /// `t`
    Truncate,
    /// `m` (logical decoding message)
    Message,
}

impl EnvelopeOperation {
    /// Parse a Debezium operation code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "c" => Some(Self::Create),
            "r" => Some(Self::Read),
            "u" => Some(Self::Update),
            "d" => Some(Self::Delete),
            "t" => Some(Self::Truncate),
            "m" => Some(Self::Message),
            _ => None,
        }
    }

    /// The wire code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Create => "c",
            Self::Read => "r",
            Self::Update => "u",
            Self::Delete => "d",
            Self::Truncate => "t",
            Self::Message => "m",
        }
    }
}

impl std::fmt::Display for EnvelopeOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A change record as delivered by the log-tailing connector.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRecord {
    topic: String,
    key_schema: Option<ConnectSchema>,
    key: Option<Value>,
    value_schema: Option<ConnectSchema>,
    value: Option<Value>,
}

impl SourceRecord {
    /// Create a record with no key and no value.
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            key_schema: None,
            key: None,
            value_schema: None,
            value: None,
        }
    }

    /// Set the key part.
    pub fn with_key(mut self, schema: Option<ConnectSchema>, key: Option<Value>) -> Self {
        self.key_schema = schema;
        self.key = key.filter(|k| !k.is_null());
        self
    }

    /// Set the value part.
    pub fn with_value(mut self, schema: Option<ConnectSchema>, value: Option<Value>) -> Self {
        self.value_schema = schema;
        self.value = value.filter(|v| !v.is_null());
        self
    }

    /// Parse a record from JSON converter key/value bytes.
    ///
    /// Missing bytes or a `null` payload produce a null part, so tombstones
    /// parse successfully. A JSON object without a `payload` member is
    /// rejected with a schema error instead of being read as an empty part.
    pub fn from_json(
        topic: impl Into<String>,
        key: Option<&[u8]>,
        value: Option<&[u8]>,
    ) -> Result<Self> {
        let (key_schema, key) = parse_part(key)?;
        let (value_schema, value) = parse_part(value)?;
        Ok(Self::new(topic)
            .with_key(key_schema, key)
            .with_value(value_schema, value))
    }

    /// Topic the connector published to.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Schema of the key part.
    pub fn key_schema(&self) -> Option<&ConnectSchema> {
        self.key_schema.as_ref()
    }

    /// Key payload; `None` when the key is absent or null.
    pub fn key(&self) -> Option<&Value> {
        self.key.as_ref()
    }

    /// Schema of the value part.
    pub fn value_schema(&self) -> Option<&ConnectSchema> {
        self.value_schema.as_ref()
    }

    /// Value payload; `None` for tombstones.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// The value as a struct, if it is one.
    pub fn value_struct(&self) -> Option<&Map<String, Value>> {
        self.value.as_ref().and_then(Value::as_object)
    }

    /// String held by a top-level value field; `None` if absent, null or not a string.
    pub fn value_string(&self, field: &str) -> Option<&str> {
        self.value_struct()
            .and_then(|s| s.get(field))
            .and_then(Value::as_str)
    }

    /// Schema of a top-level value field.
    pub fn value_field_schema(&self, field: &str) -> Option<&ConnectSchema> {
        self.value_schema
            .as_ref()
            .and_then(|s| s.field(field))
            .map(|f| &f.schema)
    }
}

fn parse_part(bytes: Option<&[u8]>) -> Result<(Option<ConnectSchema>, Option<Value>)> {
    let Some(bytes) = bytes.filter(|b| !b.is_empty()) else {
        return Ok((None, None));
    };
    let raw: Value = serde_json::from_slice(bytes)?;
    if raw.is_null() {
        return Ok((None, None));
    }
    // Schemaless output (`schemas.enable=false`) has no payload member.
    if raw.get(PAYLOAD).is_none() {
        return Err(CdcError::schema(
            "expected a JSON converter envelope with 'schema' and 'payload' members",
        ));
    }
    let envelope: JsonEnvelope = serde_json::from_value(raw)?;
    Ok((envelope.schema, Some(envelope.payload)))
}
