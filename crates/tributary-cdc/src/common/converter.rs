//! Row image conversion
//!
//! Debezium encodes temporal columns as integers or strings tagged with a
//! logical schema name. The converter rewrites dates, timestamps and times of
//! day (Debezium and Kafka Connect logical types alike) into readable strings
//! and re-expresses zoned timestamps in the server time zone. Everything else
//! passes through untouched.

use crate::common::record::ConnectSchema;
use crate::common::{CdcError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde_json::{Map, Value};

/// Debezium temporal logical type names.
pub mod logical {
    pub const DATE: &str = "io.debezium.time.Date";
    pub const TIMESTAMP: &str = "io.debezium.time.Timestamp";
    pub const MICRO_TIMESTAMP: &str = "io.debezium.time.MicroTimestamp";
    pub const NANO_TIMESTAMP: &str = "io.debezium.time.NanoTimestamp";
    pub const ZONED_TIMESTAMP: &str = "io.debezium.time.ZonedTimestamp";
    pub const TIME: &str = "io.debezium.time.Time";
    pub const MICRO_TIME: &str = "io.debezium.time.MicroTime";
    pub const NANO_TIME: &str = "io.debezium.time.NanoTime";

    pub const CONNECT_DATE: &str = "org.apache.kafka.connect.data.Date";
    pub const CONNECT_TIMESTAMP: &str = "org.apache.kafka.connect.data.Timestamp";
    pub const CONNECT_TIME: &str = "org.apache.kafka.connect.data.Time";
}

/// Days from 0001-01-01 to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Converts before/after row images.
#[derive(Debug, Clone, Copy)]
pub struct RowConverter {
    server_time_zone: Tz,
}

impl RowConverter {
    /// Create a converter for the given server time zone.
    pub fn new(server_time_zone: Tz) -> Self {
        Self { server_time_zone }
    }

    /// Zone applied to zoned timestamps.
    pub fn server_time_zone(&self) -> Tz {
        self.server_time_zone
    }

    /// Convert a row image. Null or absent rows convert to `None`.
    pub fn convert_row(
        &self,
        schema: Option<&ConnectSchema>,
        row: Option<&Value>,
    ) -> Result<Option<Value>> {
        let row = match row {
            None | Some(Value::Null) => return Ok(None),
            Some(row) => row,
        };
        let Some(schema) = schema else {
            return Ok(Some(row.clone()));
        };
        let Some(columns) = row.as_object() else {
            return Err(CdcError::schema(format!(
                "row image must be a struct, got {}",
                json_kind(row)
            )));
        };

        let mut converted = Map::with_capacity(columns.len());
        for (name, value) in columns {
            let value = match schema.field(name) {
                Some(field) => self
                    .convert_value(&field.schema, value)
                    .map_err(|e| CdcError::serialization(format!("column '{}': {}", name, e)))?,
                None => value.clone(),
            };
            converted.insert(name.clone(), value);
        }
        Ok(Some(Value::Object(converted)))
    }

    /// Convert a single column value according to its schema.
    pub fn convert_value(&self, schema: &ConnectSchema, value: &Value) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        match schema.name() {
            Some(logical::DATE | logical::CONNECT_DATE) => {
                let days = as_i64(value)?;
                let date = i32::try_from(days)
                    .ok()
                    .and_then(|d| d.checked_add(UNIX_EPOCH_DAYS_FROM_CE))
                    .and_then(NaiveDate::from_num_days_from_ce_opt)
                    .ok_or_else(|| out_of_range(value))?;
                Ok(Value::String(date.format("%Y-%m-%d").to_string()))
            }
            Some(logical::TIMESTAMP | logical::CONNECT_TIMESTAMP) => {
                let ts = DateTime::<Utc>::from_timestamp_millis(as_i64(value)?)
                    .ok_or_else(|| out_of_range(value))?;
                Ok(local_string(ts.naive_utc(), "%Y-%m-%dT%H:%M:%S%.3f"))
            }
            Some(logical::MICRO_TIMESTAMP) => {
                let ts = DateTime::<Utc>::from_timestamp_micros(as_i64(value)?)
                    .ok_or_else(|| out_of_range(value))?;
                Ok(local_string(ts.naive_utc(), "%Y-%m-%dT%H:%M:%S%.6f"))
            }
            Some(logical::NANO_TIMESTAMP) => {
                let ts = DateTime::<Utc>::from_timestamp_nanos(as_i64(value)?);
                Ok(local_string(ts.naive_utc(), "%Y-%m-%dT%H:%M:%S%.9f"))
            }
            Some(logical::ZONED_TIMESTAMP) => {
                let raw = value.as_str().ok_or_else(|| {
                    CdcError::serialization(format!("expected string, got {}", json_kind(value)))
                })?;
                let ts = DateTime::parse_from_rfc3339(raw).map_err(|e| {
                    CdcError::serialization(format!("invalid zoned timestamp '{}': {}", raw, e))
                })?;
                Ok(Value::String(
                    ts.with_timezone(&self.server_time_zone).to_rfc3339(),
                ))
            }
            Some(logical::TIME | logical::CONNECT_TIME) => time_of_day(value, 1_000, 3),
            Some(logical::MICRO_TIME) => time_of_day(value, 1_000_000, 6),
            Some(logical::NANO_TIME) => time_of_day(value, 1_000_000_000, 9),
            _ => Ok(value.clone()),
        }
    }
}

/// Render a duration since midnight. MySQL `TIME` spans -838:59:59 to
/// 838:59:59, so hours are not wrapped at 24.
fn time_of_day(value: &Value, units_per_second: u64, digits: usize) -> Result<Value> {
    let raw = as_i64(value)?;
    let sign = if raw < 0 { "-" } else { "" };
    let units = raw.unsigned_abs();
    let seconds = units / units_per_second;
    Ok(Value::String(format!(
        "{}{:02}:{:02}:{:02}.{:0width$}",
        sign,
        seconds / 3600,
        seconds / 60 % 60,
        seconds % 60,
        units % units_per_second,
        width = digits
    )))
}

fn local_string(ts: NaiveDateTime, format: &str) -> Value {
    Value::String(ts.format(format).to_string())
}

fn as_i64(value: &Value) -> Result<i64> {
    value.as_i64().ok_or_else(|| {
        CdcError::serialization(format!("expected integer, got {}", json_kind(value)))
    })
}

fn out_of_range(value: &Value) -> CdcError {
    CdcError::serialization(format!("temporal value out of range: {}", value))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "struct",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::record::SchemaType;
    use serde_json::json;

    fn named(schema_type: SchemaType, name: &str) -> ConnectSchema {
        ConnectSchema::new(schema_type).with_name(name)
    }

    fn utc() -> RowConverter {
        RowConverter::new(chrono_tz::UTC)
    }

    #[test]
    fn test_date() {
        let schema = named(SchemaType::Int32, logical::DATE);
        assert_eq!(utc().convert_value(&schema, &json!(0)).unwrap(), json!("1970-01-01"));
        assert_eq!(utc().convert_value(&schema, &json!(19723)).unwrap(), json!("2024-01-01"));
        assert_eq!(utc().convert_value(&schema, &json!(-1)).unwrap(), json!("1969-12-31"));
    }

    #[test]
    fn test_timestamps() {
        let millis = named(SchemaType::Int64, logical::TIMESTAMP);
        assert_eq!(
            utc().convert_value(&millis, &json!(1_704_067_200_123i64)).unwrap(),
            json!("2024-01-01T00:00:00.123")
        );

        let micros = named(SchemaType::Int64, logical::MICRO_TIMESTAMP);
        assert_eq!(
            utc().convert_value(&micros, &json!(1_704_067_200_000_001i64)).unwrap(),
            json!("2024-01-01T00:00:00.000001")
        );

        let nanos = named(SchemaType::Int64, logical::NANO_TIMESTAMP);
        assert_eq!(
            utc().convert_value(&nanos, &json!(1_000_000_001i64)).unwrap(),
            json!("1970-01-01T00:00:01.000000001")
        );
    }

    #[test]
    fn test_times_of_day() {
        let millis = named(SchemaType::Int32, logical::TIME);
        assert_eq!(
            utc().convert_value(&millis, &json!(45_296_789)).unwrap(),
            json!("12:34:56.789")
        );

        let micros = named(SchemaType::Int64, logical::MICRO_TIME);
        assert_eq!(
            utc().convert_value(&micros, &json!(3_600_000_000i64)).unwrap(),
            json!("01:00:00.000000")
        );

        let nanos = named(SchemaType::Int64, logical::NANO_TIME);
        assert_eq!(
            utc().convert_value(&nanos, &json!(1_000_000_001i64)).unwrap(),
            json!("00:00:01.000000001")
        );
    }

    #[test]
    fn test_mysql_time_range() {
        let micros = named(SchemaType::Int64, logical::MICRO_TIME);
        assert_eq!(
            utc().convert_value(&micros, &json!(3_020_399_000_000i64)).unwrap(),
            json!("838:59:59.000000")
        );
        assert_eq!(
            utc().convert_value(&micros, &json!(-5_400_500_000i64)).unwrap(),
            json!("-01:30:00.500000")
        );
    }

    #[test]
    fn test_connect_logical_types() {
        let date = named(SchemaType::Int32, logical::CONNECT_DATE);
        assert_eq!(utc().convert_value(&date, &json!(16816)).unwrap(), json!("2016-01-16"));

        let ts = named(SchemaType::Int64, logical::CONNECT_TIMESTAMP);
        assert_eq!(
            utc().convert_value(&ts, &json!(1_709_285_400_000i64)).unwrap(),
            json!("2024-03-01T09:30:00.000")
        );

        let time = named(SchemaType::Int32, logical::CONNECT_TIME);
        assert_eq!(utc().convert_value(&time, &json!(0)).unwrap(), json!("00:00:00.000"));
    }

    #[test]
    fn test_timestamp_ignores_server_zone() {
        let converter = RowConverter::new(chrono_tz::Asia::Shanghai);
        let millis = named(SchemaType::Int64, logical::TIMESTAMP);
        assert_eq!(
            converter.convert_value(&millis, &json!(0)).unwrap(),
            json!("1970-01-01T00:00:00.000")
        );
    }

    #[test]
    fn test_zoned_timestamp_uses_server_zone() {
        let converter = RowConverter::new(chrono_tz::Asia::Shanghai);
        let schema = named(SchemaType::String, logical::ZONED_TIMESTAMP);
        assert_eq!(
            converter.convert_value(&schema, &json!("2024-01-01T00:00:00Z")).unwrap(),
            json!("2024-01-01T08:00:00+08:00")
        );
    }

    #[test]
    fn test_invalid_zoned_timestamp() {
        let schema = named(SchemaType::String, logical::ZONED_TIMESTAMP);
        let err = utc().convert_value(&schema, &json!("yesterday")).unwrap_err();
        assert_eq!(err.error_code(), "serialization_error");
    }

    #[test]
    fn test_wrong_physical_type() {
        let schema = named(SchemaType::Int64, logical::TIMESTAMP);
        assert!(utc().convert_value(&schema, &json!("12")).is_err());
    }

    #[test]
    fn test_convert_row() {
        let schema = ConnectSchema::structure()
            .with_field("id", ConnectSchema::new(SchemaType::Int32))
            .with_field("order_date", named(SchemaType::Int32, logical::DATE))
            .with_field("note", ConnectSchema::new(SchemaType::String).optional());

        let row = json!({"id": 10001, "order_date": 16816, "note": null});
        let converted = utc().convert_row(Some(&schema), Some(&row)).unwrap().unwrap();

        assert_eq!(
            converted,
            json!({"id": 10001, "order_date": "2016-01-16", "note": null})
        );
    }

    #[test]
    fn test_convert_row_null_and_schemaless() {
        assert_eq!(utc().convert_row(None, None).unwrap(), None);
        assert_eq!(utc().convert_row(None, Some(&Value::Null)).unwrap(), None);

        let row = json!({"id": 1});
        assert_eq!(utc().convert_row(None, Some(&row)).unwrap(), Some(row));
    }

    #[test]
    fn test_convert_row_not_struct() {
        let schema = ConnectSchema::structure();
        let err = utc().convert_row(Some(&schema), Some(&json!(5))).unwrap_err();
        assert_eq!(err.error_code(), "schema_error");
    }
}
