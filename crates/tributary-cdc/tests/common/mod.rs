//! Shared helpers for tributary-cdc integration tests

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Once;
use tributary_cdc::SourceRecord;

static INIT: Once = Once::new();

/// Initialize test logging (idempotent)
pub fn init_test_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive("tributary_cdc=trace".parse().unwrap()),
            )
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Read a JSON converter fixture.
pub fn fixture(name: &str) -> Vec<u8> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read(&path).unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e))
}

/// Build a record for the `inventory.orders` table from a value fixture.
pub fn orders_record(value_fixture: &str) -> SourceRecord {
    SourceRecord::from_json(
        "mysql_server.inventory.orders",
        Some(&fixture("orders_key.json")),
        Some(&fixture(value_fixture)),
    )
    .unwrap()
}

/// Build the MySQL schema change record fixture.
pub fn schema_change_record() -> SourceRecord {
    SourceRecord::from_json(
        "mysql_server",
        Some(&fixture("schema_change_key.json")),
        Some(&fixture("schema_change_value.json")),
    )
    .unwrap()
}
