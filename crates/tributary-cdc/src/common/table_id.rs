//! Table identifiers
//!
//! Debezium names data-change topics `<server>.<namespace>.<table>`. The
//! server segment is the connector's logical name and is not part of the
//! table identity.

use crate::common::{CdcError, Result};
use serde::{Deserialize, Serialize};

/// Logical table a change belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableId {
    /// Database (MySQL) or schema (PostgreSQL) name
    pub namespace: String,
    /// Table name
    pub table_name: String,
}

impl TableId {
    /// Create a new table identifier.
    pub fn new(namespace: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            table_name: table_name.into(),
        }
    }

    /// Parse a data-change topic name.
    ///
    /// Segment 0 is dropped, segments 1 and 2 become namespace and table, and
    /// any further segments are ignored. Fewer than three segments, or an
    /// empty namespace/table segment, is a [`CdcError::MalformedTopic`].
    pub fn from_topic(topic: &str) -> Result<Self> {
        let mut parts = topic.split('.');
        let _server = parts.next();
        match (parts.next(), parts.next()) {
            (Some(namespace), Some(table)) if !namespace.is_empty() && !table.is_empty() => {
                Ok(Self::new(namespace, table))
            }
            _ => Err(CdcError::malformed_topic(topic)),
        }
    }

    /// `namespace.table`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.namespace, self.table_name)
    }
}

impl std::fmt::Display for TableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.namespace, self.table_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_topic() {
        let id = TableId::from_topic("mysql_server.inventory.orders").unwrap();
        assert_eq!(id.namespace, "inventory");
        assert_eq!(id.table_name, "orders");
        assert_eq!(id.to_string(), "inventory.orders");
        assert_eq!(id.qualified_name(), "inventory.orders");
    }

    #[test]
    fn test_from_topic_extra_segments_ignored() {
        let id = TableId::from_topic("srv.inventory.orders.v2").unwrap();
        assert_eq!(id, TableId::new("inventory", "orders"));
    }

    #[test]
    fn test_from_topic_two_segments() {
        let err = TableId::from_topic("mysql_server.inventory").unwrap_err();
        assert!(matches!(
            err,
            CdcError::MalformedTopic { ref topic } if topic == "mysql_server.inventory"
        ));
    }

    #[test]
    fn test_from_topic_single_segment() {
        assert!(TableId::from_topic("orders").is_err());
        assert!(TableId::from_topic("").is_err());
    }

    #[test]
    fn test_from_topic_empty_segments() {
        assert!(TableId::from_topic("srv..orders").is_err());
        assert!(TableId::from_topic("srv.inventory.").is_err());
    }

    #[test]
    fn test_server_segment_may_be_empty() {
        let id = TableId::from_topic(".inventory.orders").unwrap();
        assert_eq!(id, TableId::new("inventory", "orders"));
    }
}
