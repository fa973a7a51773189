//! Schema metadata: the mapping from logical entity names to tables and from
//! logical field names to physical columns.
//!
//! This is the input the field catalog is built from. It is supplied
//! explicitly (for example deserialized from a metadata document) rather than
//! derived by reflection, so catalog construction is deterministic and
//! testable without a live database.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Mapping from an entity name to its table information.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct TablesInfo(pub BTreeMap<String, TableInfo>);

/// Information about a database table (or any other kind of relation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TableInfo {
    pub table_name: String,
    /// Logical field name to column information. Lookups are case-sensitive
    /// and exact; there is no fuzzy matching.
    pub fields: BTreeMap<String, FieldInfo>,
}

/// Information about a single database column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldInfo {
    pub column: String,
}

impl TablesInfo {
    /// Look up a tracked entity by name.
    pub fn get(&self, entity: &str) -> Option<&TableInfo> {
        self.0.get(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_documents_round_trip() {
        let document = serde_json::json!({
            "users": {
                "table_name": "users",
                "fields": {
                    "Id": { "column": "id" },
                    "Name": { "column": "name" }
                }
            }
        });

        let tables: TablesInfo = serde_json::from_value(document.clone()).unwrap();
        assert_eq!(
            tables.get("users").unwrap().fields.get("Name").unwrap(),
            &FieldInfo {
                column: "name".to_string()
            }
        );
        assert_eq!(serde_json::to_value(&tables).unwrap(), document);
    }
}
