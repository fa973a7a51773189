//! The field catalog: the validated mapping from logical entity field names
//! to physical, backend-safe column references.

use std::collections::BTreeMap;

use sieve_metadata as metadata;
use sieve_sql::sql::ast;
use sieve_sql::sql::helpers;

use super::query::error::Error;

/// The set of legal field names for one entity, built once per compiler
/// instance and immutable thereafter. Field names are the only identifiers
/// ever placed into generated SQL, and only after they resolve here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCatalog {
    table: ast::TableName,
    fields: BTreeMap<String, metadata::FieldInfo>,
}

impl FieldCatalog {
    pub fn new(table_info: &metadata::TableInfo) -> Self {
        FieldCatalog {
            table: ast::TableName(table_info.table_name.clone()),
            fields: table_info.fields.clone(),
        }
    }

    pub fn table(&self) -> &ast::TableName {
        &self.table
    }

    /// Resolve a logical field name. Matching is case-sensitive and exact.
    pub fn resolve(&self, field: &str) -> Result<&metadata::FieldInfo, Error> {
        self.fields
            .get(field)
            .ok_or_else(|| Error::InvalidFieldName(field.to_string()))
    }

    /// The table-qualified rendering, used in filters, sorts, and groups so
    /// references stay unambiguous under joins.
    pub fn qualified(&self, field: &str) -> Result<ast::ColumnReference, Error> {
        let info = self.resolve(field)?;
        Ok(ast::ColumnReference::TableColumn {
            table: self.table.clone(),
            name: ast::ColumnName(info.column.clone()),
        })
    }

    /// The unqualified rendering: the plain column name, used as the default
    /// aggregation alias.
    pub fn unqualified(&self, field: &str) -> Result<ast::ColumnAlias, Error> {
        let info = self.resolve(field)?;
        Ok(helpers::make_column_alias(info.column.clone()))
    }
}
