//! Shared fixtures: metadata for the test entities and compiler builders.

use std::collections::BTreeMap;
use std::sync::Arc;

use sieve_metadata as metadata;
use sieve_sql::sql::ast;
use sieve_translation::translation::query::QueryCompiler;
use sieve_translation::translation::scopes::ScopeRegistry;

fn table(name: &str, fields: &[(&str, &str)]) -> metadata::TableInfo {
    metadata::TableInfo {
        table_name: name.to_string(),
        fields: fields
            .iter()
            .map(|(field, column)| {
                (
                    (*field).to_string(),
                    metadata::FieldInfo {
                        column: (*column).to_string(),
                    },
                )
            })
            .collect(),
    }
}

/// Metadata tracking the `users` and `orders` entities.
pub fn tables() -> Arc<metadata::TablesInfo> {
    Arc::new(metadata::TablesInfo(BTreeMap::from([
        (
            "users".to_string(),
            table(
                "users",
                &[
                    ("Id", "id"),
                    ("Name", "name"),
                    ("Status", "status"),
                    ("Age", "age"),
                    ("DeletedAt", "deleted_at"),
                    ("Tags", "tags"),
                ],
            ),
        ),
        (
            "orders".to_string(),
            table(
                "orders",
                &[("Id", "id"), ("UserId", "user_id"), ("Total", "total")],
            ),
        ),
    ])))
}

/// A compiler for the `users` entity over the given registry.
pub fn users_compiler(registry: Arc<ScopeRegistry>) -> QueryCompiler {
    QueryCompiler::new(tables(), "users", registry).unwrap()
}

/// A compiler for the `users` entity with an empty registry.
pub fn compiler() -> QueryCompiler {
    users_compiler(Arc::new(ScopeRegistry::new()))
}

/// A qualified reference to a `users` column, for building scopes in tests.
pub fn users_column(column: &str) -> ast::Expression {
    ast::Expression::ColumnReference(ast::ColumnReference::TableColumn {
        table: ast::TableName("users".to_string()),
        name: ast::ColumnName(column.to_string()),
    })
}
