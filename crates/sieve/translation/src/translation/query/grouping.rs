//! Handle group-by translation.

use sieve_sql::sql::ast;

use super::error::Error;
use crate::translation::catalog::FieldCatalog;
use crate::translation::request::Group;
use crate::translation::scopes::{ScopeKind, ScopeRegistry};

/// Append the request's groups to the select's GROUP BY clause. A named
/// group scope short-circuits field validation for that group, and owns the
/// whole plan state it receives: replacing the projection as well as the
/// grouping is part of its contract. Raw HAVING text is rejected.
pub fn translate_groups(
    catalog: &FieldCatalog,
    registry: &ScopeRegistry,
    mut select: ast::Select,
    groups: &[Group],
    errors: &mut Vec<Error>,
) -> ast::Select {
    for group in groups {
        if let Some(name) = group.scope_name() {
            match registry.lookup(ScopeKind::Group, name) {
                Some(scope) => select = scope(select),
                None => errors.push(Error::ScopeNotFound {
                    kind: ScopeKind::Group,
                    name: name.to_string(),
                }),
            }
            continue;
        }

        let column = match catalog.qualified(&group.field) {
            Ok(column) => column,
            Err(error) => {
                errors.push(error);
                continue;
            }
        };
        select
            .group_by
            .elements
            .push(ast::Expression::ColumnReference(column));

        if group.having_text().is_some() {
            errors.push(Error::HavingNotSupported);
        }
    }
    select
}
