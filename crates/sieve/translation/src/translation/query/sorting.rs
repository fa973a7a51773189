//! Handle order-by translation.

use sieve_sql::sql::ast;
use sieve_sql::sql::helpers;

use super::error::Error;
use crate::translation::catalog::FieldCatalog;
use crate::translation::request::Sort;
use crate::translation::scopes::{ScopeKind, ScopeRegistry};

/// Append the request's sorts to the select's ORDER BY clause. A named sort
/// scope short-circuits field validation for that sort; a scope reference
/// that resolves to nothing is a compile error.
pub fn translate_sorts(
    catalog: &FieldCatalog,
    registry: &ScopeRegistry,
    mut select: ast::Select,
    sorts: &[Sort],
    errors: &mut Vec<Error>,
) -> ast::Select {
    for sort in sorts {
        if let Some(name) = sort.scope_name() {
            match registry.lookup(ScopeKind::Sort, name) {
                Some(scope) => select = scope(select),
                None => errors.push(Error::ScopeNotFound {
                    kind: ScopeKind::Sort,
                    name: name.to_string(),
                }),
            }
            continue;
        }

        let column = match catalog.qualified(&sort.field) {
            Ok(column) => column,
            Err(error) => {
                errors.push(error);
                continue;
            }
        };

        let mut target = ast::Expression::ColumnReference(column);
        if sort.nocase {
            target = helpers::lower(target);
        }

        let direction = if sort.desc {
            ast::OrderByDirection::Desc
        } else {
            ast::OrderByDirection::Asc
        };
        select
            .order_by
            .elements
            .push(ast::OrderByElement { target, direction });
    }
    select
}
