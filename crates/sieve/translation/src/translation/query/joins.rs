//! Handle join and sub-query translation.

use sieve_sql::sql::ast;
use sieve_sql::sql::helpers;

use super::error::{CompileErrors, Error};
use super::root::QueryCompiler;
use crate::translation::request::{Join, SubQuery};
use crate::translation::scopes::{ScopeKind, ScopeRegistry};

/// Append the request's joins. An explicit kind takes precedence over a
/// named join scope only when it is non-empty; with no kind the scope, if
/// present, is used exclusively. Table and condition text is the caller's
/// raw SQL and is rendered verbatim. Unrecognized kinds are skipped.
pub fn translate_joins(
    registry: &ScopeRegistry,
    mut select: ast::Select,
    joins: &[Join],
    errors: &mut Vec<Error>,
) -> ast::Select {
    for join in joins {
        let kind = match join.kind_name() {
            Some(kind) => kind,
            None => {
                if let Some(name) = join.scope_name() {
                    match registry.lookup(ScopeKind::Join, name) {
                        Some(scope) => select = scope(select),
                        None => errors.push(Error::ScopeNotFound {
                            kind: ScopeKind::Join,
                            name: name.to_string(),
                        }),
                    }
                }
                continue;
            }
        };

        if let Some(kind) = parse_join_kind(kind) {
            select.joins.push(ast::Join::Table(ast::TableJoin {
                kind,
                table: ast::RawSql(join.table.clone()),
                on: ast::RawSql(join.condition.clone()),
            }));
        }
    }
    select
}

fn parse_join_kind(kind: &str) -> Option<ast::JoinKind> {
    match kind.to_uppercase().as_str() {
        "LEFT" => Some(ast::JoinKind::Left),
        "RIGHT" => Some(ast::JoinKind::Right),
        "INNER" => Some(ast::JoinKind::Inner),
        _ => None,
    }
}

/// Compile the nested request with an independent compiler bound to the
/// sub-query's entity and embed the result as a derived table:
/// `JOIN (<nested select>) AS "<field>" ON <join_cond>`. Errors from the
/// nested compilation surface on the parent.
pub fn translate_sub_query(
    compiler: &QueryCompiler,
    mut select: ast::Select,
    sub: &SubQuery,
    errors: &mut Vec<Error>,
) -> ast::Select {
    let sub_compiler = match QueryCompiler::new(
        compiler.tables().clone(),
        &sub.table,
        compiler.registry().clone(),
    ) {
        Ok(sub_compiler) => sub_compiler,
        Err(error) => {
            errors.push(error);
            return select;
        }
    };

    match sub_compiler.compile(&sub.filter) {
        Ok(plan) => select.joins.push(ast::Join::DerivedTable(ast::DerivedTableJoin {
            select: Box::new(plan.query),
            alias: helpers::make_table_alias(sub.field.clone()),
            on: ast::RawSql(sub.join_cond.clone()),
        })),
        Err(CompileErrors(sub_errors)) => errors.extend(sub_errors),
    }
    select
}
