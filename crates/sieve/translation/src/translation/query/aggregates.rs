//! Handle aggregate projection translation.

use sieve_sql::sql::ast;
use sieve_sql::sql::helpers;

use super::error::Error;
use crate::translation::catalog::FieldCatalog;
use crate::translation::request::{Aggregation, AggregationOp};

/// Build the combined aggregation projection. When any projection is
/// produced it replaces the select list outright, including a projection a
/// select or group scope installed earlier; it does not append to it.
pub fn translate_aggregations(
    catalog: &FieldCatalog,
    mut select: ast::Select,
    aggrs: &[Aggregation],
    errors: &mut Vec<Error>,
) -> ast::Select {
    if aggrs.is_empty() {
        return select;
    }

    let mut projections: Vec<(ast::ColumnAlias, ast::Expression)> = vec![];
    for aggr in aggrs {
        if !aggr.add_selects.is_empty() {
            errors.push(Error::AddSelectsNotSupported);
        }

        let column = match catalog.qualified(&aggr.field) {
            Ok(column) => column,
            Err(error) => {
                errors.push(error);
                continue;
            }
        };

        let mut target = ast::Expression::ColumnReference(column);
        if aggr.nocase {
            target = helpers::lower(target);
        }

        let expression = match aggr.op {
            AggregationOp::Count => ast::Expression::Count(ast::CountType::Simple(Box::new(target))),
            AggregationOp::Sum => call(ast::Function::Sum, target),
            AggregationOp::Avg => call(ast::Function::Avg, target),
            AggregationOp::Max => call(ast::Function::Max, target),
            AggregationOp::Min => call(ast::Function::Min, target),
            AggregationOp::Unknown => continue,
        };

        let alias = match aggr.alias_name() {
            Some(alias) => helpers::make_column_alias(alias.to_string()),
            // resolve() has already succeeded for this field
            None => match catalog.unqualified(&aggr.field) {
                Ok(alias) => alias,
                Err(error) => {
                    errors.push(error);
                    continue;
                }
            },
        };
        projections.push((alias, expression));
    }

    if !projections.is_empty() {
        select.select_list = ast::SelectList::SelectList(projections);
    }
    select
}

fn call(function: ast::Function, arg: ast::Expression) -> ast::Expression {
    ast::Expression::FunctionCall {
        function,
        args: vec![arg],
    }
}
