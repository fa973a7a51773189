//! Handle filtering/where clause translation.

use sieve_sql::sql::ast;
use sieve_sql::sql::helpers;

use super::error::Error;
use crate::translation::catalog::FieldCatalog;
use crate::translation::request::{Filter, Operator};

/// Fold the standard filters into the select's WHERE clause. A filter whose
/// field fails validation is recorded and skipped; no part of it reaches the
/// plan.
pub fn translate_filters(
    catalog: &FieldCatalog,
    mut select: ast::Select,
    filters: &[Filter],
    errors: &mut Vec<Error>,
) -> ast::Select {
    for filter in filters {
        let column = match catalog.qualified(&filter.field) {
            Ok(column) => column,
            Err(error) => {
                errors.push(error);
                continue;
            }
        };
        if let Some(predicate) = translate_operator(column, filter) {
            select.where_ = ast::Where(helpers::and_expr(select.where_.0, predicate));
        }
    }
    select
}

/// Translate one operator application into a predicate. The value is always
/// a bound parameter; only the already-validated column reference lands in
/// SQL text. Returns `None` for the operators that produce no predicate:
/// `Unknown`, and `Between` without exactly two operands.
fn translate_operator(column: ast::ColumnReference, filter: &Filter) -> Option<ast::Expression> {
    let mut target = ast::Expression::ColumnReference(column);
    let mut value = filter.value.clone();
    if filter.nocase && filter.op.folds_case() {
        target = helpers::lower(target);
        value = value.to_lowercase();
    }

    match filter.op {
        Operator::Eq => Some(binary(target, ast::BinaryOperator::Equals, value)),
        Operator::Ne => Some(binary(target, ast::BinaryOperator::NotEquals, value)),
        Operator::Gt => Some(binary(target, ast::BinaryOperator::GreaterThan, value)),
        Operator::Ge => Some(binary(
            target,
            ast::BinaryOperator::GreaterThanOrEqualTo,
            value,
        )),
        Operator::Lt => Some(binary(target, ast::BinaryOperator::LessThan, value)),
        Operator::Le => Some(binary(target, ast::BinaryOperator::LessThanOrEqualTo, value)),
        Operator::Like | Operator::Contains => Some(binary(
            target,
            ast::BinaryOperator::Like,
            format!("%{value}%"),
        )),
        Operator::StartsWith => Some(binary(target, ast::BinaryOperator::Like, format!("{value}%"))),
        Operator::EndsWith => Some(binary(target, ast::BinaryOperator::Like, format!("%{value}"))),
        Operator::NotLike => Some(binary(
            target,
            ast::BinaryOperator::NotLike,
            format!("%{value}%"),
        )),
        Operator::In => Some(array(target, ast::BinaryArrayOperator::In, &value)),
        Operator::NotIn => Some(array(target, ast::BinaryArrayOperator::NotIn, &value)),
        Operator::Between => {
            let operands: Vec<&str> = value.split(',').collect();
            match operands.as_slice() {
                [lower, upper] => Some(ast::Expression::Between {
                    expression: Box::new(target),
                    lower: Box::new(helpers::string_value((*lower).to_string())),
                    upper: Box::new(helpers::string_value((*upper).to_string())),
                }),
                _ => None,
            }
        }
        Operator::IsNull => Some(unary(target, ast::UnaryOperator::IsNull)),
        Operator::NotNull => Some(unary(target, ast::UnaryOperator::IsNotNull)),
        Operator::Regexp => Some(binary(target, ast::BinaryOperator::Regex, value)),
        Operator::NotRegexp => Some(binary(target, ast::BinaryOperator::NotRegex, value)),
        Operator::Overlap => Some(binary(target, ast::BinaryOperator::Overlap, value)),
        Operator::ArrayContains => Some(binary(target, ast::BinaryOperator::ArrayContains, value)),
        Operator::ArrayContained => {
            Some(binary(target, ast::BinaryOperator::ArrayContainedIn, value))
        }
        Operator::Unknown => None,
    }
}

fn binary(left: ast::Expression, operator: ast::BinaryOperator, value: String) -> ast::Expression {
    ast::Expression::BinaryOperation {
        left: Box::new(left),
        operator,
        right: Box::new(helpers::string_value(value)),
    }
}

/// Split a comma-delimited operand list into one bound parameter each. Empty
/// segments are preserved as literal empty strings.
fn array(left: ast::Expression, operator: ast::BinaryArrayOperator, raw: &str) -> ast::Expression {
    ast::Expression::BinaryArrayOperation {
        left: Box::new(left),
        operator,
        right: raw
            .split(',')
            .map(|operand| helpers::string_value(operand.to_string()))
            .collect(),
    }
}

fn unary(expression: ast::Expression, operator: ast::UnaryOperator) -> ast::Expression {
    ast::Expression::UnaryOperation {
        expression: Box::new(expression),
        operator,
    }
}
