//! Helpers for building sql::ast types in certain shapes and patterns.

use super::ast::*;

// Empty clauses //

/// An empty `WHERE` clause.
pub fn empty_where() -> Where {
    Where(true_expr())
}

/// An empty `GROUP BY` clause.
pub fn empty_group_by() -> GroupBy {
    GroupBy { elements: vec![] }
}

/// An empty `ORDER BY` clause.
pub fn empty_order_by() -> OrderBy {
    OrderBy { elements: vec![] }
}

/// Empty `LIMIT` and `OFFSET` clauses.
pub fn empty_limit() -> Limit {
    Limit {
        limit: None,
        offset: None,
    }
}

/// A `true` expression.
pub fn true_expr() -> Expression {
    Expression::Value(Value::Bool(true))
}

/// A `false` expression.
pub fn false_expr() -> Expression {
    Expression::Value(Value::Bool(false))
}

// Aliasing //

/// Create column aliases using this function so we build everything in one place.
pub fn make_column_alias(name: String) -> ColumnAlias {
    ColumnAlias { name }
}

/// Create table aliases using this function so we build everything in one place.
pub fn make_table_alias(name: String) -> TableAlias {
    TableAlias { name }
}

// Expressions //

/// AND two expressions together, treating a `true` on the left as empty.
pub fn and_expr(left: Expression, right: Expression) -> Expression {
    if left == true_expr() {
        right
    } else {
        Expression::And {
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// Wrap an expression in `LOWER(..)`.
pub fn lower(expression: Expression) -> Expression {
    Expression::FunctionCall {
        function: Function::Lower,
        args: vec![expression],
    }
}

/// A string value, which becomes a bound parameter when printed.
pub fn string_value(value: String) -> Expression {
    Expression::Value(Value::String(value))
}

// SELECTs //

/// Build a simple select with a select list and the rest empty.
pub fn simple_select(select_list: Vec<(ColumnAlias, Expression)>) -> Select {
    Select {
        distinct: false,
        select_list: SelectList::SelectList(select_list),
        from: None,
        joins: vec![],
        where_: empty_where(),
        group_by: empty_group_by(),
        order_by: empty_order_by(),
        limit: empty_limit(),
    }
}

/// Build a `SELECT *` over a from clause.
pub fn star_select(from: From) -> Select {
    Select {
        distinct: false,
        select_list: SelectList::SelectStar,
        from: Some(from),
        joins: vec![],
        where_: empty_where(),
        group_by: empty_group_by(),
        order_by: empty_order_by(),
        limit: empty_limit(),
    }
}

/// Wrap a select in `SELECT COUNT(*) AS "count" FROM (..) AS "count_source"`,
/// counting the rows the inner select produces.
pub fn count_select(inner: Select) -> Select {
    let mut select = simple_select(vec![(
        make_column_alias("count".to_string()),
        Expression::Count(CountType::Star),
    )]);
    select.from = Some(From::Select {
        select: Box::new(inner),
        alias: make_table_alias("count_source".to_string()),
    });
    select
}
