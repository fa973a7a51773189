//! Convert a SQL AST to a low-level SQL string.

use super::ast::*;
use super::helpers;
use super::string::{Param, SQL};

impl Select {
    pub fn to_sql(&self, sql: &mut SQL) {
        sql.append_syntax("SELECT ");
        if self.distinct {
            sql.append_syntax("DISTINCT ");
        }

        self.select_list.to_sql(sql);

        if let Some(from) = &self.from {
            sql.append_syntax(" ");
            from.to_sql(sql);
        }

        for join in &self.joins {
            join.to_sql(sql);
        }

        self.where_.to_sql(sql);

        self.group_by.to_sql(sql);

        self.order_by.to_sql(sql);

        self.limit.to_sql(sql);
    }
}

impl SelectList {
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            SelectList::SelectList(select_list) => {
                for (index, (col, expr)) in select_list.iter().enumerate() {
                    expr.to_sql(sql);
                    sql.append_syntax(" AS ");
                    col.to_sql(sql);
                    if index < (select_list.len() - 1) {
                        sql.append_syntax(", ");
                    }
                }
            }
            SelectList::SelectStar => {
                sql.append_syntax("*");
            }
        }
    }
}

impl From {
    pub fn to_sql(&self, sql: &mut SQL) {
        sql.append_syntax("FROM ");
        match self {
            From::Table { name, alias } => {
                name.to_sql(sql);
                sql.append_syntax(" AS ");
                alias.to_sql(sql);
            }
            From::Select { select, alias } => {
                sql.append_syntax("(");
                select.to_sql(sql);
                sql.append_syntax(")");
                sql.append_syntax(" AS ");
                alias.to_sql(sql);
            }
        }
    }
}

impl Join {
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            Join::Table(join) => {
                join.kind.to_sql(sql);
                sql.append_syntax(&join.table.0);
                sql.append_syntax(" ON ");
                sql.append_syntax(&join.on.0);
            }
            Join::DerivedTable(join) => {
                sql.append_syntax(" JOIN (");
                join.select.to_sql(sql);
                sql.append_syntax(") AS ");
                join.alias.to_sql(sql);
                sql.append_syntax(" ON ");
                sql.append_syntax(&join.on.0);
            }
        }
    }
}

impl JoinKind {
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            JoinKind::Inner => sql.append_syntax(" INNER JOIN "),
            JoinKind::Left => sql.append_syntax(" LEFT JOIN "),
            JoinKind::Right => sql.append_syntax(" RIGHT JOIN "),
        }
    }
}

impl Where {
    pub fn to_sql(&self, sql: &mut SQL) {
        let Where(expression) = self;
        if *expression != helpers::true_expr() {
            sql.append_syntax(" WHERE ");
            expression.to_sql(sql);
        }
    }
}

impl GroupBy {
    pub fn to_sql(&self, sql: &mut SQL) {
        if !self.elements.is_empty() {
            sql.append_syntax(" GROUP BY ");
            for (index, element) in self.elements.iter().enumerate() {
                element.to_sql(sql);
                if index < (self.elements.len() - 1) {
                    sql.append_syntax(", ");
                }
            }
        }
    }
}

impl OrderBy {
    pub fn to_sql(&self, sql: &mut SQL) {
        if !self.elements.is_empty() {
            sql.append_syntax(" ORDER BY ");
            for (index, element) in self.elements.iter().enumerate() {
                element.to_sql(sql);
                if index < (self.elements.len() - 1) {
                    sql.append_syntax(", ");
                }
            }
        }
    }
}

impl OrderByElement {
    pub fn to_sql(&self, sql: &mut SQL) {
        self.target.to_sql(sql);
        self.direction.to_sql(sql);
    }
}

impl OrderByDirection {
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            OrderByDirection::Asc => sql.append_syntax(" ASC"),
            OrderByDirection::Desc => sql.append_syntax(" DESC"),
        }
    }
}

impl Limit {
    pub fn to_sql(&self, sql: &mut SQL) {
        if let Some(limit) = self.limit {
            sql.append_syntax(" LIMIT ");
            sql.append_syntax(&limit.to_string());
        }
        if let Some(offset) = self.offset {
            sql.append_syntax(" OFFSET ");
            sql.append_syntax(&offset.to_string());
        }
    }
}

// scalars

impl Expression {
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            Expression::And { left, right } => {
                sql.append_syntax("(");
                left.to_sql(sql);
                sql.append_syntax(" AND ");
                right.to_sql(sql);
                sql.append_syntax(")");
            }
            Expression::Or { left, right } => {
                sql.append_syntax("(");
                left.to_sql(sql);
                sql.append_syntax(" OR ");
                right.to_sql(sql);
                sql.append_syntax(")");
            }
            Expression::Not(expr) => {
                sql.append_syntax("NOT ");
                expr.to_sql(sql);
            }
            Expression::BinaryOperation {
                left,
                operator,
                right,
            } => {
                sql.append_syntax("(");
                left.to_sql(sql);
                operator.to_sql(sql);
                right.to_sql(sql);
                sql.append_syntax(")");
            }
            Expression::BinaryArrayOperation {
                left,
                operator,
                right,
            } => {
                sql.append_syntax("(");
                left.to_sql(sql);
                operator.to_sql(sql);
                sql.append_syntax("(");
                for (index, item) in right.iter().enumerate() {
                    item.to_sql(sql);
                    if index < (right.len() - 1) {
                        sql.append_syntax(", ");
                    }
                }
                sql.append_syntax(")");
                sql.append_syntax(")");
            }
            Expression::UnaryOperation {
                expression,
                operator,
            } => {
                sql.append_syntax("(");
                expression.to_sql(sql);
                operator.to_sql(sql);
                sql.append_syntax(")");
            }
            Expression::Between {
                expression,
                lower,
                upper,
            } => {
                sql.append_syntax("(");
                expression.to_sql(sql);
                sql.append_syntax(" BETWEEN ");
                lower.to_sql(sql);
                sql.append_syntax(" AND ");
                upper.to_sql(sql);
                sql.append_syntax(")");
            }
            Expression::FunctionCall { function, args } => {
                function.to_sql(sql);
                sql.append_syntax("(");
                for (index, arg) in args.iter().enumerate() {
                    arg.to_sql(sql);
                    if index < (args.len() - 1) {
                        sql.append_syntax(", ");
                    }
                }
                sql.append_syntax(")");
            }
            Expression::Count(count_type) => {
                sql.append_syntax("COUNT(");
                count_type.to_sql(sql);
                sql.append_syntax(")");
            }
            Expression::ColumnReference(column_reference) => column_reference.to_sql(sql),
            Expression::Value(value) => value.to_sql(sql),
            Expression::RawSql(raw) => sql.append_syntax(&raw.0),
        }
    }
}

impl UnaryOperator {
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            UnaryOperator::IsNull => sql.append_syntax(" IS NULL"),
            UnaryOperator::IsNotNull => sql.append_syntax(" IS NOT NULL"),
        }
    }
}

impl BinaryOperator {
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            BinaryOperator::Equals => sql.append_syntax(" = "),
            BinaryOperator::NotEquals => sql.append_syntax(" != "),
            BinaryOperator::LessThan => sql.append_syntax(" < "),
            BinaryOperator::LessThanOrEqualTo => sql.append_syntax(" <= "),
            BinaryOperator::GreaterThan => sql.append_syntax(" > "),
            BinaryOperator::GreaterThanOrEqualTo => sql.append_syntax(" >= "),
            BinaryOperator::Like => sql.append_syntax(" LIKE "),
            BinaryOperator::NotLike => sql.append_syntax(" NOT LIKE "),
            BinaryOperator::Regex => sql.append_syntax(" ~ "),
            BinaryOperator::NotRegex => sql.append_syntax(" !~ "),
            BinaryOperator::Overlap => sql.append_syntax(" && "),
            BinaryOperator::ArrayContains => sql.append_syntax(" @> "),
            BinaryOperator::ArrayContainedIn => sql.append_syntax(" <@ "),
        }
    }
}

impl BinaryArrayOperator {
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            BinaryArrayOperator::In => sql.append_syntax(" IN "),
            BinaryArrayOperator::NotIn => sql.append_syntax(" NOT IN "),
        }
    }
}

impl Function {
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            Function::Lower => sql.append_syntax("LOWER"),
            Function::Sum => sql.append_syntax("SUM"),
            Function::Avg => sql.append_syntax("AVG"),
            Function::Max => sql.append_syntax("MAX"),
            Function::Min => sql.append_syntax("MIN"),
            Function::Unknown(name) => sql.append_syntax(name),
        }
    }
}

impl CountType {
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            CountType::Star => sql.append_syntax("*"),
            CountType::Simple(expression) => expression.to_sql(sql),
            CountType::Distinct(expression) => {
                sql.append_syntax("DISTINCT ");
                expression.to_sql(sql);
            }
        }
    }
}

impl Value {
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            Value::Int8(i) => sql.append_syntax(&i.to_string()),
            Value::Float8(n) => sql.append_syntax(&n.to_string()),
            Value::Bool(true) => sql.append_syntax("true"),
            Value::Bool(false) => sql.append_syntax("false"),
            Value::String(s) => sql.append_param(Param::String(s.clone())),
            Value::Null => sql.append_syntax("NULL"),
        }
    }
}

// names

impl TableName {
    pub fn to_sql(&self, sql: &mut SQL) {
        sql.append_identifier(&self.0);
    }
}

impl TableAlias {
    pub fn to_sql(&self, sql: &mut SQL) {
        sql.append_identifier(&self.name);
    }
}

impl ColumnReference {
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            ColumnReference::TableColumn { table, name } => {
                table.to_sql(sql);
                sql.append_syntax(".");
                name.to_sql(sql);
            }
            ColumnReference::Unqualified(name) => name.to_sql(sql),
        }
    }
}

impl ColumnName {
    pub fn to_sql(&self, sql: &mut SQL) {
        sql.append_identifier(&self.0);
    }
}

impl ColumnAlias {
    pub fn to_sql(&self, sql: &mut SQL) {
        sql.append_identifier(&self.name);
    }
}
