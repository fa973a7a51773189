//! Type definitions of a SQL AST representation.

/// A SELECT clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub distinct: bool,
    pub select_list: SelectList,
    pub from: Option<From>,
    pub joins: Vec<Join>,
    pub where_: Where,
    pub group_by: GroupBy,
    pub order_by: OrderBy,
    pub limit: Limit,
}

/// A select list.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectList {
    SelectList(Vec<(ColumnAlias, Expression)>),
    SelectStar,
}

/// A FROM clause.
#[derive(Debug, Clone, PartialEq)]
pub enum From {
    /// Select from a table reference.
    Table { name: TableName, alias: TableAlias },
    /// Select from a subquery.
    Select {
        select: Box<Select>,
        alias: TableAlias,
    },
}

/// A JOIN clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Join {
    /// A join onto a caller-named table with a raw condition.
    Table(TableJoin),
    /// A join onto a derived table built from a full select.
    DerivedTable(DerivedTableJoin),
}

/// LEFT/RIGHT/INNER JOIN onto raw, caller-supplied table text.
#[derive(Debug, Clone, PartialEq)]
pub struct TableJoin {
    pub kind: JoinKind,
    pub table: RawSql,
    pub on: RawSql,
}

/// `JOIN (<select>) AS <alias> ON <condition>`.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedTableJoin {
    pub select: Box<Select>,
    pub alias: TableAlias,
    pub on: RawSql,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
}

/// Raw SQL text written by a caller which is opaque to us. It is printed
/// verbatim, never quoted: whoever supplies it is responsible for its safety.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSql(pub String);

/// A WHERE clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Where(pub Expression);

/// A GROUP BY clause.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupBy {
    pub elements: Vec<Expression>,
}

/// An ORDER BY clause.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub elements: Vec<OrderByElement>,
}

/// A single element in an ORDER BY clause.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByElement {
    pub target: Expression,
    pub direction: OrderByDirection,
}

/// A direction for a single ORDER BY element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderByDirection {
    Asc,
    Desc,
}

/// LIMIT and OFFSET clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// A scalar expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// AND clause
    And {
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// OR clause
    Or {
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// NOT clause
    Not(Box<Expression>),
    /// A binary operation on two scalar expressions.
    BinaryOperation {
        left: Box<Expression>,
        operator: BinaryOperator,
        right: Box<Expression>,
    },
    /// A binary operation on a scalar expression and an array of scalar
    /// expressions, like `IN`.
    BinaryArrayOperation {
        left: Box<Expression>,
        operator: BinaryArrayOperator,
        right: Vec<Expression>,
    },
    /// A unary operation on a scalar expression.
    UnaryOperation {
        expression: Box<Expression>,
        operator: UnaryOperator,
    },
    /// `BETWEEN <lower> AND <upper>`.
    Between {
        expression: Box<Expression>,
        lower: Box<Expression>,
        upper: Box<Expression>,
    },
    /// A scalar function call.
    FunctionCall {
        function: Function,
        args: Vec<Expression>,
    },
    /// A COUNT clause.
    Count(CountType),
    /// A column reference.
    ColumnReference(ColumnReference),
    /// An irreducible value.
    Value(Value),
    /// Raw predicate text supplied by a scope.
    RawSql(RawSql),
}

/// A unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    IsNull,
    IsNotNull,
}

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
    Like,
    NotLike,
    Regex,
    NotRegex,
    Overlap,
    ArrayContains,
    ArrayContainedIn,
}

/// A binary operator when the rhs is an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryArrayOperator {
    In,
    NotIn,
}

/// A scalar function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Function {
    Lower,
    Sum,
    Avg,
    Max,
    Min,
    Unknown(String),
}

/// COUNT clause.
#[derive(Debug, Clone, PartialEq)]
pub enum CountType {
    Star,
    Simple(Box<Expression>),
    Distinct(Box<Expression>),
}

/// Value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int8(i64),
    Float8(f64),
    Bool(bool),
    String(String),
    Null,
}

/// A database table name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(pub String);

/// A reference to a column, used in select lists, predicates, and orderings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnReference {
    /// A table-qualified column.
    TableColumn { table: TableName, name: ColumnName },
    /// A bare column, for contexts where qualification is unwanted.
    Unqualified(ColumnName),
}

/// A database table's column name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnName(pub String);

/// Aliases that we give to relations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableAlias {
    pub name: String,
}

/// Aliases that we give to columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnAlias {
    pub name: String,
}
