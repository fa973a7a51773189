//! The wire-representable request data model.
//!
//! All container fields carry serde defaults so sparse JSON documents parse:
//! a filter with no `op` key is an equality filter, flags default to false,
//! and absent lists are empty.

use std::fmt;

use enum_iterator::Sequence;
use serde::{Deserialize, Serialize};

/// A filter comparison operator.
///
/// The wire encoding is the lowercase name (`"eq"`, `"not_in"`,
/// `"array_contains"`, ...). Unrecognized wire values deserialize to
/// [`Operator::Unknown`], which compiles to no predicate and renders as
/// `"UNKNOWN"` in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Sequence, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    #[default]
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Like,
    In,
    Between,
    NotIn,
    IsNull,
    NotNull,
    StartsWith,
    EndsWith,
    Contains,
    NotLike,
    Regexp,
    NotRegexp,
    Overlap,
    ArrayContains,
    ArrayContained,
    Unknown,
}

impl Operator {
    /// The stable diagnostic name.
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Eq => "EQ",
            Operator::Ne => "NE",
            Operator::Gt => "GT",
            Operator::Ge => "GE",
            Operator::Lt => "LT",
            Operator::Le => "LE",
            Operator::Like => "LIKE",
            Operator::In => "IN",
            Operator::Between => "BETWEEN",
            Operator::NotIn => "NOT_IN",
            Operator::IsNull => "IS_NULL",
            Operator::NotNull => "NOT_NULL",
            Operator::StartsWith => "STARTS_WITH",
            Operator::EndsWith => "ENDS_WITH",
            Operator::Contains => "CONTAINS",
            Operator::NotLike => "NOT_LIKE",
            Operator::Regexp => "REGEXP",
            Operator::NotRegexp => "NOT_REGEXP",
            Operator::Overlap => "OVERLAP",
            Operator::ArrayContains => "ARRAY_CONTAINS",
            Operator::ArrayContained => "ARRAY_CONTAINED",
            Operator::Unknown => "UNKNOWN",
        }
    }

    /// The name of the operator exposed on the wire.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Gt => "gt",
            Operator::Ge => "ge",
            Operator::Lt => "lt",
            Operator::Le => "le",
            Operator::Like => "like",
            Operator::In => "in",
            Operator::Between => "between",
            Operator::NotIn => "not_in",
            Operator::IsNull => "is_null",
            Operator::NotNull => "not_null",
            Operator::StartsWith => "starts_with",
            Operator::EndsWith => "ends_with",
            Operator::Contains => "contains",
            Operator::NotLike => "not_like",
            Operator::Regexp => "regexp",
            Operator::NotRegexp => "not_regexp",
            Operator::Overlap => "overlap",
            Operator::ArrayContains => "array_contains",
            Operator::ArrayContained => "array_contained",
            Operator::Unknown => "unknown",
        }
    }

    /// Parse a wire name; anything unrecognized is `Unknown`.
    pub fn parse(name: &str) -> Operator {
        enum_iterator::all::<Operator>()
            .find(|op| op.wire_name() == name)
            .unwrap_or(Operator::Unknown)
    }

    /// Whether the case-insensitive flag applies to this operator. Null
    /// checks have no value to lower, and the array operators compare
    /// structure, not text.
    pub fn folds_case(&self) -> bool {
        !matches!(
            self,
            Operator::IsNull
                | Operator::NotNull
                | Operator::Overlap
                | Operator::ArrayContains
                | Operator::ArrayContained
                | Operator::Unknown
        )
    }
}

impl From<String> for Operator {
    fn from(name: String) -> Self {
        Operator::parse(&name)
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.wire_name().to_string()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An aggregation operation.
///
/// Wire encoding is the lowercase name; unrecognized values deserialize to
/// `Unknown`, which projects nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Sequence, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AggregationOp {
    Count,
    Sum,
    Avg,
    Max,
    Min,
    #[default]
    Unknown,
}

impl AggregationOp {
    /// The stable diagnostic name.
    pub fn name(&self) -> &'static str {
        match self {
            AggregationOp::Count => "COUNT",
            AggregationOp::Sum => "SUM",
            AggregationOp::Avg => "AVG",
            AggregationOp::Max => "MAX",
            AggregationOp::Min => "MIN",
            AggregationOp::Unknown => "UNKNOWN",
        }
    }

    /// The name of the operation exposed on the wire.
    pub fn wire_name(&self) -> &'static str {
        match self {
            AggregationOp::Count => "count",
            AggregationOp::Sum => "sum",
            AggregationOp::Avg => "avg",
            AggregationOp::Max => "max",
            AggregationOp::Min => "min",
            AggregationOp::Unknown => "unknown",
        }
    }

    /// Parse a wire name; anything unrecognized is `Unknown`.
    pub fn parse(name: &str) -> AggregationOp {
        enum_iterator::all::<AggregationOp>()
            .find(|op| op.wire_name() == name)
            .unwrap_or(AggregationOp::Unknown)
    }
}

impl From<String> for AggregationOp {
    fn from(name: String) -> Self {
        AggregationOp::parse(&name)
    }
}

impl From<AggregationOp> for String {
    fn from(op: AggregationOp) -> Self {
        op.wire_name().to_string()
    }
}

impl fmt::Display for AggregationOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single filter clause.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Filter {
    /// Logical entity field name, resolved through the catalog.
    pub field: String,
    pub op: Operator,
    /// The operand, string-encoded. `In`/`NotIn`/`Between` pack multiple
    /// operands comma-separated; a known limitation of this encoding is that
    /// operand values containing commas cannot be represented.
    pub value: String,
    pub nocase: bool,
}

/// A sort clause: a field name or a named sort scope.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Sort {
    pub field: String,
    pub desc: bool,
    pub nocase: bool,
    pub scope: Option<String>,
}

impl Sort {
    pub fn scope_name(&self) -> Option<&str> {
        non_empty(&self.scope)
    }
}

/// A grouping clause: a field name or a named group scope.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Group {
    pub field: String,
    /// Raw HAVING text is rejected at compile time; register a group scope
    /// instead.
    pub having: Option<String>,
    pub scope: Option<String>,
}

impl Group {
    pub fn scope_name(&self) -> Option<&str> {
        non_empty(&self.scope)
    }

    pub fn having_text(&self) -> Option<&str> {
        non_empty(&self.having)
    }
}

/// An aggregation projection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Aggregation {
    pub field: String,
    pub op: AggregationOp,
    pub nocase: bool,
    /// Raw extra selects are rejected at compile time; register a select
    /// scope instead.
    pub add_selects: Vec<String>,
    /// Projection alias; defaults to the plain column name when absent.
    pub alias: Option<String>,
}

impl Aggregation {
    pub fn alias_name(&self) -> Option<&str> {
        non_empty(&self.alias)
    }
}

/// Pagination parameters. `total` is an output side channel: it is written
/// during a paginated execute with the row count of the unpaginated query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    /// 1-based page number.
    pub page: u32,
    pub page_size: u32,
    pub total: i64,
}

/// A join clause: an explicit LEFT/RIGHT/INNER join onto raw table and
/// condition text, or a named join scope. An explicit kind takes precedence
/// over the scope only when it is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Join {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub table: String,
    pub condition: String,
    pub scope: Option<String>,
}

impl Join {
    pub fn kind_name(&self) -> Option<&str> {
        non_empty(&self.kind)
    }

    pub fn scope_name(&self) -> Option<&str> {
        non_empty(&self.scope)
    }
}

/// A sub-query joined to the parent query as a derived table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SubQuery {
    /// Alias the derived table is joined under.
    pub field: String,
    /// Entity the nested request is compiled against.
    pub table: String,
    pub filter: FilterRequest,
    /// Raw join condition between parent and derived table.
    pub join_cond: String,
}

/// A reference to a registered select scope.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomField {
    /// The output field name the scope projects; informational for callers.
    pub name: String,
    pub scope: String,
}

/// A reference to a registered filter scope.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomFilter {
    pub scope: String,
}

/// The aggregate root of a query request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterRequest {
    pub filters: Vec<Filter>,
    pub custom_fields: Vec<CustomField>,
    pub custom_filter: Option<CustomFilter>,
    pub sorts: Vec<Sort>,
    pub aggrs: Vec<Aggregation>,
    pub page: Option<Pagination>,
    pub groups: Vec<Group>,
    pub joins: Vec<Join>,
    pub sub_query: Option<Box<SubQuery>>,
    pub distinct: bool,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|text| !text.is_empty())
}
