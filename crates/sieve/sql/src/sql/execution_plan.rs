//! The accumulated, not-yet-executed representation of a compiled request.

use super::ast;
use super::string::SQL;

/// A compiled request: the row query, plus the count query over the same
/// filtered-but-unpaginated state used to populate pagination totals.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionPlan {
    pub query: ast::Select,
    pub count: ast::Select,
}

impl ExecutionPlan {
    /// Print the row query.
    pub fn query_sql(&self) -> SQL {
        let mut sql = SQL::new();
        self.query.to_sql(&mut sql);
        sql
    }

    /// Print the count query.
    pub fn count_sql(&self) -> SQL {
        let mut sql = SQL::new();
        self.count.to_sql(&mut sql);
        sql
    }
}
