//! Run compiled plans against the database and materialize rows.

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, SqlitePool};

use sieve_sql::sql::execution_plan::ExecutionPlan;
use sieve_sql::sql::string::{Param, SQL};
use sieve_translation::translation::query::QueryCompiler;
use sieve_translation::translation::request::FilterRequest;

use crate::error::Error;

/// Executes compiled requests against a connection pool. The compiler and
/// executor are synchronous in structure: each call compiles, optionally
/// counts, and runs, with no internal task spawning. Retries, timeouts, and
/// cancellation are the pool's concern, not this layer's.
pub struct Executor {
    pool: SqlitePool,
}

impl Executor {
    pub fn new(pool: SqlitePool) -> Self {
        Executor { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Compile and run a request, mapping every row into `T`. Zero rows is
    /// success with an empty vec.
    ///
    /// When the request carries pagination, the count query runs first and
    /// its result is written into `request.page.total` — one extra round
    /// trip per call. Callers that want to avoid it should omit `page` and
    /// call [`Executor::count`] themselves.
    pub async fn find_all<T>(
        &self,
        compiler: &QueryCompiler,
        request: &mut FilterRequest,
    ) -> Result<Vec<T>, Error>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let plan = compiler.compile(request)?;
        self.populate_total(&plan, request).await?;

        let query = plan.query_sql();
        tracing::info!(generated_sql = %query.sql, params = ?query.params);

        let mut rows = sqlx::query_as::<_, T>(&query.sql);
        for param in &query.params {
            let Param::String(value) = param;
            rows = rows.bind(value);
        }
        Ok(rows.fetch_all(&self.pool).await?)
    }

    /// Compile and run a request, mapping the first row into `T`. Zero rows
    /// is [`Error::NotFound`]. Pagination behaves as in
    /// [`Executor::find_all`].
    pub async fn find_one<T>(
        &self,
        compiler: &QueryCompiler,
        request: &mut FilterRequest,
    ) -> Result<T, Error>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let plan = compiler.compile(request)?;
        self.populate_total(&plan, request).await?;

        let query = plan.query_sql();
        tracing::info!(generated_sql = %query.sql, params = ?query.params);

        let mut row = sqlx::query_as::<_, T>(&query.sql);
        for param in &query.params {
            let Param::String(value) = param;
            row = row.bind(value);
        }
        row.fetch_optional(&self.pool)
            .await?
            .ok_or(Error::NotFound)
    }

    /// Compile a request and run its count query: the row count of the
    /// filtered-but-unpaginated plan. Does not touch `request.page`.
    pub async fn count(&self, compiler: &QueryCompiler, request: &FilterRequest) -> Result<i64, Error> {
        let plan = compiler.compile(request)?;
        self.run_count(&plan.count_sql()).await
    }

    async fn populate_total(
        &self,
        plan: &ExecutionPlan,
        request: &mut FilterRequest,
    ) -> Result<(), Error> {
        if let Some(page) = request.page.as_mut() {
            page.total = self.run_count(&plan.count_sql()).await?;
        }
        Ok(())
    }

    async fn run_count(&self, query: &SQL) -> Result<i64, Error> {
        tracing::info!(generated_sql = %query.sql, params = ?query.params);

        let mut count = sqlx::query_scalar::<_, i64>(&query.sql);
        for param in &query.params {
            let Param::String(value) = param;
            count = count.bind(value);
        }
        Ok(count.fetch_one(&self.pool).await?)
    }
}
