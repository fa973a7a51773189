//! The request compiler: fold a `FilterRequest` into a single query plan in
//! a fixed stage order.

use std::sync::Arc;

use sieve_metadata as metadata;
use sieve_sql::sql::ast;
use sieve_sql::sql::execution_plan::ExecutionPlan;
use sieve_sql::sql::helpers;

use super::error::{CompileErrors, Error};
use super::{aggregates, filtering, grouping, joins, sorting};
use crate::translation::catalog::FieldCatalog;
use crate::translation::request::FilterRequest;
use crate::translation::scopes::{ScopeFunc, ScopeKind, ScopeRegistry};

/// Compiles requests against one entity. The field catalog is built once at
/// construction; the scope registry is injected and shared, so one compiler
/// can serve many concurrent callers.
#[derive(Debug, Clone)]
pub struct QueryCompiler {
    catalog: FieldCatalog,
    tables: Arc<metadata::TablesInfo>,
    registry: Arc<ScopeRegistry>,
}

impl QueryCompiler {
    /// Build a compiler bound to `entity`, which must be tracked in the
    /// metadata.
    pub fn new(
        tables: Arc<metadata::TablesInfo>,
        entity: &str,
        registry: Arc<ScopeRegistry>,
    ) -> Result<Self, Error> {
        let table_info = tables
            .get(entity)
            .ok_or_else(|| Error::TableNotFound(entity.to_string()))?;
        let catalog = FieldCatalog::new(table_info);
        Ok(QueryCompiler {
            catalog,
            tables,
            registry,
        })
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn registry(&self) -> &Arc<ScopeRegistry> {
        &self.registry
    }

    pub(crate) fn tables(&self) -> &Arc<metadata::TablesInfo> {
        &self.tables
    }

    /// Register a scope on this compiler's registry.
    pub fn register_scope<F>(&self, kind: ScopeKind, name: impl Into<String>, scope: F)
    where
        F: Fn(ast::Select) -> ast::Select + Send + Sync + 'static,
    {
        self.registry.register(kind, name, scope);
    }

    /// Compile a request into an execution plan.
    ///
    /// Stages apply in a fixed order; a stage whose request field is empty is
    /// a no-op. A clause that fails validation is recorded and never
    /// partially applied, and compilation continues so every problem in the
    /// request is reported; any recorded error means no plan is produced.
    pub fn compile(&self, request: &FilterRequest) -> Result<ExecutionPlan, CompileErrors> {
        let mut errors: Vec<Error> = vec![];

        let mut select = helpers::star_select(ast::From::Table {
            name: self.catalog.table().clone(),
            alias: helpers::make_table_alias(self.catalog.table().0.clone()),
        });

        // (1) select scopes for custom fields
        for field in &request.custom_fields {
            match self.lookup_scope(ScopeKind::Select, &field.scope, &mut errors) {
                Some(scope) => select = scope(select),
                None => continue,
            }
        }

        // (2) distinct
        if request.distinct {
            select.distinct = true;
        }

        // (3) joins
        select = joins::translate_joins(&self.registry, select, &request.joins, &mut errors);

        // (4) sub-query as a derived table
        if let Some(sub) = &request.sub_query {
            select = joins::translate_sub_query(self, select, sub, &mut errors);
        }

        // (5) standard filters
        select = filtering::translate_filters(&self.catalog, select, &request.filters, &mut errors);

        // (6) custom filter scope
        if let Some(filter) = &request.custom_filter {
            if let Some(scope) = self.lookup_scope(ScopeKind::Filter, &filter.scope, &mut errors) {
                select = scope(select);
            }
        }

        // (7) groups
        select = grouping::translate_groups(
            &self.catalog,
            &self.registry,
            select,
            &request.groups,
            &mut errors,
        );

        // (8) sorts
        select = sorting::translate_sorts(
            &self.catalog,
            &self.registry,
            select,
            &request.sorts,
            &mut errors,
        );

        // (9) aggregation projections
        select = aggregates::translate_aggregations(&self.catalog, select, &request.aggrs, &mut errors);

        // (10) pagination. The count query captures the filtered state before
        // limit and offset apply.
        let count = helpers::count_select(select.clone());
        if let Some(page) = &request.page {
            select.limit = ast::Limit {
                limit: Some(page.page_size),
                offset: Some(page.page.saturating_sub(1).saturating_mul(page.page_size)),
            };
        }

        if !errors.is_empty() {
            return Err(CompileErrors(errors));
        }

        tracing::debug!(table = %self.catalog.table().0, "compiled request");
        Ok(ExecutionPlan {
            query: select,
            count,
        })
    }

    fn lookup_scope(
        &self,
        kind: ScopeKind,
        name: &str,
        errors: &mut Vec<Error>,
    ) -> Option<ScopeFunc> {
        let scope = self.registry.lookup(kind, name);
        if scope.is_none() {
            errors.push(Error::ScopeNotFound {
                kind,
                name: name.to_string(),
            });
        }
        scope
    }
}
