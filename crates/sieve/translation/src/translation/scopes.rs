//! Named scopes: registered, opaque transforms over a query plan.
//!
//! A scope is a transform from query-plan state to query-plan state, not
//! narrowly one clause: a group scope, for example, may legitimately replace
//! both the grouping and the projection of the plan it receives. Scope
//! authors supply any raw SQL text themselves and are responsible for its
//! safety; the compiler never quotes it.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use sieve_sql::sql::ast;

/// An opaque transform from one query-plan state to another.
pub type ScopeFunc = Arc<dyn Fn(ast::Select) -> ast::Select + Send + Sync>;

/// The category a scope is registered under. A name in one category is
/// invisible to every other category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScopeKind {
    Filter,
    Sort,
    Group,
    Select,
    Join,
}

impl ScopeKind {
    pub fn name(&self) -> &'static str {
        match self {
            ScopeKind::Filter => "filter",
            ScopeKind::Sort => "sort",
            ScopeKind::Group => "group",
            ScopeKind::Select => "select",
            ScopeKind::Join => "join",
        }
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A store of named scopes, partitioned by category.
///
/// Registration may happen during initialization while other callers compile
/// concurrently, so the map sits behind a reader/writer lock: lookups never
/// block each other, writes are exclusive. The registry owns registered
/// functions. One registry is injected per compiler instance; there is no
/// process-global registry.
#[derive(Default)]
pub struct ScopeRegistry {
    scopes: RwLock<BTreeMap<(ScopeKind, String), ScopeFunc>>,
}

impl ScopeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a scope under `(kind, name)`. A later registration under the
    /// same key replaces the earlier one silently.
    pub fn register<F>(&self, kind: ScopeKind, name: impl Into<String>, scope: F)
    where
        F: Fn(ast::Select) -> ast::Select + Send + Sync + 'static,
    {
        let mut scopes = self.scopes.write().expect("scope registry lock poisoned");
        scopes.insert((kind, name.into()), Arc::new(scope));
    }

    /// Look up a scope by category and name.
    pub fn lookup(&self, kind: ScopeKind, name: &str) -> Option<ScopeFunc> {
        let scopes = self.scopes.read().expect("scope registry lock poisoned");
        scopes.get(&(kind, name.to_string())).cloned()
    }
}

impl fmt::Debug for ScopeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let scopes = self.scopes.read().expect("scope registry lock poisoned");
        f.debug_struct("ScopeRegistry")
            .field("scopes", &scopes.keys().collect::<Vec<_>>())
            .finish()
    }
}
