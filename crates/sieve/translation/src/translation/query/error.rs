//! Errors for request compilation.

use std::fmt;

use thiserror::Error;

use crate::translation::scopes::ScopeKind;

/// A single compilation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A filter/sort/group/aggregation field name not present in the catalog.
    #[error("invalid field name: {0}")]
    InvalidFieldName(String),

    /// The compiler (or a sub-query) was pointed at an untracked entity.
    #[error("table '{0}' is not tracked in the catalog")]
    TableNotFound(String),

    /// A referenced scope is not registered in its category.
    #[error("{kind} scope '{name}' is not registered")]
    ScopeNotFound { kind: ScopeKind, name: String },

    /// Raw HAVING text is rejected; register a group scope instead.
    #[error("having conditions must be registered as a group scope")]
    HavingNotSupported,

    /// Raw per-aggregation extra selects are rejected; register a select
    /// scope instead.
    #[error("additional selects must be registered as a select scope")]
    AddSelectsNotSupported,
}

/// Every error recorded while compiling one request. Compilation keeps going
/// after a failed clause so a single request surfaces all of its problems at
/// once, but a request with any recorded error never yields a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileErrors(pub Vec<Error>);

impl fmt::Display for CompileErrors {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (index, error) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for CompileErrors {}
