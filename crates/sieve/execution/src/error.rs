//! Errors arising while executing a plan.

use thiserror::Error;

use sieve_translation::translation::query::error::CompileErrors;

#[derive(Debug, Error)]
pub enum Error {
    /// The request failed validation; nothing was sent to the backend.
    #[error("request failed to compile: {0}")]
    Compile(#[from] CompileErrors),

    /// `find_one` matched no rows.
    #[error("no rows matched the request")]
    NotFound,

    /// Backend errors propagate unmodified so callers can tell a bad request
    /// from a storage failure.
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
