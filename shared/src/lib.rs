// shared/src/lib.rs

use std::time::Duration;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure talking to the Primary Store or the Fast Cache.
///
/// The underlying driver error is kept as a structured `source`, so callers
/// can inspect or log it without parsing the message.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("{backend} unreachable")]
    ConnectionFailure {
        backend: &'static str,
        #[source]
        source: BoxError,
    },
    #[error("{backend} query failed")]
    QueryFailure {
        backend: &'static str,
        #[source]
        source: BoxError,
    },
}

impl StoreError {
    pub fn connection(backend: &'static str, source: impl Into<BoxError>) -> Self {
        StoreError::ConnectionFailure {
            backend,
            source: source.into(),
        }
    }

    pub fn query(backend: &'static str, source: impl Into<BoxError>) -> Self {
        StoreError::QueryFailure {
            backend,
            source: source.into(),
        }
    }

    /// A call that exceeded its deadline is reported as an unreachable backend
    pub fn timed_out(backend: &'static str, after: Duration) -> Self {
        let source = std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            format!("no response within {} ms", after.as_millis()),
        );
        StoreError::connection(backend, source)
    }

    pub fn backend(&self) -> &'static str {
        match self {
            StoreError::ConnectionFailure { backend, .. }
            | StoreError::QueryFailure { backend, .. } => backend,
        }
    }
}

/// Caller input that was rejected before reaching any store.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field '{field}'")]
    MissingField { field: &'static str },
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
}

/// Errors surfaced by resource operations.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, Error>;

pub mod config;
