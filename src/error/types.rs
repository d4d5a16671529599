// src/error/types.rs
use thiserror::Error;

/// Failure of the underlying favorite record store.
///
/// Always recoverable at the coordinator boundary: a storage failure is
/// surfaced to the caller, never fatal to the process. The original cause
/// is flattened to a message because callers only branch on read vs write.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage read failed: {0}")]
    ReadFailed(String),

    #[error("storage write failed: {0}")]
    WriteFailed(String),
}

impl StoreError {
    pub fn read(err: impl std::fmt::Display) -> Self {
        StoreError::ReadFailed(err.to_string())
    }

    pub fn write(err: impl std::fmt::Display) -> Self {
        StoreError::WriteFailed(err.to_string())
    }
}

/// Mutation-caller view of a storage failure: the requested favorite or
/// unfavorite did not take effect.
#[derive(Debug, Error)]
pub enum FavoriteError {
    #[error("favorite change was not persisted: {0}")]
    PersistenceFailed(#[from] StoreError),
}

/// Catalog API client errors.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog returned status {0}")]
    Status(u16),

    #[error("failed to decode catalog response: {0}")]
    Decode(String),

    #[error("movie {0} not found in catalog")]
    NotFound(i64),
}

/// Application bootstrap errors (database setup, migrations).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::Pool(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
