// src/error/mod.rs

pub mod types;

pub use types::{ApiError, AppError, AppResult, FavoriteError, StoreError};
