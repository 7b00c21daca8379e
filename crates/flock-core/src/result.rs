//! Application result alias.

use crate::error::AppError;

/// Result type used throughout the Flock crates.
pub type AppResult<T> = Result<T, AppError>;
