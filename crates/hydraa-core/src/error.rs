//! Common error types for HYDRAA.
//!
//! This module provides shared error types that are used across multiple crates.

use thiserror::Error;

/// A result type using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core errors that can occur throughout the HYDRAA system.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An invalid identifier was provided.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] crate::ids::IdError),

    /// A location path does not exist in the location taxonomy.
    #[error("unknown location: {0}")]
    UnknownLocation(String),

    /// An encroachment type ID is not part of the reference list.
    #[error("unknown encroachment type: {0}")]
    UnknownEncroachmentType(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}
