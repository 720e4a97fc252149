//! Core types and utilities for HYDRAA.
//!
//! This crate provides the foundational types used throughout the petition workflow:
//!
//! - **Identifiers**: Strongly-typed IDs for users, petitions, and feedback records,
//!   plus the human-facing petition number (`PTN000012024`)
//! - **Reference data**: The static location taxonomy and encroachment types
//! - **Error types**: Common error definitions shared across crates
//!
//! # Example
//!
//! ```
//! use hydraa_core::{PetitionId, PetitionNumber, UserId};
//!
//! // Directory user IDs are short opaque strings
//! let officer = UserId::new("officer2").unwrap();
//!
//! // Petition numbers carry a per-year sequence
//! let number = PetitionNumber::new(1, 2024).unwrap();
//! assert_eq!(number.to_string(), "PTN000012024");
//!
//! // Petition IDs are derived from the creator and the petition number
//! let petition_id = PetitionId::generate(&officer, &number);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod ids;
pub mod reference;

pub use error::{CoreError, Result};
pub use ids::{FeedbackId, IdError, PetitionId, PetitionNumber, UserId};
pub use reference::{EncroachmentType, LocationNode, ENCROACHMENT_TYPES, LOCATIONS};
