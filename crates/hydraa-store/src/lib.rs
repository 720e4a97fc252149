//! Storage layer for HYDRAA.
//!
//! This crate provides persistence for the user directory, petitions, and the
//! feedback records attached to petitions, plus the single persisted session
//! slot. `RocksStore` keeps everything in a local `RocksDB` database with
//! column families for indexing; `MemoryStore` is an in-process fake with the
//! same semantics.
//!
//! # Architecture
//!
//! The `RocksDB` storage uses the following column families:
//!
//! - `users`: Directory users, keyed by `user_id`
//! - `users_by_email`: Unique email index
//! - `petitions`: Primary petition records, keyed by `petition_id`
//! - `petitions_by_status`: Index for listing petitions by status
//! - `petitions_by_number`: Unique petition number index
//! - `eo_feedback`: Officer reports, in submission order per petition
//! - `hod_feedback`: Final decisions, one per petition
//! - `counters`: Per-year petition sequences
//! - `session`: The `hydraa_user` session slot
//!
//! # Concurrency
//!
//! Petitions carry a `version`. Every petition update is a compare-and-swap
//! on that version: the write succeeds only if the stored version still
//! equals the caller's copy, and the committed record carries the next
//! version. A lost race surfaces as `StoreError::Conflict`.
//!
//! # Example
//!
//! ```no_run
//! use hydraa_store::{PetitionStatus, RocksStore, Store};
//!
//! let store = RocksStore::open("/tmp/hydraa-db").unwrap();
//!
//! // List petitions waiting for assignment
//! let pending = store.list_petitions_by_status(PetitionStatus::Pending).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod memory;
pub mod rocks;
pub mod schema;
pub mod types;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use rocks::RocksStore;
pub use types::{
    derive_handle, Designation, EncroachmentZone, EoFeedback, HodFeedback, ParseEnumError,
    Petition, PetitionStatus, PetitionType, Petitioner, Role, SubmittedBy, TimeBound, User,
};

use hydraa_core::{PetitionId, PetitionNumber, UserId};

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer, allowing for different implementations
/// (e.g., `RocksDB`, in-memory for testing).
pub trait Store: Send + Sync {
    // =========================================================================
    // User Operations
    // =========================================================================

    /// Insert or update a user record.
    ///
    /// This also maintains the email index.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Duplicate` if the email belongs to another user.
    fn put_user(&self, user: &User) -> Result<()>;

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_user(&self, user_id: &UserId) -> Result<Option<User>>;

    /// Get a user by email, compared case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Delete a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the user doesn't exist.
    fn delete_user(&self, user_id: &UserId) -> Result<()>;

    /// List all users, ordered by user ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_users(&self) -> Result<Vec<User>>;

    // =========================================================================
    // Petition Operations
    // =========================================================================

    /// Insert a new petition.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Duplicate` if the petition ID or number is taken.
    fn insert_petition(&self, petition: &Petition) -> Result<()>;

    /// Get a petition by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_petition(&self, petition_id: &PetitionId) -> Result<Option<Petition>>;

    /// Get a petition by its petition number.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_petition_by_number(&self, number: &PetitionNumber) -> Result<Option<Petition>>;

    /// List all petitions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_petitions(&self) -> Result<Vec<Petition>>;

    /// List all petitions with a given status.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_petitions_by_status(&self, status: PetitionStatus) -> Result<Vec<Petition>>;

    /// Compare-and-swap a petition.
    ///
    /// `petition.version` must equal the stored version. The record is written
    /// with the next version and the committed copy is returned.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the petition doesn't exist, or
    /// `StoreError::Conflict` if the stored version has moved on.
    fn update_petition(&self, petition: &Petition) -> Result<Petition>;

    /// Compare-and-swap a petition and append an officer report in one write.
    ///
    /// # Errors
    ///
    /// Same as [`Store::update_petition`].
    fn commit_feedback(&self, petition: &Petition, feedback: &EoFeedback) -> Result<Petition>;

    /// Compare-and-swap a petition and record its final decision in one write.
    ///
    /// # Errors
    ///
    /// Same as [`Store::update_petition`], plus `StoreError::Duplicate` if a
    /// decision already exists for the petition.
    fn commit_decision(&self, petition: &Petition, decision: &HodFeedback) -> Result<Petition>;

    /// List the officer reports of a petition in submission order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_eo_feedback(&self, petition_id: &PetitionId) -> Result<Vec<EoFeedback>>;

    /// Get the final decision of a petition, if recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_hod_feedback(&self, petition_id: &PetitionId) -> Result<Option<HodFeedback>>;

    /// Allocate the next petition sequence number for a year, starting at 1.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn next_petition_sequence(&self, year: u16) -> Result<u32>;

    // =========================================================================
    // Session Slot
    // =========================================================================

    /// Persist the logged-in user in the session slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn save_session(&self, user: &User) -> Result<()>;

    /// Load the user stored in the session slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn load_session(&self) -> Result<Option<User>>;

    /// Clear the session slot. Clearing an empty slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn clear_session(&self) -> Result<()>;
}

/// Check a compare-and-swap precondition.
pub(crate) fn check_version(expected: u64, found: u64) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(StoreError::Conflict { expected, found })
    }
}

/// Produce the committed copy of a petition with the next version.
pub(crate) fn next_version(petition: &Petition) -> Petition {
    let mut committed = petition.clone();
    committed.version = petition.version + 1;
    committed
}
