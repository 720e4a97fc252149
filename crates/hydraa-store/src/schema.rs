//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Directory users, keyed by `user_id`.
    pub const USERS: &str = "users";

    /// Index: users by lowercased email, value is the `user_id`.
    pub const USERS_BY_EMAIL: &str = "users_by_email";

    /// Primary petition records, keyed by `petition_id`.
    pub const PETITIONS: &str = "petitions";

    /// Index: petitions by status, keyed by `status || petition_id`.
    pub const PETITIONS_BY_STATUS: &str = "petitions_by_status";

    /// Index: petitions by petition number, value is the `petition_id`.
    pub const PETITIONS_BY_NUMBER: &str = "petitions_by_number";

    /// Officer reports, keyed by `petition_id || submitted_at || feedback_id`.
    pub const EO_FEEDBACK: &str = "eo_feedback";

    /// Final decisions, keyed by `petition_id`.
    pub const HOD_FEEDBACK: &str = "hod_feedback";

    /// Sequence counters, keyed by counter name.
    pub const COUNTERS: &str = "counters";

    /// The persisted session slot.
    pub const SESSION: &str = "session";
}

/// Key of the persisted session slot.
pub const SESSION_SLOT: &str = "hydraa_user";

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::USERS,
        cf::USERS_BY_EMAIL,
        cf::PETITIONS,
        cf::PETITIONS_BY_STATUS,
        cf::PETITIONS_BY_NUMBER,
        cf::EO_FEEDBACK,
        cf::HOD_FEEDBACK,
        cf::COUNTERS,
        cf::SESSION,
    ]
}
