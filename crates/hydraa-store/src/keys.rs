//! Key encoding utilities for `RocksDB`.
//!
//! This module provides functions to encode and decode keys for the primary
//! records and their indexes. Composite keys put the grouping component
//! first so that related records can be read with a prefix scan.

use chrono::{DateTime, Utc};
use hydraa_core::{FeedbackId, PetitionId, PetitionNumber, UserId};

/// Length of an encoded petition ID.
pub const PETITION_ID_LEN: usize = 32;

/// Encode a user key (the user ID bytes).
#[must_use]
pub fn user_key(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Encode an email index key. Emails are compared case-insensitively.
#[must_use]
pub fn email_key(email: &str) -> Vec<u8> {
    email.trim().to_lowercase().into_bytes()
}

/// Encode a petition key (the petition ID bytes).
#[must_use]
pub fn petition_key(petition_id: &PetitionId) -> Vec<u8> {
    petition_id.as_bytes().to_vec()
}

/// Encode a status-petition index key: `status || petition_id`.
#[must_use]
pub fn status_petition_key(status: u8, petition_id: &PetitionId) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + PETITION_ID_LEN);
    key.push(status);
    key.extend_from_slice(petition_id.as_bytes());
    key
}

/// Encode a status prefix for scanning all petitions by status.
#[must_use]
pub fn status_prefix(status: u8) -> Vec<u8> {
    vec![status]
}

/// Extract the petition ID from a status-petition key.
///
/// Returns `None` if the key is not `1 + 32` bytes long.
#[must_use]
pub fn petition_id_from_status_key(key: &[u8]) -> Option<PetitionId> {
    let bytes: [u8; PETITION_ID_LEN] = key.get(1..)?.try_into().ok()?;
    Some(PetitionId::from_bytes(bytes))
}

/// Decode a petition ID stored as an index value.
#[must_use]
pub fn petition_id_from_value(value: &[u8]) -> Option<PetitionId> {
    let bytes: [u8; PETITION_ID_LEN] = value.try_into().ok()?;
    Some(PetitionId::from_bytes(bytes))
}

/// Encode a petition number index key (its display form).
#[must_use]
pub fn petition_number_key(number: &PetitionNumber) -> Vec<u8> {
    number.to_string().into_bytes()
}

/// Encode an officer report key: `petition_id || submitted_at_ms || feedback_id`.
///
/// The big-endian timestamp keeps reports of one petition in submission order.
#[must_use]
pub fn eo_feedback_key(
    petition_id: &PetitionId,
    submitted_at: DateTime<Utc>,
    feedback_id: &FeedbackId,
) -> Vec<u8> {
    let millis = u64::try_from(submitted_at.timestamp_millis()).unwrap_or(0);
    let mut key = Vec::with_capacity(PETITION_ID_LEN + 8 + 16);
    key.extend_from_slice(petition_id.as_bytes());
    key.extend_from_slice(&millis.to_be_bytes());
    key.extend_from_slice(feedback_id.as_bytes());
    key
}

/// Encode a petition prefix for scanning all reports of a petition.
#[must_use]
pub fn petition_prefix(petition_id: &PetitionId) -> Vec<u8> {
    petition_id.as_bytes().to_vec()
}

/// Encode the counter key of the petition sequence for a year.
#[must_use]
pub fn petition_sequence_key(year: u16) -> Vec<u8> {
    let mut key = b"petition_seq/".to_vec();
    key.extend_from_slice(&year.to_be_bytes());
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    fn petition_id(byte: u8) -> PetitionId {
        PetitionId::from_bytes([byte; 32])
    }

    #[test]
    fn status_key_roundtrip() {
        let id = petition_id(7);
        let key = status_petition_key(3, &id);
        assert_eq!(key.len(), 33);
        assert!(key.starts_with(&status_prefix(3)));
        assert_eq!(petition_id_from_status_key(&key), Some(id));
        assert_eq!(petition_id_from_status_key(&key[..10]), None);
    }

    #[test]
    fn email_keys_ignore_case() {
        assert_eq!(email_key("Officer@HYDRAA.gov.in"), email_key(" officer@hydraa.gov.in"));
    }

    #[test]
    fn feedback_keys_sort_by_time() {
        let id = petition_id(1);
        let earlier = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let later = DateTime::from_timestamp(1_700_000_100, 0).unwrap();

        let a = eo_feedback_key(&id, later, &FeedbackId::generate());
        let b = eo_feedback_key(&id, earlier, &FeedbackId::generate());

        assert!(a.starts_with(&petition_prefix(&id)));
        assert!(b < a);
    }

    #[test]
    fn sequence_keys_differ_per_year() {
        assert_ne!(petition_sequence_key(2024), petition_sequence_key(2025));
    }
}
