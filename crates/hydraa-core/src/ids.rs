//! Core identifier types for HYDRAA.
//!
//! This module provides strongly-typed identifiers for users, petitions, and
//! feedback records, plus the human-facing [`PetitionNumber`].
//! All IDs are designed for efficient storage and lookup.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum length of a directory user ID.
const MAX_USER_ID_LEN: usize = 64;

/// Prefix of every petition number.
const PETITION_NUMBER_PREFIX: &str = "PTN";

/// A directory user identifier.
///
/// User IDs are short opaque strings issued by the user directory
/// (for example `officer2`). They are restricted to ASCII alphanumerics,
/// `-`, `_` and `.` so they can be used verbatim as storage keys.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Parse and validate a `UserId`.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is empty, too long, or contains
    /// characters other than ASCII alphanumerics, `-`, `_` or `.`.
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        if value.is_empty() {
            return Err(IdError::Empty);
        }
        if value.len() > MAX_USER_ID_LEN {
            return Err(IdError::InvalidLength {
                expected: MAX_USER_ID_LEN,
                got: value.len(),
            });
        }
        if let Some(c) = value
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        {
            return Err(IdError::InvalidCharacter(c));
        }
        Ok(Self(value))
    }

    /// Generate a new random `UserId` for a freshly created directory entry.
    #[must_use]
    pub fn generate() -> Self {
        let uuid = uuid::Uuid::new_v4().simple().to_string();
        Self(uuid[..12].to_string())
    }

    /// Return the string form of the ID.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the ID bytes, used as a storage key.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UserId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for UserId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl AsRef<[u8]> for UserId {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// A 32-byte petition identifier, generated via blake3 hash.
///
/// Petition IDs are derived from the creating user, the petition number and a
/// timestamp, so they stay unique even if a petition number were ever reissued.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PetitionId([u8; 32]);

impl PetitionId {
    /// Create a new `PetitionId` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Generate a new unique `PetitionId` using blake3.
    #[must_use]
    pub fn generate(created_by: &UserId, number: &PetitionNumber) -> Self {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();

        let mut hasher = blake3::Hasher::new();
        hasher.update(created_by.as_bytes());
        hasher.update(number.to_string().as_bytes());
        hasher.update(&timestamp.to_le_bytes());

        Self(*hasher.finalize().as_bytes())
    }

    /// Generate a deterministic `PetitionId` for testing.
    #[must_use]
    pub fn generate_deterministic(created_by: &UserId, number: &PetitionNumber, seed: u64) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(created_by.as_bytes());
        hasher.update(number.to_string().as_bytes());
        hasher.update(&seed.to_le_bytes());

        Self(*hasher.finalize().as_bytes())
    }

    /// Parse a `PetitionId` from a hex-encoded string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid hex or not exactly 64 characters.
    pub fn from_hex(s: &str) -> Result<Self, IdError> {
        let bytes = hex::decode(s).map_err(|_| IdError::InvalidHex)?;
        let arr: [u8; 32] = bytes.try_into().map_err(|_| IdError::InvalidLength {
            expected: 32,
            got: s.len() / 2,
        })?;
        Ok(Self(arr))
    }

    /// Return the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Return the hex-encoded string representation.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for PetitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PetitionId({})", self.to_hex())
    }
}

impl fmt::Display for PetitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl TryFrom<String> for PetitionId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<PetitionId> for String {
    fn from(id: PetitionId) -> Self {
        id.to_hex()
    }
}

impl AsRef<[u8]> for PetitionId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A 16-byte feedback record identifier based on UUID v4.
///
/// Used for both enquiry officer reports and HOD decisions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FeedbackId(uuid::Uuid);

impl FeedbackId {
    /// Create a new `FeedbackId` from a UUID.
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random `FeedbackId`.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Return the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }

    /// Return the bytes of the UUID.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl FromStr for FeedbackId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = uuid::Uuid::parse_str(s).map_err(|_| IdError::InvalidUuid)?;
        Ok(Self(uuid))
    }
}

impl fmt::Debug for FeedbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeedbackId({})", self.0)
    }
}

impl fmt::Display for FeedbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for FeedbackId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FeedbackId> for String {
    fn from(id: FeedbackId) -> Self {
        id.0.to_string()
    }
}

/// The human-facing petition number, e.g. `PTN000012024`.
///
/// Formatted as `PTN`, a 5-digit zero-padded sequence and the 4-digit year.
/// Ordering is by year, then sequence.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PetitionNumber {
    year: u16,
    sequence: u32,
}

impl PetitionNumber {
    /// Largest sequence that fits the 5-digit field.
    pub const MAX_SEQUENCE: u32 = 99_999;

    /// Build a petition number from a sequence and a year.
    ///
    /// # Errors
    ///
    /// Returns an error if the sequence is outside `1..=99999` or the year is
    /// not a 4-digit year.
    pub fn new(sequence: u32, year: u16) -> Result<Self, IdError> {
        if sequence == 0 || sequence > Self::MAX_SEQUENCE {
            return Err(IdError::SequenceOutOfRange(sequence));
        }
        if !(1000..=9999).contains(&year) {
            return Err(IdError::InvalidPetitionNumber(format!("year {year}")));
        }
        Ok(Self { year, sequence })
    }

    /// The per-year sequence.
    #[must_use]
    pub const fn sequence(&self) -> u32 {
        self.sequence
    }

    /// The year the number was issued in.
    #[must_use]
    pub const fn year(&self) -> u16 {
        self.year
    }
}

impl fmt::Debug for PetitionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PetitionNumber({self})")
    }
}

impl fmt::Display for PetitionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{PETITION_NUMBER_PREFIX}{:05}{:04}",
            self.sequence, self.year
        )
    }
}

impl FromStr for PetitionNumber {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || IdError::InvalidPetitionNumber(s.to_string());

        let digits = s.strip_prefix(PETITION_NUMBER_PREFIX).ok_or_else(invalid)?;
        if digits.len() != 9 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let sequence: u32 = digits[..5].parse().map_err(|_| invalid())?;
        let year: u16 = digits[5..].parse().map_err(|_| invalid())?;
        Self::new(sequence, year)
    }
}

impl TryFrom<String> for PetitionNumber {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PetitionNumber> for String {
    fn from(number: PetitionNumber) -> Self {
        number.to_string()
    }
}

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input string contains invalid hexadecimal characters.
    #[error("invalid hex encoding")]
    InvalidHex,

    /// The input has an incorrect length.
    #[error("invalid length: expected {expected}, got {got}")]
    InvalidLength {
        /// The expected length.
        expected: usize,
        /// The actual length.
        got: usize,
    },

    /// The input is not a valid UUID.
    #[error("invalid UUID format")]
    InvalidUuid,

    /// The identifier is empty.
    #[error("identifier is empty")]
    Empty,

    /// The identifier contains a character that is not allowed.
    #[error("invalid character {0:?} in identifier")]
    InvalidCharacter(char),

    /// The input is not a well-formed petition number.
    #[error("invalid petition number: {0}")]
    InvalidPetitionNumber(String),

    /// The petition sequence does not fit the 5-digit field.
    #[error("petition sequence {0} is outside 1..=99999")]
    SequenceOutOfRange(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_accepts_directory_ids() {
        let id = UserId::new("officer2").unwrap();
        assert_eq!(id.as_str(), "officer2");
        assert_eq!(id.to_string(), "officer2");
    }

    #[test]
    fn user_id_rejects_bad_input() {
        assert_eq!(UserId::new(""), Err(IdError::Empty));
        assert_eq!(UserId::new("jane smith"), Err(IdError::InvalidCharacter(' ')));
        assert!(matches!(
            UserId::new("x".repeat(65)),
            Err(IdError::InvalidLength { .. })
        ));
    }

    #[test]
    fn user_id_generate_is_valid() {
        let id = UserId::generate();
        assert_eq!(id.as_str().len(), 12);
        assert!(UserId::new(id.as_str()).is_ok());
        assert_ne!(id, UserId::generate());
    }

    #[test]
    fn petition_id_deterministic() {
        let creator = UserId::new("1").unwrap();
        let number = PetitionNumber::new(1, 2024).unwrap();
        let id1 = PetitionId::generate_deterministic(&creator, &number, 7);
        let id2 = PetitionId::generate_deterministic(&creator, &number, 7);
        assert_eq!(id1, id2);

        let id3 = PetitionId::generate_deterministic(&creator, &number, 8);
        assert_ne!(id1, id3);
    }

    #[test]
    fn petition_id_hex_parse() {
        let id = PetitionId::from_bytes([0x42u8; 32]);
        let parsed = PetitionId::from_hex(&id.to_hex()).unwrap();
        assert_eq!(id, parsed);
        assert!(matches!(
            PetitionId::from_hex("not-valid-hex"),
            Err(IdError::InvalidHex)
        ));
        assert!(matches!(
            PetitionId::from_hex("deadbeef"),
            Err(IdError::InvalidLength { .. })
        ));
    }

    #[test]
    fn petition_number_format() {
        let number = PetitionNumber::new(1, 2024).unwrap();
        assert_eq!(number.to_string(), "PTN000012024");

        let number = PetitionNumber::new(12_345, 2025).unwrap();
        assert_eq!(number.to_string(), "PTN123452025");
    }

    #[test]
    fn petition_number_parse() {
        let number: PetitionNumber = "PTN000122024".parse().unwrap();
        assert_eq!(number.sequence(), 12);
        assert_eq!(number.year(), 2024);

        assert!("PTN00012024".parse::<PetitionNumber>().is_err());
        assert!("XYZ000012024".parse::<PetitionNumber>().is_err());
        assert!("PTN0000A2024".parse::<PetitionNumber>().is_err());
        assert_eq!(
            "PTN000002024".parse::<PetitionNumber>(),
            Err(IdError::SequenceOutOfRange(0))
        );
    }

    #[test]
    fn petition_number_range() {
        assert!(PetitionNumber::new(99_999, 2024).is_ok());
        assert_eq!(
            PetitionNumber::new(100_000, 2024),
            Err(IdError::SequenceOutOfRange(100_000))
        );
        assert!(PetitionNumber::new(1, 999).is_err());
    }

    #[test]
    fn petition_number_ordering() {
        let a = PetitionNumber::new(5, 2023).unwrap();
        let b = PetitionNumber::new(1, 2024).unwrap();
        let c = PetitionNumber::new(2, 2024).unwrap();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn petition_number_serde_json() {
        let number = PetitionNumber::new(3, 2024).unwrap();
        let json = serde_json::to_string(&number).unwrap();
        assert_eq!(json, "\"PTN000032024\"");
        let parsed: PetitionNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, number);
    }

    #[test]
    fn user_id_serde_rejects_invalid() {
        let parsed: Result<UserId, _> = serde_json::from_str("\"bad id\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn feedback_id_parse() {
        let id = FeedbackId::generate();
        let parsed: FeedbackId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert!(matches!(
            "not-a-uuid".parse::<FeedbackId>(),
            Err(IdError::InvalidUuid)
        ));
    }
}
