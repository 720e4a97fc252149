//! Domain types stored in the database.
//!
//! These types represent the persisted state of users, petitions, and the
//! feedback records attached to petitions.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use hydraa_core::{FeedbackId, PetitionId, PetitionNumber, UserId};
use serde::{Deserialize, Serialize};

/// Error returned when parsing one of the enumerations below from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Normalize user input for enum parsing: lowercase, no spaces, dashes or underscores.
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

// =============================================================================
// Users
// =============================================================================

/// The role a user acts in. Roles drive every permission decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Front desk staff who register petitions.
    Reception,
    /// Officer who investigates assigned petitions.
    EnquiryOfficer,
    /// Head of department (commissioner): assigns officers and decides.
    #[serde(rename = "HOD")]
    Hod,
    /// Administrator with access to every operation.
    Admin,
}

impl Role {
    /// All roles, in display order.
    pub const ALL: [Self; 4] = [Self::Reception, Self::EnquiryOfficer, Self::Hod, Self::Admin];

    /// The display label of the role.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Reception => "Reception",
            Self::EnquiryOfficer => "Enquiry Officer",
            Self::Hod => "HOD",
            Self::Admin => "Admin",
        }
    }

    /// A one-line description of what the role can do.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Reception => "Can create petitions and view all petition statuses",
            Self::EnquiryOfficer => "Can investigate assigned petitions and submit reports",
            Self::Hod => "Can assign officers, review reports, and make final decisions",
            Self::Admin => "Can manage users and access every part of the system",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "reception" => Ok(Self::Reception),
            "enquiryofficer" | "eo" | "officer" => Ok(Self::EnquiryOfficer),
            "hod" | "commissioner" => Ok(Self::Hod),
            "admin" => Ok(Self::Admin),
            _ => Err(ParseEnumError::new("role", s)),
        }
    }
}

/// A user's rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Designation {
    /// Deputy Commissioner of Police.
    #[serde(rename = "DCP")]
    Dcp,
    /// Assistant Commissioner of Police.
    #[serde(rename = "ACP")]
    Acp,
    /// Inspector.
    Inspector,
    /// Any other designation.
    Other,
}

impl Designation {
    /// The display label of the designation.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dcp => "DCP",
            Self::Acp => "ACP",
            Self::Inspector => "Inspector",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Designation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Designation {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "dcp" => Ok(Self::Dcp),
            "acp" => Ok(Self::Acp),
            "inspector" => Ok(Self::Inspector),
            "other" => Ok(Self::Other),
            _ => Err(ParseEnumError::new("designation", s)),
        }
    }
}

/// Derive the display handle of a user: first name, `/`, designation
/// (e.g. `Jane/ACP`).
#[must_use]
pub fn derive_handle(name: &str, designation: Designation) -> String {
    let first = name.split_whitespace().next().unwrap_or_default();
    format!("{first}/{designation}")
}

/// A user record in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique directory identifier.
    pub user_id: UserId,
    /// Employee number.
    pub employee_id: String,
    /// Full name.
    pub name: String,
    /// Rank.
    pub designation: Designation,
    /// Role the user acts in.
    pub role: Role,
    /// Login email, unique across the directory.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Derived display handle, see [`derive_handle`].
    pub handle: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Petitions
// =============================================================================

/// Channel through which a petition was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PetitionType {
    /// Walk-in petition.
    #[default]
    General,
    /// Prajavani public grievance programme.
    Prajavani,
    /// Received by email.
    Email,
    /// Received over WhatsApp.
    WhatsApp,
    /// Received over Twitter.
    Twitter,
    /// Any other channel.
    Other,
}

impl PetitionType {
    /// The display label of the petition type.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Prajavani => "Prajavani",
            Self::Email => "Email",
            Self::WhatsApp => "WhatsApp",
            Self::Twitter => "Twitter",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for PetitionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PetitionType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "general" => Ok(Self::General),
            "prajavani" => Ok(Self::Prajavani),
            "email" => Ok(Self::Email),
            "whatsapp" => Ok(Self::WhatsApp),
            "twitter" => Ok(Self::Twitter),
            "other" => Ok(Self::Other),
            _ => Err(ParseEnumError::new("petition type", s)),
        }
    }
}

/// Who filed the petition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SubmittedBy {
    /// A private individual.
    #[default]
    Individual,
    /// A residents' or other association.
    Association,
    /// A government body.
    Govt,
    /// A public representative.
    #[serde(rename = "Public Rep")]
    PublicRep,
    /// Anyone else.
    Other,
}

impl SubmittedBy {
    /// The display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Individual => "Individual",
            Self::Association => "Association",
            Self::Govt => "Government",
            Self::PublicRep => "Public Representative",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for SubmittedBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SubmittedBy {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "individual" => Ok(Self::Individual),
            "association" => Ok(Self::Association),
            "govt" | "government" => Ok(Self::Govt),
            "publicrep" | "publicrepresentative" => Ok(Self::PublicRep),
            "other" => Ok(Self::Other),
            _ => Err(ParseEnumError::new("submitter", s)),
        }
    }
}

/// Priority tier of a petition.
///
/// Variants are declared from most to least urgent, so the derived ordering
/// sorts `Priority` first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum TimeBound {
    /// Highest urgency.
    Priority,
    /// Needs attention soon.
    Immediate,
    /// Regular handling.
    #[default]
    Normal,
}

impl TimeBound {
    /// The display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Priority => "Priority",
            Self::Immediate => "Immediate",
            Self::Normal => "Normal",
        }
    }

    /// Whether the petition belongs on the priority lists of the dashboards.
    #[must_use]
    pub const fn is_urgent(self) -> bool {
        matches!(self, Self::Priority | Self::Immediate)
    }
}

impl fmt::Display for TimeBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeBound {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "priority" => Ok(Self::Priority),
            "immediate" => Ok(Self::Immediate),
            "normal" => Ok(Self::Normal),
            _ => Err(ParseEnumError::new("time bound", s)),
        }
    }
}

/// Lifecycle status of a petition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PetitionStatus {
    /// Registered, waiting for officer assignment.
    Pending = 1,
    /// Officers assigned, no report filed yet.
    Assigned = 2,
    /// At least one officer report filed.
    #[serde(rename = "Under Investigation")]
    UnderInvestigation = 3,
    /// Final decision recorded. Terminal.
    #[serde(rename = "Decision Made")]
    DecisionMade = 4,
}

impl PetitionStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Assigned,
        Self::UnderInvestigation,
        Self::DecisionMade,
    ];

    /// Convert the status to its numeric representation.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Try to convert a numeric value to a `PetitionStatus`.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Pending),
            2 => Some(Self::Assigned),
            3 => Some(Self::UnderInvestigation),
            4 => Some(Self::DecisionMade),
            _ => None,
        }
    }

    /// The display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Assigned => "Assigned",
            Self::UnderInvestigation => "Under Investigation",
            Self::DecisionMade => "Decision Made",
        }
    }
}

impl fmt::Display for PetitionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PetitionStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "pending" => Ok(Self::Pending),
            "assigned" => Ok(Self::Assigned),
            "underinvestigation" => Ok(Self::UnderInvestigation),
            "decisionmade" | "decided" => Ok(Self::DecisionMade),
            _ => Err(ParseEnumError::new("status", s)),
        }
    }
}

/// Contact details of the petitioner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Petitioner {
    /// Full name.
    pub name: String,
    /// Contact phone.
    pub phone: String,
    /// Postal address.
    pub address: String,
}

/// A three-level location path in the encroachment taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncroachmentZone {
    /// Zone.
    pub level1: String,
    /// Sub-zone.
    pub level2: String,
    /// Area.
    pub level3: String,
}

impl fmt::Display for EncroachmentZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} / {}", self.level1, self.level2, self.level3)
    }
}

/// A petition record stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Petition {
    /// Unique identifier.
    pub petition_id: PetitionId,
    /// Human-facing number, unique.
    pub petition_number: PetitionNumber,
    /// Date the petition was received.
    pub date: NaiveDate,
    /// Channel the petition came through.
    pub petition_type: PetitionType,
    /// Petitioner contact details.
    pub petitioner: Petitioner,
    /// Who filed the petition.
    pub submitted_by: SubmittedBy,
    /// The complaint text.
    pub complaint_details: String,
    /// Information about the respondent.
    #[serde(default)]
    pub respondent_info: String,
    /// Where the encroachment is.
    #[serde(default)]
    pub encroachment_zone: Option<EncroachmentZone>,
    /// Encroachment type IDs.
    #[serde(default)]
    pub encroachment_types: BTreeSet<String>,
    /// Reference to the scanned petition document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub petition_file: Option<String>,
    /// Remark recorded at intake.
    #[serde(default)]
    pub initial_remark: String,
    /// Priority tier.
    pub time_bound: TimeBound,
    /// Officers investigating the petition, in assignment order.
    #[serde(default)]
    pub assigned_officers: Vec<UserId>,
    /// Instructions given to the officers at assignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment_instructions: Option<String>,
    /// Current lifecycle status.
    pub status: PetitionStatus,
    /// User who registered the petition.
    pub created_by: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
    /// Optimistic concurrency version, bumped on every committed change.
    pub version: u64,
}

impl Petition {
    /// Whether the given user is one of the assigned officers.
    #[must_use]
    pub fn is_assigned_to(&self, user_id: &UserId) -> bool {
        self.assigned_officers.contains(user_id)
    }
}

/// A report filed by an enquiry officer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EoFeedback {
    /// Unique identifier.
    pub feedback_id: FeedbackId,
    /// Petition the report belongs to.
    pub petition_id: PetitionId,
    /// Officer who filed it.
    pub officer_id: UserId,
    /// Site inspection observations.
    pub observations: String,
    /// Details of pending litigation; empty when none.
    #[serde(default)]
    pub litigation_pending: String,
    /// Evidence file references, in upload order.
    #[serde(default)]
    pub evidence: Vec<String>,
    /// Findings and recommendations.
    pub findings: String,
    /// Reference to the final report document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_report: Option<String>,
    /// When the report was filed.
    pub submitted_at: DateTime<Utc>,
}

/// The final decision on a petition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HodFeedback {
    /// Unique identifier.
    pub feedback_id: FeedbackId,
    /// Petition decided.
    pub petition_id: PetitionId,
    /// The decision, e.g. "Approved" or "Rejected".
    pub action: String,
    /// Closing remarks.
    #[serde(default)]
    pub final_remarks: String,
    /// User who recorded the decision.
    pub decided_by: UserId,
    /// When the decision was recorded.
    pub decided_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_uses_first_name() {
        assert_eq!(derive_handle("Jane Smith", Designation::Acp), "Jane/ACP");
        assert_eq!(derive_handle("  Rao  Kumar ", Designation::Inspector), "Rao/Inspector");
        assert_eq!(derive_handle("Admin", Designation::Other), "Admin/Other");
    }

    #[test]
    fn status_u8_roundtrip() {
        for status in PetitionStatus::ALL {
            assert_eq!(PetitionStatus::from_u8(status.as_u8()), Some(status));
        }
        assert_eq!(PetitionStatus::from_u8(0), None);
    }

    #[test]
    fn status_labels_and_parsing() {
        assert_eq!(PetitionStatus::UnderInvestigation.to_string(), "Under Investigation");
        assert_eq!(
            "under-investigation".parse::<PetitionStatus>().unwrap(),
            PetitionStatus::UnderInvestigation
        );
        assert_eq!(
            "Decision Made".parse::<PetitionStatus>().unwrap(),
            PetitionStatus::DecisionMade
        );
        assert!("closed".parse::<PetitionStatus>().is_err());
    }

    #[test]
    fn role_parsing() {
        assert_eq!("HOD".parse::<Role>().unwrap(), Role::Hod);
        assert_eq!("EnquiryOfficer".parse::<Role>().unwrap(), Role::EnquiryOfficer);
        assert_eq!("enquiry officer".parse::<Role>().unwrap(), Role::EnquiryOfficer);
        assert!("janitor".parse::<Role>().is_err());
    }

    #[test]
    fn time_bound_orders_by_urgency() {
        let mut bounds = vec![TimeBound::Normal, TimeBound::Priority, TimeBound::Immediate];
        bounds.sort();
        assert_eq!(
            bounds,
            vec![TimeBound::Priority, TimeBound::Immediate, TimeBound::Normal]
        );
        assert!(TimeBound::Immediate.is_urgent());
        assert!(!TimeBound::Normal.is_urgent());
    }

    #[test]
    fn submitted_by_parsing() {
        assert_eq!("Public Rep".parse::<SubmittedBy>().unwrap(), SubmittedBy::PublicRep);
        assert_eq!("government".parse::<SubmittedBy>().unwrap(), SubmittedBy::Govt);
        assert_eq!("WhatsApp".parse::<PetitionType>().unwrap(), PetitionType::WhatsApp);
    }
}
