//! Request and response types for workflow operations.
//!
//! These types define the API contracts for petitions, assignments,
//! feedback, decisions and the user directory.

use std::collections::BTreeSet;
use std::time::Duration;

use chrono::NaiveDate;
use hydraa_core::UserId;
use hydraa_store::{
    Designation, EncroachmentZone, EoFeedback, HodFeedback, Petition, PetitionStatus,
    PetitionType, Petitioner, Role, SubmittedBy, TimeBound, User,
};
use serde::{Deserialize, Serialize};

/// Request to register a new petition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPetition {
    /// Date received. Defaults to today.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Channel the petition came through.
    #[serde(default)]
    pub petition_type: PetitionType,
    /// Petitioner contact details.
    pub petitioner: Petitioner,
    /// Who filed the petition.
    #[serde(default)]
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
    #[serde(default)]
    pub petition_file: Option<String>,
    /// Remark recorded at intake.
    #[serde(default)]
    pub initial_remark: String,
    /// Priority tier.
    #[serde(default)]
    pub time_bound: TimeBound,
}

impl NewPetition {
    /// Create a request with the required fields and defaults elsewhere.
    #[must_use]
    pub fn new(petitioner: Petitioner, complaint_details: impl Into<String>) -> Self {
        Self {
            date: None,
            petition_type: PetitionType::default(),
            petitioner,
            submitted_by: SubmittedBy::default(),
            complaint_details: complaint_details.into(),
            respondent_info: String::new(),
            encroachment_zone: None,
            encroachment_types: BTreeSet::new(),
            petition_file: None,
            initial_remark: String::new(),
            time_bound: TimeBound::default(),
        }
    }
}

/// Officer assignment made by the HOD.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfficerAssignment {
    /// Enquiry officers to assign, in order.
    pub officer_ids: Vec<UserId>,
    /// New priority tier, if the HOD changes it.
    #[serde(default)]
    pub time_bound: Option<TimeBound>,
    /// Instructions to the officers.
    #[serde(default)]
    pub instructions: Option<String>,
}

impl OfficerAssignment {
    /// Assign the given officers without changing anything else.
    #[must_use]
    pub fn new(officer_ids: Vec<UserId>) -> Self {
        Self {
            officer_ids,
            time_bound: None,
            instructions: None,
        }
    }
}

/// An investigation report from an assigned officer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackSubmission {
    /// Site inspection observations.
    pub observations: String,
    /// Details of pending litigation.
    #[serde(default)]
    pub litigation_pending: String,
    /// Evidence file references.
    #[serde(default)]
    pub evidence: Vec<String>,
    /// Findings and recommendations.
    pub findings: String,
    /// Reference to the final report document.
    #[serde(default)]
    pub final_report: Option<String>,
}

/// The HOD's final decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    /// The decision, e.g. "Approved" or "Rejected".
    pub action: String,
    /// Closing remarks.
    #[serde(default)]
    pub final_remarks: String,
}

impl Decision {
    /// Create a decision.
    #[must_use]
    pub fn new(action: impl Into<String>, final_remarks: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            final_remarks: final_remarks.into(),
        }
    }
}

/// The user form used to create or edit directory entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserForm {
    /// Employee number.
    pub employee_id: String,
    /// Full name.
    pub name: String,
    /// Rank.
    pub designation: Designation,
    /// Role.
    pub role: Role,
    /// Login email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
}

/// Filters for petition listings.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PetitionQuery {
    /// Only petitions in this status.
    #[serde(default)]
    pub status: Option<PetitionStatus>,
    /// Only petitions with this time bound.
    #[serde(default)]
    pub time_bound: Option<TimeBound>,
    /// Only Priority and Immediate petitions.
    #[serde(default)]
    pub priority_only: bool,
}

impl PetitionQuery {
    /// Whether a petition passes the filters.
    #[must_use]
    pub fn matches(&self, petition: &Petition) -> bool {
        self.status.map_or(true, |s| s == petition.status)
            && self.time_bound.map_or(true, |t| t == petition.time_bound)
            && (!self.priority_only || petition.time_bound.is_urgent())
    }
}

/// Per-status petition counts for a dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Waiting for assignment.
    pub pending: usize,
    /// Assigned, no report yet.
    pub assigned: usize,
    /// At least one report filed.
    pub under_investigation: usize,
    /// Decided.
    pub decision_made: usize,
}

impl DashboardStats {
    /// Count petitions by status.
    #[must_use]
    pub fn tally<'a, I: IntoIterator<Item = &'a Petition>>(petitions: I) -> Self {
        let mut stats = Self::default();
        for petition in petitions {
            match petition.status {
                PetitionStatus::Pending => stats.pending += 1,
                PetitionStatus::Assigned => stats.assigned += 1,
                PetitionStatus::UnderInvestigation => stats.under_investigation += 1,
                PetitionStatus::DecisionMade => stats.decision_made += 1,
            }
        }
        stats
    }

    /// Total number of petitions counted.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.pending + self.assigned + self.under_investigation + self.decision_made
    }

    /// The count for a status.
    #[must_use]
    pub const fn count(&self, status: PetitionStatus) -> usize {
        match status {
            PetitionStatus::Pending => self.pending,
            PetitionStatus::Assigned => self.assigned,
            PetitionStatus::UnderInvestigation => self.under_investigation,
            PetitionStatus::DecisionMade => self.decision_made,
        }
    }
}

/// A petition with its officers, reports and decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PetitionHistory {
    /// The petition snapshot.
    pub petition: Petition,
    /// Directory records of the currently assigned officers.
    pub officers: Vec<User>,
    /// Officer reports in submission order.
    pub feedback: Vec<EoFeedback>,
    /// The final decision, once recorded.
    pub decision: Option<HodFeedback>,
}

/// Configuration for the workflow service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Maximum number of officers per petition.
    #[serde(default = "default_max_officers")]
    pub max_officers: usize,
    /// Minimum petitioner name length.
    #[serde(default = "default_min_name_len")]
    pub min_petitioner_name_len: usize,
    /// Minimum number of digits in a phone number.
    #[serde(default = "default_min_phone_digits")]
    pub min_phone_digits: usize,
    /// Minimum petitioner address length.
    #[serde(default = "default_min_address_len")]
    pub min_address_len: usize,
    /// Minimum complaint length.
    #[serde(default = "default_min_complaint_len")]
    pub min_complaint_len: usize,
    /// Minimum employee ID length on the user form.
    #[serde(default = "default_min_employee_id_len")]
    pub min_employee_id_len: usize,
    /// Minimum user name length on the user form.
    #[serde(default = "default_min_user_name_len")]
    pub min_user_name_len: usize,
    /// Simulated login delay (milliseconds).
    #[serde(default = "default_login_delay_ms")]
    pub login_delay_ms: u64,
}

const fn default_max_officers() -> usize {
    3
}

const fn default_min_name_len() -> usize {
    3
}

const fn default_min_phone_digits() -> usize {
    10
}

const fn default_min_address_len() -> usize {
    5
}

const fn default_min_complaint_len() -> usize {
    10
}

const fn default_min_employee_id_len() -> usize {
    3
}

const fn default_min_user_name_len() -> usize {
    2
}

const fn default_login_delay_ms() -> u64 {
    1000
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            max_officers: default_max_officers(),
            min_petitioner_name_len: default_min_name_len(),
            min_phone_digits: default_min_phone_digits(),
            min_address_len: default_min_address_len(),
            min_complaint_len: default_min_complaint_len(),
            min_employee_id_len: default_min_employee_id_len(),
            min_user_name_len: default_min_user_name_len(),
            login_delay_ms: default_login_delay_ms(),
        }
    }
}

impl WorkflowConfig {
    /// The simulated login delay.
    #[must_use]
    pub const fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms)
    }
}
