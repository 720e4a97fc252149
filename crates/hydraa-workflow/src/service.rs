//! Workflow service implementation.
//!
//! This module provides the `Workflow` trait and the `WorkflowService`
//! implementation that drives petitions through their lifecycle.
//!
//! Every mutating operation checks, in order: the role table, the actor's
//! membership (feedback only), the petition's status, and the request
//! itself. It then commits through a compare-and-swap on the petition's
//! version, so a rejected or lost operation leaves the petition unchanged.

use std::cmp::Reverse;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use hydraa_core::{FeedbackId, IdError, PetitionId, PetitionNumber, UserId};
use hydraa_store::{EoFeedback, HodFeedback, Petition, PetitionStatus, Petitioner, Role, Store, User};

use crate::directory;
use crate::error::{Result, WorkflowError};
use crate::lifecycle;
use crate::permissions::{authorize, Operation};
use crate::session::{self, Session};
use crate::types::{
    DashboardStats, Decision, FeedbackSubmission, NewPetition, OfficerAssignment, PetitionHistory,
    PetitionQuery, UserForm, WorkflowConfig,
};
use crate::validation;

/// Trait defining the workflow operations.
///
/// This trait provides the complete API for the petition workflow, the
/// session and the user directory. Every petition operation takes the acting
/// [`Session`] explicitly.
#[async_trait]
pub trait Workflow: Send + Sync {
    // =========================================================================
    // Session
    // =========================================================================

    /// Log in by email and persist the session.
    async fn login(&self, email: &str, password: &str) -> Result<Session>;

    /// Reload the persisted session, if any.
    async fn restore_session(&self) -> Result<Option<Session>>;

    /// Clear the persisted session.
    async fn logout(&self) -> Result<()>;

    // =========================================================================
    // Petition Lifecycle
    // =========================================================================

    /// Register a new petition in `Pending`.
    ///
    /// # Errors
    ///
    /// Returns a permission error unless the role may create petitions, or a
    /// validation error if the request is incomplete.
    async fn create_petition(&self, session: &Session, request: NewPetition) -> Result<Petition>;

    /// Assign enquiry officers to a pending petition.
    ///
    /// # Errors
    ///
    /// Returns a permission error unless the role may assign, a state error
    /// unless the petition is `Pending`, or a validation error if the officer
    /// list is empty, too long, has duplicates or names a non-officer.
    async fn assign_officers(
        &self,
        session: &Session,
        petition_id: &PetitionId,
        assignment: OfficerAssignment,
    ) -> Result<Petition>;

    /// File an investigation report on a petition.
    ///
    /// # Errors
    ///
    /// Returns a permission error unless the actor is one of the assigned
    /// officers, a state error unless the petition is under investigation or
    /// assigned, or a validation error if the report is blank.
    async fn submit_feedback(
        &self,
        session: &Session,
        petition_id: &PetitionId,
        submission: FeedbackSubmission,
    ) -> Result<Petition>;

    /// Record the final decision on a petition.
    ///
    /// # Errors
    ///
    /// Returns a permission error unless the role may decide, a state error
    /// unless the petition is `Under Investigation`, or a validation error if
    /// the action is blank.
    async fn record_decision(
        &self,
        session: &Session,
        petition_id: &PetitionId,
        decision: Decision,
    ) -> Result<Petition>;

    // =========================================================================
    // Queries
    // =========================================================================

    /// Get a petition by ID.
    async fn get_petition(&self, session: &Session, petition_id: &PetitionId) -> Result<Petition>;

    /// Get a petition by its petition number.
    async fn find_petition(&self, session: &Session, number: &PetitionNumber) -> Result<Petition>;

    /// List the petitions visible to the session, filtered and ordered by
    /// urgency then newest date.
    async fn list_petitions(&self, session: &Session, query: PetitionQuery)
        -> Result<Vec<Petition>>;

    /// Per-status counts over the petitions visible to the session.
    async fn dashboard(&self, session: &Session) -> Result<DashboardStats>;

    /// A petition with its officers, reports and decision.
    async fn petition_history(
        &self,
        session: &Session,
        petition_id: &PetitionId,
    ) -> Result<PetitionHistory>;

    /// The enquiry officers available for assignment.
    async fn enquiry_officers(&self, session: &Session) -> Result<Vec<User>>;

    // =========================================================================
    // User Directory
    // =========================================================================

    /// Create a directory user.
    async fn create_user(&self, session: &Session, form: UserForm) -> Result<User>;

    /// Edit a directory user.
    async fn update_user(&self, session: &Session, user_id: &UserId, form: UserForm)
        -> Result<User>;

    /// Remove a directory user.
    async fn delete_user(&self, session: &Session, user_id: &UserId) -> Result<()>;

    /// List directory users, optionally filtered by a search term.
    async fn list_users(&self, session: &Session, search: Option<&str>) -> Result<Vec<User>>;
}

/// The main workflow service implementation.
pub struct WorkflowService<S: Store> {
    store: Arc<S>,
    config: WorkflowConfig,
}

impl<S: Store> WorkflowService<S> {
    /// Create a new workflow service.
    #[must_use]
    pub fn new(store: Arc<S>, config: WorkflowConfig) -> Self {
        Self { store, config }
    }

    /// Create with default configuration.
    #[must_use]
    pub fn with_defaults(store: Arc<S>) -> Self {
        Self::new(store, WorkflowConfig::default())
    }

    /// Get a reference to the store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Load a petition or fail with `PetitionNotFound`.
    fn load(&self, petition_id: &PetitionId) -> Result<Petition> {
        self.store
            .get_petition(petition_id)?
            .ok_or(WorkflowError::PetitionNotFound(*petition_id))
    }

    /// Whether an officer is, or was, working on a petition.
    ///
    /// Assigned officers are released when the decision is recorded; their
    /// reports keep the decided petition on their list.
    fn involves(&self, petition: &Petition, officer: &UserId) -> Result<bool> {
        if petition.is_assigned_to(officer) {
            return Ok(true);
        }
        if petition.status != PetitionStatus::DecisionMade {
            return Ok(false);
        }
        Ok(self
            .store
            .list_eo_feedback(&petition.petition_id)?
            .iter()
            .any(|f| &f.officer_id == officer))
    }

    /// The petitions the session may see on its dashboard.
    fn scoped_petitions(&self, session: &Session) -> Result<Vec<Petition>> {
        let petitions = self.store.list_petitions()?;
        if session.role() != Role::EnquiryOfficer {
            return Ok(petitions);
        }

        let mut scoped = Vec::new();
        for petition in petitions {
            if self.involves(&petition, session.user_id())? {
                scoped.push(petition);
            }
        }
        Ok(scoped)
    }

    /// Validate and commit a petition change. Invariants are checked first.
    fn commit(&self, next: &Petition) -> Result<Petition> {
        lifecycle::check_invariants(next, self.config.max_officers)?;
        self.store
            .update_petition(next)
            .map_err(|e| WorkflowError::from_commit(e, next.petition_number))
    }

    fn allocate_number(&self, year: u16) -> Result<PetitionNumber> {
        let sequence = self.store.next_petition_sequence(year)?;
        PetitionNumber::new(sequence, year).map_err(|e| match e {
            IdError::SequenceOutOfRange(_) => WorkflowError::SequenceExhausted(year),
            other => WorkflowError::Internal(other.to_string()),
        })
    }

    fn do_create(&self, session: &Session, request: NewPetition) -> Result<Petition> {
        authorize(session, Operation::CreatePetition)?;
        validation::validate_new_petition(&request, &self.config)?;

        // Numbers follow the year of registration, not the petition's date
        let now = Utc::now();
        let date = request.date.unwrap_or_else(|| now.date_naive());
        let year = u16::try_from(now.year()).map_err(|_| {
            WorkflowError::Internal(format!("clock year {} out of range", now.year()))
        })?;
        let petition_number = self.allocate_number(year)?;

        let petition = Petition {
            petition_id: PetitionId::generate(session.user_id(), &petition_number),
            petition_number,
            date,
            petition_type: request.petition_type,
            petitioner: Petitioner {
                name: request.petitioner.name.trim().to_string(),
                phone: request.petitioner.phone.trim().to_string(),
                address: request.petitioner.address.trim().to_string(),
            },
            submitted_by: request.submitted_by,
            complaint_details: request.complaint_details.trim().to_string(),
            respondent_info: request.respondent_info.trim().to_string(),
            encroachment_zone: request.encroachment_zone,
            encroachment_types: request.encroachment_types,
            petition_file: request.petition_file,
            initial_remark: request.initial_remark.trim().to_string(),
            time_bound: request.time_bound,
            assigned_officers: Vec::new(),
            assignment_instructions: None,
            status: PetitionStatus::Pending,
            created_by: session.user_id().clone(),
            created_at: now,
            updated_at: now,
            version: 0,
        };

        lifecycle::check_invariants(&petition, self.config.max_officers)?;
        self.store.insert_petition(&petition)?;

        tracing::info!(
            petition_number = %petition.petition_number,
            petition_id = %petition.petition_id,
            time_bound = %petition.time_bound,
            created_by = %session.user_id(),
            "Created petition"
        );

        Ok(petition)
    }

    fn do_assign(
        &self,
        session: &Session,
        petition_id: &PetitionId,
        assignment: OfficerAssignment,
    ) -> Result<Petition> {
        authorize(session, Operation::Assign)?;
        let petition = self.load(petition_id)?;
        lifecycle::ensure_accepts(&petition, Operation::Assign)?;

        validation::validate_officer_list(&assignment.officer_ids, &self.config)?;
        for officer_id in &assignment.officer_ids {
            let is_officer = self
                .store
                .get_user(officer_id)?
                .is_some_and(|u| u.role == Role::EnquiryOfficer);
            if !is_officer {
                return Err(WorkflowError::validation(
                    "officer_ids",
                    format!("{officer_id} is not an enquiry officer"),
                ));
            }
        }

        let mut next = petition.clone();
        next.status =
            lifecycle::validate_transition(&petition, PetitionStatus::Assigned, Operation::Assign)?;
        next.assigned_officers = assignment.officer_ids;
        if let Some(time_bound) = assignment.time_bound {
            next.time_bound = time_bound;
        }
        next.assignment_instructions = assignment
            .instructions
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        next.updated_at = Utc::now();

        let committed = self.commit(&next)?;

        tracing::info!(
            petition_number = %committed.petition_number,
            status = %committed.status,
            officers = ?committed.assigned_officers,
            by = %session.user_id(),
            "Assigned officers"
        );

        Ok(committed)
    }

    fn do_feedback(
        &self,
        session: &Session,
        petition_id: &PetitionId,
        submission: FeedbackSubmission,
    ) -> Result<Petition> {
        authorize(session, Operation::SubmitFeedback)?;
        let petition = self.load(petition_id)?;
        if !petition.is_assigned_to(session.user_id()) {
            return Err(WorkflowError::NotAssigned {
                user_id: session.user_id().clone(),
                petition_number: petition.petition_number,
            });
        }
        lifecycle::ensure_accepts(&petition, Operation::SubmitFeedback)?;
        validation::validate_feedback(&submission)?;

        let now = Utc::now();
        let mut next = petition.clone();
        next.status = lifecycle::validate_transition(
            &petition,
            PetitionStatus::UnderInvestigation,
            Operation::SubmitFeedback,
        )?;
        next.updated_at = now;
        lifecycle::check_invariants(&next, self.config.max_officers)?;

        let feedback = EoFeedback {
            feedback_id: FeedbackId::generate(),
            petition_id: petition.petition_id,
            officer_id: session.user_id().clone(),
            observations: submission.observations.trim().to_string(),
            litigation_pending: submission.litigation_pending.trim().to_string(),
            evidence: submission.evidence,
            findings: submission.findings.trim().to_string(),
            final_report: submission.final_report,
            submitted_at: now,
        };

        let committed = self
            .store
            .commit_feedback(&next, &feedback)
            .map_err(|e| WorkflowError::from_commit(e, petition.petition_number))?;

        tracing::info!(
            petition_number = %committed.petition_number,
            status = %committed.status,
            feedback_id = %feedback.feedback_id,
            officer = %session.user_id(),
            "Submitted feedback"
        );

        Ok(committed)
    }

    fn do_decide(
        &self,
        session: &Session,
        petition_id: &PetitionId,
        decision: Decision,
    ) -> Result<Petition> {
        authorize(session, Operation::Decide)?;
        let petition = self.load(petition_id)?;
        lifecycle::ensure_accepts(&petition, Operation::Decide)?;
        validation::validate_decision(&decision)?;

        let now = Utc::now();
        let mut next = petition.clone();
        next.status = lifecycle::validate_transition(
            &petition,
            PetitionStatus::DecisionMade,
            Operation::Decide,
        )?;
        next.assigned_officers.clear();
        next.updated_at = now;
        lifecycle::check_invariants(&next, self.config.max_officers)?;

        let record = HodFeedback {
            feedback_id: FeedbackId::generate(),
            petition_id: petition.petition_id,
            action: decision.action.trim().to_string(),
            final_remarks: decision.final_remarks.trim().to_string(),
            decided_by: session.user_id().clone(),
            decided_at: now,
        };

        let committed = self
            .store
            .commit_decision(&next, &record)
            .map_err(|e| WorkflowError::from_commit(e, petition.petition_number))?;

        tracing::info!(
            petition_number = %committed.petition_number,
            status = %committed.status,
            action = %record.action,
            by = %session.user_id(),
            "Recorded decision"
        );

        Ok(committed)
    }
}

/// Log a rejected operation before handing the error back.
fn rejected<'a>(operation: &'static str, session: &'a Session) -> impl Fn(&WorkflowError) + 'a {
    move |err| {
        tracing::warn!(
            operation,
            user_id = %session.user_id(),
            role = %session.role(),
            kind = %err.kind(),
            error = %err,
            "Rejected operation"
        );
    }
}

/// Sort for listings: most urgent first, then newest date, then newest number.
fn sort_for_listing(petitions: &mut [Petition]) {
    petitions.sort_by_key(|p| (p.time_bound, Reverse(p.date), Reverse(p.petition_number)));
}

#[async_trait]
impl<S: Store + 'static> Workflow for WorkflowService<S> {
    // =========================================================================
    // Session
    // =========================================================================

    async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let result =
            session::login(&*self.store, email, password, self.config.login_delay()).await;

        match &result {
            Ok(session) => tracing::info!(
                user_id = %session.user_id(),
                role = %session.role(),
                "Logged in"
            ),
            Err(err) => tracing::warn!(email, error = %err, "Login failed"),
        }

        result
    }

    async fn restore_session(&self) -> Result<Option<Session>> {
        let restored = session::restore(&*self.store)?;
        tracing::debug!(user_id = ?restored.as_ref().map(Session::user_id), "Restored session");
        Ok(restored)
    }

    async fn logout(&self) -> Result<()> {
        session::logout(&*self.store)?;
        tracing::info!("Logged out");
        Ok(())
    }

    // =========================================================================
    // Petition Lifecycle
    // =========================================================================

    async fn create_petition(&self, session: &Session, request: NewPetition) -> Result<Petition> {
        self.do_create(session, request)
            .inspect_err(rejected("create_petition", session))
    }

    async fn assign_officers(
        &self,
        session: &Session,
        petition_id: &PetitionId,
        assignment: OfficerAssignment,
    ) -> Result<Petition> {
        self.do_assign(session, petition_id, assignment)
            .inspect_err(rejected("assign_officers", session))
    }

    async fn submit_feedback(
        &self,
        session: &Session,
        petition_id: &PetitionId,
        submission: FeedbackSubmission,
    ) -> Result<Petition> {
        self.do_feedback(session, petition_id, submission)
            .inspect_err(rejected("submit_feedback", session))
    }

    async fn record_decision(
        &self,
        session: &Session,
        petition_id: &PetitionId,
        decision: Decision,
    ) -> Result<Petition> {
        self.do_decide(session, petition_id, decision)
            .inspect_err(rejected("record_decision", session))
    }

    // =========================================================================
    // Queries
    // =========================================================================

    async fn get_petition(&self, session: &Session, petition_id: &PetitionId) -> Result<Petition> {
        authorize(session, Operation::ViewPetitions)?;
        let petition = self.load(petition_id)?;
        tracing::debug!(petition_number = %petition.petition_number, "Loaded petition");
        Ok(petition)
    }

    async fn find_petition(&self, session: &Session, number: &PetitionNumber) -> Result<Petition> {
        authorize(session, Operation::ViewPetitions)?;
        self.store
            .get_petition_by_number(number)?
            .ok_or(WorkflowError::PetitionNumberNotFound(*number))
    }

    async fn list_petitions(
        &self,
        session: &Session,
        query: PetitionQuery,
    ) -> Result<Vec<Petition>> {
        authorize(session, Operation::ViewPetitions)?;

        let mut petitions: Vec<Petition> = self
            .scoped_petitions(session)?
            .into_iter()
            .filter(|p| query.matches(p))
            .collect();
        sort_for_listing(&mut petitions);

        tracing::debug!(
            user_id = %session.user_id(),
            count = petitions.len(),
            "Listed petitions"
        );

        Ok(petitions)
    }

    async fn dashboard(&self, session: &Session) -> Result<DashboardStats> {
        authorize(session, Operation::ViewPetitions)?;
        Ok(DashboardStats::tally(&self.scoped_petitions(session)?))
    }

    async fn petition_history(
        &self,
        session: &Session,
        petition_id: &PetitionId,
    ) -> Result<PetitionHistory> {
        authorize(session, Operation::ViewPetitions)?;
        let petition = self.load(petition_id)?;

        let mut officers = Vec::with_capacity(petition.assigned_officers.len());
        for officer_id in &petition.assigned_officers {
            // Officers removed from the directory are skipped
            if let Some(user) = self.store.get_user(officer_id)? {
                officers.push(user);
            }
        }

        Ok(PetitionHistory {
            feedback: self.store.list_eo_feedback(petition_id)?,
            decision: self.store.get_hod_feedback(petition_id)?,
            officers,
            petition,
        })
    }

    async fn enquiry_officers(&self, session: &Session) -> Result<Vec<User>> {
        directory::enquiry_officers(&*self.store, session)
    }

    // =========================================================================
    // User Directory
    // =========================================================================

    async fn create_user(&self, session: &Session, form: UserForm) -> Result<User> {
        directory::create_user(&*self.store, session, form, &self.config)
            .inspect_err(rejected("create_user", session))
    }

    async fn update_user(
        &self,
        session: &Session,
        user_id: &UserId,
        form: UserForm,
    ) -> Result<User> {
        directory::update_user(&*self.store, session, user_id, form, &self.config)
            .inspect_err(rejected("update_user", session))
    }

    async fn delete_user(&self, session: &Session, user_id: &UserId) -> Result<()> {
        directory::delete_user(&*self.store, session, user_id)
            .inspect_err(rejected("delete_user", session))
    }

    async fn list_users(&self, session: &Session, search: Option<&str>) -> Result<Vec<User>> {
        directory::list_users(&*self.store, session, search)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use chrono::NaiveDate;
    use hydraa_store::{RocksStore, TimeBound};
    use tempfile::TempDir;

    fn setup() -> (WorkflowService<RocksStore>, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(RocksStore::open(dir.path()).unwrap());
        seed::seed_directory(&*store).unwrap();
        let config = WorkflowConfig {
            login_delay_ms: 0,
            ..Default::default()
        };
        (WorkflowService::new(store, config), dir)
    }

    async fn as_user(service: &WorkflowService<RocksStore>, email: &str) -> Session {
        service.login(email, "password").await.unwrap()
    }

    fn request(name: &str, time_bound: TimeBound, day: u32) -> NewPetition {
        let mut request = NewPetition::new(
            Petitioner {
                name: name.to_string(),
                phone: "9876543210".to_string(),
                address: "House 4, Kukatpally".to_string(),
            },
            "Illegal construction on the storm water drain",
        );
        request.time_bound = time_bound;
        request.date = NaiveDate::from_ymd_opt(2024, 6, day);
        request
    }

    fn ids(names: &[&str]) -> Vec<UserId> {
        names.iter().map(|n| UserId::new(*n).unwrap()).collect()
    }

    fn report() -> FeedbackSubmission {
        FeedbackSubmission {
            observations: "Drain covered by a concrete slab".to_string(),
            findings: "Encroachment confirmed".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_petition_assigns_numbers() {
        let (service, _dir) = setup();
        let reception = as_user(&service, "reception@hydraa.gov.in").await;

        let first = service
            .create_petition(&reception, request("Rajesh Kumar", TimeBound::Normal, 1))
            .await
            .unwrap();
        let second = service
            .create_petition(&reception, request("Lakshmi Devi", TimeBound::Normal, 2))
            .await
            .unwrap();

        let year = Utc::now().year();
        assert_eq!(first.petition_number.to_string(), format!("PTN00001{year}"));
        assert_eq!(second.petition_number.to_string(), format!("PTN00002{year}"));
        assert_eq!(first.status, PetitionStatus::Pending);
        assert!(first.assigned_officers.is_empty());
        assert_eq!(first.created_by.as_str(), "1");

        let found = service
            .find_petition(&reception, &second.petition_number)
            .await
            .unwrap();
        assert_eq!(found.petition_id, second.petition_id);
    }

    #[tokio::test]
    async fn petition_numbers_follow_registration_year() {
        let (service, _dir) = setup();
        let reception = as_user(&service, "reception@hydraa.gov.in").await;
        let this_year = u16::try_from(Utc::now().year()).unwrap();

        let mut backdated = request("Rajesh Kumar", TimeBound::Normal, 1);
        backdated.date = NaiveDate::from_ymd_opt(2019, 3, 1);
        let petition = service.create_petition(&reception, backdated).await.unwrap();
        assert_eq!(petition.petition_number.year(), this_year);
        assert_eq!(petition.date, NaiveDate::from_ymd_opt(2019, 3, 1).unwrap());

        let mut ancient = request("Lakshmi Devi", TimeBound::Normal, 2);
        ancient.date = NaiveDate::from_ymd_opt(999, 1, 1);
        let result = service.create_petition(&reception, ancient).await;
        assert!(matches!(
            result,
            Err(WorkflowError::Validation { field: "date", .. })
        ));

        // The rejected request did not consume a sequence number
        let next = service
            .create_petition(&reception, request("Lakshmi Devi", TimeBound::Normal, 2))
            .await
            .unwrap();
        assert_eq!(next.petition_number.sequence(), 2);
        assert_eq!(service.store().list_petitions().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn create_petition_requires_role() {
        let (service, _dir) = setup();
        let hod = as_user(&service, "commissioner@hydraa.gov.in").await;

        let result = service
            .create_petition(&hod, request("Rajesh Kumar", TimeBound::Normal, 1))
            .await;
        assert!(matches!(result, Err(WorkflowError::RoleNotPermitted { .. })));
        assert!(service.store().list_petitions().unwrap().is_empty());
    }

    #[tokio::test]
    async fn assignment_rejects_non_officers() {
        let (service, _dir) = setup();
        let reception = as_user(&service, "reception@hydraa.gov.in").await;
        let hod = as_user(&service, "commissioner@hydraa.gov.in").await;
        let petition = service
            .create_petition(&reception, request("Rajesh Kumar", TimeBound::Normal, 1))
            .await
            .unwrap();

        // "3" is the HOD, "ghost" does not exist
        for bad in [ids(&["officer2", "3"]), ids(&["ghost"])] {
            let result = service
                .assign_officers(&hod, &petition.petition_id, OfficerAssignment::new(bad))
                .await;
            assert!(matches!(
                result,
                Err(WorkflowError::Validation {
                    field: "officer_ids",
                    ..
                })
            ));
        }

        let stored = service.store().get_petition(&petition.petition_id).unwrap().unwrap();
        assert_eq!(stored.status, PetitionStatus::Pending);
        assert_eq!(stored.version, 0);
    }

    #[tokio::test]
    async fn assignment_can_change_time_bound() {
        let (service, _dir) = setup();
        let reception = as_user(&service, "reception@hydraa.gov.in").await;
        let hod = as_user(&service, "commissioner@hydraa.gov.in").await;
        let petition = service
            .create_petition(&reception, request("Rajesh Kumar", TimeBound::Normal, 1))
            .await
            .unwrap();

        let assignment = OfficerAssignment {
            officer_ids: ids(&["officer4"]),
            time_bound: Some(TimeBound::Priority),
            instructions: Some("  Visit the site within a week ".to_string()),
        };
        let assigned = service
            .assign_officers(&hod, &petition.petition_id, assignment)
            .await
            .unwrap();

        assert_eq!(assigned.status, PetitionStatus::Assigned);
        assert_eq!(assigned.time_bound, TimeBound::Priority);
        assert_eq!(
            assigned.assignment_instructions.as_deref(),
            Some("Visit the site within a week")
        );
        assert_eq!(assigned.version, 1);
    }

    #[tokio::test]
    async fn feedback_permission_checked_before_status() {
        let (service, _dir) = setup();
        let reception = as_user(&service, "reception@hydraa.gov.in").await;
        let officer1 = as_user(&service, "officer@hydraa.gov.in").await;
        let petition = service
            .create_petition(&reception, request("Rajesh Kumar", TimeBound::Normal, 1))
            .await
            .unwrap();

        // Pending petition, unassigned officer: permission, not state
        let result = service
            .submit_feedback(&officer1, &petition.petition_id, report())
            .await;
        assert!(matches!(result, Err(WorkflowError::NotAssigned { .. })));

        // Reception may not file feedback at all
        let result = service
            .submit_feedback(&reception, &petition.petition_id, report())
            .await;
        assert!(matches!(result, Err(WorkflowError::RoleNotPermitted { .. })));
    }

    #[tokio::test]
    async fn blank_feedback_rejected() {
        let (service, _dir) = setup();
        let reception = as_user(&service, "reception@hydraa.gov.in").await;
        let hod = as_user(&service, "commissioner@hydraa.gov.in").await;
        let petition = service
            .create_petition(&reception, request("Rajesh Kumar", TimeBound::Normal, 1))
            .await
            .unwrap();
        service
            .assign_officers(
                &hod,
                &petition.petition_id,
                OfficerAssignment::new(ids(&["officer1"])),
            )
            .await
            .unwrap();
        let officer1 = as_user(&service, "officer@hydraa.gov.in").await;

        let result = service
            .submit_feedback(
                &officer1,
                &petition.petition_id,
                FeedbackSubmission {
                    observations: "Seen".to_string(),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(WorkflowError::Validation {
                field: "findings",
                ..
            })
        ));
        assert!(service
            .store()
            .list_eo_feedback(&petition.petition_id)
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn decision_releases_officers() {
        let (service, _dir) = setup();
        let reception = as_user(&service, "reception@hydraa.gov.in").await;
        let hod = as_user(&service, "commissioner@hydraa.gov.in").await;
        let petition = service
            .create_petition(&reception, request("Rajesh Kumar", TimeBound::Normal, 1))
            .await
            .unwrap();
        service
            .assign_officers(
                &hod,
                &petition.petition_id,
                OfficerAssignment::new(ids(&["officer1"])),
            )
            .await
            .unwrap();
        let officer1 = as_user(&service, "officer@hydraa.gov.in").await;
        service
            .submit_feedback(&officer1, &petition.petition_id, report())
            .await
            .unwrap();

        let decided = service
            .record_decision(
                &hod,
                &petition.petition_id,
                Decision::new("Rejected", "No encroachment on public land"),
            )
            .await
            .unwrap();
        assert_eq!(decided.status, PetitionStatus::DecisionMade);
        assert!(decided.assigned_officers.is_empty());

        let history = service
            .petition_history(&hod, &petition.petition_id)
            .await
            .unwrap();
        assert_eq!(history.feedback.len(), 1);
        assert_eq!(history.feedback[0].officer_id.as_str(), "officer1");
        assert_eq!(history.decision.unwrap().action, "Rejected");

        // The officer still sees the decided petition
        let listed = service
            .list_petitions(&officer1, PetitionQuery::default())
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn officers_see_only_their_petitions() {
        let (service, _dir) = setup();
        let reception = as_user(&service, "reception@hydraa.gov.in").await;
        let hod = as_user(&service, "commissioner@hydraa.gov.in").await;

        let a = service
            .create_petition(&reception, request("Rajesh Kumar", TimeBound::Normal, 1))
            .await
            .unwrap();
        service
            .create_petition(&reception, request("Lakshmi Devi", TimeBound::Normal, 2))
            .await
            .unwrap();
        service
            .assign_officers(&hod, &a.petition_id, OfficerAssignment::new(ids(&["officer2"])))
            .await
            .unwrap();

        let officer2 = as_user(&service, "rao@hydraa.gov.in").await;
        let officer3 = as_user(&service, "anjali@hydraa.gov.in").await;

        let mine = service
            .list_petitions(&officer2, PetitionQuery::default())
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].petition_id, a.petition_id);
        assert!(service
            .list_petitions(&officer3, PetitionQuery::default())
            .await
            .unwrap()
            .is_empty());

        let stats = service.dashboard(&officer2).await.unwrap();
        assert_eq!(stats.assigned, 1);
        assert_eq!(stats.total(), 1);

        let all = service.dashboard(&reception).await.unwrap();
        assert_eq!(all.pending, 1);
        assert_eq!(all.assigned, 1);
    }

    #[tokio::test]
    async fn listings_sorted_by_urgency_then_date() {
        let (service, _dir) = setup();
        let reception = as_user(&service, "reception@hydraa.gov.in").await;

        for (name, bound, day) in [
            ("Normal Old", TimeBound::Normal, 1),
            ("Priority Old", TimeBound::Priority, 2),
            ("Normal New", TimeBound::Normal, 9),
            ("Immediate", TimeBound::Immediate, 5),
            ("Priority New", TimeBound::Priority, 8),
        ] {
            service
                .create_petition(&reception, request(name, bound, day))
                .await
                .unwrap();
        }

        let names = |petitions: Vec<Petition>| -> Vec<String> {
            petitions.into_iter().map(|p| p.petitioner.name).collect()
        };

        let listed = service
            .list_petitions(&reception, PetitionQuery::default())
            .await
            .unwrap();
        assert_eq!(
            names(listed),
            ["Priority New", "Priority Old", "Immediate", "Normal New", "Normal Old"]
        );

        let urgent = service
            .list_petitions(
                &reception,
                PetitionQuery {
                    priority_only: true,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(urgent.len(), 3);

        let normal = service
            .list_petitions(
                &reception,
                PetitionQuery {
                    time_bound: Some(TimeBound::Normal),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(normal.len(), 2);
    }

    #[tokio::test]
    async fn missing_petition_is_not_found() {
        let (service, _dir) = setup();
        let hod = as_user(&service, "commissioner@hydraa.gov.in").await;
        let unknown = PetitionId::from_bytes([9u8; 32]);

        let result = service.get_petition(&hod, &unknown).await;
        assert!(matches!(result, Err(WorkflowError::PetitionNotFound(_))));

        let number = PetitionNumber::new(42, 2024).unwrap();
        let result = service.find_petition(&hod, &number).await;
        assert!(matches!(result, Err(WorkflowError::PetitionNumberNotFound(_))));
    }

    #[tokio::test]
    async fn stale_commit_reports_conflict() {
        let (service, _dir) = setup();
        let reception = as_user(&service, "reception@hydraa.gov.in").await;
        let petition = service
            .create_petition(&reception, request("Rajesh Kumar", TimeBound::Normal, 1))
            .await
            .unwrap();

        // Someone else committed in between
        let mut concurrent = petition.clone();
        concurrent.initial_remark = "Walk-in".to_string();
        service.store().update_petition(&concurrent).unwrap();

        let mut stale = petition.clone();
        stale.status = PetitionStatus::Assigned;
        stale.assigned_officers = ids(&["officer2"]);
        let err = service.commit(&stale).unwrap_err();
        assert!(matches!(err, WorkflowError::Conflict { .. }));
        assert!(err.is_retriable());
    }
}
