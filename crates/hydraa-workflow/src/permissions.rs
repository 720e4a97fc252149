//! Role-based permissions.
//!
//! A single role → operation table decides what each role may do. Every
//! mutating operation of the engine and the [`visible_actions`] query consult
//! it.
//!
//! | operation        | Reception | EnquiryOfficer | HOD | Admin |
//! |------------------|:---------:|:--------------:|:---:|:-----:|
//! | create petition  | ✓         |                |     | ✓     |
//! | view petitions   | ✓         | ✓              | ✓   | ✓     |
//! | assign officers  |           |                | ✓   | ✓     |
//! | submit feedback  |           | ✓ (assigned)   |     | ✓ (assigned) |
//! | record decision  |           |                | ✓   | ✓     |
//! | manage users     |           |                |     | ✓     |

use std::fmt;

use hydraa_store::{Petition, Role};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WorkflowError};
use crate::lifecycle;
use crate::session::Session;

/// An operation a user may attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// Register a new petition.
    CreatePetition,
    /// Look at petitions, dashboards and history.
    ViewPetitions,
    /// Assign enquiry officers to a pending petition.
    Assign,
    /// File an investigation report.
    SubmitFeedback,
    /// Record the final decision.
    Decide,
    /// Administer the user directory.
    ManageUsers,
}

impl Operation {
    /// The per-petition workflow actions, in the order they become available.
    pub const WORKFLOW_ACTIONS: [Self; 3] = [Self::Assign, Self::SubmitFeedback, Self::Decide];

    /// A short verb phrase for messages.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::CreatePetition => "create petitions",
            Self::ViewPetitions => "view petitions",
            Self::Assign => "assign officers",
            Self::SubmitFeedback => "submit feedback",
            Self::Decide => "record decisions",
            Self::ManageUsers => "manage users",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Check the role table.
#[must_use]
pub const fn role_permits(role: Role, operation: Operation) -> bool {
    use Operation::{Assign, CreatePetition, Decide, SubmitFeedback, ViewPetitions};

    match role {
        Role::Admin => true,
        Role::Reception => matches!(operation, CreatePetition | ViewPetitions),
        Role::EnquiryOfficer => matches!(operation, SubmitFeedback | ViewPetitions),
        Role::Hod => matches!(operation, Assign | Decide | ViewPetitions),
    }
}

/// All operations a role may perform.
#[must_use]
pub fn permitted_operations(role: Role) -> Vec<Operation> {
    use Operation::{Assign, CreatePetition, Decide, ManageUsers, SubmitFeedback, ViewPetitions};

    [CreatePetition, ViewPetitions, Assign, SubmitFeedback, Decide, ManageUsers]
        .into_iter()
        .filter(|op| role_permits(role, *op))
        .collect()
}

/// Authorize an operation for the session's role.
///
/// # Errors
///
/// Returns `WorkflowError::RoleNotPermitted` if the role table refuses it.
pub fn authorize(session: &Session, operation: Operation) -> Result<()> {
    if role_permits(session.role(), operation) {
        Ok(())
    } else {
        Err(WorkflowError::RoleNotPermitted {
            role: session.role(),
            operation,
        })
    }
}

/// The workflow actions applicable to a petition for a role.
///
/// An action is visible when the role table grants it and the petition's
/// status accepts it. Officer membership is not considered; see
/// [`visible_actions_for`].
#[must_use]
pub fn visible_actions(petition: &Petition, role: Role) -> Vec<Operation> {
    Operation::WORKFLOW_ACTIONS
        .into_iter()
        .filter(|op| role_permits(role, *op) && lifecycle::accepts(*op, petition.status))
        .collect()
}

/// The workflow actions applicable to a petition for the session's user.
///
/// Like [`visible_actions`], but hides `SubmitFeedback` unless the user is
/// one of the petition's assigned officers.
#[must_use]
pub fn visible_actions_for(petition: &Petition, session: &Session) -> Vec<Operation> {
    visible_actions(petition, session.role())
        .into_iter()
        .filter(|op| *op != Operation::SubmitFeedback || petition.is_assigned_to(session.user_id()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{petition_in, session_as};
    use hydraa_store::PetitionStatus;

    #[test]
    fn role_table() {
        assert!(role_permits(Role::Reception, Operation::CreatePetition));
        assert!(!role_permits(Role::Reception, Operation::Decide));
        assert!(!role_permits(Role::Reception, Operation::Assign));
        assert!(role_permits(Role::EnquiryOfficer, Operation::SubmitFeedback));
        assert!(!role_permits(Role::EnquiryOfficer, Operation::Assign));
        assert!(role_permits(Role::Hod, Operation::Assign));
        assert!(role_permits(Role::Hod, Operation::Decide));
        assert!(!role_permits(Role::Hod, Operation::CreatePetition));
        assert!(!role_permits(Role::Hod, Operation::ManageUsers));
        for role in Role::ALL {
            assert!(role_permits(role, Operation::ViewPetitions));
        }
        assert_eq!(permitted_operations(Role::Admin).len(), 6);
    }

    #[test]
    fn only_admins_manage_users() {
        for role in Role::ALL {
            assert_eq!(
                role_permits(role, Operation::ManageUsers),
                role == Role::Admin,
                "{role}"
            );
            assert_eq!(
                permitted_operations(role).contains(&Operation::ManageUsers),
                role == Role::Admin
            );
        }
    }

    #[test]
    fn visible_actions_follow_status() {
        let pending = petition_in(PetitionStatus::Pending, &[]);
        assert_eq!(visible_actions(&pending, Role::Hod), vec![Operation::Assign]);
        assert!(visible_actions(&pending, Role::Reception).is_empty());
        assert!(visible_actions(&pending, Role::EnquiryOfficer).is_empty());

        let assigned = petition_in(PetitionStatus::Assigned, &["officer2"]);
        assert!(visible_actions(&assigned, Role::Hod).is_empty());
        assert_eq!(
            visible_actions(&assigned, Role::EnquiryOfficer),
            vec![Operation::SubmitFeedback]
        );

        let investigating = petition_in(PetitionStatus::UnderInvestigation, &["officer2"]);
        assert_eq!(visible_actions(&investigating, Role::Hod), vec![Operation::Decide]);
        assert_eq!(
            visible_actions(&investigating, Role::Admin),
            vec![Operation::SubmitFeedback, Operation::Decide]
        );

        let decided = petition_in(PetitionStatus::DecisionMade, &[]);
        for role in Role::ALL {
            assert!(visible_actions(&decided, role).is_empty());
        }
    }

    #[test]
    fn session_view_hides_feedback_from_unassigned_officers() {
        let assigned = petition_in(PetitionStatus::Assigned, &["officer2"]);

        let officer2 = session_as("officer2", Role::EnquiryOfficer);
        assert_eq!(
            visible_actions_for(&assigned, &officer2),
            vec![Operation::SubmitFeedback]
        );

        let officer3 = session_as("officer3", Role::EnquiryOfficer);
        assert!(visible_actions_for(&assigned, &officer3).is_empty());
    }

    #[test]
    fn authorize_reports_role_and_operation() {
        let reception = session_as("1", Role::Reception);
        let err = authorize(&reception, Operation::Decide).unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::RoleNotPermitted {
                role: Role::Reception,
                operation: Operation::Decide
            }
        ));
        assert!(authorize(&reception, Operation::CreatePetition).is_ok());
    }
}
