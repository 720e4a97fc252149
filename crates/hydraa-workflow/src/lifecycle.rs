//! Petition lifecycle state machine.
//!
//! This module defines the valid status transitions for petitions and the
//! structural invariants every committed petition must satisfy.
//!
//! # State Machine
//!
//! ```text
//!   ┌──────────┐  assign   ┌──────────┐  first feedback  ┌─────────────────────┐
//!   │ Pending  │──────────▶│ Assigned │─────────────────▶│ Under Investigation │◀─┐
//!   └──────────┘           └──────────┘                  └──────────┬──────────┘  │
//!                                                                   │   feedback  │
//!                                                                   │─────────────┘
//!                                                          decision │
//!                                                                   ▼
//!                                                          ┌───────────────┐
//!                                                          │ Decision Made │
//!                                                          └───────────────┘
//! ```
//!
//! There are no back-transitions and no cancellation.

use std::collections::HashSet;

use hydraa_store::{Petition, PetitionStatus};

use crate::error::{Result, WorkflowError};
use crate::permissions::Operation;

/// Validates a status transition and returns the target status if valid.
///
/// # Errors
///
/// Returns `WorkflowError::InvalidState` if the transition is not allowed.
pub fn validate_transition(
    petition: &Petition,
    to: PetitionStatus,
    operation: Operation,
) -> Result<PetitionStatus> {
    if is_valid_transition(petition.status, to) {
        Ok(to)
    } else {
        Err(WorkflowError::InvalidState {
            petition_number: petition.petition_number,
            status: petition.status,
            operation,
        })
    }
}

/// Check if a status transition is valid according to the state machine.
#[must_use]
pub const fn is_valid_transition(from: PetitionStatus, to: PetitionStatus) -> bool {
    use PetitionStatus::{Assigned, DecisionMade, Pending, UnderInvestigation};

    matches!(
        (from, to),
        (Pending, Assigned)
            // Every report moves to (or keeps) Under Investigation
            | (Assigned | UnderInvestigation, UnderInvestigation)
            | (UnderInvestigation, DecisionMade)
    )
}

/// Returns the list of valid target statuses from the given status.
#[must_use]
pub fn valid_transitions_from(status: PetitionStatus) -> Vec<PetitionStatus> {
    use PetitionStatus::{Assigned, DecisionMade, Pending, UnderInvestigation};

    match status {
        Pending => vec![Assigned],
        Assigned => vec![UnderInvestigation],
        UnderInvestigation => vec![UnderInvestigation, DecisionMade],
        DecisionMade => vec![],
    }
}

/// Returns true if the status is terminal.
#[must_use]
pub const fn is_terminal(status: PetitionStatus) -> bool {
    matches!(status, PetitionStatus::DecisionMade)
}

/// Returns true if a petition in `status` accepts the operation.
///
/// Operations that do not act on a single petition are accepted in every status.
#[must_use]
pub const fn accepts(operation: Operation, status: PetitionStatus) -> bool {
    match operation {
        Operation::Assign => matches!(status, PetitionStatus::Pending),
        Operation::SubmitFeedback => matches!(
            status,
            PetitionStatus::Assigned | PetitionStatus::UnderInvestigation
        ),
        Operation::Decide => matches!(status, PetitionStatus::UnderInvestigation),
        Operation::CreatePetition | Operation::ViewPetitions | Operation::ManageUsers => true,
    }
}

/// Require that the petition's status accepts the operation.
///
/// # Errors
///
/// Returns `WorkflowError::InvalidState` otherwise.
pub fn ensure_accepts(petition: &Petition, operation: Operation) -> Result<()> {
    if accepts(operation, petition.status) {
        Ok(())
    } else {
        Err(WorkflowError::InvalidState {
            petition_number: petition.petition_number,
            status: petition.status,
            operation,
        })
    }
}

/// Check the structural invariants of a petition before it is committed.
///
/// # Errors
///
/// Returns `WorkflowError::Internal` naming the first violated invariant.
pub fn check_invariants(petition: &Petition, max_officers: usize) -> Result<()> {
    let officers = &petition.assigned_officers;
    let violation = if petition.status == PetitionStatus::Pending && !officers.is_empty() {
        Some("pending petition has assigned officers")
    } else if !officers.is_empty()
        && !matches!(
            petition.status,
            PetitionStatus::Assigned | PetitionStatus::UnderInvestigation
        )
    {
        Some("officers assigned outside the investigation states")
    } else if officers.len() > max_officers {
        Some("too many assigned officers")
    } else if officers.iter().collect::<HashSet<_>>().len() != officers.len() {
        Some("duplicate assigned officers")
    } else {
        None
    };

    match violation {
        Some(what) => Err(WorkflowError::Internal(format!(
            "petition {}: {what}",
            petition.petition_number
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::petition_in;

    #[test]
    fn valid_transitions() {
        use PetitionStatus::*;

        assert!(is_valid_transition(Pending, Assigned));
        assert!(is_valid_transition(Assigned, UnderInvestigation));
        // Repeated feedback keeps the status
        assert!(is_valid_transition(UnderInvestigation, UnderInvestigation));
        assert!(is_valid_transition(UnderInvestigation, DecisionMade));
    }

    #[test]
    fn invalid_transitions() {
        use PetitionStatus::*;

        // No skipping ahead
        assert!(!is_valid_transition(Pending, UnderInvestigation));
        assert!(!is_valid_transition(Assigned, DecisionMade));
        // No going back
        assert!(!is_valid_transition(Assigned, Pending));
        assert!(!is_valid_transition(DecisionMade, UnderInvestigation));
        // No self-loop except Under Investigation
        assert!(!is_valid_transition(Pending, Pending));
        assert!(!is_valid_transition(Assigned, Assigned));
    }

    #[test]
    fn status_only_moves_forward() {
        for from in PetitionStatus::ALL {
            for to in valid_transitions_from(from) {
                assert!(to >= from, "{from} -> {to} goes backwards");
                assert!(is_valid_transition(from, to));
            }
        }
        assert!(valid_transitions_from(PetitionStatus::DecisionMade).is_empty());
    }

    #[test]
    fn validate_transition_err() {
        let petition = petition_in(PetitionStatus::Assigned, &["officer2"]);
        let result = validate_transition(&petition, PetitionStatus::DecisionMade, Operation::Decide);

        match result {
            Err(WorkflowError::InvalidState {
                status, operation, ..
            }) => {
                assert_eq!(status, PetitionStatus::Assigned);
                assert_eq!(operation, Operation::Decide);
            }
            _ => panic!("expected InvalidState error"),
        }
    }

    #[test]
    fn operation_acceptance() {
        assert!(accepts(Operation::Assign, PetitionStatus::Pending));
        assert!(!accepts(Operation::Assign, PetitionStatus::Assigned));
        assert!(accepts(Operation::SubmitFeedback, PetitionStatus::Assigned));
        assert!(accepts(Operation::SubmitFeedback, PetitionStatus::UnderInvestigation));
        assert!(!accepts(Operation::SubmitFeedback, PetitionStatus::DecisionMade));
        assert!(accepts(Operation::Decide, PetitionStatus::UnderInvestigation));
        assert!(!accepts(Operation::Decide, PetitionStatus::Assigned));
        assert!(accepts(Operation::ViewPetitions, PetitionStatus::DecisionMade));
    }

    #[test]
    fn terminal_status() {
        assert!(is_terminal(PetitionStatus::DecisionMade));
        assert!(!is_terminal(PetitionStatus::UnderInvestigation));
    }

    #[test]
    fn invariants() {
        assert!(check_invariants(&petition_in(PetitionStatus::Pending, &[]), 3).is_ok());
        assert!(check_invariants(&petition_in(PetitionStatus::Pending, &["officer2"]), 3).is_err());
        assert!(
            check_invariants(&petition_in(PetitionStatus::Assigned, &["officer2", "officer3"]), 3)
                .is_ok()
        );
        assert!(
            check_invariants(&petition_in(PetitionStatus::Assigned, &["officer2", "officer2"]), 3)
                .is_err()
        );
        assert!(check_invariants(
            &petition_in(
                PetitionStatus::Assigned,
                &["officer1", "officer2", "officer3", "officer4"]
            ),
            3
        )
        .is_err());
        assert!(
            check_invariants(&petition_in(PetitionStatus::DecisionMade, &["officer2"]), 3).is_err()
        );
        assert!(check_invariants(&petition_in(PetitionStatus::DecisionMade, &[]), 3).is_ok());
    }
}
