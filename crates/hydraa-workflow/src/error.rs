//! Error types for the workflow engine.
//!
//! Every failure is a typed `WorkflowError`. Callers branch on
//! [`WorkflowError::kind`] and show [`WorkflowError::user_message`] to users.

use std::fmt;

use hydraa_core::{PetitionId, PetitionNumber, UserId};
use hydraa_store::{PetitionStatus, Role, StoreError};
use thiserror::Error;

use crate::permissions::Operation;

/// A result type using `WorkflowError`.
pub type Result<T> = std::result::Result<T, WorkflowError>;

/// Coarse classification of workflow errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input failed validation.
    Validation,
    /// The actor may not perform the operation.
    Permission,
    /// The petition's status does not accept the operation.
    State,
    /// A referenced record does not exist.
    NotFound,
    /// A concurrent change won the optimistic version check.
    Conflict,
    /// Storage or other internal failure.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validation => "validation",
            Self::Permission => "permission",
            Self::State => "state",
            Self::NotFound => "not found",
            Self::Conflict => "conflict",
            Self::Internal => "internal",
        };
        f.write_str(name)
    }
}

/// Errors that can occur in workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// An input field is missing or malformed.
    #[error("invalid {field}: {message}")]
    Validation {
        /// The offending field.
        field: &'static str,
        /// Human-readable explanation.
        message: String,
    },

    /// The role table does not grant the operation.
    #[error("role {role} may not {operation}")]
    RoleNotPermitted {
        /// The actor's role.
        role: Role,
        /// The attempted operation.
        operation: Operation,
    },

    /// The actor is not one of the petition's assigned officers.
    #[error("user {user_id} is not assigned to petition {petition_number}")]
    NotAssigned {
        /// The actor.
        user_id: UserId,
        /// The petition.
        petition_number: PetitionNumber,
    },

    /// No user is logged in.
    #[error("not logged in")]
    NotAuthenticated,

    /// Login failed.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The petition's status does not accept the operation.
    #[error("cannot {operation} on petition {petition_number} in status {status}")]
    InvalidState {
        /// The petition.
        petition_number: PetitionNumber,
        /// Its current status.
        status: PetitionStatus,
        /// The attempted operation.
        operation: Operation,
    },

    /// The requested petition was not found.
    #[error("petition not found: {0}")]
    PetitionNotFound(PetitionId),

    /// No petition has the given number.
    #[error("petition number not found: {0}")]
    PetitionNumberNotFound(PetitionNumber),

    /// The requested user was not found.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// Another writer changed the petition first.
    #[error("petition {petition_number} was modified concurrently")]
    Conflict {
        /// The petition.
        petition_number: PetitionNumber,
    },

    /// The petition number sequence of a year is used up.
    #[error("petition numbers exhausted for {0}")]
    SequenceExhausted(u16),

    /// Storage layer error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl WorkflowError {
    /// Shorthand for a validation failure.
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Returns the error's classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } | Self::InvalidCredentials => ErrorKind::Validation,
            Self::RoleNotPermitted { .. } | Self::NotAssigned { .. } | Self::NotAuthenticated => {
                ErrorKind::Permission
            }
            Self::InvalidState { .. } => ErrorKind::State,
            Self::PetitionNotFound(_)
            | Self::PetitionNumberNotFound(_)
            | Self::UserNotFound(_) => ErrorKind::NotFound,
            Self::Conflict { .. } | Self::Store(StoreError::Conflict { .. }) => ErrorKind::Conflict,
            Self::SequenceExhausted(_) | Self::Store(_) | Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Returns true if this error might be resolved by retrying.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        match self {
            Self::SequenceExhausted(_) => false,
            _ => matches!(self.kind(), ErrorKind::Conflict | ErrorKind::Internal),
        }
    }

    /// A message suitable for showing to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message, .. } => message.clone(),
            Self::RoleNotPermitted { operation, .. } => {
                format!("You do not have permission to {operation}.")
            }
            Self::NotAssigned {
                petition_number, ..
            } => format!("You are not assigned to petition {petition_number}."),
            Self::NotAuthenticated => "Please log in to continue.".to_string(),
            Self::InvalidCredentials => "Invalid email or password".to_string(),
            Self::InvalidState {
                petition_number,
                status,
                operation,
            } => format!("Cannot {operation} on petition {petition_number} while it is {status}."),
            Self::PetitionNotFound(_) => "Petition not found.".to_string(),
            Self::PetitionNumberNotFound(number) => format!("Petition {number} not found."),
            Self::UserNotFound(user_id) => format!("User {user_id} not found."),
            Self::Conflict { petition_number } => format!(
                "Petition {petition_number} was changed by someone else. Reload it and try again."
            ),
            Self::Store(StoreError::Conflict { .. }) => {
                "The record was changed by someone else. Reload it and try again.".to_string()
            }
            Self::SequenceExhausted(year) => {
                format!("No more petition numbers are available for {year}.")
            }
            Self::Store(_) | Self::Internal(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }

    /// Map a store error from a petition commit.
    pub(crate) fn from_commit(err: StoreError, petition_number: PetitionNumber) -> Self {
        match err {
            StoreError::Conflict { .. } => Self::Conflict { petition_number },
            other => Self::Store(other),
        }
    }
}
