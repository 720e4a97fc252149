//! User directory administration.
//!
//! Creating, editing and removing users is reserved to Admins. The enquiry
//! officer roster is also available to anyone who may assign officers.

use chrono::Utc;
use hydraa_core::UserId;
use hydraa_store::{derive_handle, PetitionStatus, Role, Store, StoreError, User};

use crate::error::{Result, WorkflowError};
use crate::permissions::{authorize, Operation};
use crate::session::Session;
use crate::types::{UserForm, WorkflowConfig};
use crate::validation;

fn email_taken(email: &str) -> WorkflowError {
    WorkflowError::validation("email", format!("A user with email {email} already exists"))
}

/// Make sure no other user holds the form's email.
fn ensure_email_free<S: Store>(store: &S, email: &str, owner: Option<&UserId>) -> Result<()> {
    match store.get_user_by_email(email)? {
        Some(existing) if Some(&existing.user_id) != owner => Err(email_taken(email)),
        _ => Ok(()),
    }
}

/// Refuse when the officer still holds petitions that are being worked.
fn ensure_no_open_assignments<S: Store>(
    store: &S,
    user_id: &UserId,
    field: &'static str,
) -> Result<()> {
    let mut open = Vec::new();
    for status in [PetitionStatus::Assigned, PetitionStatus::UnderInvestigation] {
        open.extend(
            store
                .list_petitions_by_status(status)?
                .into_iter()
                .filter(|p| p.is_assigned_to(user_id))
                .map(|p| p.petition_number.to_string()),
        );
    }
    if open.is_empty() {
        return Ok(());
    }
    open.sort();
    Err(WorkflowError::validation(
        field,
        format!(
            "User {user_id} is assigned to open petitions: {}",
            open.join(", ")
        ),
    ))
}

fn put_user<S: Store>(store: &S, user: &User) -> Result<()> {
    store.put_user(user).map_err(|e| match e {
        StoreError::Duplicate(_) => email_taken(&user.email),
        other => WorkflowError::Store(other),
    })
}

/// Create a directory user with a generated ID.
///
/// # Errors
///
/// Returns `WorkflowError::RoleNotPermitted` unless the session is an Admin,
/// or `WorkflowError::Validation` if the form is invalid or the email taken.
pub fn create_user<S: Store>(
    store: &S,
    session: &Session,
    form: UserForm,
    config: &WorkflowConfig,
) -> Result<User> {
    authorize(session, Operation::ManageUsers)?;
    validation::validate_user_form(&form, config)?;

    let email = form.email.trim().to_string();
    ensure_email_free(store, &email, None)?;

    let now = Utc::now();
    let name = form.name.trim().to_string();
    let user = User {
        user_id: UserId::generate(),
        employee_id: form.employee_id.trim().to_string(),
        handle: derive_handle(&name, form.designation),
        name,
        designation: form.designation,
        role: form.role,
        email,
        phone: form.phone.trim().to_string(),
        created_at: now,
        updated_at: now,
    };
    put_user(store, &user)?;

    tracing::info!(
        user_id = %user.user_id,
        role = %user.role,
        by = %session.user_id(),
        "Created user"
    );

    Ok(user)
}

/// Replace a user's details from the form. The handle is re-derived.
///
/// # Errors
///
/// Returns `WorkflowError::UserNotFound` if the user does not exist, plus the
/// errors of [`create_user`]. Taking the Enquiry Officer role from someone
/// assigned to an Assigned or Under Investigation petition is a
/// `WorkflowError::Validation` error.
pub fn update_user<S: Store>(
    store: &S,
    session: &Session,
    user_id: &UserId,
    form: UserForm,
    config: &WorkflowConfig,
) -> Result<User> {
    authorize(session, Operation::ManageUsers)?;
    validation::validate_user_form(&form, config)?;

    let mut user = store
        .get_user(user_id)?
        .ok_or_else(|| WorkflowError::UserNotFound(user_id.clone()))?;

    if user.role == Role::EnquiryOfficer && form.role != Role::EnquiryOfficer {
        ensure_no_open_assignments(store, user_id, "role")?;
    }

    let email = form.email.trim().to_string();
    ensure_email_free(store, &email, Some(user_id))?;

    user.employee_id = form.employee_id.trim().to_string();
    user.name = form.name.trim().to_string();
    user.designation = form.designation;
    user.role = form.role;
    user.email = email;
    user.phone = form.phone.trim().to_string();
    user.handle = derive_handle(&user.name, user.designation);
    user.updated_at = Utc::now();
    put_user(store, &user)?;

    tracing::info!(user_id = %user.user_id, by = %session.user_id(), "Updated user");

    Ok(user)
}

/// Remove a user from the directory.
///
/// # Errors
///
/// Returns `WorkflowError::RoleNotPermitted` unless the session is an Admin,
/// `WorkflowError::Validation` if the user is assigned to an open petition,
/// or `WorkflowError::UserNotFound` if the user does not exist.
pub fn delete_user<S: Store>(store: &S, session: &Session, user_id: &UserId) -> Result<()> {
    authorize(session, Operation::ManageUsers)?;
    ensure_no_open_assignments(store, user_id, "user_id")?;

    store.delete_user(user_id).map_err(|e| match e {
        StoreError::NotFound => WorkflowError::UserNotFound(user_id.clone()),
        other => WorkflowError::Store(other),
    })?;

    tracing::info!(user_id = %user_id, by = %session.user_id(), "Deleted user");

    Ok(())
}

/// Whether a user matches a search term (case-insensitive substring of name,
/// employee ID, email or role).
#[must_use]
pub fn matches_search(user: &User, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    [
        user.name.as_str(),
        user.employee_id.as_str(),
        user.email.as_str(),
        user.role.label(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&term))
}

/// List directory users, optionally filtered by a search term.
///
/// # Errors
///
/// Returns `WorkflowError::RoleNotPermitted` unless the session is an Admin.
pub fn list_users<S: Store>(store: &S, session: &Session, search: Option<&str>) -> Result<Vec<User>> {
    authorize(session, Operation::ManageUsers)?;

    let mut users: Vec<User> = store
        .list_users()?
        .into_iter()
        .filter(|u| search.map_or(true, |term| matches_search(u, term)))
        .collect();
    users.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.user_id.cmp(&b.user_id)));

    Ok(users)
}

/// The enquiry officers available for assignment.
///
/// # Errors
///
/// Returns `WorkflowError::RoleNotPermitted` unless the session may assign.
pub fn enquiry_officers<S: Store>(store: &S, session: &Session) -> Result<Vec<User>> {
    authorize(session, Operation::Assign)?;

    let mut officers: Vec<User> = store
        .list_users()?
        .into_iter()
        .filter(|u| u.role == Role::EnquiryOfficer)
        .collect();
    officers.sort_by(|a, b| a.user_id.cmp(&b.user_id));

    Ok(officers)
}
