//! Input validation for workflow requests.
//!
//! Each check returns `WorkflowError::Validation` naming the offending field
//! and carrying the message shown to the user.

use std::collections::HashSet;

use chrono::Datelike;
use hydraa_core::reference;
use hydraa_core::UserId;

use crate::error::{Result, WorkflowError};
use crate::types::{Decision, FeedbackSubmission, NewPetition, UserForm, WorkflowConfig};

fn require_min_len(field: &'static str, value: &str, min: usize, message: &str) -> Result<()> {
    if value.trim().chars().count() < min {
        Err(WorkflowError::validation(field, message))
    } else {
        Ok(())
    }
}

fn require_present(field: &'static str, value: &str, message: &str) -> Result<()> {
    require_min_len(field, value, 1, message)
}

/// Check a phone number: digits plus optional `+`, `-` and spaces, with at
/// least `min_digits` digits.
fn validate_phone(field: &'static str, phone: &str, min_digits: usize) -> Result<()> {
    let well_formed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' '));
    let digits = phone.chars().filter(char::is_ascii_digit).count();

    if well_formed && digits >= min_digits {
        Ok(())
    } else {
        Err(WorkflowError::validation(
            field,
            format!("Phone number must be at least {min_digits} digits"),
        ))
    }
}

/// A deliberately small email syntax check: `local@domain.tld`, no whitespace.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, _)| !host.is_empty())
        && !domain.ends_with('.')
}

/// Validate a new petition.
///
/// # Errors
///
/// Returns `WorkflowError::Validation` for the first failing field.
pub fn validate_new_petition(request: &NewPetition, config: &WorkflowConfig) -> Result<()> {
    let petitioner = &request.petitioner;
    let name_min = config.min_petitioner_name_len;
    require_min_len(
        "petitioner.name",
        &petitioner.name,
        name_min,
        &format!("Name must be at least {name_min} characters"),
    )?;
    validate_phone("petitioner.phone", &petitioner.phone, config.min_phone_digits)?;
    let address_min = config.min_address_len;
    require_min_len(
        "petitioner.address",
        &petitioner.address,
        address_min,
        &format!("Address must be at least {address_min} characters"),
    )?;
    let complaint_min = config.min_complaint_len;
    require_min_len(
        "complaint_details",
        &request.complaint_details,
        complaint_min,
        &format!("Complaint details must be at least {complaint_min} characters"),
    )?;

    if request
        .date
        .is_some_and(|date| !(1000..=9999).contains(&date.year()))
    {
        return Err(WorkflowError::validation("date", "Please enter a valid date"));
    }

    if let Some(zone) = &request.encroachment_zone {
        reference::resolve_location(&zone.level1, &zone.level2, &zone.level3).map_err(|_| {
            WorkflowError::validation(
                "encroachment_zone",
                format!("Unknown encroachment location: {zone}"),
            )
        })?;
    }

    reference::validate_encroachment_types(request.encroachment_types.iter().map(String::as_str))
        .map_err(|e| WorkflowError::validation("encroachment_types", e.to_string()))?;

    Ok(())
}

/// Validate the shape of an officer list: non-empty, bounded, no duplicates.
///
/// Directory lookups (existence and role) are done by the caller.
///
/// # Errors
///
/// Returns `WorkflowError::Validation` if the list is malformed.
pub fn validate_officer_list(officer_ids: &[UserId], config: &WorkflowConfig) -> Result<()> {
    if officer_ids.is_empty() {
        return Err(WorkflowError::validation(
            "officer_ids",
            "Please select at least one officer",
        ));
    }
    if officer_ids.len() > config.max_officers {
        return Err(WorkflowError::validation(
            "officer_ids",
            format!("At most {} officers can be assigned", config.max_officers),
        ));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = officer_ids.iter().find(|id| !seen.insert(*id)) {
        return Err(WorkflowError::validation(
            "officer_ids",
            format!("Officer {dup} is listed more than once"),
        ));
    }
    Ok(())
}

/// Validate an investigation report.
///
/// # Errors
///
/// Returns `WorkflowError::Validation` if observations or findings are blank.
pub fn validate_feedback(submission: &FeedbackSubmission) -> Result<()> {
    require_present(
        "observations",
        &submission.observations,
        "Please enter your observations",
    )?;
    require_present(
        "findings",
        &submission.findings,
        "Please enter your findings and recommendations",
    )
}

/// Validate a decision.
///
/// # Errors
///
/// Returns `WorkflowError::Validation` if the action is blank.
pub fn validate_decision(decision: &Decision) -> Result<()> {
    require_present("action", &decision.action, "Please enter the decision")
}

/// Validate the user form.
///
/// # Errors
///
/// Returns `WorkflowError::Validation` for the first failing field.
pub fn validate_user_form(form: &UserForm, config: &WorkflowConfig) -> Result<()> {
    let id_min = config.min_employee_id_len;
    require_min_len(
        "employee_id",
        &form.employee_id,
        id_min,
        &format!("Employee ID must be at least {id_min} characters"),
    )?;
    let name_min = config.min_user_name_len;
    require_min_len(
        "name",
        &form.name,
        name_min,
        &format!("Name must be at least {name_min} characters"),
    )?;
    if !is_valid_email(form.email.trim()) {
        return Err(WorkflowError::validation(
            "email",
            "Please enter a valid email address",
        ));
    }
    validate_phone("phone", &form.phone, config.min_phone_digits)
}

/// Validate login input.
///
/// # Errors
///
/// Returns `WorkflowError::Validation` if either value is blank.
pub fn validate_credentials(email: &str, password: &str) -> Result<()> {
    require_present("email", email, "Please enter your email")?;
    if password.is_empty() {
        return Err(WorkflowError::validation(
            "password",
            "Please enter your password",
        ));
    }
    Ok(())
}
