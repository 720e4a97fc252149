//! Demo user directory.
//!
//! A fresh installation has no users and therefore nobody who can log in.
//! [`seed_directory`] installs one user per role plus five enquiry officers.

use chrono::Utc;
use hydraa_core::UserId;
use hydraa_store::{derive_handle, Designation, Role, Store, User};

use crate::error::{Result, WorkflowError};

/// `(id, employee id, name, designation, role, email, phone)`
type SeedRow = (
    &'static str,
    &'static str,
    &'static str,
    Designation,
    Role,
    &'static str,
    &'static str,
);

const DEMO_USERS: &[SeedRow] = &[
    ("1", "EMP001", "John Doe", Designation::Dcp, Role::Reception, "reception@hydraa.gov.in", "9876543210"),
    ("3", "EMP003", "Michael Brown", Designation::Dcp, Role::Hod, "commissioner@hydraa.gov.in", "9876543212"),
    ("4", "EMP004", "Admin User", Designation::Other, Role::Admin, "admin@hydraa.gov.in", "9876543213"),
    ("officer1", "EMP002", "Jane Smith", Designation::Acp, Role::EnquiryOfficer, "officer@hydraa.gov.in", "9876543211"),
    ("officer2", "EMP005", "Rao Kumar", Designation::Inspector, Role::EnquiryOfficer, "rao@hydraa.gov.in", "9876543214"),
    ("officer3", "EMP006", "Anjali Sharma", Designation::Inspector, Role::EnquiryOfficer, "anjali@hydraa.gov.in", "9876543215"),
    ("officer4", "EMP007", "Suresh Reddy", Designation::Dcp, Role::EnquiryOfficer, "suresh@hydraa.gov.in", "9876543216"),
    ("officer5", "EMP008", "Prakash Rao", Designation::Acp, Role::EnquiryOfficer, "prakash@hydraa.gov.in", "9876543217"),
];

/// The demo users.
///
/// # Errors
///
/// Returns `WorkflowError::Internal` if a built-in ID fails validation.
pub fn demo_users() -> Result<Vec<User>> {
    let now = Utc::now();
    DEMO_USERS
        .iter()
        .map(|&(id, employee_id, name, designation, role, email, phone)| {
            let user_id = UserId::new(id).map_err(|e| WorkflowError::Internal(e.to_string()))?;
            Ok(User {
                user_id,
                employee_id: employee_id.to_string(),
                name: name.to_string(),
                designation,
                role,
                email: email.to_string(),
                phone: phone.to_string(),
                handle: derive_handle(name, designation),
                created_at: now,
                updated_at: now,
            })
        })
        .collect()
}

/// Insert the demo users that are not already present.
///
/// Returns the number of users inserted. Existing users are left untouched.
///
/// # Errors
///
/// Returns an error if the store fails, including when a demo email is
/// already used by a different user.
pub fn seed_directory<S: Store>(store: &S) -> Result<usize> {
    let mut inserted = 0;
    for user in demo_users()? {
        if store.get_user(&user.user_id)?.is_none() {
            store.put_user(&user)?;
            inserted += 1;
        }
    }

    if inserted > 0 {
        tracing::info!(inserted, "Seeded user directory");
    }

    Ok(inserted)
}
