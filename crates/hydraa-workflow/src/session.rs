//! Session management operations.
//!
//! A [`Session`] is the explicit "who is acting" value passed to every
//! workflow operation. It is created by [`login`], persisted in the store's
//! session slot, reloaded at process start by [`restore`], and discarded by
//! [`logout`].
//!
//! Authentication is a stub: any non-empty password is accepted for a known
//! email after a simulated delay.

use std::time::Duration;

use hydraa_core::UserId;
use hydraa_store::{Role, Store, User};

use crate::error::{Result, WorkflowError};
use crate::validation;

/// The logged-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user: User,
}

impl Session {
    /// Create a session for a directory user.
    #[must_use]
    pub const fn new(user: User) -> Self {
        Self { user }
    }

    /// The acting user's ID.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user.user_id
    }

    /// The acting user's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.user.role
    }

    /// The full user record.
    #[must_use]
    pub const fn user(&self) -> &User {
        &self.user
    }
}

/// Log in by email and persist the session.
///
/// Waits `delay` before answering, successful or not.
///
/// # Errors
///
/// Returns `WorkflowError::Validation` if email or password is blank, or
/// `WorkflowError::InvalidCredentials` if no user has that email.
pub async fn login<S: Store>(
    store: &S,
    email: &str,
    password: &str,
    delay: Duration,
) -> Result<Session> {
    validation::validate_credentials(email, password)?;

    tokio::time::sleep(delay).await;

    let user = store
        .get_user_by_email(email.trim())?
        .ok_or(WorkflowError::InvalidCredentials)?;

    store.save_session(&user)?;

    Ok(Session::new(user))
}

/// Reload the persisted session, if any.
///
/// The stored record is re-resolved against the directory: edits made since
/// login are picked up, and a user deleted since login clears the slot.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn restore<S: Store>(store: &S) -> Result<Option<Session>> {
    let Some(saved) = store.load_session()? else {
        return Ok(None);
    };

    match store.get_user(&saved.user_id)? {
        Some(current) => {
            if current != saved {
                store.save_session(&current)?;
            }
            Ok(Some(Session::new(current)))
        }
        None => {
            store.clear_session()?;
            Ok(None)
        }
    }
}

/// Clear the persisted session.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn logout<S: Store>(store: &S) -> Result<()> {
    store.clear_session()?;
    Ok(())
}

/// Require a restored session.
///
/// # Errors
///
/// Returns `WorkflowError::NotAuthenticated` if `session` is `None`.
pub fn require(session: Option<Session>) -> Result<Session> {
    session.ok_or(WorkflowError::NotAuthenticated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use hydraa_store::{MemoryStore, RocksStore};
    use tempfile::TempDir;

    fn setup() -> (RocksStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        seed::seed_directory(&store).unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn login_persists_session() {
        let (store, _dir) = setup();

        let session = login(&store, "commissioner@hydraa.gov.in", "any", Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(session.role(), Role::Hod);
        assert_eq!(session.user().handle, "Michael/DCP");

        let restored = restore(&store).unwrap().unwrap();
        assert_eq!(restored, session);
    }

    #[tokio::test]
    async fn unknown_email_rejected() {
        let (store, _dir) = setup();

        let result = login(&store, "nobody@hydraa.gov.in", "secret", Duration::ZERO).await;
        assert!(matches!(result, Err(WorkflowError::InvalidCredentials)));
        assert!(store.load_session().unwrap().is_none());
    }

    #[tokio::test]
    async fn blank_credentials_rejected() {
        let (store, _dir) = setup();

        let result = login(&store, "admin@hydraa.gov.in", "", Duration::ZERO).await;
        assert!(matches!(
            result,
            Err(WorkflowError::Validation {
                field: "password",
                ..
            })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn login_waits_for_delay() {
        let store = MemoryStore::new();
        seed::seed_directory(&store).unwrap();

        let started = tokio::time::Instant::now();
        login(&store, "reception@hydraa.gov.in", "x", Duration::from_millis(1000))
            .await
            .unwrap();
        assert!(started.elapsed() >= Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn logout_clears_slot() {
        let (store, _dir) = setup();
        login(&store, "admin@hydraa.gov.in", "x", Duration::ZERO)
            .await
            .unwrap();

        logout(&store).unwrap();
        assert!(restore(&store).unwrap().is_none());
        assert!(matches!(
            require(restore(&store).unwrap()),
            Err(WorkflowError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn restore_follows_directory() {
        let (store, _dir) = setup();
        let session = login(&store, "officer@hydraa.gov.in", "x", Duration::ZERO)
            .await
            .unwrap();

        // Edited since login
        let mut edited = session.user().clone();
        edited.phone = "9000000000".to_string();
        store.put_user(&edited).unwrap();
        let restored = restore(&store).unwrap().unwrap();
        assert_eq!(restored.user().phone, "9000000000");

        // Deleted since login
        store.delete_user(session.user_id()).unwrap();
        assert!(restore(&store).unwrap().is_none());
        assert!(store.load_session().unwrap().is_none());
    }
}
