//! In-memory storage implementation.
//!
//! `MemoryStore` keeps every record in ordered maps behind a single mutex. It
//! has the same uniqueness and compare-and-swap semantics as `RocksStore` and
//! is used by tests and short-lived tooling.

use std::collections::{BTreeMap, HashMap};

use hydraa_core::{PetitionId, PetitionNumber, UserId};
use parking_lot::Mutex;

use crate::error::{Result, StoreError};
use crate::keys;
use crate::types::{EoFeedback, HodFeedback, Petition, PetitionStatus, User};
use crate::{check_version, next_version, Store};

#[derive(Default)]
struct Inner {
    users: BTreeMap<UserId, User>,
    users_by_email: HashMap<Vec<u8>, UserId>,
    petitions: HashMap<PetitionId, Petition>,
    petitions_by_number: HashMap<PetitionNumber, PetitionId>,
    eo_feedback: HashMap<PetitionId, Vec<EoFeedback>>,
    hod_feedback: HashMap<PetitionId, HodFeedback>,
    sequences: HashMap<u16, u32>,
    session: Option<User>,
}

impl Inner {
    fn cas(&mut self, petition: &Petition) -> Result<Petition> {
        let stored = self
            .petitions
            .get(&petition.petition_id)
            .ok_or(StoreError::NotFound)?;
        check_version(petition.version, stored.version)?;

        let committed = next_version(petition);
        self.petitions
            .insert(committed.petition_id, committed.clone());
        Ok(committed)
    }
}

/// In-memory storage implementation.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn put_user(&self, user: &User) -> Result<()> {
        let mut inner = self.inner.lock();
        let email_key = keys::email_key(&user.email);

        if let Some(owner) = inner.users_by_email.get(&email_key) {
            if owner != &user.user_id {
                return Err(StoreError::Duplicate(format!("email {}", user.email)));
            }
        }

        if let Some(old) = inner.users.get(&user.user_id).map(|u| keys::email_key(&u.email)) {
            inner.users_by_email.remove(&old);
        }
        inner.users_by_email.insert(email_key, user.user_id.clone());
        inner.users.insert(user.user_id.clone(), user.clone());
        Ok(())
    }

    fn get_user(&self, user_id: &UserId) -> Result<Option<User>> {
        Ok(self.inner.lock().users.get(user_id).cloned())
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let inner = self.inner.lock();
        Ok(inner
            .users_by_email
            .get(&keys::email_key(email))
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    fn delete_user(&self, user_id: &UserId) -> Result<()> {
        let mut inner = self.inner.lock();
        let user = inner.users.remove(user_id).ok_or(StoreError::NotFound)?;
        inner.users_by_email.remove(&keys::email_key(&user.email));
        Ok(())
    }

    fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.inner.lock().users.values().cloned().collect())
    }

    fn insert_petition(&self, petition: &Petition) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.petitions.contains_key(&petition.petition_id) {
            return Err(StoreError::Duplicate(format!(
                "petition {}",
                petition.petition_id
            )));
        }
        if inner
            .petitions_by_number
            .contains_key(&petition.petition_number)
        {
            return Err(StoreError::Duplicate(format!(
                "petition number {}",
                petition.petition_number
            )));
        }

        inner
            .petitions_by_number
            .insert(petition.petition_number, petition.petition_id);
        inner
            .petitions
            .insert(petition.petition_id, petition.clone());
        Ok(())
    }

    fn get_petition(&self, petition_id: &PetitionId) -> Result<Option<Petition>> {
        Ok(self.inner.lock().petitions.get(petition_id).cloned())
    }

    fn get_petition_by_number(&self, number: &PetitionNumber) -> Result<Option<Petition>> {
        let inner = self.inner.lock();
        Ok(inner
            .petitions_by_number
            .get(number)
            .and_then(|id| inner.petitions.get(id))
            .cloned())
    }

    fn list_petitions(&self) -> Result<Vec<Petition>> {
        Ok(self.inner.lock().petitions.values().cloned().collect())
    }

    fn list_petitions_by_status(&self, status: PetitionStatus) -> Result<Vec<Petition>> {
        Ok(self
            .inner
            .lock()
            .petitions
            .values()
            .filter(|p| p.status == status)
            .cloned()
            .collect())
    }

    fn update_petition(&self, petition: &Petition) -> Result<Petition> {
        self.inner.lock().cas(petition)
    }

    fn commit_feedback(&self, petition: &Petition, feedback: &EoFeedback) -> Result<Petition> {
        let mut inner = self.inner.lock();
        let committed = inner.cas(petition)?;
        inner
            .eo_feedback
            .entry(feedback.petition_id)
            .or_default()
            .push(feedback.clone());
        Ok(committed)
    }

    fn commit_decision(&self, petition: &Petition, decision: &HodFeedback) -> Result<Petition> {
        let mut inner = self.inner.lock();
        if inner.hod_feedback.contains_key(&decision.petition_id) {
            return Err(StoreError::Duplicate(format!(
                "decision for petition {}",
                decision.petition_id
            )));
        }
        let committed = inner.cas(petition)?;
        inner
            .hod_feedback
            .insert(decision.petition_id, decision.clone());
        Ok(committed)
    }

    fn list_eo_feedback(&self, petition_id: &PetitionId) -> Result<Vec<EoFeedback>> {
        Ok(self
            .inner
            .lock()
            .eo_feedback
            .get(petition_id)
            .cloned()
            .unwrap_or_default())
    }

    fn get_hod_feedback(&self, petition_id: &PetitionId) -> Result<Option<HodFeedback>> {
        Ok(self.inner.lock().hod_feedback.get(petition_id).cloned())
    }

    fn next_petition_sequence(&self, year: u16) -> Result<u32> {
        let mut inner = self.inner.lock();
        let counter = inner.sequences.entry(year).or_insert(0);
        *counter = counter
            .checked_add(1)
            .ok_or_else(|| StoreError::Database("petition sequence overflow".into()))?;
        Ok(*counter)
    }

    fn save_session(&self, user: &User) -> Result<()> {
        self.inner.lock().session = Some(user.clone());
        Ok(())
    }

    fn load_session(&self) -> Result<Option<User>> {
        Ok(self.inner.lock().session.clone())
    }

    fn clear_session(&self) -> Result<()> {
        self.inner.lock().session = None;
        Ok(())
    }
}
