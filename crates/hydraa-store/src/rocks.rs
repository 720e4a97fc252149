//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store` trait.

use std::path::Path;
use std::sync::Arc;

use hydraa_core::{PetitionId, PetitionNumber, UserId};
use parking_lot::Mutex;
use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, IteratorMode, MultiThreaded,
    Options, WriteBatch,
};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf, SESSION_SLOT};
use crate::types::{EoFeedback, HodFeedback, Petition, PetitionStatus, User};
use crate::{check_version, next_version, Store};

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    /// Serializes read-check-write sections (unique indexes, CAS, counters).
    write_lock: Mutex<()>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let path = path.as_ref();
        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::debug!(path = %path.display(), "Opened petition database");

        Ok(Self {
            db: Arc::new(db),
            write_lock: Mutex::new(()),
        })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Read and decode a single value.
    fn get_value<T: serde::de::DeserializeOwned>(
        &self,
        cf_name: &str,
        key: &[u8],
    ) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    /// Decode every value in a column family.
    fn scan_values<T: serde::de::DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let mut values = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (_, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            values.push(Self::deserialize(&value)?);
        }
        Ok(values)
    }

    fn write(&self, batch: WriteBatch) -> Result<()> {
        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    /// Stage a compare-and-swap of a petition into `batch`.
    ///
    /// Must be called with `write_lock` held.
    fn stage_petition_cas(&self, batch: &mut WriteBatch, petition: &Petition) -> Result<Petition> {
        let cf_petitions = self.cf(cf::PETITIONS)?;
        let cf_by_status = self.cf(cf::PETITIONS_BY_STATUS)?;

        let stored: Petition = self
            .get_value(cf::PETITIONS, &keys::petition_key(&petition.petition_id))?
            .ok_or(StoreError::NotFound)?;
        if let Err(e) = check_version(petition.version, stored.version) {
            tracing::debug!(
                petition_id = %petition.petition_id,
                expected = petition.version,
                found = stored.version,
                "Rejected stale petition write"
            );
            return Err(e);
        }

        let committed = next_version(petition);
        batch.put_cf(
            &cf_petitions,
            keys::petition_key(&committed.petition_id),
            Self::serialize(&committed)?,
        );

        if stored.status != committed.status {
            batch.delete_cf(
                &cf_by_status,
                keys::status_petition_key(stored.status.as_u8(), &stored.petition_id),
            );
        }
        batch.put_cf(
            &cf_by_status,
            keys::status_petition_key(committed.status.as_u8(), &committed.petition_id),
            [],
        );

        Ok(committed)
    }
}

impl Store for RocksStore {
    // =========================================================================
    // User Operations
    // =========================================================================

    fn put_user(&self, user: &User) -> Result<()> {
        let cf_users = self.cf(cf::USERS)?;
        let cf_by_email = self.cf(cf::USERS_BY_EMAIL)?;

        let user_key = keys::user_key(&user.user_id);
        let email_key = keys::email_key(&user.email);

        let _guard = self.write_lock.lock();

        // Email must not belong to anyone else
        if let Some(owner) = self
            .db
            .get_cf(&cf_by_email, &email_key)
            .map_err(|e| StoreError::Database(e.to_string()))?
        {
            if owner.as_slice() != user_key.as_slice() {
                return Err(StoreError::Duplicate(format!("email {}", user.email)));
            }
        }

        let old_email = self
            .get_value::<User>(cf::USERS, &user_key)?
            .map(|u| keys::email_key(&u.email));

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_users, &user_key, Self::serialize(user)?);
        if let Some(old) = old_email {
            if old != email_key {
                batch.delete_cf(&cf_by_email, &old);
            }
        }
        batch.put_cf(&cf_by_email, &email_key, &user_key);

        self.write(batch)
    }

    fn get_user(&self, user_id: &UserId) -> Result<Option<User>> {
        self.get_value(cf::USERS, &keys::user_key(user_id))
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let cf_by_email = self.cf(cf::USERS_BY_EMAIL)?;
        let Some(user_key) = self
            .db
            .get_cf(&cf_by_email, keys::email_key(email))
            .map_err(|e| StoreError::Database(e.to_string()))?
        else {
            return Ok(None);
        };
        self.get_value(cf::USERS, &user_key)
    }

    fn delete_user(&self, user_id: &UserId) -> Result<()> {
        let cf_users = self.cf(cf::USERS)?;
        let cf_by_email = self.cf(cf::USERS_BY_EMAIL)?;

        let _guard = self.write_lock.lock();
        let user = self.get_user(user_id)?.ok_or(StoreError::NotFound)?;

        let mut batch = WriteBatch::default();
        batch.delete_cf(&cf_users, keys::user_key(user_id));
        batch.delete_cf(&cf_by_email, keys::email_key(&user.email));

        self.write(batch)
    }

    fn list_users(&self) -> Result<Vec<User>> {
        self.scan_values(cf::USERS)
    }

    // =========================================================================
    // Petition Operations
    // =========================================================================

    fn insert_petition(&self, petition: &Petition) -> Result<()> {
        let cf_petitions = self.cf(cf::PETITIONS)?;
        let cf_by_status = self.cf(cf::PETITIONS_BY_STATUS)?;
        let cf_by_number = self.cf(cf::PETITIONS_BY_NUMBER)?;

        let petition_key = keys::petition_key(&petition.petition_id);
        let number_key = keys::petition_number_key(&petition.petition_number);

        let _guard = self.write_lock.lock();

        let exists = |cf: &Arc<BoundColumnFamily<'_>>, key: &[u8]| -> Result<bool> {
            self.db
                .get_pinned_cf(cf, key)
                .map(|v| v.is_some())
                .map_err(|e| StoreError::Database(e.to_string()))
        };
        if exists(&cf_petitions, &petition_key)? {
            return Err(StoreError::Duplicate(format!(
                "petition {}",
                petition.petition_id
            )));
        }
        if exists(&cf_by_number, &number_key)? {
            return Err(StoreError::Duplicate(format!(
                "petition number {}",
                petition.petition_number
            )));
        }

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_petitions, &petition_key, Self::serialize(petition)?);
        batch.put_cf(
            &cf_by_status,
            keys::status_petition_key(petition.status.as_u8(), &petition.petition_id),
            [],
        );
        batch.put_cf(&cf_by_number, &number_key, &petition_key);

        self.write(batch)
    }

    fn get_petition(&self, petition_id: &PetitionId) -> Result<Option<Petition>> {
        self.get_value(cf::PETITIONS, &keys::petition_key(petition_id))
    }

    fn get_petition_by_number(&self, number: &PetitionNumber) -> Result<Option<Petition>> {
        let cf_by_number = self.cf(cf::PETITIONS_BY_NUMBER)?;
        let Some(value) = self
            .db
            .get_cf(&cf_by_number, keys::petition_number_key(number))
            .map_err(|e| StoreError::Database(e.to_string()))?
        else {
            return Ok(None);
        };
        let Some(petition_id) = keys::petition_id_from_value(&value) else {
            tracing::warn!(petition_number = %number, "Corrupt petition number index entry");
            return Err(StoreError::Database("corrupt petition number index".into()));
        };
        self.get_petition(&petition_id)
    }

    fn list_petitions(&self) -> Result<Vec<Petition>> {
        self.scan_values(cf::PETITIONS)
    }

    fn list_petitions_by_status(&self, status: PetitionStatus) -> Result<Vec<Petition>> {
        let cf_by_status = self.cf(cf::PETITIONS_BY_STATUS)?;
        let prefix = keys::status_prefix(status.as_u8());

        let mut petitions = Vec::new();
        let iter = self.db.iterator_cf(
            &cf_by_status,
            IteratorMode::From(&prefix, rocksdb::Direction::Forward),
        );

        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;

            // Stop if we're past the prefix
            if !key.starts_with(&prefix) {
                break;
            }

            let Some(petition_id) = keys::petition_id_from_status_key(&key) else {
                tracing::warn!(status = %status, "Corrupt petition status index entry");
                return Err(StoreError::Database("corrupt status index".into()));
            };
            match self.get_petition(&petition_id)? {
                Some(petition) => petitions.push(petition),
                None => tracing::warn!(
                    petition_id = %petition_id,
                    status = %status,
                    "Status index points at a missing petition"
                ),
            }
        }

        Ok(petitions)
    }

    fn update_petition(&self, petition: &Petition) -> Result<Petition> {
        let _guard = self.write_lock.lock();

        let mut batch = WriteBatch::default();
        let committed = self.stage_petition_cas(&mut batch, petition)?;
        self.write(batch)?;

        Ok(committed)
    }

    fn commit_feedback(&self, petition: &Petition, feedback: &EoFeedback) -> Result<Petition> {
        let cf_feedback = self.cf(cf::EO_FEEDBACK)?;
        let _guard = self.write_lock.lock();

        let mut batch = WriteBatch::default();
        let committed = self.stage_petition_cas(&mut batch, petition)?;
        batch.put_cf(
            &cf_feedback,
            keys::eo_feedback_key(
                &feedback.petition_id,
                feedback.submitted_at,
                &feedback.feedback_id,
            ),
            Self::serialize(feedback)?,
        );
        self.write(batch)?;

        Ok(committed)
    }

    fn commit_decision(&self, petition: &Petition, decision: &HodFeedback) -> Result<Petition> {
        let cf_decisions = self.cf(cf::HOD_FEEDBACK)?;
        let decision_key = keys::petition_key(&decision.petition_id);
        let _guard = self.write_lock.lock();

        if self
            .db
            .get_pinned_cf(&cf_decisions, &decision_key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .is_some()
        {
            return Err(StoreError::Duplicate(format!(
                "decision for petition {}",
                decision.petition_id
            )));
        }

        let mut batch = WriteBatch::default();
        let committed = self.stage_petition_cas(&mut batch, petition)?;
        batch.put_cf(&cf_decisions, &decision_key, Self::serialize(decision)?);
        self.write(batch)?;

        Ok(committed)
    }

    fn list_eo_feedback(&self, petition_id: &PetitionId) -> Result<Vec<EoFeedback>> {
        let cf = self.cf(cf::EO_FEEDBACK)?;
        let prefix = keys::petition_prefix(petition_id);

        let mut reports = Vec::new();
        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(&prefix, rocksdb::Direction::Forward));

        for item in iter {
            let (key, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(&prefix) {
                break;
            }
            reports.push(Self::deserialize(&value)?);
        }

        Ok(reports)
    }

    fn get_hod_feedback(&self, petition_id: &PetitionId) -> Result<Option<HodFeedback>> {
        self.get_value(cf::HOD_FEEDBACK, &keys::petition_key(petition_id))
    }

    fn next_petition_sequence(&self, year: u16) -> Result<u32> {
        let cf = self.cf(cf::COUNTERS)?;
        let key = keys::petition_sequence_key(year);
        let _guard = self.write_lock.lock();

        let current: u32 = self.get_value(cf::COUNTERS, &key)?.unwrap_or(0);
        let next = current
            .checked_add(1)
            .ok_or_else(|| StoreError::Database("petition sequence overflow".into()))?;

        self.db
            .put_cf(&cf, &key, Self::serialize(&next)?)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(next)
    }

    // =========================================================================
    // Session Slot
    // =========================================================================

    fn save_session(&self, user: &User) -> Result<()> {
        let cf = self.cf(cf::SESSION)?;
        self.db
            .put_cf(&cf, SESSION_SLOT, Self::serialize(user)?)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn load_session(&self) -> Result<Option<User>> {
        self.get_value(cf::SESSION, SESSION_SLOT.as_bytes())
    }

    fn clear_session(&self) -> Result<()> {
        let cf = self.cf(cf::SESSION)?;
        self.db
            .delete_cf(&cf, SESSION_SLOT)
            .map_err(|e| StoreError::Database(e.to_string()))
    }
}
