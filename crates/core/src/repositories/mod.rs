//! Repository interfaces and storage backends.
//!
//! Services are written against the traits in this module:
//!
//! - [`RecordRepository`] for id-keyed, insertion-ordered collections (appointments and
//!   billing items), aliased as [`AppointmentRepository`] and [`BillingRepository`]
//! - [`PatientRepository`] for the read-only roster
//!
//! Two backends are provided: [`memory`] for tests and demo sessions, and [`yaml`] for a data
//! directory of YAML files. Both take `&self` and keep their collection behind an
//! `RwLock`, so every read-modify-write runs under a single write lock.

pub mod memory;
pub mod yaml;

use crate::error::{CoreError, CoreResult};
use crate::models::{Appointment, BillingItem, Patient};
use clinic_uuid::RecordId;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A storable record with a stable identifier.
pub trait Record: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Human-readable record kind used in errors and log lines.
    const KIND: &'static str;

    fn record_id(&self) -> RecordId;
}

impl Record for Appointment {
    const KIND: &'static str = "appointment";

    fn record_id(&self) -> RecordId {
        self.id
    }
}

impl Record for BillingItem {
    const KIND: &'static str = "billing item";

    fn record_id(&self) -> RecordId {
        self.id
    }
}

/// Check run against the current records while the write lock is held.
///
/// Receives the stored records and the candidate being written.
pub type WriteGuard<'a, T> = &'a dyn Fn(&[T], &T) -> CoreResult<()>;

/// Which stored records a caller may address. Records it rejects are reported as not found.
pub type Visibility<'a, T> = &'a dyn Fn(&T) -> bool;

/// Id-keyed collection preserving insertion order.
pub trait RecordRepository<T: Record>: Send + Sync {
    /// Snapshot of every record in insertion order.
    fn list(&self) -> CoreResult<Vec<T>>;

    fn get(&self, id: RecordId) -> CoreResult<Option<T>> {
        Ok(self.list()?.into_iter().find(|r| r.record_id() == id))
    }

    /// Append `record` if `guard` accepts it.
    ///
    /// # Errors
    ///
    /// `CoreError::DuplicateRecord` if the id is already stored, or whatever `guard` returns.
    fn insert_with(&self, record: T, guard: WriteGuard<'_, T>) -> CoreResult<()>;

    fn insert(&self, record: T) -> CoreResult<()> {
        self.insert_with(record, &|_, _| Ok(()))
    }

    /// Replace the stored record with the same id, returning the previous version.
    ///
    /// # Errors
    ///
    /// `CoreError::NotFound` if no record has that id; the collection is left unchanged.
    fn replace_with(&self, record: T, guard: WriteGuard<'_, T>) -> CoreResult<T>;

    fn replace(&self, record: T) -> CoreResult<T> {
        self.replace_with(record, &|_, _| Ok(()))
    }

    /// Apply `change` to the record with `id` if `visible` accepts it, returning the updated
    /// record.
    fn modify_where(
        &self,
        id: RecordId,
        visible: Visibility<'_, T>,
        change: &mut dyn FnMut(&mut T),
    ) -> CoreResult<T>;

    fn modify(&self, id: RecordId, change: &mut dyn FnMut(&mut T)) -> CoreResult<T> {
        self.modify_where(id, &|_| true, change)
    }

    /// Remove and return the record with `id` if `visible` accepts it.
    fn remove_where(&self, id: RecordId, visible: Visibility<'_, T>) -> CoreResult<T>;

    fn remove(&self, id: RecordId) -> CoreResult<T> {
        self.remove_where(id, &|_| true)
    }
}

pub type AppointmentRepository = dyn RecordRepository<Appointment>;
pub type BillingRepository = dyn RecordRepository<BillingItem>;

/// Read-only patient roster in its natural order.
pub trait PatientRepository: Send + Sync {
    fn roster(&self) -> CoreResult<Vec<Patient>>;

    fn find(&self, patient_id: &str) -> CoreResult<Option<Patient>> {
        Ok(self.roster()?.into_iter().find(|p| p.id == patient_id))
    }
}

// ============================================================================
// Collection operations shared by the backends. Callers hold the write lock.
// ============================================================================

pub(crate) fn insert_record<T: Record>(
    records: &mut Vec<T>,
    record: T,
    guard: WriteGuard<'_, T>,
) -> CoreResult<()> {
    let id = record.record_id();
    if records.iter().any(|r| r.record_id() == id) {
        return Err(CoreError::DuplicateRecord {
            kind: T::KIND,
            id: id.to_string(),
        });
    }
    guard(records, &record)?;
    records.push(record);
    Ok(())
}

pub(crate) fn replace_record<T: Record>(
    records: &mut [T],
    record: T,
    guard: WriteGuard<'_, T>,
) -> CoreResult<T> {
    let id = record.record_id();
    let index = position(records, id, &|_| true)?;
    guard(records, &record)?;
    Ok(std::mem::replace(&mut records[index], record))
}

pub(crate) fn modify_record<T: Record>(
    records: &mut [T],
    id: RecordId,
    visible: Visibility<'_, T>,
    change: &mut dyn FnMut(&mut T),
) -> CoreResult<T> {
    let index = position(records, id, visible)?;
    let record = &mut records[index];
    change(record);
    Ok(record.clone())
}

pub(crate) fn remove_record<T: Record>(
    records: &mut Vec<T>,
    id: RecordId,
    visible: Visibility<'_, T>,
) -> CoreResult<T> {
    let index = position(records, id, visible)?;
    Ok(records.remove(index))
}

fn position<T: Record>(
    records: &[T],
    id: RecordId,
    visible: Visibility<'_, T>,
) -> CoreResult<usize> {
    records
        .iter()
        .position(|r| r.record_id() == id && visible(r))
        .ok_or_else(|| CoreError::not_found(T::KIND, id))
}
