//! In-memory repositories.

use super::{
    insert_record, modify_record, remove_record, replace_record, PatientRepository, Record,
    RecordRepository, Visibility, WriteGuard,
};
use crate::error::CoreResult;
use crate::models::Patient;
use clinic_uuid::RecordId;
use std::sync::RwLock;

/// Vector-backed record store.
#[derive(Debug)]
pub struct InMemoryRepository<T> {
    records: RwLock<Vec<T>>,
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Record> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `records`; later duplicates of an id are dropped.
    pub fn with_records(records: impl IntoIterator<Item = T>) -> Self {
        let mut unique: Vec<T> = Vec::new();
        for record in records {
            if insert_record(&mut unique, record, &|_, _| Ok(())).is_err() {
                tracing::warn!("dropping duplicate {} in seed data", T::KIND);
            }
        }
        Self {
            records: RwLock::new(unique),
        }
    }
}

impl<T: Record> RecordRepository<T> for InMemoryRepository<T> {
    fn list(&self) -> CoreResult<Vec<T>> {
        Ok(self.records.read()?.clone())
    }

    fn get(&self, id: RecordId) -> CoreResult<Option<T>> {
        Ok(self
            .records
            .read()?
            .iter()
            .find(|r| r.record_id() == id)
            .cloned())
    }

    fn insert_with(&self, record: T, guard: WriteGuard<'_, T>) -> CoreResult<()> {
        insert_record(&mut *self.records.write()?, record, guard)
    }

    fn replace_with(&self, record: T, guard: WriteGuard<'_, T>) -> CoreResult<T> {
        replace_record(&mut *self.records.write()?, record, guard)
    }

    fn modify_where(
        &self,
        id: RecordId,
        visible: Visibility<'_, T>,
        change: &mut dyn FnMut(&mut T),
    ) -> CoreResult<T> {
        modify_record(&mut *self.records.write()?, id, visible, change)
    }

    fn remove_where(&self, id: RecordId, visible: Visibility<'_, T>) -> CoreResult<T> {
        remove_record(&mut *self.records.write()?, id, visible)
    }
}

/// Fixed roster held in memory.
#[derive(Clone, Debug, Default)]
pub struct InMemoryPatients {
    patients: Vec<Patient>,
}

impl InMemoryPatients {
    pub fn new(patients: Vec<Patient>) -> Self {
        Self { patients }
    }
}

impl PatientRepository for InMemoryPatients {
    fn roster(&self) -> CoreResult<Vec<Patient>> {
        Ok(self.patients.clone())
    }

    fn find(&self, patient_id: &str) -> CoreResult<Option<Patient>> {
        Ok(self.patients.iter().find(|p| p.id == patient_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::models::{BillingCategory, BillingItem, Money};
    use chrono::NaiveDate;

    fn item(description: &str) -> BillingItem {
        BillingItem {
            id: RecordId::new(),
            patient_id: "P1001".into(),
            date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            description: description.into(),
            amount: Money::from_cents(1000),
            paid: false,
            category: BillingCategory::Other,
            notes: String::new(),
        }
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let repo: InMemoryRepository<BillingItem> = InMemoryRepository::new();
        let first = item("first");
        repo.insert(first.clone()).expect("first insert");

        let mut clash = item("second");
        clash.id = first.id;
        let err = repo.insert(clash).expect_err("duplicate id");
        assert!(matches!(err, CoreError::DuplicateRecord { .. }));
        assert_eq!(repo.list().unwrap(), vec![first]);
    }

    #[test]
    fn test_replace_unknown_id_leaves_store_unchanged() {
        let repo = InMemoryRepository::with_records([item("a"), item("b")]);
        let before = repo.list().unwrap();

        let err = repo.replace(item("stranger")).expect_err("unknown id");
        assert!(err.is_not_found());
        assert_eq!(repo.list().unwrap(), before);
    }

    #[test]
    fn test_modify_and_remove_target_one_record() {
        let a = item("a");
        let b = item("b");
        let repo = InMemoryRepository::with_records([a.clone(), b.clone()]);

        let updated = repo
            .modify(b.id, &mut |r: &mut BillingItem| r.paid = true)
            .expect("modify b");
        assert!(updated.paid);
        assert_eq!(repo.get(a.id).unwrap(), Some(a.clone()));

        let removed = repo.remove(a.id).expect("remove a");
        assert_eq!(removed, a);
        assert_eq!(repo.list().unwrap(), vec![updated]);
        assert!(repo.remove(a.id).expect_err("already gone").is_not_found());
    }

    #[test]
    fn test_hidden_record_is_not_found() {
        let mine = item("mine");
        let mut theirs = item("theirs");
        theirs.patient_id = "P1002".into();
        let repo = InMemoryRepository::with_records([mine.clone(), theirs.clone()]);
        let only_p1001 = |r: &BillingItem| r.patient_id == "P1001";

        let err = repo
            .modify_where(theirs.id, &only_p1001, &mut |r: &mut BillingItem| r.paid = true)
            .expect_err("hidden record");
        assert!(err.is_not_found());
        assert!(repo
            .remove_where(theirs.id, &only_p1001)
            .expect_err("hidden record")
            .is_not_found());
        assert_eq!(repo.list().unwrap(), vec![mine.clone(), theirs]);

        assert_eq!(repo.remove_where(mine.id, &only_p1001).expect("visible"), mine);
    }

    #[test]
    fn test_guard_runs_inside_insert() {
        let repo = InMemoryRepository::with_records([item("a")]);
        let err = repo
            .insert_with(item("b"), &|existing, _| {
                assert_eq!(existing.len(), 1);
                Err(CoreError::InvalidInput("blocked".into()))
            })
            .expect_err("guard rejects");
        assert!(matches!(err, CoreError::InvalidInput(_)));
        assert_eq!(repo.list().unwrap().len(), 1);
    }
}
