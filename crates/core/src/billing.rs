//! Billing ledger.
//!
//! Queries are snapshots in insertion order. Money is summed in whole cents, so totals over
//! patient-scoped subsets always add up to the ledger-wide total.

use crate::models::{BillingItem, BillingSummary, Money};
use crate::repositories::BillingRepository;
use crate::{CoreError, CoreResult};
use chrono::{Local, Months, NaiveDate};
use clinic_uuid::RecordId;
use std::sync::Arc;

#[derive(Clone)]
pub struct BillingLedger {
    items: Arc<BillingRepository>,
}

impl BillingLedger {
    pub fn new(items: Arc<BillingRepository>) -> Self {
        Self { items }
    }

    pub fn all_items(&self) -> CoreResult<Vec<BillingItem>> {
        self.items.list()
    }

    pub fn items_for_patient(&self, patient_id: &str) -> CoreResult<Vec<BillingItem>> {
        let mut items = self.items.list()?;
        items.retain(|i| i.patient_id == patient_id);
        Ok(items)
    }

    pub fn get(&self, id: RecordId) -> CoreResult<BillingItem> {
        self.items
            .get(id)?
            .ok_or_else(|| CoreError::not_found("billing item", id))
    }

    pub fn add_item(&self, item: BillingItem) -> CoreResult<()> {
        let id = item.id;
        self.items.insert(item)?;
        tracing::info!("added billing item {}", id);
        Ok(())
    }

    /// Replace the item with the same id; returns the previous version.
    pub fn update_item(&self, item: BillingItem) -> CoreResult<BillingItem> {
        let id = item.id;
        let result = self.items.replace(item);
        log_mutation("updated", id, &result);
        result
    }

    /// Remove the item and return it.
    pub fn delete_item(&self, id: RecordId) -> CoreResult<BillingItem> {
        let result = self.items.remove(id);
        log_mutation("deleted", id, &result);
        result
    }

    /// Set the paid flag in one locked step and return the updated item.
    ///
    /// # Errors
    ///
    /// `CoreError::NotFound` for an unknown id; the ledger is left unchanged.
    pub fn mark_as_paid(&self, id: RecordId) -> CoreResult<BillingItem> {
        let result = self.items.modify(id, &mut |item: &mut BillingItem| item.paid = true);
        log_mutation("marked paid", id, &result);
        result
    }

    /// Sum of unpaid amounts, for one patient or the whole ledger.
    pub fn outstanding_balance(&self, patient_id: Option<&str>) -> CoreResult<Money> {
        Ok(self
            .scoped(patient_id)?
            .iter()
            .filter(|i| !i.paid)
            .map(|i| i.amount)
            .sum())
    }

    /// Paid amounts dated within the last calendar month of the local date.
    pub fn paid_amount_in_last_month(&self, patient_id: Option<&str>) -> CoreResult<Money> {
        self.paid_amount_in_month_before(Local::now().date_naive(), patient_id)
    }

    /// Sum of paid amounts dated strictly after `today` minus one calendar month.
    ///
    /// Month arithmetic clamps to the end of the shorter month, so on March 31 the cutoff is
    /// the last day of February.
    pub fn paid_amount_in_month_before(
        &self,
        today: NaiveDate,
        patient_id: Option<&str>,
    ) -> CoreResult<Money> {
        let cutoff = one_month_before(today);
        Ok(self
            .scoped(patient_id)?
            .iter()
            .filter(|i| i.paid && i.date > cutoff)
            .map(|i| i.amount)
            .sum())
    }

    pub fn summary(&self, patient_id: Option<&str>) -> CoreResult<BillingSummary> {
        self.summary_as_of(Local::now().date_naive(), patient_id)
    }

    pub fn summary_as_of(
        &self,
        today: NaiveDate,
        patient_id: Option<&str>,
    ) -> CoreResult<BillingSummary> {
        Ok(BillingSummary {
            outstanding: self.outstanding_balance(patient_id)?,
            paid_last_month: self.paid_amount_in_month_before(today, patient_id)?,
        })
    }

    fn scoped(&self, patient_id: Option<&str>) -> CoreResult<Vec<BillingItem>> {
        match patient_id {
            Some(patient_id) => self.items_for_patient(patient_id),
            None => self.all_items(),
        }
    }
}

fn one_month_before(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_months(Months::new(1))
        .unwrap_or(NaiveDate::MIN)
}

fn log_mutation<T>(action: &str, id: RecordId, result: &CoreResult<T>) {
    match result {
        Ok(_) => tracing::info!("{} billing item {}", action, id),
        Err(e) if e.is_not_found() => tracing::warn!("{} billing item {}: {}", action, id, e),
        Err(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BillingCategory;
    use crate::repositories::memory::InMemoryRepository;
    use std::thread;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn item(patient_id: &str, cents: u64, paid: bool, date: NaiveDate) -> BillingItem {
        BillingItem {
            id: RecordId::new(),
            patient_id: patient_id.into(),
            date,
            description: "Visit".into(),
            amount: Money::from_cents(cents),
            paid,
            category: BillingCategory::Consultation,
            notes: String::new(),
        }
    }

    fn ledger(seed: Vec<BillingItem>) -> BillingLedger {
        BillingLedger::new(Arc::new(InMemoryRepository::with_records(seed)))
    }

    #[test]
    fn test_outstanding_and_paid_last_month() {
        let ledger = ledger(vec![]);
        ledger.add_item(item("P1001", 15000, false, today())).unwrap();
        ledger.add_item(item("P1001", 7500, true, today())).unwrap();

        assert_eq!(
            ledger.outstanding_balance(Some("P1001")).unwrap(),
            Money::from_cents(15000)
        );
        assert_eq!(
            ledger
                .paid_amount_in_month_before(today(), Some("P1001"))
                .unwrap(),
            Money::from_cents(7500)
        );
    }

    #[test]
    fn test_empty_ledger_totals_are_zero() {
        let ledger = ledger(vec![]);
        assert_eq!(ledger.outstanding_balance(None).unwrap(), Money::ZERO);
        assert_eq!(ledger.outstanding_balance(Some("P404")).unwrap(), Money::ZERO);
        assert_eq!(
            ledger.paid_amount_in_month_before(today(), None).unwrap(),
            Money::ZERO
        );
    }

    #[test]
    fn test_paid_window_is_strictly_after_cutoff() {
        let cutoff = NaiveDate::from_ymd_opt(2026, 9, 17).unwrap();
        let ledger = ledger(vec![
            item("P1001", 100, true, cutoff),
            item("P1001", 200, true, cutoff.succ_opt().unwrap()),
            item("P1001", 400, false, today()),
        ]);
        assert_eq!(
            ledger.paid_amount_in_month_before(today(), None).unwrap(),
            Money::from_cents(200)
        );
    }

    #[test]
    fn test_month_arithmetic_clamps() {
        let march_31 = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();
        assert_eq!(
            one_month_before(march_31),
            NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()
        );
    }

    #[test]
    fn test_totals_are_additive_over_patients() {
        let ledger = ledger(vec![
            item("P1001", 15000, false, today()),
            item("P1001", 7500, true, today()),
            item("P1003", 12000, false, today()),
            item("P1003", 4550, true, today()),
            item("P1005", 20000, false, today()),
        ]);

        let patients = ["P1001", "P1003", "P1005"];
        let outstanding: Money = patients
            .into_iter()
            .map(|p| ledger.outstanding_balance(Some(p)).unwrap())
            .sum();
        let paid: Money = patients
            .into_iter()
            .map(|p| ledger.paid_amount_in_month_before(today(), Some(p)).unwrap())
            .sum();

        assert_eq!(outstanding, ledger.outstanding_balance(None).unwrap());
        assert_eq!(paid, ledger.paid_amount_in_month_before(today(), None).unwrap());
        assert_eq!(outstanding, Money::from_cents(47000));
        assert_eq!(paid, Money::from_cents(12050));
    }

    #[test]
    fn test_mark_as_paid_unknown_id_leaves_ledger_unchanged() {
        let ledger = ledger(vec![item("P1001", 15000, false, today())]);
        let before = ledger.all_items().unwrap();

        let err = ledger.mark_as_paid(RecordId::new()).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(ledger.all_items().unwrap(), before);
    }

    #[test]
    fn test_mark_as_paid_changes_only_target() {
        let a = item("P1001", 15000, false, today());
        let b = item("P1001", 5000, false, today());
        let ledger = ledger(vec![a.clone(), b.clone()]);

        let paid = ledger.mark_as_paid(a.id).unwrap();
        assert!(paid.paid);
        assert_eq!(ledger.get(b.id).unwrap(), b);

        let summary = ledger.summary_as_of(today(), Some("P1001")).unwrap();
        assert_eq!(summary.outstanding, Money::from_cents(5000));
        assert_eq!(summary.paid_last_month, Money::from_cents(15000));
    }

    #[test]
    fn test_update_and_delete() {
        let a = item("P1001", 15000, false, today());
        let ledger = ledger(vec![a.clone()]);

        let mut edited = a.clone();
        edited.description = "Annual Physical Examination".into();
        assert_eq!(ledger.update_item(edited.clone()).unwrap(), a);
        assert_eq!(ledger.delete_item(a.id).unwrap(), edited);
        assert!(ledger.all_items().unwrap().is_empty());
        assert!(ledger.update_item(edited).unwrap_err().is_not_found());
    }

    #[test]
    fn test_concurrent_mark_as_paid() {
        let seed: Vec<_> = (0..16).map(|_| item("P1001", 1000, false, today())).collect();
        let ids: Vec<_> = seed.iter().map(|i| i.id).collect();
        let ledger = ledger(seed);

        thread::scope(|scope| {
            for id in &ids {
                let ledger = &ledger;
                scope.spawn(move || ledger.mark_as_paid(*id).expect("mark paid"));
            }
        });

        assert_eq!(ledger.outstanding_balance(None).unwrap(), Money::ZERO);
        assert_eq!(
            ledger.paid_amount_in_month_before(today(), None).unwrap(),
            Money::from_cents(16000)
        );
    }
}
