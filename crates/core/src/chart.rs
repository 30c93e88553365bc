//! Per-patient chart: journal notes, current medications and attached reports.
//!
//! Chart data is session state held in memory. Journals and reports list newest first.

use crate::models::{JournalEntry, Medication, Report};
use crate::{CoreError, CoreResult};
use chrono::NaiveDate;
use clinic_types::NonEmptyText;
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Debug, Default)]
struct ChartData {
    journals: HashMap<String, Vec<JournalEntry>>,
    medications: HashMap<String, Vec<Medication>>,
    reports: HashMap<String, Vec<Report>>,
}

#[derive(Debug, Default)]
pub struct PatientChart {
    data: RwLock<ChartData>,
}

impl PatientChart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a chart from per-patient lists, each already ordered newest first.
    pub fn from_parts(
        journals: HashMap<String, Vec<JournalEntry>>,
        medications: HashMap<String, Vec<Medication>>,
        reports: HashMap<String, Vec<Report>>,
    ) -> Self {
        Self {
            data: RwLock::new(ChartData {
                journals,
                medications,
                reports,
            }),
        }
    }

    pub fn journal(&self, patient_id: &str) -> CoreResult<Vec<JournalEntry>> {
        Ok(self
            .data
            .read()?
            .journals
            .get(patient_id)
            .cloned()
            .unwrap_or_default())
    }

    /// Prepend a note dated `date`. The text is trimmed.
    ///
    /// # Errors
    ///
    /// `CoreError::Text` if the text is blank.
    pub fn add_journal_entry(
        &self,
        patient_id: &str,
        text: &str,
        date: NaiveDate,
    ) -> CoreResult<JournalEntry> {
        let text = NonEmptyText::new(text)?;
        let entry = JournalEntry {
            date,
            text: text.into_inner(),
        };
        self.data
            .write()?
            .journals
            .entry(patient_id.to_string())
            .or_default()
            .insert(0, entry.clone());
        tracing::info!("added journal entry for patient {}", patient_id);
        Ok(entry)
    }

    /// Replace the text of the entry at `index` (0 is the newest).
    pub fn edit_journal_entry(
        &self,
        patient_id: &str,
        index: usize,
        text: &str,
    ) -> CoreResult<JournalEntry> {
        let text = NonEmptyText::new(text)?;
        let mut data = self.data.write()?;
        let entry = data
            .journals
            .get_mut(patient_id)
            .and_then(|entries| entries.get_mut(index))
            .ok_or_else(|| CoreError::not_found("journal entry", format!("{patient_id}#{index}")))?;
        entry.text = text.into_inner();
        Ok(entry.clone())
    }

    pub fn medications(&self, patient_id: &str) -> CoreResult<Vec<Medication>> {
        Ok(self
            .data
            .read()?
            .medications
            .get(patient_id)
            .cloned()
            .unwrap_or_default())
    }

    pub fn reports(&self, patient_id: &str) -> CoreResult<Vec<Report>> {
        Ok(self
            .data
            .read()?
            .reports
            .get(patient_id)
            .cloned()
            .unwrap_or_default())
    }

    /// Attach a new report of `kind` (e.g. `JPG`), titled `New <kind> Report`.
    pub fn add_report(
        &self,
        patient_id: &str,
        kind: &str,
        author: &str,
        date: NaiveDate,
    ) -> CoreResult<Report> {
        let kind = NonEmptyText::new(kind)?.into_inner().to_ascii_uppercase();
        let report = Report {
            title: format!("New {} Report", kind),
            kind,
            date,
            author: author.trim().to_string(),
        };
        self.data
            .write()?
            .reports
            .entry(patient_id.to_string())
            .or_default()
            .insert(0, report.clone());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    #[test]
    fn test_new_journal_entries_go_first() {
        let chart = seed::demo_chart(today());
        let before = chart.journal("P1001").unwrap();
        assert_eq!(before.len(), 3);

        let added = chart
            .add_journal_entry("P1001", "  Reviewed dictated note.  ", today())
            .expect("add entry");
        assert_eq!(added.text, "Reviewed dictated note.");

        let after = chart.journal("P1001").unwrap();
        assert_eq!(after.len(), 4);
        assert_eq!(after[0], added);
        assert_eq!(&after[1..], before.as_slice());
    }

    #[test]
    fn test_blank_journal_entry_is_rejected() {
        let chart = PatientChart::new();
        let err = chart
            .add_journal_entry("P1002", "   ", today())
            .expect_err("blank text");
        assert!(matches!(err, CoreError::Text(_)));
        assert!(chart.journal("P1002").unwrap().is_empty());
    }

    #[test]
    fn test_edit_journal_entry() {
        let chart = seed::demo_chart(today());
        let edited = chart
            .edit_journal_entry("P1003", 1, "BP 138/85 after adjustment.")
            .expect("edit");
        assert_eq!(chart.journal("P1003").unwrap()[1], edited);

        let err = chart
            .edit_journal_entry("P1003", 99, "nope")
            .expect_err("no such entry");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_seeded_medications_and_reports() {
        let chart = seed::demo_chart(today());

        let meds: Vec<_> = chart
            .medications("P1003")
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(meds, vec!["Lisinopril", "Atorvastatin", "Metformin"]);

        let reports = chart.reports("P1003").unwrap();
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[2].date, NaiveDate::from_ymd_opt(2026, 9, 17).unwrap());

        assert!(chart.medications("P1002").unwrap().is_empty());
        assert!(chart.reports("P1004").unwrap().is_empty());
    }

    #[test]
    fn test_add_report_prepends() {
        let chart = seed::demo_chart(today());
        let report = chart
            .add_report("P1005", "jpg", "Dr. Wilson", today())
            .expect("add report");
        assert_eq!(report.title, "New JPG Report");
        assert_eq!(chart.reports("P1005").unwrap()[0], report);
    }
}
