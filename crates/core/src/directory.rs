//! Patient directory.
//!
//! Ownership-scoped, page-wise access to the roster plus the name filter used by interactive
//! search. Pages are 1-indexed; a page past the end of the scoped roster is empty, which is
//! how callers learn the roster is exhausted.

use crate::config::CoreConfig;
use crate::constants::MIN_SEARCH_QUERY_LEN;
use crate::models::{Patient, PatientScope};
use crate::repositories::PatientRepository;
use crate::{CoreError, CoreResult};
use std::ops::Range;
use std::sync::Arc;

#[derive(Clone)]
pub struct PatientDirectory {
    patients: Arc<dyn PatientRepository>,
    cfg: Arc<CoreConfig>,
}

impl PatientDirectory {
    pub fn new(patients: Arc<dyn PatientRepository>, cfg: Arc<CoreConfig>) -> Self {
        Self { patients, cfg }
    }

    /// The roster restricted to `scope`, in roster order.
    pub fn scoped_roster(&self, scope: PatientScope) -> CoreResult<Vec<Patient>> {
        let roster = self.patients.roster()?;
        Ok(match scope {
            PatientScope::All => roster,
            PatientScope::Mine => {
                let doctor_id = self.cfg.acting_doctor().id();
                roster
                    .into_iter()
                    .filter(|p| p.doctor_id == doctor_id)
                    .collect()
            }
        })
    }

    /// Page `page` (1-indexed) of the scoped roster.
    ///
    /// # Errors
    ///
    /// `CoreError::InvalidInput` when `page` or `page_size` is zero. Pages past the end are
    /// not errors and return an empty vector.
    pub fn get_patients(
        &self,
        page: usize,
        page_size: usize,
        scope: PatientScope,
    ) -> CoreResult<Vec<Patient>> {
        if page == 0 || page_size == 0 {
            return Err(CoreError::InvalidInput(format!(
                "page and page size must be at least 1 (got page {}, page size {})",
                page, page_size
            )));
        }

        let mut roster = self.scoped_roster(scope)?;
        let Some(range) = page_bounds(page, page_size, roster.len()) else {
            tracing::debug!("page {} of {} patients is past the end", page, scope);
            return Ok(Vec::new());
        };
        roster.truncate(range.end);
        Ok(roster.split_off(range.start))
    }

    /// Name search over the whole scoped roster.
    pub fn search(&self, query: &str, scope: PatientScope) -> CoreResult<Vec<Patient>> {
        Ok(filter_by_name(&self.scoped_roster(scope)?, query))
    }

    pub fn find(&self, patient_id: &str) -> CoreResult<Option<Patient>> {
        self.patients.find(patient_id)
    }

    pub fn roster(&self) -> CoreResult<Vec<Patient>> {
        self.patients.roster()
    }
}

/// Index range of page `page` within a collection of `len` items, or `None` once the start
/// offset reaches `len`.
pub fn page_bounds(page: usize, page_size: usize, len: usize) -> Option<Range<usize>> {
    let start = page.checked_sub(1)?.checked_mul(page_size)?;
    if start >= len {
        return None;
    }
    let end = start.saturating_add(page_size).min(len);
    Some(start..end)
}

/// Patients whose name contains `query`, case-insensitively, in their original order.
///
/// A trimmed query shorter than the minimum search length does not filter.
pub fn filter_by_name(patients: &[Patient], query: &str) -> Vec<Patient> {
    let folded = query.trim().to_lowercase();
    if folded.chars().count() < MIN_SEARCH_QUERY_LEN {
        return patients.to_vec();
    }
    patients
        .iter()
        .filter(|p| p.name_contains(&folded))
        .cloned()
        .collect()
}
