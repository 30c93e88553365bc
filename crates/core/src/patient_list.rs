//! Incremental patient list with name filtering.
//!
//! [`PatientListModel`] is the state behind a scrolling patient list: it requests pages one at
//! a time, remembers when the roster ran out, and presents a filtered view without touching the
//! loaded set.

use crate::constants::{DEFAULT_PAGE_SIZE, NO_MORE_PATIENTS_NOTICE};
use crate::directory::{filter_by_name, PatientDirectory};
use crate::models::{Patient, PatientScope};
use crate::CoreResult;

/// Anything that can serve 1-indexed pages of the roster.
pub trait PageSource {
    fn fetch_page(
        &self,
        page: usize,
        page_size: usize,
        scope: PatientScope,
    ) -> CoreResult<Vec<Patient>>;
}

impl PageSource for PatientDirectory {
    fn fetch_page(
        &self,
        page: usize,
        page_size: usize,
        scope: PatientScope,
    ) -> CoreResult<Vec<Patient>> {
        self.get_patients(page, page_size, scope)
    }
}

/// Outcome of a load request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageLoad {
    /// A non-empty page was appended; carries its length.
    Loaded(usize),
    /// The roster just ran out. Show [`PageLoad::notice`] to the user.
    Exhausted,
    /// The roster had already run out; the source was not queried.
    AlreadyExhausted,
}

impl PageLoad {
    /// The "no more patients" notice, present only on the load that discovered exhaustion.
    pub fn notice(self) -> Option<&'static str> {
        match self {
            PageLoad::Exhausted => Some(NO_MORE_PATIENTS_NOTICE),
            _ => None,
        }
    }
}

pub struct PatientListModel<S> {
    source: S,
    scope: PatientScope,
    page_size: usize,
    next_page: usize,
    has_more: bool,
    loaded: Vec<Patient>,
    query: String,
}

impl<S: PageSource> PatientListModel<S> {
    pub fn new(source: S, scope: PatientScope) -> Self {
        Self::with_page_size(source, scope, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(source: S, scope: PatientScope, page_size: usize) -> Self {
        Self {
            source,
            scope,
            page_size,
            next_page: 1,
            has_more: true,
            loaded: Vec::new(),
            query: String::new(),
        }
    }

    /// Request the next page.
    ///
    /// # Errors
    ///
    /// Source errors are returned unchanged and leave the model as it was, so the same page can
    /// be retried.
    pub fn load_next_page(&mut self) -> CoreResult<PageLoad> {
        if !self.has_more {
            return Ok(PageLoad::AlreadyExhausted);
        }

        let page = self
            .source
            .fetch_page(self.next_page, self.page_size, self.scope)?;

        if page.is_empty() {
            self.has_more = false;
            tracing::debug!("patient list exhausted after {} pages", self.next_page - 1);
            return Ok(PageLoad::Exhausted);
        }

        let count = page.len();
        self.loaded.extend(page);
        self.next_page += 1;
        Ok(PageLoad::Loaded(count))
    }

    /// Load pages until the roster runs out; returns the number of patients added.
    pub fn load_all(&mut self) -> CoreResult<usize> {
        let mut added = 0;
        while let PageLoad::Loaded(count) = self.load_next_page()? {
            added += count;
        }
        Ok(added)
    }

    /// Set the name filter. The loaded set is not modified.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// The loaded patients passed through the current filter.
    pub fn visible(&self) -> Vec<Patient> {
        filter_by_name(&self.loaded, &self.query)
    }

    /// Every patient loaded so far, in load order.
    pub fn loaded(&self) -> &[Patient] {
        &self.loaded
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// The page the next load will request.
    pub fn next_page(&self) -> usize {
        self.next_page
    }

    pub fn scope(&self) -> PatientScope {
        self.scope
    }

    /// Switch scope; the list restarts from page 1.
    pub fn set_scope(&mut self, scope: PatientScope) {
        self.scope = scope;
        self.reset();
    }

    /// Back to page 1 with nothing loaded; the exhaustion notice is re-armed. The query is kept.
    pub fn reset(&mut self) {
        self.next_page = 1;
        self.has_more = true;
        self.loaded.clear();
    }

    /// Reset and load the first page.
    pub fn refresh(&mut self) -> CoreResult<PageLoad> {
        self.reset();
        self.load_next_page()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoreConfig;
    use crate::repositories::memory::InMemoryPatients;
    use crate::seed;
    use std::cell::Cell;
    use std::sync::Arc;

    /// Counts requests so tests can assert the source is left alone after exhaustion.
    struct CountingSource {
        directory: PatientDirectory,
        calls: Cell<usize>,
    }

    impl PageSource for CountingSource {
        fn fetch_page(
            &self,
            page: usize,
            page_size: usize,
            scope: PatientScope,
        ) -> CoreResult<Vec<Patient>> {
            self.calls.set(self.calls.get() + 1);
            self.directory.get_patients(page, page_size, scope)
        }
    }

    fn counting_source() -> CountingSource {
        CountingSource {
            directory: PatientDirectory::new(
                Arc::new(InMemoryPatients::new(seed::demo_patients())),
                Arc::new(CoreConfig::default()),
            ),
            calls: Cell::new(0),
        }
    }

    #[test]
    fn test_notice_fires_exactly_once_per_exhaustion() {
        let mut model = PatientListModel::with_page_size(counting_source(), PatientScope::All, 2);

        assert_eq!(model.load_next_page().unwrap(), PageLoad::Loaded(2));
        assert_eq!(model.load_next_page().unwrap(), PageLoad::Loaded(2));
        assert_eq!(model.load_next_page().unwrap(), PageLoad::Loaded(1));

        let exhausted = model.load_next_page().unwrap();
        assert_eq!(exhausted, PageLoad::Exhausted);
        assert_eq!(exhausted.notice(), Some(NO_MORE_PATIENTS_NOTICE));
        assert!(!model.has_more());
        assert_eq!(model.source.calls.get(), 4);

        for _ in 0..3 {
            let again = model.load_next_page().unwrap();
            assert_eq!(again, PageLoad::AlreadyExhausted);
            assert_eq!(again.notice(), None);
        }
        assert_eq!(model.source.calls.get(), 4, "no queries after exhaustion");
        assert_eq!(model.loaded().len(), 5);
    }

    #[test]
    fn test_reset_rearms_notice() {
        let mut model = PatientListModel::new(counting_source(), PatientScope::Mine);
        assert_eq!(model.load_all().unwrap(), 3);
        assert!(!model.has_more());

        model.reset();
        assert!(model.has_more());
        assert_eq!(model.next_page(), 1);
        assert!(model.loaded().is_empty());

        assert_eq!(model.load_next_page().unwrap(), PageLoad::Loaded(3));
        assert_eq!(model.load_next_page().unwrap(), PageLoad::Exhausted);
    }

    #[test]
    fn test_refresh_reloads_first_page() {
        let mut model = PatientListModel::with_page_size(counting_source(), PatientScope::All, 2);
        model.load_all().unwrap();

        assert_eq!(model.refresh().unwrap(), PageLoad::Loaded(2));
        let ids: Vec<_> = model.loaded().iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids, vec!["P1001", "P1002"]);
    }

    #[test]
    fn test_filter_never_mutates_loaded_set() {
        let mut model = PatientListModel::new(counting_source(), PatientScope::All);
        model.load_all().unwrap();
        let original = model.loaded().to_vec();

        model.set_query("jo");
        assert_eq!(model.visible(), original);

        model.set_query("joh");
        let names: Vec<_> = model.visible().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["John Doe", "Michael Johnson"]);
        assert_eq!(model.loaded(), original.as_slice());

        model.clear_query();
        assert_eq!(model.visible(), original);
    }

    #[test]
    fn test_set_scope_restarts_paging() {
        let mut model = PatientListModel::new(counting_source(), PatientScope::All);
        model.load_all().unwrap();
        model.set_scope(PatientScope::Mine);
        assert!(model.loaded().is_empty());
        model.load_all().unwrap();
        assert!(model.loaded().iter().all(|p| p.doctor_id == "doc123"));
    }
}
