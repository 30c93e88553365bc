//! Service wiring.
//!
//! [`ClinicServices`] builds every core service from one [`CoreConfig`]: demo data in memory
//! when no data directory is configured, YAML files under the data directory otherwise.
//! Binaries construct it once and share it.

use crate::billing::BillingLedger;
use crate::chart::PatientChart;
use crate::config::CoreConfig;
use crate::constants::{
    APPOINTMENTS_FILENAME, BILLING_FILENAME, PATIENTS_FILENAME, SETTINGS_FILENAME,
};
use crate::directory::PatientDirectory;
use crate::models::{Appointment, BillingItem, JournalEntry, Patient};
use crate::repositories::memory::{InMemoryPatients, InMemoryRepository};
use crate::repositories::yaml::{YamlPatientRoster, YamlRepository};
use crate::repositories::{AppointmentRepository, BillingRepository, PatientRepository};
use crate::schedule::ScheduleService;
use crate::seed;
use crate::settings::{InMemoryPreferences, PreferencesStore, YamlPreferencesFile};
use crate::transcripts::TranscriptLog;
use crate::validation::{AppointmentDraft, BillingDraft};
use crate::{CoreError, CoreResult};
use chrono::{Local, NaiveDate};
use clinic_uuid::RecordId;
use std::path::Path;
use std::sync::Arc;

#[derive(Clone)]
pub struct ClinicServices {
    pub cfg: Arc<CoreConfig>,
    pub directory: PatientDirectory,
    pub schedule: ScheduleService,
    pub ledger: BillingLedger,
    pub chart: Arc<PatientChart>,
    pub preferences: Arc<dyn PreferencesStore>,
    pub transcripts: Arc<TranscriptLog>,
}

impl ClinicServices {
    /// Build services for `cfg`, using its data directory when one is set.
    pub fn open(cfg: Arc<CoreConfig>) -> CoreResult<Self> {
        match cfg.data_dir().map(Path::to_path_buf) {
            Some(dir) => Self::with_data_dir(cfg, &dir),
            None => Ok(Self::demo(cfg)),
        }
    }

    /// In-memory services populated with the demo data.
    pub fn demo(cfg: Arc<CoreConfig>) -> Self {
        let today = Local::now().date_naive();
        let appointments = seed::demo_appointments(today, cfg.acting_doctor());
        let billing = seed::demo_billing(today);
        let mut services = Self::in_memory(cfg, seed::demo_patients(), appointments, billing);
        services.chart = Arc::new(seed::demo_chart(today));
        services
    }

    /// In-memory services over the given records, with an empty chart.
    pub fn in_memory(
        cfg: Arc<CoreConfig>,
        patients: Vec<Patient>,
        appointments: Vec<Appointment>,
        billing: Vec<BillingItem>,
    ) -> Self {
        let language = cfg.system_language().to_string();
        Self::assemble(
            cfg,
            Arc::new(InMemoryPatients::new(patients)),
            Arc::new(InMemoryRepository::with_records(appointments)),
            Arc::new(InMemoryRepository::with_records(billing)),
            Arc::new(PatientChart::new()),
            Arc::new(InMemoryPreferences::new(language)),
        )
    }

    /// YAML-backed services under `dir`. Missing files are created from the demo data.
    pub fn with_data_dir(cfg: Arc<CoreConfig>, dir: &Path) -> CoreResult<Self> {
        let today = Local::now().date_naive();
        let doctor = cfg.acting_doctor().clone();

        let patients = YamlPatientRoster::open_or_seed(&dir.join(PATIENTS_FILENAME), seed::demo_patients)?;
        let appointments = YamlRepository::open_or_seed(dir.join(APPOINTMENTS_FILENAME), || {
            seed::demo_appointments(today, &doctor)
        })?;
        let billing =
            YamlRepository::open_or_seed(dir.join(BILLING_FILENAME), || seed::demo_billing(today))?;
        let preferences =
            YamlPreferencesFile::new(dir.join(SETTINGS_FILENAME), cfg.system_language());

        tracing::info!("using data directory {}", dir.display());
        Ok(Self::assemble(
            cfg,
            Arc::new(patients),
            Arc::new(appointments),
            Arc::new(billing),
            Arc::new(seed::demo_chart(today)),
            Arc::new(preferences),
        ))
    }

    fn assemble(
        cfg: Arc<CoreConfig>,
        patients: Arc<dyn PatientRepository>,
        appointments: Arc<AppointmentRepository>,
        billing: Arc<BillingRepository>,
        chart: Arc<PatientChart>,
        preferences: Arc<dyn PreferencesStore>,
    ) -> Self {
        Self {
            directory: PatientDirectory::new(patients, cfg.clone()),
            schedule: ScheduleService::new(appointments, cfg.clone()),
            ledger: BillingLedger::new(billing),
            chart,
            preferences,
            transcripts: Arc::new(TranscriptLog::new()),
            cfg,
        }
    }

    /// The roster entry for `patient_id`, or `CoreError::NotFound`.
    pub fn require_patient(&self, patient_id: &str) -> CoreResult<Patient> {
        self.directory
            .find(patient_id)?
            .ok_or_else(|| CoreError::not_found("patient", patient_id))
    }

    /// Validate a draft against the roster and store it. Returns the stored appointment.
    pub fn create_appointment(&self, draft: AppointmentDraft) -> CoreResult<Appointment> {
        let roster = self.directory.roster()?;
        let appointment = draft.validate(&roster, self.cfg.acting_doctor())?;
        self.schedule.add_appointment(appointment.clone())?;
        Ok(appointment)
    }

    /// Validate a draft as the new version of the acting doctor's appointment `id` and store it.
    ///
    /// The stored doctor is kept, as are the stored type and status when the draft omits them.
    pub fn update_appointment(&self, id: RecordId, draft: AppointmentDraft) -> CoreResult<Appointment> {
        let existing = self.schedule.get(id)?;
        let roster = self.directory.roster()?;
        let appointment = draft.validate_update(&existing, &roster)?;
        self.schedule.update_appointment(appointment.clone())?;
        Ok(appointment)
    }

    pub fn create_billing_item(&self, draft: BillingDraft) -> CoreResult<BillingItem> {
        let roster = self.directory.roster()?;
        let item = draft.validate(&roster)?;
        self.ledger.add_item(item.clone())?;
        Ok(item)
    }

    pub fn update_billing_item(&self, id: RecordId, draft: BillingDraft) -> CoreResult<BillingItem> {
        let roster = self.directory.roster()?;
        let item = draft.validate_with_id(id, &roster)?;
        self.ledger.update_item(item.clone())?;
        Ok(item)
    }

    /// Add a note to a known patient's journal.
    pub fn add_journal_entry(
        &self,
        patient_id: &str,
        text: &str,
        date: NaiveDate,
    ) -> CoreResult<JournalEntry> {
        self.require_patient(patient_id)?;
        self.chart.add_journal_entry(patient_id, text, date)
    }
}
