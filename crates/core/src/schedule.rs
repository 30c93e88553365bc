//! Appointment store for the acting doctor.
//!
//! Queries and mutations see only the acting doctor's appointments. Mutations address records
//! by id and report unknown ids, or ids owned by another doctor, as `CoreError::NotFound`
//! instead of silently doing nothing.
//!
//! Two appointments for the same doctor may overlap unless the configuration enables
//! double-booking rejection; [`ScheduleService::find_conflicts`] reports overlaps either way.

use crate::config::CoreConfig;
use crate::constants::DEFAULT_UPCOMING_LIMIT;
use crate::models::{Appointment, AppointmentStatus};
use crate::repositories::AppointmentRepository;
use crate::{CoreError, CoreResult};
use chrono::{Local, NaiveDate};
use clinic_uuid::RecordId;
use std::sync::Arc;

#[derive(Clone)]
pub struct ScheduleService {
    appointments: Arc<AppointmentRepository>,
    cfg: Arc<CoreConfig>,
}

impl ScheduleService {
    pub fn new(appointments: Arc<AppointmentRepository>, cfg: Arc<CoreConfig>) -> Self {
        Self { appointments, cfg }
    }

    fn doctor_id(&self) -> &str {
        self.cfg.acting_doctor().id()
    }

    fn for_acting_doctor(&self) -> CoreResult<Vec<Appointment>> {
        let doctor_id = self.doctor_id();
        Ok(self
            .appointments
            .list()?
            .into_iter()
            .filter(|a| a.doctor_id == doctor_id)
            .collect())
    }

    /// Appointments on `date` in store order.
    pub fn appointments_for_date(&self, date: NaiveDate) -> CoreResult<Vec<Appointment>> {
        let mut appointments = self.for_acting_doctor()?;
        appointments.retain(|a| a.date == date);
        tracing::debug!("{} appointments on {}", appointments.len(), date);
        Ok(appointments)
    }

    /// Appointments on `date` ordered by time of day, for display.
    pub fn appointments_for_date_by_time(&self, date: NaiveDate) -> CoreResult<Vec<Appointment>> {
        let mut appointments = self.appointments_for_date(date)?;
        sort_by_time_of_day(&mut appointments);
        Ok(appointments)
    }

    pub fn appointments_by_patient(&self, patient_id: &str) -> CoreResult<Vec<Appointment>> {
        let mut appointments = self.for_acting_doctor()?;
        appointments.retain(|a| a.patient_id == patient_id);
        Ok(appointments)
    }

    /// The acting doctor's appointment with `id`; other doctors' records are not found.
    pub fn get(&self, id: RecordId) -> CoreResult<Appointment> {
        let doctor_id = self.doctor_id();
        self.appointments
            .get(id)?
            .filter(|a| a.doctor_id == doctor_id)
            .ok_or_else(|| CoreError::not_found("appointment", id))
    }

    /// Upcoming appointments as of the local calendar date.
    pub fn upcoming_appointments(&self, limit: Option<usize>) -> CoreResult<Vec<Appointment>> {
        self.upcoming_appointments_as_of(
            Local::now().date_naive(),
            limit.unwrap_or(DEFAULT_UPCOMING_LIMIT),
        )
    }

    /// At most `limit` open appointments dated `today` or later, earliest first.
    ///
    /// Ties keep store order. Unparseable times sort after every parseable time on their date.
    pub fn upcoming_appointments_as_of(
        &self,
        today: NaiveDate,
        limit: usize,
    ) -> CoreResult<Vec<Appointment>> {
        let mut upcoming: Vec<Appointment> = self
            .for_acting_doctor()?
            .into_iter()
            .filter(|a| a.date >= today && !a.status.is_closed())
            .collect();
        upcoming.sort_by_key(|a| (a.date, time_sort_key(a)));
        upcoming.truncate(limit);
        Ok(upcoming)
    }

    /// Store a validated appointment.
    ///
    /// # Errors
    ///
    /// - `CoreError::DuplicateRecord` if the id is already stored
    /// - `CoreError::ScheduleConflict` if double-booking rejection is enabled and the
    ///   appointment overlaps another one for the same doctor
    pub fn add_appointment(&self, appointment: Appointment) -> CoreResult<()> {
        let id = appointment.id;
        if self.cfg.reject_double_booking() {
            self.appointments.insert_with(appointment, &reject_conflicts)?;
        } else {
            self.appointments.insert(appointment)?;
        }
        tracing::info!("added appointment {}", id);
        Ok(())
    }

    /// Replace the appointment with the same id; returns the previous version.
    ///
    /// # Errors
    ///
    /// - `CoreError::NotFound` if no appointment of the acting doctor has that id
    /// - `CoreError::InvalidInput` if `updated` names another doctor
    /// - `CoreError::ScheduleConflict` as for [`ScheduleService::add_appointment`]
    pub fn update_appointment(&self, updated: Appointment) -> CoreResult<Appointment> {
        let id = updated.id;
        let doctor_id = self.doctor_id();
        let reject_double_booking = self.cfg.reject_double_booking();
        let guard = |existing: &[Appointment], candidate: &Appointment| {
            if !existing
                .iter()
                .any(|a| a.id == candidate.id && a.doctor_id == doctor_id)
            {
                return Err(CoreError::not_found("appointment", candidate.id));
            }
            if candidate.doctor_id != doctor_id {
                return Err(CoreError::InvalidInput(format!(
                    "appointment {} cannot be moved to doctor {}",
                    candidate.id, candidate.doctor_id
                )));
            }
            if reject_double_booking {
                reject_conflicts(existing, candidate)
            } else {
                Ok(())
            }
        };
        let result = self.appointments.replace_with(updated, &guard);
        log_mutation("updated", id, &result);
        result
    }

    /// Move the appointment to `status` in one locked step; returns the updated appointment.
    pub fn set_status(&self, id: RecordId, status: AppointmentStatus) -> CoreResult<Appointment> {
        let doctor_id = self.doctor_id();
        let result = self.appointments.modify_where(
            id,
            &|a: &Appointment| a.doctor_id == doctor_id,
            &mut |a: &mut Appointment| a.status = status,
        );
        log_mutation("status change for", id, &result);
        result
    }

    /// Remove the appointment and return it.
    pub fn delete_appointment(&self, id: RecordId) -> CoreResult<Appointment> {
        let doctor_id = self.doctor_id();
        let result = self
            .appointments
            .remove_where(id, &|a: &Appointment| a.doctor_id == doctor_id);
        log_mutation("deleted", id, &result);
        result
    }

    /// Stored appointments that overlap `candidate` in time for the same doctor.
    pub fn find_conflicts(&self, candidate: &Appointment) -> CoreResult<Vec<Appointment>> {
        Ok(overlapping(&self.appointments.list()?, candidate))
    }
}

fn log_mutation<T>(action: &str, id: RecordId, result: &CoreResult<T>) {
    match result {
        Ok(_) => tracing::info!("{} appointment {}", action, id),
        Err(e) if e.is_not_found() => tracing::warn!("{} appointment {}: {}", action, id, e),
        Err(_) => {}
    }
}

fn reject_conflicts(existing: &[Appointment], candidate: &Appointment) -> CoreResult<()> {
    if overlapping(existing, candidate).is_empty() {
        Ok(())
    } else {
        Err(CoreError::ScheduleConflict {
            id: candidate.id.to_string(),
        })
    }
}

/// Appointments in `existing` that share `candidate`'s doctor and date, still hold their
/// slot, and whose time ranges intersect it. Appointments with unparseable times never
/// conflict. Ranges are compared within their own date only: a late appointment running past
/// midnight is not checked against the next morning.
pub fn overlapping(existing: &[Appointment], candidate: &Appointment) -> Vec<Appointment> {
    if !candidate.status.holds_slot() {
        return Vec::new();
    }
    let Some(wanted) = candidate.minute_range() else {
        return Vec::new();
    };

    existing
        .iter()
        .filter(|other| {
            other.id != candidate.id
                && other.doctor_id == candidate.doctor_id
                && other.date == candidate.date
                && other.status.holds_slot()
                && other
                    .minute_range()
                    .is_some_and(|taken| taken.start < wanted.end && wanted.start < taken.end)
        })
        .cloned()
        .collect()
}

/// Stable sort by time of day; unparseable times go last in their original order.
pub fn sort_by_time_of_day(appointments: &mut [Appointment]) {
    appointments.sort_by_key(time_sort_key);
}

fn time_sort_key(appointment: &Appointment) -> (bool, u32) {
    match appointment.start_minutes() {
        Some(minutes) => (false, minutes),
        None => (true, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ActingDoctor;
    use crate::models::AppointmentType;
    use crate::repositories::memory::InMemoryRepository;
    use std::thread;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn appointment(date: NaiveDate, time: &str, status: AppointmentStatus) -> Appointment {
        Appointment {
            id: RecordId::new(),
            patient_id: "P1001".into(),
            patient_name: "John Doe".into(),
            doctor_id: "doc123".into(),
            doctor_name: "Dr. Smith".into(),
            date,
            time: time.into(),
            duration_minutes: 30,
            kind: AppointmentType::Checkup,
            status,
            notes: String::new(),
            reminder_set: false,
        }
    }

    fn service_with(cfg: CoreConfig, seed: Vec<Appointment>) -> ScheduleService {
        ScheduleService::new(
            Arc::new(InMemoryRepository::with_records(seed)),
            Arc::new(cfg),
        )
    }

    fn service(seed: Vec<Appointment>) -> ScheduleService {
        service_with(CoreConfig::default(), seed)
    }

    #[test]
    fn test_upcoming_orders_by_normalised_time() {
        let later = appointment(today(), "09:30 AM", AppointmentStatus::Scheduled);
        let earlier = appointment(today(), "09:00 AM", AppointmentStatus::Confirmed);
        let service = service(vec![]);
        service.add_appointment(later.clone()).unwrap();
        service.add_appointment(earlier.clone()).unwrap();

        let upcoming = service.upcoming_appointments_as_of(today(), 5).unwrap();
        let ids: Vec<_> = upcoming.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![earlier.id, later.id]);
    }

    #[test]
    fn test_upcoming_excludes_past_closed_and_other_doctors() {
        let yesterday = today().pred_opt().unwrap();
        let tomorrow = today().succ_opt().unwrap();
        let mut other_doctor = appointment(today(), "08:00 AM", AppointmentStatus::Scheduled);
        other_doctor.doctor_id = "doc456".into();

        let service = service(vec![
            appointment(yesterday, "10:00 AM", AppointmentStatus::Scheduled),
            appointment(today(), "02:15 PM", AppointmentStatus::Cancelled),
            appointment(today(), "03:00 PM", AppointmentStatus::Completed),
            appointment(tomorrow, "10:00 AM", AppointmentStatus::NoShow),
            appointment(today(), "11:00 AM", AppointmentStatus::Rescheduled),
            other_doctor,
        ]);

        let upcoming = service.upcoming_appointments_as_of(today(), 10).unwrap();
        let times: Vec<_> = upcoming.iter().map(|a| (a.date, a.time.as_str())).collect();
        assert_eq!(times, vec![(today(), "11:00 AM"), (tomorrow, "10:00 AM")]);
    }

    #[test]
    fn test_upcoming_respects_limit_and_sorts_pm_after_am() {
        let tomorrow = today().succ_opt().unwrap();
        let service = service(vec![
            appointment(tomorrow, "09:00 AM", AppointmentStatus::Scheduled),
            appointment(today(), "02:15 PM", AppointmentStatus::Scheduled),
            appointment(today(), "11:00 AM", AppointmentStatus::Scheduled),
            appointment(today(), "09:30 AM", AppointmentStatus::Confirmed),
        ]);

        let upcoming = service.upcoming_appointments_as_of(today(), 3).unwrap();
        let times: Vec<_> = upcoming.iter().map(|a| a.time.as_str()).collect();
        assert_eq!(times, vec!["09:30 AM", "11:00 AM", "02:15 PM"]);
        assert!(service.upcoming_appointments_as_of(today(), 0).unwrap().is_empty());
    }

    #[test]
    fn test_sort_by_time_of_day_puts_malformed_last() {
        let mut appointments = vec![
            appointment(today(), "soon", AppointmentStatus::Scheduled),
            appointment(today(), "02:15 PM", AppointmentStatus::Scheduled),
            appointment(today(), "", AppointmentStatus::Scheduled),
            appointment(today(), "09:30 AM", AppointmentStatus::Scheduled),
        ];
        sort_by_time_of_day(&mut appointments);
        let times: Vec<_> = appointments.iter().map(|a| a.time.as_str()).collect();
        assert_eq!(times, vec!["09:30 AM", "02:15 PM", "soon", ""]);
    }

    #[test]
    fn test_date_and_patient_queries_keep_store_order() {
        let tomorrow = today().succ_opt().unwrap();
        let mut jane = appointment(today(), "08:00 AM", AppointmentStatus::Scheduled);
        jane.patient_id = "P1003".into();
        let service = service(vec![
            appointment(today(), "11:00 AM", AppointmentStatus::Scheduled),
            jane,
            appointment(tomorrow, "10:00 AM", AppointmentStatus::Scheduled),
        ]);

        let on_day: Vec<_> = service
            .appointments_for_date(today())
            .unwrap()
            .into_iter()
            .map(|a| a.time)
            .collect();
        assert_eq!(on_day, vec!["11:00 AM", "08:00 AM"]);

        let by_time: Vec<_> = service
            .appointments_for_date_by_time(today())
            .unwrap()
            .into_iter()
            .map(|a| a.time)
            .collect();
        assert_eq!(by_time, vec!["08:00 AM", "11:00 AM"]);

        assert_eq!(service.appointments_by_patient("P1001").unwrap().len(), 2);
        assert_eq!(service.appointments_by_patient("P1003").unwrap().len(), 1);
    }

    #[test]
    fn test_mutations_on_unknown_id_are_not_found() {
        let existing = appointment(today(), "09:00 AM", AppointmentStatus::Scheduled);
        let service = service(vec![existing.clone()]);

        let stranger = appointment(today(), "10:00 AM", AppointmentStatus::Scheduled);
        assert!(service.update_appointment(stranger.clone()).unwrap_err().is_not_found());
        assert!(service
            .set_status(stranger.id, AppointmentStatus::Cancelled)
            .unwrap_err()
            .is_not_found());
        assert!(service.delete_appointment(stranger.id).unwrap_err().is_not_found());

        assert_eq!(service.get(existing.id).unwrap(), existing);
    }

    #[test]
    fn test_update_changes_only_target() {
        let a = appointment(today(), "09:00 AM", AppointmentStatus::Scheduled);
        let b = appointment(today(), "10:00 AM", AppointmentStatus::Scheduled);
        let service = service(vec![a.clone(), b.clone()]);

        let mut moved = b.clone();
        moved.time = "04:00 PM".into();
        let previous = service.update_appointment(moved.clone()).unwrap();
        assert_eq!(previous, b);
        assert_eq!(service.get(a.id).unwrap(), a);
        assert_eq!(service.get(b.id).unwrap(), moved);

        let cancelled = service.set_status(a.id, AppointmentStatus::Cancelled).unwrap();
        assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
        assert_eq!(service.delete_appointment(b.id).unwrap(), moved);
        assert_eq!(service.appointments_for_date(today()).unwrap(), vec![cancelled]);
    }

    #[test]
    fn test_other_doctors_appointments_cannot_be_changed() {
        let mut theirs = appointment(today(), "09:00 AM", AppointmentStatus::Confirmed);
        theirs.doctor_id = "doc456".into();
        theirs.doctor_name = "Dr. Jones".into();
        let service = service(vec![theirs.clone()]);

        assert!(service.get(theirs.id).unwrap_err().is_not_found());

        let mut taken_over = theirs.clone();
        taken_over.doctor_id = "doc123".into();
        taken_over.status = AppointmentStatus::Scheduled;
        assert!(service
            .update_appointment(taken_over)
            .unwrap_err()
            .is_not_found());
        assert!(service
            .set_status(theirs.id, AppointmentStatus::Cancelled)
            .unwrap_err()
            .is_not_found());
        assert!(service.delete_appointment(theirs.id).unwrap_err().is_not_found());

        let stored = service.appointments.list().unwrap();
        assert_eq!(stored, vec![theirs]);
    }

    #[test]
    fn test_update_cannot_reassign_doctor() {
        let mine = appointment(today(), "09:00 AM", AppointmentStatus::Scheduled);
        let service = service(vec![mine.clone()]);

        let mut handed_off = mine.clone();
        handed_off.doctor_id = "doc456".into();
        let err = service.update_appointment(handed_off).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
        assert_eq!(service.get(mine.id).unwrap(), mine);
    }

    #[test]
    fn test_late_evening_appointment_overlap_does_not_overflow() {
        let mut late = appointment(today(), "11:30 PM", AppointmentStatus::Confirmed);
        late.duration_minutes = u32::MAX;
        let service = service(vec![late.clone()]);

        let mut next = appointment(today(), "11:45 PM", AppointmentStatus::Scheduled);
        next.duration_minutes = 120;
        assert_eq!(service.find_conflicts(&next).unwrap(), vec![late.clone()]);

        let early = appointment(today(), "08:00 AM", AppointmentStatus::Scheduled);
        assert!(service.find_conflicts(&early).unwrap().is_empty());
    }

    #[test]
    fn test_find_conflicts_reports_overlaps() {
        let booked = appointment(today(), "09:00 AM", AppointmentStatus::Confirmed);
        let cancelled = appointment(today(), "09:10 AM", AppointmentStatus::Cancelled);
        let service = service(vec![booked.clone(), cancelled]);

        let overlapping_slot = appointment(today(), "09:15 AM", AppointmentStatus::Scheduled);
        assert_eq!(service.find_conflicts(&overlapping_slot).unwrap(), vec![booked.clone()]);

        let back_to_back = appointment(today(), "09:30 AM", AppointmentStatus::Scheduled);
        assert!(service.find_conflicts(&back_to_back).unwrap().is_empty());

        let mut other_doctor = overlapping_slot.clone();
        other_doctor.doctor_id = "doc456".into();
        assert!(service.find_conflicts(&other_doctor).unwrap().is_empty());

        // Double booking is allowed by default.
        service.add_appointment(overlapping_slot).unwrap();
    }

    #[test]
    fn test_reject_double_booking() {
        let cfg = CoreConfig::new(ActingDoctor::default(), None, "en".into(), true).unwrap();
        let booked = appointment(today(), "09:00 AM", AppointmentStatus::Confirmed);
        let service = service_with(cfg, vec![booked.clone()]);

        let clash = appointment(today(), "09:15 AM", AppointmentStatus::Scheduled);
        let err = service.add_appointment(clash).unwrap_err();
        assert!(matches!(err, CoreError::ScheduleConflict { .. }));

        // Rescheduling an appointment within its own slot is not a conflict with itself.
        let mut shifted = booked.clone();
        shifted.time = "09:10 AM".into();
        service.update_appointment(shifted).unwrap();

        let free = appointment(today(), "10:00 AM", AppointmentStatus::Scheduled);
        service.add_appointment(free).unwrap();
    }

    #[test]
    fn test_concurrent_status_changes_are_not_lost() {
        let seed: Vec<_> = (0..8)
            .map(|_| appointment(today(), "09:00 AM", AppointmentStatus::Scheduled))
            .collect();
        let ids: Vec<_> = seed.iter().map(|a| a.id).collect();
        let service = service(seed);

        let handles: Vec<_> = ids
            .iter()
            .copied()
            .map(|id| {
                let service = service.clone();
                thread::spawn(move || {
                    service
                        .set_status(id, AppointmentStatus::Completed)
                        .expect("set status");
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("thread panicked");
        }

        let all = service.appointments_for_date(today()).unwrap();
        assert_eq!(all.len(), 8);
        assert!(all.iter().all(|a| a.status == AppointmentStatus::Completed));
    }
}
