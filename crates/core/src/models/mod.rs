//! Record types held by the clinic stores.

mod appointment;
mod billing;
mod chart;
mod money;
mod patient;

pub use appointment::{Appointment, AppointmentStatus, AppointmentType};
pub use billing::{BillingCategory, BillingItem, BillingSummary};
pub use chart::{JournalEntry, Medication, Report};
pub use money::Money;
pub use patient::{Patient, PatientScope};
