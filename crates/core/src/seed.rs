//! Demo data.
//!
//! Used when no data directory is configured, and to populate a fresh data directory. Dates
//! are relative to the `today` argument so the schedule and ledger always look current.

use crate::chart::PatientChart;
use crate::config::ActingDoctor;
use crate::models::{
    Appointment, AppointmentStatus, AppointmentType, BillingCategory, BillingItem, JournalEntry,
    Medication, Money, Patient, Report,
};
use chrono::{Days, NaiveDate};
use clinic_uuid::RecordId;
use std::collections::HashMap;

pub fn demo_patients() -> Vec<Patient> {
    vec![
        Patient::new("P1001", "John Doe", 45, "Male", "doc123"),
        Patient::new("P1002", "Jane Smith", 32, "Female", "doc456"),
        Patient::new("P1003", "Michael Johnson", 68, "Male", "doc123"),
        Patient::new("P1004", "Emily Brown", 29, "Female", "doc789"),
        Patient::new("P1005", "David Wilson", 55, "Male", "doc123"),
    ]
}

fn days_after(today: NaiveDate, days: u64) -> NaiveDate {
    today.checked_add_days(Days::new(days)).unwrap_or(today)
}

fn days_before(today: NaiveDate, days: u64) -> NaiveDate {
    today.checked_sub_days(Days::new(days)).unwrap_or(today)
}

/// Five appointments for `doctor` over the next three days.
pub fn demo_appointments(today: NaiveDate, doctor: &ActingDoctor) -> Vec<Appointment> {
    let rows = [
        ("P1001", "John Doe", 0, "09:30 AM", 30, AppointmentType::Checkup, AppointmentStatus::Confirmed, "Annual physical examination"),
        ("P1003", "Michael Johnson", 0, "11:00 AM", 45, AppointmentType::FollowUp, AppointmentStatus::Scheduled, "Follow-up on medication adjustment"),
        ("P1005", "David Wilson", 0, "02:15 PM", 30, AppointmentType::Consultation, AppointmentStatus::Scheduled, "Discussion about recent test results"),
        ("P1001", "John Doe", 1, "10:00 AM", 60, AppointmentType::Procedure, AppointmentStatus::Confirmed, "Minor procedure scheduled"),
        ("P1003", "Michael Johnson", 2, "03:30 PM", 30, AppointmentType::FollowUp, AppointmentStatus::Confirmed, ""),
    ];

    rows.into_iter()
        .map(
            |(patient_id, patient_name, offset, time, duration, kind, status, notes)| Appointment {
                id: RecordId::new(),
                patient_id: patient_id.to_string(),
                patient_name: patient_name.to_string(),
                doctor_id: doctor.id().to_string(),
                doctor_name: doctor.name().to_string(),
                date: days_after(today, offset),
                time: time.to_string(),
                duration_minutes: duration,
                kind,
                status,
                notes: notes.to_string(),
                reminder_set: false,
            },
        )
        .collect()
}

pub fn demo_billing(today: NaiveDate) -> Vec<BillingItem> {
    let rows = [
        ("P1001", 0, "Annual Physical Examination", 15000, false, BillingCategory::Consultation),
        ("P1001", 10, "Blood Test - Complete Blood Count", 7500, true, BillingCategory::LabTest),
        ("P1003", 5, "ECG Test", 12000, false, BillingCategory::Procedure),
        ("P1003", 20, "Prescription Medication - Antibiotics", 4550, true, BillingCategory::Medication),
        ("P1005", 0, "Chest X-Ray", 20000, false, BillingCategory::Imaging),
    ];

    rows.into_iter()
        .map(|(patient_id, days_ago, description, cents, paid, category)| BillingItem {
            id: RecordId::new(),
            patient_id: patient_id.to_string(),
            date: days_before(today, days_ago),
            description: description.to_string(),
            amount: Money::from_cents(cents),
            paid,
            category,
            notes: String::new(),
        })
        .collect()
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn journal(rows: &[(NaiveDate, &str)]) -> Vec<JournalEntry> {
    rows.iter()
        .map(|(date, text)| JournalEntry {
            date: *date,
            text: text.to_string(),
        })
        .collect()
}

fn medication(name: &str, dosage: &str, frequency: &str, purpose: &str, by: &str) -> Medication {
    Medication {
        name: name.into(),
        dosage: dosage.into(),
        frequency: frequency.into(),
        purpose: purpose.into(),
        prescribed_by: by.into(),
    }
}

fn report(title: &str, kind: &str, date: NaiveDate, author: &str) -> Report {
    Report {
        title: title.into(),
        kind: kind.into(),
        date,
        author: author.into(),
    }
}

/// Journals, medications and reports for the demo patients that have a chart.
pub fn demo_chart(today: NaiveDate) -> PatientChart {
    let journals = HashMap::from([
        (
            "P1001".to_string(),
            journal(&[
                (ymd(2025, 3, 28), "Patient presented with persistent cough and mild fever (38.1°C). Lungs clear upon auscultation. Prescribed amoxicillin 500mg TID for 7 days. Follow-up scheduled for April 4."),
                (ymd(2025, 3, 10), "Routine check-up. Blood pressure 130/85. Patient reports increased stress at work affecting sleep. Discussed sleep hygiene measures and recommended stress reduction techniques."),
                (ymd(2025, 2, 15), "Patient came in for annual physical. All vitals normal. Lab work ordered: CBC, CMP, lipid panel, A1C. Results reviewed on Feb 20 - all within normal limits."),
            ]),
        ),
        (
            "P1003".to_string(),
            journal(&[
                (ymd(2025, 3, 30), "Patient reports worsening joint pain in knees and fingers. Shows signs of early osteoarthritis. Recommended physical therapy and prescribed Naproxen 500mg BID PRN pain."),
                (ymd(2025, 2, 28), "Follow-up for hypertension. BP 142/88. Medication adjusted - increased lisinopril to 20mg daily. Encouraged continued diet modifications and daily exercise."),
                (ymd(2025, 1, 17), "Patient presented with symptoms of seasonal allergies. Prescribed loratadine 10mg daily. Discussed air purifier for home use."),
            ]),
        ),
        (
            "P1005".to_string(),
            journal(&[
                (ymd(2025, 4, 1), "Patient reports improved energy levels since starting B12 supplements. Iron levels still low - continuing iron supplementation. Schedule follow-up in 3 months."),
                (ymd(2025, 3, 15), "Discussed weight management strategies. Patient has lost 4kg since last visit. Encouraged continued progress with current diet and exercise regimen."),
                (ymd(2025, 2, 5), "Initial diagnosis of iron-deficiency anemia. Hgb 10.2 g/dL. Started on ferrous sulfate 325mg daily. B12 level also low - started B12 supplementation."),
            ]),
        ),
    ]);

    let medications = HashMap::from([
        (
            "P1001".to_string(),
            vec![
                medication("Amoxicillin", "500mg", "3 times daily for 7 days", "Bacterial infection", "Dr. Smith"),
                medication("Ibuprofen", "400mg", "Every 6 hours as needed", "Pain and inflammation", "Dr. Smith"),
            ],
        ),
        (
            "P1003".to_string(),
            vec![
                medication("Lisinopril", "20mg", "Once daily", "Hypertension", "Dr. Williams"),
                medication("Atorvastatin", "40mg", "Once daily at bedtime", "High cholesterol", "Dr. Williams"),
                medication("Metformin", "500mg", "Twice daily with meals", "Type 2 Diabetes", "Dr. Williams"),
            ],
        ),
        (
            "P1005".to_string(),
            vec![
                medication("Levothyroxine", "88mcg", "Once daily on empty stomach", "Hypothyroidism", "Dr. Garcia"),
                medication("Ferrous Sulfate", "325mg", "Twice daily with food", "Iron deficiency anemia", "Dr. Garcia"),
            ],
        ),
    ]);

    let reports = HashMap::from([
        (
            "P1001".to_string(),
            vec![
                report("Blood Test Results", "PDF", today, "Dr. Smith"),
                report("Chest X-Ray", "JPG", days_before(today, 15), "Dr. Johnson"),
            ],
        ),
        (
            "P1003".to_string(),
            vec![
                report("Cardiac Evaluation", "PDF", today, "Dr. Williams"),
                report("ECG Results", "JPG", days_before(today, 7), "Dr. Williams"),
                report("Blood Pressure Chart", "PNG", days_before(today, 30), "Dr. Baker"),
            ],
        ),
        (
            "P1005".to_string(),
            vec![report("CT Scan Results", "PDF", today, "Dr. Garcia")],
        ),
    ]);

    PatientChart::from_parts(journals, medications, reports)
}
