use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Free-text journal note on a patient's chart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub date: NaiveDate,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub purpose: String,
    pub prescribed_by: String,
}

/// An attached document such as a lab result or scan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    /// File type label, e.g. `PDF` or `JPG`.
    #[serde(rename = "type")]
    pub kind: String,
    pub date: NaiveDate,
    pub author: String,
}
