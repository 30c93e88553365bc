use super::Money;
use crate::{CoreError, CoreResult};
use chrono::NaiveDate;
use clinic_uuid::RecordId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A charge raised against a patient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingItem {
    pub id: RecordId,
    pub patient_id: String,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Money,
    #[serde(default)]
    pub paid: bool,
    pub category: BillingCategory,
    #[serde(default)]
    pub notes: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingCategory {
    Consultation,
    Procedure,
    Medication,
    LabTest,
    Imaging,
    Other,
}

impl BillingCategory {
    pub const ALL: [BillingCategory; 6] = [
        BillingCategory::Consultation,
        BillingCategory::Procedure,
        BillingCategory::Medication,
        BillingCategory::LabTest,
        BillingCategory::Imaging,
        BillingCategory::Other,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            BillingCategory::Consultation => "Consultation",
            BillingCategory::Procedure => "Procedure",
            BillingCategory::Medication => "Medication",
            BillingCategory::LabTest => "Lab Test",
            BillingCategory::Imaging => "Imaging",
            BillingCategory::Other => "Other",
        }
    }

    fn key(self) -> &'static str {
        match self {
            BillingCategory::Consultation => "consultation",
            BillingCategory::Procedure => "procedure",
            BillingCategory::Medication => "medication",
            BillingCategory::LabTest => "lab_test",
            BillingCategory::Imaging => "imaging",
            BillingCategory::Other => "other",
        }
    }
}

impl fmt::Display for BillingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for BillingCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.display_name().eq_ignore_ascii_case(s) || c.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::InvalidInput(format!("unknown billing category '{}'", s)))
    }
}

/// Totals shown in a patient's billing header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BillingSummary {
    pub outstanding: Money,
    pub paid_last_month: Money,
}
