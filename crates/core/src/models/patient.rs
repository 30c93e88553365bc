use crate::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A roster entry. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
    /// Identifier of the owning doctor.
    pub doctor_id: String,
}

impl Patient {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        age: u32,
        gender: impl Into<String>,
        doctor_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            age,
            gender: gender.into(),
            doctor_id: doctor_id.into(),
        }
    }

    /// Case-insensitive substring match on the display name.
    ///
    /// `folded_query` must already be lower-cased.
    pub fn name_contains(&self, folded_query: &str) -> bool {
        self.name.to_lowercase().contains(folded_query)
    }
}

/// Ownership filter applied to roster queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatientScope {
    /// Patients owned by the acting doctor.
    Mine,
    /// The whole roster.
    #[default]
    All,
}

impl fmt::Display for PatientScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatientScope::Mine => write!(f, "mine"),
            PatientScope::All => write!(f, "all"),
        }
    }
}

impl FromStr for PatientScope {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mine" | "my" | "my_patients" => Ok(PatientScope::Mine),
            "all" | "all_patients" => Ok(PatientScope::All),
            other => Err(CoreError::InvalidInput(format!(
                "unknown patient scope '{}' (expected 'mine' or 'all')",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_from_str() {
        assert_eq!("MINE".parse::<PatientScope>().unwrap(), PatientScope::Mine);
        assert_eq!("my_patients".parse::<PatientScope>().unwrap(), PatientScope::Mine);
        assert_eq!("all".parse::<PatientScope>().unwrap(), PatientScope::All);
        assert!("others".parse::<PatientScope>().is_err());
    }

    #[test]
    fn test_name_contains_is_case_insensitive() {
        let patient = Patient::new("P1001", "John Doe", 45, "Male", "doc123");
        assert!(patient.name_contains("joh"));
        assert!(patient.name_contains("n do"));
        assert!(!patient.name_contains("jane"));
    }
}
