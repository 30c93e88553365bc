//! YAML file repositories.
//!
//! Each collection lives in one YAML file holding a sequence of records. Files are read once
//! when the repository is opened and rewritten in full after every successful mutation.
//!
//! Loading is fail-soft per record: an element that does not decode (bad date, unknown enum
//! value, missing field) is logged and skipped, so one corrupt entry cannot hide the rest of
//! the ledger or schedule. Writes go to a sibling temporary file which is then renamed over the
//! target, so readers never observe a half-written file.

use super::{
    insert_record, modify_record, remove_record, replace_record, PatientRepository, Record,
    RecordRepository, Visibility, WriteGuard,
};
use crate::error::{CoreError, CoreResult};
use crate::models::Patient;
use clinic_uuid::RecordId;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Record store persisted to a single YAML file.
#[derive(Debug)]
pub struct YamlRepository<T> {
    path: PathBuf,
    records: RwLock<Vec<T>>,
}

impl<T: Record> YamlRepository<T> {
    /// Open the file at `path`; a missing file is an empty collection.
    pub fn open(path: impl Into<PathBuf>) -> CoreResult<Self> {
        let path = path.into();
        let records = if path.exists() {
            read_records::<T>(&path, T::KIND)?
        } else {
            Vec::new()
        };
        tracing::debug!("opened {} with {} {} records", path.display(), records.len(), T::KIND);

        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    /// Open the file at `path`, writing `seed()` to it first if it does not exist yet.
    pub fn open_or_seed(path: impl Into<PathBuf>, seed: impl FnOnce() -> Vec<T>) -> CoreResult<Self> {
        let path = path.into();
        if !path.exists() {
            let records = seed();
            write_yaml_atomic(&path, &records)?;
            tracing::info!("seeded {} with {} {} records", path.display(), records.len(), T::KIND);
        }
        Self::open(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `op` to a copy of the records and persist it; the in-memory state only changes
    /// once the file write succeeded.
    fn commit<R>(&self, op: impl FnOnce(&mut Vec<T>) -> CoreResult<R>) -> CoreResult<R> {
        let mut records = self.records.write()?;
        let mut next = records.clone();
        let out = op(&mut next)?;
        write_yaml_atomic(&self.path, &next)?;
        *records = next;
        Ok(out)
    }
}

impl<T: Record> RecordRepository<T> for YamlRepository<T> {
    fn list(&self) -> CoreResult<Vec<T>> {
        Ok(self.records.read()?.clone())
    }

    fn insert_with(&self, record: T, guard: WriteGuard<'_, T>) -> CoreResult<()> {
        self.commit(|records| insert_record(records, record, guard))
    }

    fn replace_with(&self, record: T, guard: WriteGuard<'_, T>) -> CoreResult<T> {
        self.commit(|records| replace_record(records, record, guard))
    }

    fn modify_where(
        &self,
        id: RecordId,
        visible: Visibility<'_, T>,
        change: &mut dyn FnMut(&mut T),
    ) -> CoreResult<T> {
        self.commit(|records| modify_record(records, id, visible, change))
    }

    fn remove_where(&self, id: RecordId, visible: Visibility<'_, T>) -> CoreResult<T> {
        self.commit(|records| remove_record(records, id, visible))
    }
}

/// Patient roster read from a YAML file.
#[derive(Clone, Debug)]
pub struct YamlPatientRoster {
    patients: Vec<Patient>,
}

impl YamlPatientRoster {
    pub fn open(path: &Path) -> CoreResult<Self> {
        let patients = if path.exists() {
            read_records::<Patient>(path, "patient")?
        } else {
            Vec::new()
        };
        Ok(Self { patients })
    }

    /// Open the roster, writing `seed()` first if the file does not exist.
    pub fn open_or_seed(path: &Path, seed: impl FnOnce() -> Vec<Patient>) -> CoreResult<Self> {
        if !path.exists() {
            write_yaml_atomic(path, &seed())?;
        }
        Self::open(path)
    }
}

impl PatientRepository for YamlPatientRoster {
    fn roster(&self) -> CoreResult<Vec<Patient>> {
        Ok(self.patients.clone())
    }
}

/// Decode a YAML sequence, skipping elements that fail to decode.
fn read_records<T: DeserializeOwned>(path: &Path, kind: &str) -> CoreResult<Vec<T>> {
    let contents = fs::read_to_string(path).map_err(CoreError::FileRead)?;
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: serde_yaml::Value =
        serde_yaml::from_str(&contents).map_err(CoreError::YamlDeserialization)?;
    let elements = match value {
        serde_yaml::Value::Sequence(elements) => elements,
        serde_yaml::Value::Null => return Ok(Vec::new()),
        _ => {
            return Err(CoreError::InvalidInput(format!(
                "{} does not contain a list of {} records",
                path.display(),
                kind
            )))
        }
    };

    let mut records = Vec::with_capacity(elements.len());
    for (index, element) in elements.into_iter().enumerate() {
        match serde_yaml::from_value::<T>(element) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(
                    "skipping unreadable {} record #{} in {}: {}",
                    kind,
                    index,
                    path.display(),
                    e
                );
            }
        }
    }
    Ok(records)
}

/// Serialise `value` as YAML and atomically replace `path` with it.
pub(crate) fn write_yaml_atomic<V: Serialize + ?Sized>(path: &Path, value: &V) -> CoreResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(CoreError::StorageDirCreation)?;
    }

    let yaml = serde_yaml::to_string(value).map_err(CoreError::YamlSerialization)?;

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    fs::write(&tmp_path, yaml).map_err(CoreError::FileWrite)?;
    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CoreError::FileWrite(e)
    })
}
