//! JSON file store.
//!
//! Each collection is one pretty-printed JSON array in the data directory:
//!
//! ```text
//! data/
//! ├── companies.json
//! ├── drivers.json
//! └── shifts.json
//! ```
//!
//! A missing file reads as an empty collection. Each write goes to its own
//! sibling `<file>.<uuid>.tmp` file that is then renamed over the original,
//! so a crash mid-write leaves the previous version intact and concurrent
//! writers never share a temp file. The last rename wins.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{Company, Driver, ShiftRecord};

use super::BillingStore;

const COMPANIES_FILE: &str = "companies.json";
const DRIVERS_FILE: &str = "drivers.json";
const SHIFTS_FILE: &str = "shifts.json";

/// A [`BillingStore`] backed by JSON files in one directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Opens (and creates, if needed) the data directory.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use diaria_ledger::store::JsonFileStore;
    ///
    /// let store = JsonFileStore::open("./data")?;
    /// # Ok::<(), diaria_ledger::error::EngineError>(())
    /// ```
    pub fn open<P: AsRef<Path>>(dir: P) -> EngineResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| {
            EngineError::persistence("open", format!("{}: {}", dir.display(), e))
        })?;
        Ok(Self { dir })
    }

    /// The data directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read_collection<T: DeserializeOwned>(
        &self,
        file: &str,
        operation: &str,
    ) -> EngineResult<Vec<T>> {
        let path = self.dir.join(file);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| EngineError::persistence(operation, format!("{}: {}", path.display(), e)))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let items: Vec<T> = serde_json::from_str(&content)
            .map_err(|e| EngineError::persistence(operation, format!("{}: {}", path.display(), e)))?;
        debug!(file = %path.display(), count = items.len(), "Loaded collection");
        Ok(items)
    }

    fn write_collection<T: Serialize>(
        &self,
        file: &str,
        items: &[T],
        operation: &str,
    ) -> EngineResult<()> {
        let path = self.dir.join(file);
        let tmp_path = self.dir.join(format!("{}.{}.tmp", file, Uuid::new_v4()));

        let content = serde_json::to_string_pretty(items)
            .map_err(|e| EngineError::persistence(operation, e))?;
        fs::write(&tmp_path, content).map_err(|e| {
            EngineError::persistence(operation, format!("{}: {}", tmp_path.display(), e))
        })?;
        if let Err(e) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(EngineError::persistence(
                operation,
                format!("{}: {}", path.display(), e),
            ));
        }

        debug!(file = %path.display(), count = items.len(), "Persisted collection");
        Ok(())
    }
}

impl BillingStore for JsonFileStore {
    fn load_companies(&self) -> EngineResult<Vec<Company>> {
        self.read_collection(COMPANIES_FILE, "load_companies")
    }

    fn persist_companies(&self, companies: &[Company]) -> EngineResult<()> {
        self.write_collection(COMPANIES_FILE, companies, "persist_companies")
    }

    fn load_drivers(&self) -> EngineResult<Vec<Driver>> {
        self.read_collection(DRIVERS_FILE, "load_drivers")
    }

    fn persist_drivers(&self, drivers: &[Driver]) -> EngineResult<()> {
        self.write_collection(DRIVERS_FILE, drivers, "persist_drivers")
    }

    fn load_shift_ledger(&self) -> EngineResult<Vec<ShiftRecord>> {
        self.read_collection(SHIFTS_FILE, "load_shift_ledger")
    }

    fn persist_shift_ledger(&self, records: &[ShiftRecord]) -> EngineResult<()> {
        self.write_collection(SHIFTS_FILE, records, "persist_shift_ledger")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;
    use chrono::NaiveDateTime;
    use rust_decimal::Decimal;

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_missing_files_read_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        assert!(store.load_companies().unwrap().is_empty());
        assert!(store.load_shift_ledger().unwrap().is_empty());
    }

    #[test]
    fn test_drivers_round_trip_keeps_leading_zeros() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        let drivers = vec![Driver {
            name: "Maria".to_string(),
            tax_id: "00098765432".to_string(),
            status: Status::Inactive,
        }];
        store.persist_drivers(&drivers).unwrap();

        let reopened = JsonFileStore::open(dir.path()).unwrap();
        assert_eq!(reopened.load_drivers().unwrap(), drivers);
    }

    fn leftover_tmp_files(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".tmp"))
            .collect()
    }

    #[test]
    fn test_two_stores_on_one_directory_leave_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let first = JsonFileStore::open(dir.path()).unwrap();
        let second = JsonFileStore::open(dir.path()).unwrap();

        let handles: Vec<_> = [first, second]
            .into_iter()
            .enumerate()
            .map(|(i, store)| {
                std::thread::spawn(move || {
                    for round in 0..20 {
                        let drivers = vec![Driver {
                            name: format!("Driver {}-{}", i, round),
                            tax_id: format!("{:03}", round),
                            status: Status::Active,
                        }];
                        store.persist_drivers(&drivers).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let reopened = JsonFileStore::open(dir.path()).unwrap();
        let drivers = reopened.load_drivers().unwrap();
        assert_eq!(drivers.len(), 1);
        assert!(drivers[0].name.ends_with("-19"));
        assert!(leftover_tmp_files(dir.path()).is_empty());
    }

    #[test]
    fn test_shift_ledger_round_trip_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        let records: Vec<ShiftRecord> = (0..3)
            .map(|i| ShiftRecord {
                start_time: make_datetime("2026-01-12 09:00:00"),
                end_time: make_datetime("2026-01-12 17:00:00"),
                company_name: "Rapido Express".to_string(),
                driver_name: format!("Driver {}", i),
                vehicle_type: "moto".to_string(),
                driver_tax_id: format!("00{}", i),
                amount_charged: Decimal::new(12050, 2),
                amount_paid: Decimal::new(9000, 2),
                minimum_guaranteed_charged: false,
                minimum_guaranteed_paid: false,
                registered_by: "admin".to_string(),
            })
            .collect();
        store.persist_shift_ledger(&records).unwrap();
        assert_eq!(store.load_shift_ledger().unwrap(), records);
    }

    #[test]
    fn test_corrupt_file_is_persistence_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("companies.json"), "{ not json").unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        match store.load_companies() {
            Err(EngineError::Persistence { operation, .. }) => {
                assert_eq!(operation, "load_companies")
            }
            other => panic!("Expected Persistence error, got {:?}", other),
        }
    }
}
