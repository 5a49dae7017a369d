use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{memory::StoreSnapshot, LedgerStore};
use crate::{
    errors::{FinPlanError, Result},
    ledger::{EntryId, LedgerEntry, LedgerEntryInput, RecurringRule, RulePatch},
    utils::paths::write_atomic,
};

pub const STORE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreDocument {
    schema_version: u32,
    #[serde(flatten)]
    data: StoreSnapshot,
}

/// File-backed store that rewrites a single JSON document after every mutation.
///
/// Mutations are staged on a copy and only become visible once the file write
/// succeeds, so a failed write leaves both disk and memory unchanged.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    data: Mutex<StoreSnapshot>,
}

impl JsonStore {
    /// Opens the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = if path.exists() {
            load_snapshot(&path)?
        } else {
            StoreSnapshot::default()
        };
        tracing::debug!(
            path = %path.display(),
            rules = data.rules.len(),
            entries = data.entries.len(),
            "opened json store"
        );
        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreSnapshot>> {
        self.data
            .lock()
            .map_err(|_| FinPlanError::StoreUnavailable("json store lock poisoned".into()))
    }

    fn mutate<T>(&self, change: impl FnOnce(&mut StoreSnapshot) -> Result<T>) -> Result<T> {
        let mut guard = self.lock()?;
        let mut staged = guard.clone();
        let value = change(&mut staged)?;
        save_snapshot(&staged, &self.path)?;
        *guard = staged;
        Ok(value)
    }
}

impl LedgerStore for JsonStore {
    fn list_recurring_rules(&self) -> Result<Vec<RecurringRule>> {
        Ok(self.lock()?.rules.clone())
    }

    fn get_recurring_rule(&self, id: Uuid) -> Result<Option<RecurringRule>> {
        Ok(self.lock()?.rules.iter().find(|rule| rule.id == id).cloned())
    }

    fn add_recurring_rule(&self, rule: RecurringRule) -> Result<Uuid> {
        self.mutate(|data| data.insert_rule(rule))
    }

    fn update_recurring_rule(&self, id: Uuid, patch: &RulePatch) -> Result<()> {
        self.mutate(|data| {
            data.rule_mut(id)?.apply(patch);
            Ok(())
        })
    }

    fn delete_recurring_rule(&self, id: Uuid) -> Result<()> {
        self.mutate(|data| data.remove_rule(id))
    }

    fn list_ledger_entries(&self) -> Result<Vec<LedgerEntry>> {
        Ok(self.lock()?.entries.clone())
    }

    fn add_ledger_entry(&self, entry: LedgerEntryInput) -> Result<EntryId> {
        self.mutate(|data| Ok(data.insert_entry(entry)))
    }
}

fn load_snapshot(path: &Path) -> Result<StoreSnapshot> {
    let data = fs::read_to_string(path)?;
    let document: StoreDocument = serde_json::from_str(&data)?;
    if document.schema_version > STORE_SCHEMA_VERSION {
        return Err(FinPlanError::Storage(format!(
            "store `{}` is from a newer schema version ({})",
            path.display(),
            document.schema_version
        )));
    }
    Ok(document.data)
}

fn save_snapshot(data: &StoreSnapshot, path: &Path) -> Result<()> {
    let document = StoreDocument {
        schema_version: STORE_SCHEMA_VERSION,
        data: data.clone(),
    };
    let json = serde_json::to_string_pretty(&document)?;
    write_atomic(path, &json)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tempfile::TempDir;

    use super::*;
    use crate::{ledger::Frequency, utils::paths::tmp_path};

    fn store_in_temp_dir() -> (JsonStore, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let store = JsonStore::open(temp.path().join("finplan.json")).expect("open store");
        (store, temp)
    }

    #[test]
    fn missing_file_opens_empty() {
        let (store, _guard) = store_in_temp_dir();
        assert!(store.list_recurring_rules().unwrap().is_empty());
        assert!(store.list_ledger_entries().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn mutations_survive_reopen() {
        let (store, _guard) = store_in_temp_dir();
        let next = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        let rule = RecurringRule::new("Internet", 999.0, Frequency::Monthly, next);
        let id = store.add_recurring_rule(rule).unwrap();
        let moved = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        store
            .update_recurring_rule(id, &RulePatch::next_date(moved))
            .unwrap();

        let reopened = JsonStore::open(store.path()).unwrap();
        let stored = reopened.get_recurring_rule(id).unwrap().expect("rule kept");
        assert_eq!(stored.next_date, Some(moved));
        assert!(!tmp_path(store.path()).exists());
    }

    #[test]
    fn entry_ids_continue_after_reopen() {
        let (store, _guard) = store_in_temp_dir();
        let date = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        store
            .add_ledger_entry(LedgerEntryInput::manual("Lunch", 250.0, "Food", "INR", date))
            .unwrap();

        let reopened = JsonStore::open(store.path()).unwrap();
        let id = reopened
            .add_ledger_entry(LedgerEntryInput::manual("Dinner", 400.0, "Food", "INR", date))
            .unwrap();
        assert_eq!(id, 2);
    }

    #[test]
    fn newer_schema_is_refused() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("finplan.json");
        fs::write(&path, r#"{"schemaVersion": 99, "rules": [], "entries": []}"#).unwrap();
        let err = JsonStore::open(&path).unwrap_err();
        assert!(matches!(err, FinPlanError::Storage(_)));
    }

    #[test]
    fn failed_update_leaves_memory_unchanged() {
        let (store, _guard) = store_in_temp_dir();
        let err = store
            .update_recurring_rule(Uuid::new_v4(), &RulePatch::active(false))
            .unwrap_err();
        assert!(matches!(err, FinPlanError::RuleNotFound(_)));
        assert!(!store.path().exists());
    }
}
