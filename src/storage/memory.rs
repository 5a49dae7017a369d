use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::LedgerStore;
use crate::{
    errors::{FinPlanError, Result},
    ledger::{EntryId, LedgerEntry, LedgerEntryInput, RecurringRule, RulePatch},
};

/// Complete contents of a store: rules, entries and the next entry key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    #[serde(default)]
    pub rules: Vec<RecurringRule>,
    #[serde(default)]
    pub entries: Vec<LedgerEntry>,
    #[serde(default = "first_entry_id")]
    pub next_entry_id: EntryId,
}

fn first_entry_id() -> EntryId {
    1
}

impl Default for StoreSnapshot {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            entries: Vec::new(),
            next_entry_id: first_entry_id(),
        }
    }
}

impl StoreSnapshot {
    pub(crate) fn rule_mut(&mut self, id: Uuid) -> Result<&mut RecurringRule> {
        self.rules
            .iter_mut()
            .find(|rule| rule.id == id)
            .ok_or(FinPlanError::RuleNotFound(id))
    }

    pub(crate) fn insert_rule(&mut self, rule: RecurringRule) -> Result<Uuid> {
        if self.rules.iter().any(|existing| existing.id == rule.id) {
            return Err(FinPlanError::Storage(format!(
                "recurring rule {} already exists",
                rule.id
            )));
        }
        let id = rule.id;
        self.rules.push(rule);
        Ok(id)
    }

    pub(crate) fn remove_rule(&mut self, id: Uuid) -> Result<()> {
        let before = self.rules.len();
        self.rules.retain(|rule| rule.id != id);
        if self.rules.len() == before {
            return Err(FinPlanError::RuleNotFound(id));
        }
        Ok(())
    }

    pub(crate) fn insert_entry(&mut self, input: LedgerEntryInput) -> EntryId {
        let id = self.next_entry_id;
        self.next_entry_id += 1;
        self.entries.push(LedgerEntry { id, input });
        id
    }
}

/// In-process store. Clones of the data are handed out; the store keeps the originals.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<StoreSnapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            data: Mutex::new(snapshot),
        }
    }

    /// Seeds the store with rules, returning it for chaining in tests and demos.
    pub fn with_rules(rules: impl IntoIterator<Item = RecurringRule>) -> Self {
        Self::from_snapshot(StoreSnapshot {
            rules: rules.into_iter().collect(),
            ..StoreSnapshot::default()
        })
    }

    pub fn snapshot(&self) -> Result<StoreSnapshot> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreSnapshot>> {
        self.data
            .lock()
            .map_err(|_| FinPlanError::StoreUnavailable("memory store lock poisoned".into()))
    }
}

impl LedgerStore for MemoryStore {
    fn list_recurring_rules(&self) -> Result<Vec<RecurringRule>> {
        Ok(self.lock()?.rules.clone())
    }

    fn get_recurring_rule(&self, id: Uuid) -> Result<Option<RecurringRule>> {
        Ok(self.lock()?.rules.iter().find(|rule| rule.id == id).cloned())
    }

    fn add_recurring_rule(&self, rule: RecurringRule) -> Result<Uuid> {
        self.lock()?.insert_rule(rule)
    }

    fn update_recurring_rule(&self, id: Uuid, patch: &RulePatch) -> Result<()> {
        self.lock()?.rule_mut(id)?.apply(patch);
        Ok(())
    }

    fn delete_recurring_rule(&self, id: Uuid) -> Result<()> {
        self.lock()?.remove_rule(id)
    }

    fn list_ledger_entries(&self) -> Result<Vec<LedgerEntry>> {
        Ok(self.lock()?.entries.clone())
    }

    fn add_ledger_entry(&self, entry: LedgerEntryInput) -> Result<EntryId> {
        Ok(self.lock()?.insert_entry(entry))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::ledger::Frequency;

    fn rule(category: &str) -> RecurringRule {
        RecurringRule::new(
            category,
            10.0,
            Frequency::Weekly,
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
        )
    }

    #[test]
    fn entry_ids_increment_from_one() {
        let store = MemoryStore::new();
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let first = store
            .add_ledger_entry(LedgerEntryInput::manual("Lunch", 250.0, "Food", "INR", date))
            .unwrap();
        let second = store
            .add_ledger_entry(LedgerEntryInput::manual("Tea", 30.0, "Food", "INR", date))
            .unwrap();
        assert_eq!((first, second), (1, 2));
    }

    #[test]
    fn active_listing_skips_paused_rules_and_keeps_order() {
        let mut paused = rule("Paused");
        paused.is_active = false;
        let store = MemoryStore::with_rules(vec![rule("A"), paused, rule("B")]);
        let active = store.list_active_recurring_rules().unwrap();
        let names: Vec<_> = active.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn updating_unknown_rule_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update_recurring_rule(Uuid::new_v4(), &RulePatch::active(false))
            .unwrap_err();
        assert!(matches!(err, FinPlanError::RuleNotFound(_)));
    }

    #[test]
    fn duplicate_rule_id_is_rejected() {
        let original = rule("Gym");
        let store = MemoryStore::with_rules(vec![original.clone()]);
        assert!(store.add_recurring_rule(original).is_err());
    }
}
