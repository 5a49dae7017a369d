mod session_tests;

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    errors::{FinPlanError, Result},
    ledger::{EntryId, LedgerEntry, LedgerEntryInput, RecurringRule, RulePatch},
    storage::{LedgerStore, MemoryStore},
};

pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Memory store that can be told to reject specific writes.
#[derive(Default)]
pub(super) struct FlakyStore {
    pub inner: MemoryStore,
    /// Entry write (1-based, counted across the store) that fails with a storage error.
    pub fail_entry_write: Option<usize>,
    /// Rule whose `next_date` update is rejected.
    pub fail_update_for: Option<Uuid>,
    /// Every entry write reports the store as unreachable.
    pub unavailable: bool,
    pub entry_writes: AtomicUsize,
    pub rule_updates: AtomicUsize,
}

impl FlakyStore {
    pub fn with_rules(rules: Vec<RecurringRule>) -> Self {
        Self {
            inner: MemoryStore::with_rules(rules),
            ..Self::default()
        }
    }

    pub fn rule(&self, id: Uuid) -> RecurringRule {
        self.inner.get_recurring_rule(id).unwrap().expect("rule exists")
    }
}

impl LedgerStore for FlakyStore {
    fn list_recurring_rules(&self) -> Result<Vec<RecurringRule>> {
        self.inner.list_recurring_rules()
    }

    fn get_recurring_rule(&self, id: Uuid) -> Result<Option<RecurringRule>> {
        self.inner.get_recurring_rule(id)
    }

    fn add_recurring_rule(&self, rule: RecurringRule) -> Result<Uuid> {
        self.inner.add_recurring_rule(rule)
    }

    fn update_recurring_rule(&self, id: Uuid, patch: &RulePatch) -> Result<()> {
        self.rule_updates.fetch_add(1, Ordering::SeqCst);
        if self.fail_update_for == Some(id) {
            return Err(FinPlanError::Storage("rule update rejected".into()));
        }
        self.inner.update_recurring_rule(id, patch)
    }

    fn delete_recurring_rule(&self, id: Uuid) -> Result<()> {
        self.inner.delete_recurring_rule(id)
    }

    fn list_ledger_entries(&self) -> Result<Vec<LedgerEntry>> {
        self.inner.list_ledger_entries()
    }

    fn add_ledger_entry(&self, entry: LedgerEntryInput) -> Result<EntryId> {
        let attempt = self.entry_writes.fetch_add(1, Ordering::SeqCst) + 1;
        if self.unavailable {
            return Err(FinPlanError::StoreUnavailable("database closed".into()));
        }
        if self.fail_entry_write == Some(attempt) {
            return Err(FinPlanError::Storage("quota exceeded".into()));
        }
        self.inner.add_ledger_entry(entry)
    }
}
