pub mod json_backend;
pub mod memory;

use uuid::Uuid;

use crate::{
    errors::Result,
    ledger::{EntryId, LedgerEntry, LedgerEntryInput, RecurringRule, RulePatch},
};

/// Key-indexed record store holding ledger entries and recurring rules.
///
/// Listing methods return records in insertion order so passes are deterministic.
pub trait LedgerStore: Send + Sync {
    fn list_recurring_rules(&self) -> Result<Vec<RecurringRule>>;

    fn list_active_recurring_rules(&self) -> Result<Vec<RecurringRule>> {
        Ok(self
            .list_recurring_rules()?
            .into_iter()
            .filter(|rule| rule.is_active)
            .collect())
    }

    fn get_recurring_rule(&self, id: Uuid) -> Result<Option<RecurringRule>>;
    fn add_recurring_rule(&self, rule: RecurringRule) -> Result<Uuid>;
    fn update_recurring_rule(&self, id: Uuid, patch: &RulePatch) -> Result<()>;
    fn delete_recurring_rule(&self, id: Uuid) -> Result<()>;

    fn list_ledger_entries(&self) -> Result<Vec<LedgerEntry>>;
    fn add_ledger_entry(&self, entry: LedgerEntryInput) -> Result<EntryId>;
}

pub use json_backend::{JsonStore, STORE_SCHEMA_VERSION};
pub use memory::MemoryStore;
