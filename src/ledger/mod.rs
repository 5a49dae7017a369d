//! Ledger records: recurring rules, ledger entries and schedule arithmetic.

pub mod entry;
pub mod frequency;
pub mod rule;

pub use entry::{EntryId, LedgerEntry, LedgerEntryInput};
pub use frequency::Frequency;
pub use rule::{RecurringRule, RuleKind, RulePatch};
