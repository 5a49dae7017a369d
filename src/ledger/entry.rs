use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::rule::RecurringRule;

/// Store-assigned key of a ledger entry. Keys start at 1 and only grow.
pub type EntryId = u64;

/// A persisted ledger entry, either entered manually or generated from a rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: EntryId,
    #[serde(flatten)]
    pub input: LedgerEntryInput,
}

impl std::ops::Deref for LedgerEntry {
    type Target = LedgerEntryInput;

    fn deref(&self) -> &Self::Target {
        &self.input
    }
}

/// Fields of a ledger entry before the store assigns its key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntryInput {
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub currency: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_rule_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntryInput {
    /// Builds the entry for one occurrence of `rule` dated `date`.
    pub fn for_occurrence(
        rule: &RecurringRule,
        date: NaiveDate,
        default_currency: &str,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            description: rule.entry_description().to_string(),
            amount: rule.amount,
            category: rule.category.clone(),
            currency: rule.entry_currency(default_currency).to_string(),
            date,
            is_recurring: true,
            recurring_rule_id: Some(rule.id),
            created_at,
        }
    }

    /// Builds a manually entered entry with no rule attached.
    pub fn manual(
        description: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
        currency: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            category: category.into(),
            currency: currency.into(),
            date,
            is_recurring: false,
            recurring_rule_id: None,
            created_at: Utc::now(),
        }
    }
}
