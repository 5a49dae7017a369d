use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::frequency::Frequency;

/// What a recurring rule pays into.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    #[default]
    Expense,
    Savings,
}

/// A user-defined schedule (bill, subscription, SIP) that periodically produces ledger entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecurringRule {
    pub id: Uuid,
    #[serde(default, rename = "type")]
    pub kind: RuleKind,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub next_date: Option<NaiveDate>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl RecurringRule {
    pub fn new(
        category: impl Into<String>,
        amount: f64,
        frequency: Frequency,
        next_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: RuleKind::Expense,
            category: category.into(),
            description: None,
            amount,
            currency: None,
            frequency,
            next_date: Some(next_date),
            is_active: true,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn with_kind(mut self, kind: RuleKind) -> Self {
        self.kind = kind;
        self
    }

    /// Description used for generated entries, falling back to the category.
    pub fn entry_description(&self) -> &str {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .unwrap_or(&self.category)
    }

    /// Currency used for generated entries, falling back to `default_currency`.
    pub fn entry_currency<'a>(&'a self, default_currency: &'a str) -> &'a str {
        self.currency
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .unwrap_or(default_currency)
    }

    /// Applies a patch in place. Fields left as `None` keep their current value.
    pub fn apply(&mut self, patch: &RulePatch) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(category) = &patch.category {
            self.category = category.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(currency) = &patch.currency {
            self.currency = currency.clone();
        }
        if let Some(frequency) = &patch.frequency {
            self.frequency = frequency.clone();
        }
        if let Some(next_date) = patch.next_date {
            self.next_date = Some(next_date);
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
    }
}

/// Partial update for a stored rule.
///
/// `description` and `currency` are doubly optional: `Some(None)` clears the field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RulePatch {
    pub kind: Option<RuleKind>,
    pub category: Option<String>,
    pub description: Option<Option<String>>,
    pub amount: Option<f64>,
    pub currency: Option<Option<String>>,
    pub frequency: Option<Frequency>,
    pub next_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

impl RulePatch {
    /// The only patch the catch-up pass ever writes.
    pub fn next_date(date: NaiveDate) -> Self {
        Self {
            next_date: Some(date),
            ..Self::default()
        }
    }

    pub fn active(is_active: bool) -> Self {
        Self {
            is_active: Some(is_active),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
