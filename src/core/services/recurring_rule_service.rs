//! Validated mutations for recurring rules.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    errors::{FinPlanError, Result},
    ledger::{Frequency, RecurringRule, RuleKind, RulePatch},
    storage::LedgerStore,
};

/// Form input for a new recurring rule.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleDraft {
    pub kind: RuleKind,
    pub category: String,
    pub description: Option<String>,
    pub amount: f64,
    pub currency: Option<String>,
    pub frequency: Frequency,
    pub next_date: NaiveDate,
}

impl RuleDraft {
    pub fn new(category: impl Into<String>, amount: f64, next_date: NaiveDate) -> Self {
        Self {
            kind: RuleKind::Expense,
            category: category.into(),
            description: None,
            amount,
            currency: None,
            frequency: Frequency::Monthly,
            next_date,
        }
    }
}

/// Create, edit, toggle and delete operations over the rules in a [`LedgerStore`].
///
/// Deleting or editing a rule never touches entries it already generated.
pub struct RecurringRuleService<'a> {
    store: &'a dyn LedgerStore,
}

impl<'a> RecurringRuleService<'a> {
    pub fn new(store: &'a dyn LedgerStore) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<RecurringRule>> {
        self.store.list_recurring_rules()
    }

    /// Stores a new active rule built from `draft`.
    pub fn add(&self, draft: RuleDraft) -> Result<RecurringRule> {
        let category = validate_category(&draft.category)?;
        validate_amount(draft.amount)?;
        let rule = RecurringRule {
            id: Uuid::new_v4(),
            kind: draft.kind,
            category,
            description: normalize_text(draft.description),
            amount: draft.amount,
            currency: normalize_currency(draft.currency),
            frequency: draft.frequency,
            next_date: Some(draft.next_date),
            is_active: true,
        };
        self.store.add_recurring_rule(rule.clone())?;
        tracing::info!(rule = %rule.id, category = %rule.category, "recurring rule added");
        Ok(rule)
    }

    /// Applies `patch` after validating the fields it changes.
    pub fn update(&self, id: Uuid, mut patch: RulePatch) -> Result<RecurringRule> {
        let mut rule = self.require(id)?;
        if let Some(category) = patch.category.take() {
            patch.category = Some(validate_category(&category)?);
        }
        if let Some(amount) = patch.amount {
            validate_amount(amount)?;
        }
        if let Some(description) = patch.description.take() {
            patch.description = Some(normalize_text(description));
        }
        if let Some(currency) = patch.currency.take() {
            patch.currency = Some(normalize_currency(currency));
        }
        if patch.is_empty() {
            return Ok(rule);
        }
        self.store.update_recurring_rule(id, &patch)?;
        rule.apply(&patch);
        tracing::info!(rule = %id, "recurring rule updated");
        Ok(rule)
    }

    /// Flips the active flag and returns the new state.
    pub fn toggle(&self, id: Uuid) -> Result<bool> {
        let rule = self.require(id)?;
        let is_active = !rule.is_active;
        self.store
            .update_recurring_rule(id, &RulePatch::active(is_active))?;
        tracing::info!(rule = %id, is_active, "recurring rule toggled");
        Ok(is_active)
    }

    pub fn delete(&self, id: Uuid) -> Result<()> {
        self.store.delete_recurring_rule(id)?;
        tracing::info!(rule = %id, "recurring rule deleted");
        Ok(())
    }

    fn require(&self, id: Uuid) -> Result<RecurringRule> {
        self.store
            .get_recurring_rule(id)?
            .ok_or(FinPlanError::RuleNotFound(id))
    }
}

fn validate_category(category: &str) -> Result<String> {
    let trimmed = category.trim();
    if trimmed.is_empty() {
        return Err(FinPlanError::InvalidRule("category is required".into()));
    }
    Ok(trimmed.to_string())
}

fn validate_amount(amount: f64) -> Result<()> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(FinPlanError::InvalidRule(format!(
            "amount must be greater than zero, got {}",
            amount
        )))
    }
}

fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn normalize_currency(value: Option<String>) -> Option<String> {
    normalize_text(value).map(|code| code.to_ascii_uppercase())
}
