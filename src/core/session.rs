//! Application session: the loaded view of the store plus the once-per-session catch-up.

use uuid::Uuid;

use crate::{
    clock::Clock,
    core::{
        processor::{PassReport, RecurringRuleProcessor},
        services::{RecurringRuleService, RuleDraft},
    },
    errors::{FinPlanError, Result},
    ledger::{LedgerEntry, RecurringRule, RulePatch},
    storage::LedgerStore,
};

/// Holds the in-memory view that frontends render and drives the catch-up pass.
pub struct Session {
    store: Box<dyn LedgerStore>,
    clock: Box<dyn Clock>,
    default_currency: String,
    entries: Vec<LedgerEntry>,
    rules: Vec<RecurringRule>,
    loaded: bool,
    caught_up: bool,
}

impl Session {
    pub fn new(
        store: Box<dyn LedgerStore>,
        clock: Box<dyn Clock>,
        default_currency: impl Into<String>,
    ) -> Self {
        Self {
            store,
            clock,
            default_currency: default_currency.into(),
            entries: Vec::new(),
            rules: Vec::new(),
            loaded: false,
            caught_up: false,
        }
    }

    /// Reads entries and rules from the store into the session view.
    pub fn load(&mut self) -> Result<()> {
        self.refresh()?;
        self.loaded = true;
        tracing::debug!(
            entries = self.entries.len(),
            rules = self.rules.len(),
            "session loaded"
        );
        Ok(())
    }

    /// Runs the catch-up pass over the loaded rules.
    ///
    /// Must follow [`Session::load`]. Only the first call in a session runs a
    /// pass; later calls return `Ok(None)` without touching the store. The view
    /// is refreshed once, after the pass, and only when entries were generated.
    pub fn run_catch_up(&mut self) -> Result<Option<PassReport>> {
        if !self.loaded {
            return Err(FinPlanError::SessionNotLoaded);
        }
        if self.caught_up {
            tracing::debug!("catch-up already ran this session");
            return Ok(None);
        }
        self.caught_up = true;

        let processor = RecurringRuleProcessor::new(self.store.as_ref(), &self.default_currency);
        let report = processor.run_pass(&self.rules, self.clock.as_ref())?;
        if report.needs_refresh() {
            self.refresh()?;
        }
        Ok(Some(report))
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn rules(&self) -> &[RecurringRule] {
        &self.rules
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn has_caught_up(&self) -> bool {
        self.caught_up
    }

    pub fn default_currency(&self) -> &str {
        &self.default_currency
    }

    pub fn store(&self) -> &dyn LedgerStore {
        self.store.as_ref()
    }

    pub fn add_rule(&mut self, draft: RuleDraft) -> Result<RecurringRule> {
        let rule = self.rule_service().add(draft)?;
        self.refresh_rules()?;
        Ok(rule)
    }

    pub fn update_rule(&mut self, id: Uuid, patch: RulePatch) -> Result<RecurringRule> {
        let rule = self.rule_service().update(id, patch)?;
        self.refresh_rules()?;
        Ok(rule)
    }

    pub fn toggle_rule(&mut self, id: Uuid) -> Result<bool> {
        let is_active = self.rule_service().toggle(id)?;
        self.refresh_rules()?;
        Ok(is_active)
    }

    pub fn delete_rule(&mut self, id: Uuid) -> Result<()> {
        self.rule_service().delete(id)?;
        self.refresh_rules()
    }

    fn rule_service(&self) -> RecurringRuleService<'_> {
        RecurringRuleService::new(self.store.as_ref())
    }

    fn refresh(&mut self) -> Result<()> {
        self.entries = self.store.list_ledger_entries()?;
        self.refresh_rules()
    }

    fn refresh_rules(&mut self) -> Result<()> {
        self.rules = self.store.list_recurring_rules()?;
        Ok(())
    }
}
