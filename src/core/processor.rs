//! Catch-up generation of ledger entries from recurring rules.
//!
//! A pass captures one reference instant, then walks every active rule in the
//! order supplied. Each rule emits one entry per occurrence dated on or before
//! the reference date and has its `next_date` advanced with a single update.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    clock::Clock,
    errors::Result,
    ledger::{LedgerEntry, LedgerEntryInput, RecurringRule, RulePatch},
    storage::LedgerStore,
};

/// Which store call failed while processing a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    /// Writing the entry for `occurrence` failed; the rule stops there.
    Entry,
    /// Entries were written but persisting `next_date = occurrence` failed.
    Schedule,
}

#[derive(Debug, Clone)]
pub struct RuleFailure {
    pub rule_id: Uuid,
    pub stage: FailureStage,
    pub occurrence: NaiveDate,
    pub message: String,
}

/// Schedule movement of one rule during a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleAdvance {
    pub rule_id: Uuid,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub generated: usize,
}

/// Outcome of a catch-up pass, returned so the caller decides how to refresh.
#[derive(Debug, Clone)]
pub struct PassReport {
    pub now: DateTime<Utc>,
    pub today: NaiveDate,
    pub generated: Vec<LedgerEntry>,
    pub advanced: Vec<RuleAdvance>,
    pub failures: Vec<RuleFailure>,
}

impl PassReport {
    fn new(now: DateTime<Utc>, today: NaiveDate) -> Self {
        Self {
            now,
            today,
            generated: Vec::new(),
            advanced: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn generated_count(&self) -> usize {
        self.generated.len()
    }

    /// True when new entries exist and views over the store are stale.
    pub fn needs_refresh(&self) -> bool {
        !self.generated.is_empty()
    }

    pub fn entries_for(&self, rule_id: Uuid) -> impl Iterator<Item = &LedgerEntry> {
        self.generated
            .iter()
            .filter(move |entry| entry.recurring_rule_id == Some(rule_id))
    }
}

/// Materializes overdue occurrences of recurring rules into the ledger.
pub struct RecurringRuleProcessor<'a> {
    store: &'a dyn LedgerStore,
    default_currency: String,
}

impl<'a> RecurringRuleProcessor<'a> {
    pub fn new(store: &'a dyn LedgerStore, default_currency: impl Into<String>) -> Self {
        Self {
            store,
            default_currency: default_currency.into(),
        }
    }

    /// Loads the active rules from the store and runs a pass over them.
    pub fn catch_up(&self, clock: &dyn Clock) -> Result<PassReport> {
        let rules = self.store.list_active_recurring_rules()?;
        self.run_pass(&rules, clock)
    }

    /// Runs a pass over already loaded `rules`, reading the clock exactly once.
    ///
    /// The due date is derived from the same instant that stamps the entries.
    pub fn run_pass(&self, rules: &[RecurringRule], clock: &dyn Clock) -> Result<PassReport> {
        let now = clock.now();
        self.run_pass_at(rules, now, clock.today_at(now))
    }

    /// Runs a pass with an explicit reference instant.
    ///
    /// `today` decides which occurrences are due (inclusive); `now` stamps the
    /// generated entries. Only [`crate::errors::FinPlanError::StoreUnavailable`] aborts the pass;
    /// other store errors are recorded against the rule and the pass moves on.
    pub fn run_pass_at(
        &self,
        rules: &[RecurringRule],
        now: DateTime<Utc>,
        today: NaiveDate,
    ) -> Result<PassReport> {
        let mut report = PassReport::new(now, today);
        for rule in rules {
            self.process_rule(rule, &mut report)?;
        }

        if report.needs_refresh() {
            tracing::info!(
                generated = report.generated_count(),
                rules = report.advanced.len(),
                "generated recurring transactions"
            );
        }
        if !report.failures.is_empty() {
            tracing::warn!(
                failures = report.failures.len(),
                "recurring pass finished with failures"
            );
        }
        Ok(report)
    }

    fn process_rule(&self, rule: &RecurringRule, report: &mut PassReport) -> Result<()> {
        if !rule.is_active {
            tracing::trace!(rule = %rule.id, "skipping inactive rule");
            return Ok(());
        }
        let Some(start) = rule.next_date else {
            tracing::debug!(rule = %rule.id, "active rule has no next date");
            return Ok(());
        };
        if !rule.frequency.is_recognized() {
            tracing::warn!(
                rule = %rule.id,
                frequency = %rule.frequency,
                "unrecognized frequency, advancing monthly"
            );
        }

        let mut cursor = start;
        let mut generated = 0usize;
        while cursor <= report.today {
            let input =
                LedgerEntryInput::for_occurrence(rule, cursor, &self.default_currency, report.now);
            match self.store.add_ledger_entry(input.clone()) {
                Ok(id) => {
                    tracing::debug!(rule = %rule.id, date = %cursor, entry = id, "generated entry");
                    report.generated.push(LedgerEntry { id, input });
                    generated += 1;
                }
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    tracing::warn!(
                        rule = %rule.id,
                        date = %cursor,
                        error = %err,
                        "entry write failed"
                    );
                    report.failures.push(RuleFailure {
                        rule_id: rule.id,
                        stage: FailureStage::Entry,
                        occurrence: cursor,
                        message: err.to_string(),
                    });
                    break;
                }
            }

            let next = rule.frequency.advance(cursor);
            if next <= cursor {
                // Only reachable at the end of chrono's date range.
                report.failures.push(RuleFailure {
                    rule_id: rule.id,
                    stage: FailureStage::Schedule,
                    occurrence: cursor,
                    message: format!("schedule cannot advance past {}", cursor),
                });
                break;
            }
            cursor = next;
        }

        if cursor == start {
            return Ok(());
        }
        match self
            .store
            .update_recurring_rule(rule.id, &RulePatch::next_date(cursor))
        {
            Ok(()) => {
                report.advanced.push(RuleAdvance {
                    rule_id: rule.id,
                    from: start,
                    to: cursor,
                    generated,
                });
                Ok(())
            }
            Err(err) if err.is_fatal() => Err(err),
            Err(err) => {
                tracing::warn!(
                    rule = %rule.id,
                    next_date = %cursor,
                    error = %err,
                    "next date not persisted, occurrences may repeat next pass"
                );
                report.failures.push(RuleFailure {
                    rule_id: rule.id,
                    stage: FailureStage::Schedule,
                    occurrence: cursor,
                    message: err.to_string(),
                });
                Ok(())
            }
        }
    }
}
