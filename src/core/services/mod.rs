pub mod recurring_rule_service;

pub use recurring_rule_service::{RecurringRuleService, RuleDraft};
