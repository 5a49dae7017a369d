pub mod processor;
pub mod services;
pub mod session;

pub use processor::{FailureStage, PassReport, RecurringRuleProcessor, RuleAdvance, RuleFailure};
pub use services::{RecurringRuleService, RuleDraft};
pub use session::Session;

#[cfg(test)]
mod tests;
