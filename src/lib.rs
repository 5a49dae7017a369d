#![doc(test(attr(deny(warnings))))]

//! FinPlan Core turns recurring rules (bills, subscriptions, SIPs) into ledger
//! entries, catching up on every occurrence missed since the last session.

pub mod cli;
pub mod clock;
pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

pub use crate::core::{PassReport, RecurringRuleProcessor, Session};
pub use errors::{FinPlanError, Result};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("FinPlan Core tracing initialized.");
    });
}
