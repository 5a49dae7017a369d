use super::date;
use crate::{
    clock::FixedClock,
    core::{services::RuleDraft, session::Session},
    errors::FinPlanError,
    ledger::{Frequency, LedgerEntryInput, RecurringRule},
    storage::{LedgerStore, MemoryStore},
};

fn session_with(rules: Vec<RecurringRule>, today: chrono::NaiveDate) -> Session {
    Session::new(
        Box::new(MemoryStore::with_rules(rules)),
        Box::new(FixedClock::on(today)),
        "INR",
    )
}

#[test]
fn catch_up_requires_loaded_data() {
    let mut session = session_with(Vec::new(), date(2026, 2, 22));
    let err = session.run_catch_up().unwrap_err();
    assert!(matches!(err, FinPlanError::SessionNotLoaded));
}

#[test]
fn catch_up_refreshes_view_once_after_generation() {
    let rule = RecurringRule::new("Gym", 200.0, Frequency::Weekly, date(2026, 2, 1));
    let mut session = session_with(vec![rule.clone()], date(2026, 2, 22));
    session.load().unwrap();
    assert!(session.entries().is_empty());

    let report = session.run_catch_up().unwrap().expect("first pass runs");

    assert_eq!(report.generated_count(), 4);
    assert_eq!(session.entries().len(), 4);
    assert_eq!(session.rules()[0].next_date, Some(date(2026, 3, 1)));
}

#[test]
fn catch_up_runs_only_once_per_session() {
    let rule = RecurringRule::new("Gym", 200.0, Frequency::Weekly, date(2026, 2, 1));
    let mut session = session_with(vec![rule], date(2026, 2, 22));
    session.load().unwrap();

    assert!(session.run_catch_up().unwrap().is_some());
    assert!(session.run_catch_up().unwrap().is_none());
    assert!(session.has_caught_up());
    assert_eq!(session.store().list_ledger_entries().unwrap().len(), 4);
}

#[test]
fn view_is_not_reloaded_when_nothing_was_generated() {
    let rule = RecurringRule::new("Rent", 9000.0, Frequency::Monthly, date(2026, 3, 1));
    let mut session = session_with(vec![rule], date(2026, 2, 22));
    session.load().unwrap();
    session
        .store()
        .add_ledger_entry(LedgerEntryInput::manual(
            "Lunch",
            250.0,
            "Food",
            "INR",
            date(2026, 2, 21),
        ))
        .unwrap();

    let report = session.run_catch_up().unwrap().unwrap();

    assert!(!report.needs_refresh());
    assert!(session.entries().is_empty());
}

#[test]
fn rule_edits_refresh_the_rule_view() {
    let mut session = session_with(Vec::new(), date(2026, 2, 22));
    session.load().unwrap();

    let mut draft = RuleDraft::new("Spotify", 119.0, date(2026, 3, 1));
    draft.frequency = Frequency::Monthly;
    let rule = session.add_rule(draft).unwrap();
    assert_eq!(session.rules().len(), 1);

    assert!(!session.toggle_rule(rule.id).unwrap());
    assert!(!session.rules()[0].is_active);

    session.delete_rule(rule.id).unwrap();
    assert!(session.rules().is_empty());
}
