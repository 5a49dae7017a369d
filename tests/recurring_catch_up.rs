mod common;

use common::{date, open_session, temp_store_path};
use finplan_core::{
    core::RuleDraft,
    ledger::{Frequency, RecurringRule},
    storage::{JsonStore, LedgerStore},
};

#[test]
fn gym_rule_catches_up_across_restarts() {
    let (path, _guard) = temp_store_path();
    let rule_id = {
        let mut session = open_session(&path, date(2026, 1, 20));
        let mut draft = RuleDraft::new("Gym", 200.0, date(2026, 2, 1));
        draft.frequency = Frequency::Weekly;
        session.add_rule(draft).unwrap().id
    };

    let mut session = open_session(&path, date(2026, 2, 22));
    let report = session.run_catch_up().unwrap().expect("pass runs");
    let dates: Vec<_> = report.generated.iter().map(|entry| entry.date).collect();
    assert_eq!(
        dates,
        [
            date(2026, 2, 1),
            date(2026, 2, 8),
            date(2026, 2, 15),
            date(2026, 2, 22)
        ]
    );
    assert!(report
        .generated
        .iter()
        .all(|entry| entry.recurring_rule_id == Some(rule_id) && entry.currency == "INR"));

    let reopened = JsonStore::open(&path).unwrap();
    let stored = reopened.get_recurring_rule(rule_id).unwrap().unwrap();
    assert_eq!(stored.next_date, Some(date(2026, 3, 1)));
    assert_eq!(reopened.list_ledger_entries().unwrap().len(), 4);
}

#[test]
fn restarting_on_the_same_day_generates_nothing_new() {
    let (path, _guard) = temp_store_path();
    JsonStore::open(&path)
        .unwrap()
        .add_recurring_rule(RecurringRule::new(
            "Internet",
            799.0,
            Frequency::Monthly,
            date(2025, 12, 15),
        ))
        .unwrap();

    let first = open_session(&path, date(2026, 3, 15))
        .run_catch_up()
        .unwrap()
        .unwrap();
    let second = open_session(&path, date(2026, 3, 15))
        .run_catch_up()
        .unwrap()
        .unwrap();

    assert_eq!(first.generated_count(), 4);
    assert_eq!(second.generated_count(), 0);
    assert_eq!(JsonStore::open(&path).unwrap().list_ledger_entries().unwrap().len(), 4);
}

#[test]
fn paused_rule_resumes_from_its_stored_date() {
    let (path, _guard) = temp_store_path();
    let id = {
        let mut session = open_session(&path, date(2026, 1, 1));
        let mut draft = RuleDraft::new("Magazine", 150.0, date(2026, 1, 10));
        draft.frequency = Frequency::Quarterly;
        let id = session.add_rule(draft).unwrap().id;
        session.toggle_rule(id).unwrap();
        id
    };

    let mut paused = open_session(&path, date(2026, 5, 1));
    assert_eq!(paused.run_catch_up().unwrap().unwrap().generated_count(), 0);
    paused.toggle_rule(id).unwrap();

    let mut resumed = open_session(&path, date(2026, 5, 1));
    let report = resumed.run_catch_up().unwrap().unwrap();
    let dates: Vec<_> = report.generated.iter().map(|entry| entry.date).collect();
    assert_eq!(dates, [date(2026, 1, 10), date(2026, 4, 10)]);
    assert_eq!(resumed.rules()[0].next_date, Some(date(2026, 7, 10)));
}

#[test]
fn deleting_a_rule_keeps_its_history() {
    let (path, _guard) = temp_store_path();
    let mut session = open_session(&path, date(2026, 2, 1));
    let rule = session
        .add_rule(RuleDraft::new("Rent", 15000.0, date(2026, 1, 1)))
        .unwrap();
    drop(session);

    let mut session = open_session(&path, date(2026, 2, 1));
    session.run_catch_up().unwrap();
    session.delete_rule(rule.id).unwrap();

    assert!(session.rules().is_empty());
    assert_eq!(session.entries().len(), 2);
    assert!(session
        .entries()
        .iter()
        .all(|entry| entry.recurring_rule_id == Some(rule.id)));
}
