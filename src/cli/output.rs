use colored::Colorize;
use std::fmt;
use std::sync::{OnceLock, RwLock};

use crate::{
    core::{FailureStage, PassReport},
    ledger::{LedgerEntry, RecurringRule},
};

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    /// A result line; printed even in quiet mode.
    Item,
    Success,
    Warning,
    Error,
    Section,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct OutputPreferences {
    /// Skips colors and decorations.
    pub plain: bool,
    /// Suppresses section headers and informational lines.
    pub quiet: bool,
}

static PREFERENCES: OnceLock<RwLock<OutputPreferences>> = OnceLock::new();

pub fn set_preferences(prefs: OutputPreferences) {
    let lock = PREFERENCES.get_or_init(|| RwLock::new(OutputPreferences::default()));
    if let Ok(mut guard) = lock.write() {
        *guard = prefs;
    }
}

fn preferences() -> OutputPreferences {
    PREFERENCES
        .get_or_init(|| RwLock::new(OutputPreferences::default()))
        .read()
        .map(|guard| *guard)
        .unwrap_or_default()
}

fn apply_style(
    kind: MessageKind,
    message: impl fmt::Display,
    prefs: &OutputPreferences,
) -> String {
    let text = message.to_string();
    let formatted = match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()),
        MessageKind::Info | MessageKind::Item => text,
        MessageKind::Success => format!("[ok] {text}"),
        MessageKind::Warning => format!("[!] {text}"),
        MessageKind::Error => format!("[x] {text}"),
    };

    if prefs.plain {
        return formatted;
    }

    match kind {
        MessageKind::Success => formatted.bright_green().to_string(),
        MessageKind::Warning => formatted.bright_yellow().to_string(),
        MessageKind::Error => formatted.bright_red().to_string(),
        MessageKind::Section => formatted.bold().to_string(),
        MessageKind::Info | MessageKind::Item => formatted,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let prefs = preferences();
    if prefs.quiet && matches!(kind, MessageKind::Info | MessageKind::Section) {
        return;
    }
    let formatted = apply_style(kind, message, &prefs);
    match kind {
        MessageKind::Error => eprintln!("{}", formatted),
        MessageKind::Section => println!("\n{}", formatted),
        _ => println!("{}", formatted),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn item(message: impl fmt::Display) {
    print(MessageKind::Item, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

pub fn format_rule(rule: &RecurringRule) -> String {
    let status = if rule.is_active { "active" } else { "paused" };
    let next = rule
        .next_date
        .map(|date| date.to_string())
        .unwrap_or_else(|| "-".into());
    format!(
        "{}  {:<20} {:>10.2} {:<4} {:<16} next {}  [{}]",
        rule.id,
        rule.entry_description(),
        rule.amount,
        rule.currency.as_deref().unwrap_or(""),
        rule.frequency.label(),
        next,
        status
    )
}

pub fn format_entry(entry: &LedgerEntry) -> String {
    let marker = if entry.is_recurring { "R" } else { " " };
    format!(
        "#{:<5} {} {} {:<20} {:<14} {:>10.2} {}",
        entry.id,
        entry.date,
        marker,
        entry.description,
        entry.category,
        entry.amount,
        entry.currency
    )
}

/// Prints the outcome of a catch-up pass. Silent when nothing happened.
pub fn report_pass(report: &PassReport, verbose: bool) {
    if report.needs_refresh() {
        success(format!(
            "Generated {} recurring transaction(s)",
            report.generated_count()
        ));
        for entry in &report.generated {
            item(format_entry(entry));
        }
    } else if verbose {
        info(format!("No recurring transactions due as of {}", report.today));
    }
    for failure in &report.failures {
        let stage = match failure.stage {
            FailureStage::Entry => "entry",
            FailureStage::Schedule => "schedule",
        };
        warning(format!(
            "rule {} {} write failed at {}: {}",
            failure.rule_id, stage, failure.occurrence, failure.message
        ));
    }
}
