//! Command-line frontend over the JSON store in the application data directory.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    errors::FinPlanError,
    ledger::{Frequency, RuleKind},
};

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] FinPlanError),
    #[error("Invalid input: {0}")]
    Input(String),
}

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Parser)]
#[command(name = "finplan_cli", about = "Recurring bills, subscriptions and SIPs ledger")]
pub struct Cli {
    /// Data directory (defaults to $FINPLAN_HOME or ~/.finplan).
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,
    /// Disable colored output.
    #[arg(long, global = true)]
    pub plain: bool,
    /// Print only results, warnings and errors.
    #[arg(long, short, global = true)]
    pub quiet: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate every overdue recurring transaction.
    CatchUp,
    /// Manage recurring rules.
    #[command(subcommand)]
    Rules(RulesCommand),
    /// Inspect ledger entries.
    #[command(subcommand)]
    Entries(EntriesCommand),
    /// Show or change preferences.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print build information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum RulesCommand {
    List,
    Add(RuleArgs),
    Edit {
        id: Uuid,
        #[command(flatten)]
        changes: RuleChangeArgs,
    },
    Toggle {
        id: Uuid,
    },
    Delete {
        id: Uuid,
    },
}

#[derive(Debug, Args)]
pub struct RuleArgs {
    #[arg(long)]
    pub category: String,
    #[arg(long)]
    pub amount: f64,
    #[arg(long, default_value = "monthly", value_parser = parse_frequency)]
    pub frequency: Frequency,
    /// First occurrence (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub next_date: Option<NaiveDate>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub currency: Option<String>,
    #[arg(long, value_parser = parse_kind, default_value = "expense")]
    pub kind: RuleKind,
}

#[derive(Debug, Args)]
pub struct RuleChangeArgs {
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub amount: Option<f64>,
    #[arg(long, value_parser = parse_frequency)]
    pub frequency: Option<Frequency>,
    #[arg(long, value_parser = parse_date)]
    pub next_date: Option<NaiveDate>,
    /// New description; an empty string clears it.
    #[arg(long)]
    pub description: Option<String>,
    /// New currency; an empty string falls back to the default.
    #[arg(long)]
    pub currency: Option<String>,
    #[arg(long, value_parser = parse_kind)]
    pub kind: Option<RuleKind>,
}

#[derive(Debug, Subcommand)]
pub enum EntriesCommand {
    List {
        /// Only entries generated by this rule.
        #[arg(long)]
        rule: Option<Uuid>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    Show,
    SetCurrency { code: String },
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("expected YYYY-MM-DD: {err}"))
}

fn parse_frequency(raw: &str) -> Result<Frequency, String> {
    let frequency = Frequency::from(raw);
    if frequency.is_recognized() {
        Ok(frequency)
    } else {
        Err("expected weekly, biweekly, monthly, quarterly or yearly".into())
    }
}

fn parse_kind(raw: &str) -> Result<RuleKind, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "expense" => Ok(RuleKind::Expense),
        "savings" => Ok(RuleKind::Savings),
        other => Err(format!("unknown rule kind `{other}`")),
    }
}

/// Parses process arguments and runs the requested command.
pub fn run_cli() -> CliResult<()> {
    let cli = Cli::parse();
    output::set_preferences(output::OutputPreferences {
        plain: cli.plain || std::env::var_os("NO_COLOR").is_some(),
        quiet: cli.quiet,
    });
    commands::dispatch(cli)
}
