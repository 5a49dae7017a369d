use crate::{
    clock::{Clock, SystemClock},
    config::{Config, ConfigManager},
    core::{RuleDraft, Session},
    ledger::RulePatch,
    storage::JsonStore,
    utils::build_info,
};

use super::{
    output, Cli, CliError, CliResult, Command, ConfigCommand, EntriesCommand, RuleArgs,
    RuleChangeArgs, RulesCommand,
};

/// Routes a parsed command line to its handler.
pub fn dispatch(cli: Cli) -> CliResult<()> {
    let manager = match cli.home {
        Some(base) => ConfigManager::with_base_dir(base)?,
        None => ConfigManager::new()?,
    };

    match cli.command {
        Command::Version => {
            print_version();
            Ok(())
        }
        Command::Config(command) => handle_config(&manager, command),
        Command::CatchUp => {
            let mut session = open_session(&manager)?;
            catch_up(&mut session, true)
        }
        Command::Rules(command) => {
            let mut session = open_session(&manager)?;
            catch_up(&mut session, false)?;
            handle_rules(&mut session, command)
        }
        Command::Entries(command) => {
            let mut session = open_session(&manager)?;
            catch_up(&mut session, false)?;
            handle_entries(&session, command)
        }
    }
}

fn open_session(manager: &ConfigManager) -> CliResult<Session> {
    let config = manager.load()?;
    let store = JsonStore::open(manager.store_path(&config))?;
    let mut session = Session::new(
        Box::new(store),
        Box::new(SystemClock),
        config.default_currency,
    );
    session.load()?;
    Ok(session)
}

fn catch_up(session: &mut Session, verbose: bool) -> CliResult<()> {
    if let Some(report) = session.run_catch_up()? {
        output::report_pass(&report, verbose);
    }
    Ok(())
}

fn handle_rules(session: &mut Session, command: RulesCommand) -> CliResult<()> {
    match command {
        RulesCommand::List => {
            output::section("Recurring rules");
            if session.rules().is_empty() {
                output::info("No recurring rules yet");
            }
            for rule in session.rules() {
                output::item(output::format_rule(rule));
            }
        }
        RulesCommand::Add(args) => {
            let draft = draft_from_args(args);
            let rule = session.add_rule(draft)?;
            output::success(format!("Recurring rule added: {}", rule.id));
        }
        RulesCommand::Edit { id, changes } => {
            let patch = patch_from_args(changes)?;
            let rule = session.update_rule(id, patch)?;
            output::success(format!("Recurring rule updated: {}", rule.id));
            output::item(output::format_rule(&rule));
        }
        RulesCommand::Toggle { id } => {
            let is_active = session.toggle_rule(id)?;
            let state = if is_active { "active" } else { "paused" };
            output::success(format!("Recurring rule {} is now {}", id, state));
        }
        RulesCommand::Delete { id } => {
            session.delete_rule(id)?;
            output::success(format!("Recurring rule deleted: {}", id));
        }
    }
    Ok(())
}

fn handle_entries(session: &Session, command: EntriesCommand) -> CliResult<()> {
    let EntriesCommand::List { rule } = command;
    output::section("Ledger entries");
    let mut shown = 0usize;
    for entry in session
        .entries()
        .iter()
        .filter(|entry| rule.is_none() || entry.recurring_rule_id == rule)
    {
        output::item(output::format_entry(entry));
        shown += 1;
    }
    if shown == 0 {
        output::info("No entries");
    }
    Ok(())
}

fn handle_config(manager: &ConfigManager, command: ConfigCommand) -> CliResult<()> {
    let mut config = manager.load()?;
    match command {
        ConfigCommand::Show => print_config(manager, &config),
        ConfigCommand::SetCurrency { code } => {
            config.set_default_currency(&code)?;
            manager.save(&config)?;
            output::success(format!(
                "Default currency set to {}",
                config.default_currency
            ));
        }
    }
    Ok(())
}

fn print_config(manager: &ConfigManager, config: &Config) {
    output::section("Configuration");
    output::item(format!("default currency: {}", config.default_currency));
    output::item(format!("locale: {}", config.locale));
    output::item(format!("store: {}", manager.store_path(config).display()));
    output::item(format!("config file: {}", manager.path().display()));
}

fn print_version() {
    let build = build_info::current();
    output::item(format!("finplan_cli version {}", build.version));
    output::item(format!("commit {} ({})", build.git_hash, build.profile));
    output::item(format!("built {} with {}", build.timestamp, build.rustc));
}

fn draft_from_args(args: RuleArgs) -> RuleDraft {
    let next_date = args.next_date.unwrap_or_else(|| SystemClock.today());
    RuleDraft {
        kind: args.kind,
        category: args.category,
        description: args.description,
        amount: args.amount,
        currency: args.currency,
        frequency: args.frequency,
        next_date,
    }
}

fn patch_from_args(changes: RuleChangeArgs) -> CliResult<RulePatch> {
    let patch = RulePatch {
        kind: changes.kind,
        category: changes.category,
        description: changes.description.map(Some),
        amount: changes.amount,
        currency: changes.currency.map(Some),
        frequency: changes.frequency,
        next_date: changes.next_date,
        is_active: None,
    };
    if patch.is_empty() {
        return Err(CliError::Input("nothing to change".into()));
    }
    Ok(patch)
}
