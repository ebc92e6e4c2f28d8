//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and resolves the data path
//! - loads (or seeds) the calibration table and trains the model
//! - dispatches predict / fit / table edits / plot / TUI

use clap::Parser;

use crate::cli::{Command, FitArgs, PlotArgs, PredictArgs, TableCommand};
use crate::config::Config;
use crate::domain::{CalibrationPoint, default_table};
use crate::error::{AppError, EXIT_INPUT};

pub mod query;
pub mod state;

pub use state::Calculator;

/// Entry point for the `fedo` binary.
pub fn run() -> Result<(), AppError> {
    // `fedo` and `fedo --data x.json` behave like `fedo tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    init_logging(matches!(cli.command, Command::Tui));

    let config = Config::resolve(cli.data);
    log::debug!("Using feeding data path={}", config.data_path.display());

    match cli.command {
        Command::Predict(args) => handle_predict(&config, args),
        Command::Fit(args) => handle_fit(&config, args),
        Command::Table(cmd) => handle_table(&config, cmd),
        Command::Plot(args) => handle_plot(args),
        Command::Tui => crate::tui::run(config),
    }
}

/// Route `log` records to stderr.
///
/// The TUI owns the terminal, so it stays silent unless `RUST_LOG` asks otherwise.
fn init_logging(tui: bool) {
    let default_filter = if tui { "off" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .try_init();
}

/// Load the table at the configured path and train the initial model.
pub fn load_calculator(config: &Config) -> Result<Calculator, AppError> {
    let table = crate::io::load_or_init(&config.data_path)?;
    Ok(Calculator::new(table))
}

fn handle_predict(config: &Config, args: PredictArgs) -> Result<(), AppError> {
    let weight = query::parse_weight(&args.weight).map_err(|msg| AppError::new(EXIT_INPUT, msg))?;
    let calc = load_calculator(config)?;
    let portion = calc.try_predict(weight)?;

    if args.raw {
        println!("{portion}");
    } else {
        println!("{}", crate::report::format_portion(weight, portion));
    }
    Ok(())
}

fn handle_fit(config: &Config, args: FitArgs) -> Result<(), AppError> {
    let table = crate::io::load_or_init(&config.data_path)?;
    let result = crate::fit::fit(table.points())?;

    println!("{}", crate::report::format_fit_summary(&result.model, &result.quality));

    if let Some(path) = &args.export_model {
        crate::io::write_model_json(path, &result, &table)?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn handle_table(config: &Config, cmd: TableCommand) -> Result<(), AppError> {
    let calc = load_calculator(config)?;

    let message = match cmd {
        TableCommand::List => {
            print!("{}", crate::report::format_table(&calc.table()));
            return Ok(());
        }
        TableCommand::Add { weight_kg, daily_gr } => {
            let point = CalibrationPoint { weight_kg, daily_gr };
            let (idx, refit) = calc.edit_table(|t| t.add(point))?;
            report_refit(refit);
            format!("Added row {idx}.")
        }
        TableCommand::Edit {
            index,
            weight_kg,
            daily_gr,
        } => {
            let point = CalibrationPoint { weight_kg, daily_gr };
            let ((), refit) = calc.edit_table(|t| t.edit(index, point))?;
            report_refit(refit);
            format!("Updated row {index}.")
        }
        TableCommand::Delete { index } => {
            let (removed, refit) = calc.edit_table(|t| t.delete(index))?;
            report_refit(refit);
            format!(
                "Deleted row {index} ({:.2} kg, {:.2} g).",
                removed.weight_kg, removed.daily_gr
            )
        }
        TableCommand::Import { file } => {
            let table = crate::io::read_table(&file)?;
            let rows = table.len();
            report_refit(calc.replace_table(table));
            format!("Imported {rows} rows from {}.", file.display())
        }
        TableCommand::Reset => {
            report_refit(calc.replace_table(default_table()));
            "Restored the default feeding guide.".to_string()
        }
    };

    crate::io::save_table(&config.data_path, &calc.table())?;
    println!("{message}");
    Ok(())
}

/// An edit that leaves the table unfittable is still saved; tell the user.
fn report_refit(refit: Result<crate::domain::Model, crate::error::FitError>) {
    if let Err(err) = refit {
        eprintln!("warning: {err}");
    }
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let file = crate::io::read_model_json(&args.model)?;
    print!("{}", crate::report::format_model_grid(&file, args.rows));
    Ok(())
}

/// Rewrite argv so `fedo` defaults to `fedo tui`.
///
/// Rules:
/// - `fedo`                        -> `fedo tui`
/// - `fedo --data x.json`          -> `fedo tui --data x.json`
/// - `fedo --help/--version/-h`    -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    if is_subcommand_name(&arg1) {
        return argv;
    }

    // Only global flags: run the TUI with them.
    if arg1.starts_with('-') && !argv.iter().skip(1).any(|a| is_subcommand_name(a)) {
        argv.insert(1, "tui".to_string());
    }

    argv
}

fn is_subcommand_name(arg: &str) -> bool {
    matches!(arg, "predict" | "fit" | "table" | "plot" | "tui")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_tui() {
        assert_eq!(rewrite_args(args(&["fedo"])), args(&["fedo", "tui"]));
        assert_eq!(
            rewrite_args(args(&["fedo", "--data", "x.json"])),
            args(&["fedo", "tui", "--data", "x.json"])
        );
    }

    #[test]
    fn explicit_commands_untouched() {
        let argv = args(&["fedo", "--data", "x.json", "predict", "5"]);
        assert_eq!(rewrite_args(argv.clone()), argv);
        let argv = args(&["fedo", "--help"]);
        assert_eq!(rewrite_args(argv.clone()), argv);
        let argv = args(&["fedo", "table", "list"]);
        assert_eq!(rewrite_args(argv.clone()), argv);
    }
}
