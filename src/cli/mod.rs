//! Command-line parsing for the portion calculator.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! fitting/prediction code and from command dispatch (`crate::app`).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "fedo", version, about = "Dog food portion calculator (cubic fit of a feeding guide)")]
pub struct Cli {
    /// Calibration table JSON (defaults to $FEDO_DATA, then the platform data dir).
    #[arg(long, global = true, value_name = "PATH")]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the recommended portion for a body weight.
    Predict(PredictArgs),
    /// Fit the model, print coefficients and diagnostics, optionally export it.
    Fit(FitArgs),
    /// View or edit the calibration table.
    #[command(subcommand)]
    Table(TableCommand),
    /// Print the portion grid of a previously exported model.
    Plot(PlotArgs),
    /// Launch the interactive TUI.
    Tui,
}

#[derive(Debug, Parser, Clone)]
pub struct PredictArgs {
    /// Body weight in kg (0 < weight < 100).
    #[arg(allow_negative_numbers = true)]
    pub weight: String,

    /// Print the unrounded portion only (useful for scripting).
    #[arg(long)]
    pub raw: bool,
}

#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Export model (coefficients + diagnostics + portion grid) to JSON.
    #[arg(long = "export-model", value_name = "PATH")]
    pub export_model: Option<PathBuf>,
}

/// Table subcommands. Every edit saves the table and refits.
#[derive(Debug, Subcommand, Clone)]
pub enum TableCommand {
    /// List all rows.
    List,
    /// Append a row.
    Add { weight_kg: f64, daily_gr: f64 },
    /// Replace the row at INDEX.
    Edit {
        index: usize,
        weight_kg: f64,
        daily_gr: f64,
    },
    /// Delete the row at INDEX (at least 3 rows must remain).
    Delete { index: usize },
    /// Replace the whole table with a JSON file.
    Import {
        #[arg(value_name = "JSON")]
        file: PathBuf,
    },
    /// Restore the built-in feeding guide.
    Reset,
}

/// Options for printing a saved model.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Model JSON file produced by `fedo fit --export-model`.
    #[arg(value_name = "JSON")]
    pub model: PathBuf,

    /// Maximum number of grid rows to print.
    #[arg(long, default_value_t = 21)]
    pub rows: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_predict_with_global_data() {
        let cli = Cli::parse_from(["fedo", "--data", "x.json", "predict", "12.5"]);
        assert_eq!(cli.data, Some(PathBuf::from("x.json")));
        match cli.command {
            Command::Predict(args) => {
                assert_eq!(args.weight, "12.5");
                assert!(!args.raw);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parses_table_edit() {
        let cli = Cli::parse_from(["fedo", "table", "edit", "2", "4.5", "100"]);
        match cli.command {
            Command::Table(TableCommand::Edit {
                index,
                weight_kg,
                daily_gr,
            }) => {
                assert_eq!(index, 2);
                assert_eq!(weight_kg, 4.5);
                assert_eq!(daily_gr, 100.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn data_flag_after_subcommand() {
        let cli = Cli::parse_from(["fedo", "fit", "--data", "y.json", "--export-model", "m.json"]);
        assert_eq!(cli.data, Some(PathBuf::from("y.json")));
        assert!(matches!(cli.command, Command::Fit(FitArgs { export_model: Some(_) })));
    }
}
