use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Keyboard-driven calculator.
///
/// Without a command, starts the interactive calculator: type an expression,
/// press Enter or = to evaluate, Escape or c to clear, Backspace to delete.
/// Ctrl+C quits.
#[derive(Parser, Debug)]
#[command(name = "zcalc", version, about)]
pub struct Cli {
    /// Config file to use instead of the default location.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `zcalc=trace`. Overrides RUST_LOG.
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Write logs to this file.
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Evaluate an expression once and print the result.
    Eval {
        #[arg(allow_hyphen_values = true)]
        expression: String,
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Replay a key script through the calculator and print the display.
    ///
    /// Each character is a key press. `{Enter}`, `{Escape}`, `{Backspace}`,
    /// `{CE}` and `{Negate}` name special keys and buttons.
    Keys { script: String },
}
