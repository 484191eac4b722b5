mod cli;
mod terminal;

use std::fs::File;
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, CliCommand};
use zcalc::calculator::evaluate_expression;
use zcalc::config::Config;
use zcalc::session::{Calculator, ManualRecoveryTimer, MemoryDisplay, Mode, parse_key_script};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        None => run_interactive(&config).map(|()| ExitCode::SUCCESS),
        Some(CliCommand::Eval { expression, json }) => run_eval(&expression, json),
        Some(CliCommand::Keys { script }) => run_keys(&script, &config),
    }
}

fn init_tracing(cli: &Cli) -> Result<()> {
    let filter = match &cli.log_level {
        Some(level) => EnvFilter::try_new(level).context("Invalid log level")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    } else if cli.command.is_some() {
        // Raw mode would garble stderr, so the interactive session only logs to a file.
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    Ok(())
}

fn run_interactive(config: &Config) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("Failed to start runtime")?;

    runtime.block_on(terminal::run(config))
}

fn run_eval(expression: &str, json: bool) -> Result<ExitCode> {
    match evaluate_expression(expression) {
        Ok(evaluation) if json => {
            println!("{}", serde_json::to_string(&evaluation)?);
            Ok(ExitCode::SUCCESS)
        }
        Ok(evaluation) => {
            println!("{}", evaluation.display);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("{}", err.display_text());
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run_keys(script: &str, config: &Config) -> Result<ExitCode> {
    let events = parse_key_script(script).context("Invalid key script")?;

    let mut calculator = Calculator::with_settings(
        MemoryDisplay::new(),
        ManualRecoveryTimer::new(),
        config.settings(),
    );
    for event in events {
        calculator.handle_event(event);
    }

    println!("{}", calculator.display().text());

    Ok(match calculator.mode() {
        Mode::Idle => ExitCode::SUCCESS,
        Mode::Error => ExitCode::FAILURE,
    })
}
