//! rytest - run range tester scenarios and registered cases from the shell

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tracing::{error, info};

use ry_tester::{ColorMode, TesterConfig};

mod commands;
mod format;

use commands::*;
use format::OutputFormat;

/// Range tester and case registry runner
#[derive(Parser)]
#[command(name = "rytest")]
#[command(about = "Run typed range tests and registered cases")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Console coloring (auto, always, never)
    #[arg(long, global = true)]
    color: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the built-in demonstration scenarios
    Demo {
        /// Scenario to run
        #[arg(short, long, value_enum, default_value_t = Scenario::All)]
        scenario: Scenario,
    },

    /// Run the built-in registry self-suite
    Suite {
        /// Wildcard pattern over `suite.case` names
        #[arg(long)]
        filter: Option<String>,
        /// Full case name to disable (repeatable)
        #[arg(long = "disable")]
        disabled: Vec<String>,
    },

    /// Check integer values against a predicate
    Check {
        /// Values as `VALUE` or `NAME=VALUE`
        #[arg(required = true, allow_hyphen_values = true)]
        values: Vec<String>,
        /// Predicate applied to every value
        #[arg(short, long, value_enum)]
        predicate: PredicateKind,
        /// Item expected to fail (repeatable)
        #[arg(short, long = "expect")]
        expect: Vec<String>,
        /// Expect every negative value to fail
        #[arg(long)]
        expect_negative: bool,
        /// Prefix for unnamed values
        #[arg(long)]
        prefix: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(2);
    }

    match execute(cli) {
        Ok(0) => info!("Command completed successfully"),
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("Command failed: {:#}", e);
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(2);
        }
    }
}

fn execute(cli: Cli) -> Result<i32> {
    let mut config = TesterConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?
        .with_env()
        .context("Failed to read RYTEST_* environment")?;

    if let Some(color) = cli.color.as_deref() {
        config.color = ColorMode::parse(color)?;
    }
    config.color.apply();

    let ctx = RunContext::new(config, cli.format);

    match cli.command {
        Commands::Demo { scenario } => demo_command(&ctx, scenario),
        Commands::Suite { filter, disabled } => suite_command(&ctx, filter, disabled),
        Commands::Check {
            values,
            predicate,
            expect,
            expect_negative,
            prefix,
        } => check_command(
            &ctx,
            &values,
            predicate,
            &expect,
            expect_negative,
            prefix.as_deref(),
        ),
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install logger: {}", e))?;

    Ok(())
}
