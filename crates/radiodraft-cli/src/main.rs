//! `radiodraft` -- CLI binary for the radiograph reporting pipeline.
//!
//! Provides the following subcommands:
//!
//! - `radiodraft analyze` -- Triage, dictate findings and draft a report for one image.
//! - `radiodraft evaluate` -- Run a labelled manifest and score the drafted reports.
//! - `radiodraft config show` -- Print the resolved settings with keys redacted.

use clap::{Parser, Subcommand};

mod commands;

/// Radiograph triage, findings and report drafting.
#[derive(Parser)]
#[command(
    name = "radiodraft",
    about = "Radiograph triage, findings and report drafting",
    version
)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Analyse a single radiograph and print the result as JSON.
    Analyze(commands::analyze::AnalyzeArgs),

    /// Score drafted reports against a labelled manifest.
    Evaluate(commands::evaluate::EvaluateArgs),

    /// Show resolved configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCmd,
    },
}

/// Subcommands for `radiodraft config`.
#[derive(Subcommand)]
enum ConfigCmd {
    /// Display the full resolved configuration.
    Show {
        /// Config file path (overrides auto-discovery).
        #[arg(short, long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    match cli.command {
        Commands::Analyze(args) => commands::analyze::run(args).await?,
        Commands::Evaluate(args) => commands::evaluate::run(args).await?,
        Commands::Config { action } => match action {
            ConfigCmd::Show { config } => {
                let settings = commands::load_config(config.as_deref())?;
                commands::config_cmd::config_show(&settings);
            }
        },
    }

    Ok(())
}
