//! SupportDash CLI
//!
//! Command-line interface for the support metrics dashboard.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use supportdash::client::HttpMetricsClient;
use supportdash::config::LoggingConfig;
use supportdash::models::DateRange;
use supportdash::render::{error_headline, render_text, Dashboard};
use supportdash::tui::App;
use supportdash::view::MetricsView;
use supportdash::Config;

/// SupportDash - Support ticket metrics in your terminal
#[derive(Parser)]
#[command(name = "supportdash")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "SUPPORTDASH_CONFIG")]
    config: Option<PathBuf>,

    /// Metrics service URL (overrides the configuration)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (for commands that support it)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the TUI dashboard
    Dashboard {
        /// Prefill the start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// Prefill the end date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,

        /// Tick rate in milliseconds
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        tick_rate: Option<u64>,
    },

    /// Fetch metrics once and print them
    Fetch {
        /// Start date (YYYY-MM-DD), forwarded as-is
        #[arg(long, default_value = "")]
        start: String,

        /// End date (YYYY-MM-DD), forwarded as-is
        #[arg(long, default_value = "")]
        end: String,
    },

    /// Print the effective configuration
    Config,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    dotenvy::dotenv().ok();

    // Load configuration
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging; the dashboard owns the terminal so it logs to a file
    let to_file = matches!(cli.command, Commands::Dashboard { .. });
    let _guard = match init_logging(&config.logging, cli.verbose, to_file) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error initializing logging: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    // Execute command
    let result = match cli.command {
        Commands::Dashboard {
            start,
            end,
            tick_rate,
        } => run_dashboard(config, start, end, tick_rate).await,
        Commands::Fetch { start, end } => run_fetch(config, start, end, cli.format).await,
        Commands::Config => print_config(&config),
        Commands::Completions { shell } => {
            generate_completions(shell);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(url) = &cli.url {
        config.service.url.clone_from(url);
        config.validate()?;
    }
    Ok(config)
}

fn init_logging(
    logging: &LoggingConfig,
    verbose: bool,
    to_file: bool,
) -> anyhow::Result<Option<WorkerGuard>> {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let log_file = if to_file { logging.dashboard_log_file() } else { None };
    let (writer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .map_or_else(|| PathBuf::from("."), PathBuf::from);
            let file_name = path
                .file_name()
                .context("log file path has no file name")?;
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;

            let appender = tracing_appender::rolling::never(&dir, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(non_blocking), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stderr), None),
    };

    let layer = if logging.format == "json" {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(writer)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_ansi(guard.is_none())
            .with_writer(writer)
            .boxed()
    };

    tracing_subscriber::registry().with(filter).with(layer).init();
    Ok(guard)
}

async fn run_dashboard(
    config: Config,
    start: Option<String>,
    end: Option<String>,
    tick_rate: Option<u64>,
) -> anyhow::Result<()> {
    let tick_rate = tick_rate.unwrap_or(config.tui.tick_rate_ms);
    let client = HttpMetricsClient::new(&config.service)?;
    info!(
        url = %client.url(),
        tick_rate,
        "Starting TUI dashboard"
    );

    let mut app = App::new(Arc::new(client), config.service.timeout)
        .with_tick_rate(tick_rate)
        .with_range(DateRange::new(start.unwrap_or_default(), end.unwrap_or_default()));

    app.run().await?;
    Ok(())
}

async fn run_fetch(
    config: Config,
    start: String,
    end: String,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let client = HttpMetricsClient::new(&config.service)?;
    let mut view = MetricsView::with_range(DateRange::new(start, end));

    view.fetch(&client, config.service.timeout).await;

    if let Some(err) = view.error() {
        anyhow::bail!("{}: {err}", error_headline(err));
    }
    let metrics = view
        .metrics()
        .context("fetch finished without metrics")?;

    match format {
        OutputFormat::Text => {
            println!("Support Metrics ({})", view.range());
            println!();
            print!("{}", render_text(&Dashboard::from_metrics(metrics)));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(metrics)?);
        }
    }

    Ok(())
}

fn print_config(config: &Config) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "supportdash", &mut io::stdout());
}
