//! survey-query command-line entry point.

use clap::{Parser, Subcommand};
use survey_query::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;

/// Ask questions about store-visit survey results
#[derive(Parser, Debug)]
#[command(name = "survey-query")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the survey CSV extract (overrides the config file)
    #[arg(short, long, global = true)]
    data: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable JSON logging format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Answer a single question
    Query {
        /// Question text
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Answer questions read from stdin, one per line (default)
    Ask,
    /// Show row count, columns and activity date range of the extract
    Stats,
    /// List the questions the classifier understands
    Examples,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.json_logs);

    let mut config = if let Some(path) = &args.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };
    if let Some(data) = args.data {
        config.data.path = data;
    }

    tracing::debug!(
        data = %config.data_path().display(),
        encoding = ?config.data.encoding,
        top_n = config.terms.top_n,
        "Configuration loaded"
    );

    match args.command {
        Some(Command::Examples) => cli::run_examples(args.json),
        Some(Command::Query { query }) => {
            let session = cli::Session::open(&config)?;
            cli::run_query(&session, &query.join(" "), args.json)
        }
        Some(Command::Stats) => {
            let session = cli::Session::open(&config)?;
            cli::run_stats(&session, args.json)
        }
        Some(Command::Ask) | None => {
            let session = cli::Session::open(&config)?;
            cli::run_ask(&session, args.json)
        }
    }
}

/// Log to stderr; `RUST_LOG` overrides the default `warn` level.
fn init_tracing(json_logs: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
