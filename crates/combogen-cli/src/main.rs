mod config;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use combogen_core::{Error as CoreError, redact_database_url, validate_request};
use combogen_engine::{GenerationEngine, GenerationError};
use combogen_store::{PostgresStore, StoreConfig, StoreError, ensure_schema};
use config::{ConfigError, load_config, resolve_store_config};
use logging::{LoggingError, init_logging};
use thiserror::Error;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

/// Exit status for requests the caller can fix by changing the input.
const EXIT_CLIENT_ERROR: u8 = 2;
const EXIT_FAILURE: u8 = 1;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("logging error: {0}")]
    Logging(#[from] LoggingError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Core(CoreError::InvalidRequest(_)) => EXIT_CLIENT_ERROR,
            CliError::Generation(err) if err.is_client_error() => EXIT_CLIENT_ERROR,
            _ => EXIT_FAILURE,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "combogen",
    version,
    about = "Generate and store one-item-per-type combinations"
)]
struct Cli {
    /// Path to a TOML config file (defaults to ./combogen.toml if present).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Database connection string; overrides DATABASE_URL and the config file.
    #[arg(long, global = true, value_name = "CONNECTION_STRING")]
    database_url: Option<String>,
    /// Append JSON logs to this file instead of stderr.
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Enumerate combinations for the given pools and store them.
    Generate(GenerateArgs),
    /// Create the items, combinations, and responses tables.
    InitDb,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Item count per type, comma separated (e.g. 1,2,1).
    #[arg(long, value_delimiter = ',', required = true)]
    items: Vec<u32>,
    /// Number of items in each combination.
    #[arg(long)]
    length: usize,
    /// Print the response on a single line.
    #[arg(long, default_value_t = false)]
    compact: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Cli {
        config,
        database_url,
        log_file,
        command,
    } = cli;

    let file_config = load_config(config.as_deref())?;
    let log_file = log_file.or(file_config.logging.file.clone());
    init_logging(&file_config.logging.filter, log_file.as_deref())?;

    let store_config = resolve_store_config(
        file_config.database,
        std::env::var("DATABASE_URL").ok(),
        database_url,
    );

    let run_id = Uuid::new_v4().to_string();
    let span = info_span!("run", run_id = %run_id);

    async move {
        match command {
            Command::Generate(args) => run_generate(&store_config, args).await,
            Command::InitDb => run_init_db(&store_config).await,
        }
    }
    .instrument(span)
    .await
}

async fn run_generate(store_config: &StoreConfig, args: GenerateArgs) -> Result<(), CliError> {
    let GenerateArgs {
        items,
        length,
        compact,
    } = args;

    validate_request(&items, length)?;

    let store = open_store(store_config)?;
    let engine = GenerationEngine::new(store);
    let record = engine.run(&items, length).await?;

    let output = if compact {
        serde_json::to_string(&record)?
    } else {
        serde_json::to_string_pretty(&record)?
    };
    println!("{output}");

    info!(
        event = "run_finished",
        status = "success",
        generation_id = record.id
    );
    Ok(())
}

async fn run_init_db(store_config: &StoreConfig) -> Result<(), CliError> {
    let store = open_store(store_config)?;
    ensure_schema(store.pool()).await?;
    info!(event = "run_finished", status = "success");
    Ok(())
}

fn open_store(store_config: &StoreConfig) -> Result<PostgresStore, CliError> {
    let url = store_config.url.as_deref().ok_or_else(|| {
        CliError::InvalidConfig(
            "database url is required (--database-url, DATABASE_URL, or [database].url)"
                .to_string(),
        )
    })?;

    if !(url.starts_with("postgres://") || url.starts_with("postgresql://")) {
        return Err(CliError::InvalidConfig(format!(
            "unsupported engine: {}",
            redact_database_url(url)
        )));
    }

    info!(
        event = "store_configured",
        engine = "postgres",
        database = %redact_database_url(url)
    );
    Ok(PostgresStore::from_config(store_config)?)
}
