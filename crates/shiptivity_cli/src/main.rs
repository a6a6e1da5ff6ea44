//! Command-line front end for the Shiptivity client board.
//!
//! Opens the client store once, runs one command, prints JSON, exits.

mod config;

use clap::{Parser, Subcommand};
use config::Config;
use dotenv::dotenv;
use log::{debug, info};
use serde::Serialize;
use shiptivity_core::db::open_db;
use shiptivity_core::{
    init_logging, ClientService, ClientServiceError, Lane, NewClient, SqliteClientRepository,
};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

#[derive(Parser, Debug)]
#[clap(about = "Swimlane client board backed by SQLite")]
struct Cli {
    #[clap(long)]
    /// SQLite database file (overrides SHIPTIVITY_DB_PATH)
    db: Option<PathBuf>,

    #[clap(long)]
    /// Absolute directory for log files (overrides SHIPTIVITY_LOG_DIR)
    log_dir: Option<String>,

    #[clap(long)]
    /// trace|debug|info|warn|error (overrides SHIPTIVITY_LOG_LEVEL)
    log_level: Option<String>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List clients, optionally only one lane
    List {
        #[clap(long)]
        status: Option<String>,
    },
    /// Show one client
    Get { id: String },
    /// Change a client's lane and/or priority
    Move {
        id: String,
        #[clap(long)]
        status: Option<String>,
        #[clap(long, allow_negative_numbers = true)]
        priority: Option<i64>,
    },
    /// Add a client at the bottom of a lane
    Add {
        name: String,
        #[clap(long)]
        description: Option<String>,
        #[clap(long, default_value = "backlog")]
        status: String,
    },
    /// Report duplicate or missing priorities
    Audit,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("{0}")]
    Config(#[from] config::ConfigError),
    #[error("{0}")]
    Logging(String),
    #[error("{0}")]
    Db(#[from] shiptivity_core::db::DbError),
    #[error("{0}")]
    Service(#[from] ClientServiceError),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    long_message: String,
}

impl CliError {
    fn body(&self) -> ErrorBody {
        match self {
            Self::Service(err) => ErrorBody {
                message: err.message().to_string(),
                long_message: err.long_message(),
            },
            other => ErrorBody {
                message: "Command failed.".to_string(),
                long_message: other.to_string(),
            },
        }
    }
}

fn main() -> ExitCode {
    dotenv().ok();
    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            let body = err.body();
            match serde_json::to_string_pretty(&body) {
                Ok(json) => eprintln!("{json}"),
                Err(_) => eprintln!("{}: {}", body.message, body.long_message),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<String, CliError> {
    let config = Config::from_env()?.with_overrides(cli.db, cli.log_dir, cli.log_level);
    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(&config.log_level, log_dir).map_err(CliError::Logging)?;
    }
    debug!("event=cli_start module=cli db_path={}", config.db_path.display());

    let conn = open_db(&config.db_path)?;
    let service = ClientService::new(SqliteClientRepository::new(&conn));

    let output = match cli.command {
        Command::List { status } => to_json(&service.list_clients(status.as_deref())?)?,
        Command::Get { id } => to_json(&service.get_client(&id)?)?,
        Command::Move {
            id,
            status,
            priority,
        } => to_json(&service.reposition(&id, status.as_deref(), priority)?)?,
        Command::Add {
            name,
            description,
            status,
        } => {
            let lane = shiptivity_core::validate_lane(Some(status.as_str()))
                .map_err(ClientServiceError::from)?
                .unwrap_or(Lane::Backlog);
            let mut client = NewClient::new(name, lane);
            client.description = description;
            to_json(&service.add_client(&client)?)?
        }
        Command::Audit => {
            let violations = service.audit_lanes()?;
            info!(
                "event=lane_audit module=cli status=ok violations={}",
                violations.len()
            );
            to_json(&violations)?
        }
    };

    Ok(output)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}
