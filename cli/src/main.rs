use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use resource_client::{ApiError, ClientConfig, ResourceClient, User};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const ERROR: i32 = 1;
    pub const INVALID_ARGUMENT: i32 = 2;
    pub const NOT_FOUND: i32 = 3;
}

/// Manage the users collection of a REST API
#[derive(Parser, Debug)]
#[command(name = "users", version, propagate_version = true)]
struct Cli {
    /// Base address of the API, e.g. https://api.test/
    #[arg(long, env = "RESOURCE_API_BASE_URL")]
    base_url: String,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Pretty-print JSON output and request bodies
    #[arg(long)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all users
    List,
    /// Show one user
    Get { id: String },
    /// Create a user
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        avatar: String,
    },
    /// Replace a user
    Update {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        avatar: String,
    },
    /// Delete a user
    Delete { id: String },
}

#[tokio::main]
async fn main() {
    init_logging();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(exit_code(&e));
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("USERS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ApiError>() {
        Some(ApiError::InvalidArgument(_)) => exit_codes::INVALID_ARGUMENT,
        Some(e) if e.is_not_found() => exit_codes::NOT_FOUND,
        _ => exit_codes::ERROR,
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = ClientConfig::new(&cli.base_url)?.with_pretty(cli.pretty);
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    let users = ResourceClient::<User>::connect(&config, "users")?;

    match cli.command {
        Command::List => print_json(&users.list_all().await?, cli.pretty),
        Command::Get { id } => print_json(&users.get_one(&id).await?, cli.pretty),
        Command::Create { name, avatar } => {
            let created = users.create(&User::new(name, avatar)).await?;
            print_json(&created, cli.pretty)
        }
        Command::Update { id, name, avatar } => {
            let mut user = User::new(name, avatar);
            user.id = Some(id.clone());
            print_json(&users.update(&id, &user).await?, cli.pretty)
        }
        Command::Delete { id } => {
            users.delete(&id).await?;
            eprintln!("Deleted user {id}");
            Ok(())
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("failed to render output")?;
    println!("{out}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_class() {
        let invalid = anyhow::Error::from(ApiError::InvalidArgument("id".into()));
        let missing = anyhow::Error::from(ApiError::NotFound { body: String::new() });
        let server = anyhow::Error::from(ApiError::Http {
            status: 500,
            body: String::new(),
        });
        assert_eq!(exit_code(&invalid), exit_codes::INVALID_ARGUMENT);
        assert_eq!(exit_code(&missing), exit_codes::NOT_FOUND);
        assert_eq!(exit_code(&server), exit_codes::ERROR);
    }

    #[test]
    fn cli_parses_update() {
        let cli = Cli::try_parse_from([
            "users",
            "--base-url",
            "https://api.test",
            "update",
            "1",
            "--name",
            "Jim",
            "--avatar",
            "b.png",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Update { ref id, .. } if id == "1"));
    }
}
