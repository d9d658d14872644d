//! Reelscout CLI - Command-line interface
//!
//! Search the movie catalog, browse popular titles and see what other users
//! search for most.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use reelscout_core::ReelscoutError;
use reelscout_core::tracing_setup::{CliLogLevel, init_tracing};

#[derive(Parser)]
#[command(name = "reelscout")]
#[command(about = "Movie discovery with trending searches")]
struct Cli {
    /// Console log level (RUST_LOG takes precedence)
    #[arg(long, value_enum, default_value_t = CliLogLevel::Warn)]
    log_level: CliLogLevel,

    /// Directory for the full trace log
    #[arg(long)]
    logs_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: commands::Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // A missing .env file is fine; the environment may already be set
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.log_level.as_tracing_level(), cli.logs_dir.as_deref())?;

    match commands::handle_command(cli.command).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => match describe_failure(&e) {
            Some((message, code)) => {
                tracing::debug!("Command failed: {e:?}");
                eprintln!("{message}");
                Ok(ExitCode::from(code))
            }
            None => Err(e),
        },
    }
}

/// User-facing message and exit code for failures raised by Reelscout itself.
///
/// Configuration mistakes exit with 2, other Reelscout failures with 1.
fn describe_failure(error: &anyhow::Error) -> Option<(String, u8)> {
    let error = error.downcast_ref::<ReelscoutError>()?;
    let code = if error.is_user_error() { 2 } else { 1 };
    Some((error.user_message(), code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use commands::Commands;

    #[test]
    fn test_parse_search_command() {
        let cli = Cli::try_parse_from(["reelscout", "search", "the matrix"]).unwrap();

        assert_eq!(cli.log_level, CliLogLevel::Warn);
        assert_eq!(
            cli.command,
            Commands::Search {
                query: "the matrix".to_string()
            }
        );
    }

    #[test]
    fn test_parse_log_level() {
        let cli = Cli::try_parse_from(["reelscout", "--log-level", "debug", "trending"]).unwrap();

        assert_eq!(cli.log_level, CliLogLevel::Debug);
        assert_eq!(cli.command, Commands::Trending);
    }

    #[test]
    fn test_search_requires_query() {
        assert!(Cli::try_parse_from(["reelscout", "search"]).is_err());
    }

    #[test]
    fn test_missing_api_key_is_reported_as_user_error() {
        let error = anyhow::Error::from(ReelscoutError::Configuration {
            reason: "TMDB_API_KEY is not set".to_string(),
        });

        let (message, code) = describe_failure(&error).unwrap();

        assert_eq!(message, "Configuration error: TMDB_API_KEY is not set");
        assert_eq!(code, 2);
    }

    #[test]
    fn test_backend_failure_hides_details() {
        let error = anyhow::Error::from(ReelscoutError::Backend(
            reelscout_core::BackendError::Network {
                reason: "connection refused".to_string(),
            },
        ));

        let (message, code) = describe_failure(&error).unwrap();

        assert_eq!(message, "Could not reach the backend service");
        assert_eq!(code, 1);
    }

    #[test]
    fn test_foreign_errors_are_passed_through() {
        let error = anyhow::anyhow!("stdin closed");

        assert!(describe_failure(&error).is_none());
    }
}
