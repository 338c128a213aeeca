//! apisign - sign API requests and validate signed responses.
//!
//! # Usage
//!
//! ```text
//! SIGNATURE_KEY=secret123 apisign sign --url https://api.example.com/v1/items?foo=bar
//! SIGNATURE_KEY=secret123 apisign validate --signature <hex> --timestamp 1700000000 --body '{}'
//! apisign timestamp
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SIGNATURE_KEY` | *(unset)* | Signing secret |
//! | `SIGNATURE_BASE_URL` | *(unset)* | Base URL for relative request URLs |
//! | `SIGNATURE_VERSION` | `v1` | Protocol version |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod cli;
mod commands;

use std::process::ExitCode;

use anyhow::{Context, Result};
use apisign_auth::{ProtocolRegistry, SignatureClient, SignatureKey};
use apisign_core::SignerConfig;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
/// Logs go to stderr so command output stays clean.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn client(config: &SignerConfig) -> Result<SignatureClient> {
    SignatureClient::from_config(config).context("failed to create signature client")
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli.config();
    init_tracing(&config.log_level)?;

    debug!(version = %config.signature_version, base_url = ?config.base_url, "Loaded configuration");

    match &cli.command {
        Command::Timestamp => {
            // A timestamp needs the protocol's format but not the secret.
            let protocol = ProtocolRegistry::builtin()
                .create(&config.signature_version, SignatureKey::from(""), None)
                .context("failed to select signature version")?;
            println!("{}", protocol.gen_timestamp());
        }
        Command::Sign(args) => println!("{}", commands::sign(&client(&config)?, args)?),
        Command::SignResponse(args) => {
            println!("{}", commands::sign_response(&client(&config)?, args)?);
        }
        Command::Validate(args) => {
            let valid = commands::validate(&client(&config)?, args)?;
            println!("{}", if valid { "valid" } else { "invalid" });
            if !valid {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
