//! Command-line argument definitions.

use std::path::PathBuf;

use apisign_core::{SignatureKey, SignerConfig};
use clap::{Args, Parser, Subcommand};

/// Sign API requests and validate signed responses.
#[derive(Debug, Parser)]
#[command(name = "apisign", version, about)]
pub struct Cli {
    /// Signing secret.
    #[arg(long, global = true, env = "SIGNATURE_KEY", hide_env_values = true)]
    pub key: Option<String>,

    /// Base URL for relative request URLs.
    #[arg(long, global = true, env = "SIGNATURE_BASE_URL")]
    pub base_url: Option<String>,

    /// Protocol version.
    #[arg(long = "signature-version", global = true, env = "SIGNATURE_VERSION")]
    pub signature_version: Option<String>,

    /// Log level filter (`RUST_LOG` takes precedence).
    #[arg(long, global = true, env = "LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print a fresh timestamp in the protocol's format.
    Timestamp,
    /// Sign a request and print the headers to attach.
    Sign(SignArgs),
    /// Sign a response body, as a server holding the same key would.
    SignResponse(ResponseArgs),
    /// Validate a response signature; exits with status 1 if it does not match.
    Validate(ValidateArgs),
}

/// Request body source shared by the subcommands.
#[derive(Debug, Args)]
pub struct BodyArgs {
    /// Body as a literal string.
    #[arg(long, conflicts_with = "body_file")]
    pub body: Option<String>,

    /// Read the body from a file.
    #[arg(long)]
    pub body_file: Option<PathBuf>,
}

/// Arguments of `apisign sign`.
#[derive(Debug, Args)]
pub struct SignArgs {
    /// Request URL; may carry an encoded query string.
    #[arg(long)]
    pub url: String,

    /// HTTP method.
    #[arg(long, default_value = "GET")]
    pub method: String,

    /// Unencoded query parameter `key=value`; repeatable. Replaces URL
    /// query values with the same key.
    #[arg(long = "param", value_parser = parse_param)]
    pub params: Vec<(String, String)>,

    /// Timestamp to sign with; generated when omitted.
    #[arg(long)]
    pub timestamp: Option<String>,

    /// Print headers as a JSON object.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub body: BodyArgs,
}

/// Arguments of `apisign sign-response`.
#[derive(Debug, Args)]
pub struct ResponseArgs {
    /// Timestamp of the request being answered.
    #[arg(long)]
    pub timestamp: String,

    #[command(flatten)]
    pub body: BodyArgs,
}

/// Arguments of `apisign validate`.
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Value of the response's signature header.
    #[arg(long)]
    pub signature: String,

    /// Timestamp used when the request was signed.
    #[arg(long)]
    pub timestamp: String,

    #[command(flatten)]
    pub body: BodyArgs,
}

impl Cli {
    /// Configuration from flags, falling back to the environment and then to
    /// defaults.
    #[must_use]
    pub fn config(&self) -> SignerConfig {
        let mut config = SignerConfig::from_env();
        if let Some(key) = &self.key {
            config.signature_key = Some(SignatureKey::from(key.as_str()));
        }
        if let Some(base_url) = &self.base_url {
            config.base_url = Some(base_url.clone());
        }
        if let Some(version) = &self.signature_version {
            config.signature_version.clone_from(version);
        }
        if let Some(level) = &self.log_level {
            config.log_level.clone_from(level);
        }
        config
    }
}

impl BodyArgs {
    /// Load the body bytes; empty when neither source is given.
    pub fn load(&self) -> std::io::Result<Vec<u8>> {
        match (&self.body, &self.body_file) {
            (Some(body), _) => Ok(body.as_bytes().to_vec()),
            (None, Some(path)) => std::fs::read(path),
            (None, None) => Ok(Vec::new()),
        }
    }
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.to_owned(), value.to_owned()))
        .ok_or_else(|| format!("expected key=value, got {raw:?}"))
}
