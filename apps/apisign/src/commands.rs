//! Subcommand implementations.
//!
//! Each command returns its output as a string so `main` only prints.

use anyhow::{Context, Result};
use apisign_auth::{SignRequest, SignatureClient, Timestamp};

use crate::cli::{ResponseArgs, SignArgs, ValidateArgs};

/// Sign a request and render its headers.
pub fn sign(client: &SignatureClient, args: &SignArgs) -> Result<String> {
    let body = args.body.load().context("failed to read request body")?;
    let timestamp = args.timestamp.as_deref().map(Timestamp::new);
    let params: Vec<(&str, &str)> = args
        .params
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();

    let signature = client
        .sign(&SignRequest {
            url: &args.url,
            params: &params,
            body: &body,
            method: Some(args.method.as_str()),
            timestamp: timestamp.as_ref(),
        })
        .context("failed to sign request")?;
    let headers = client.headers(&signature)?;

    let mut pairs = Vec::with_capacity(headers.len());
    for (name, value) in &headers {
        let value = value
            .to_str()
            .with_context(|| format!("header {name} is not printable"))?;
        pairs.push((name.as_str(), value));
    }

    if args.json {
        let object: serde_json::Map<String, serde_json::Value> = pairs
            .into_iter()
            .map(|(name, value)| (name.to_owned(), serde_json::Value::from(value)))
            .collect();
        Ok(serde_json::to_string_pretty(&object)?)
    } else {
        Ok(pairs
            .into_iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

/// Sign a response body and return the signature header value.
pub fn sign_response(client: &SignatureClient, args: &ResponseArgs) -> Result<String> {
    let body = args.body.load().context("failed to read response body")?;
    let signature = client
        .sign_response(&body, &Timestamp::new(args.timestamp.as_str()))
        .context("failed to sign response")?;
    Ok(signature.as_str().to_owned())
}

/// Check a response signature.
pub fn validate(client: &SignatureClient, args: &ValidateArgs) -> Result<bool> {
    let body = args.body.load().context("failed to read response body")?;
    let timestamp = Timestamp::new(args.timestamp.as_str());
    Ok(client.validate_response(&args.signature, &body, Some(&timestamp)))
}
