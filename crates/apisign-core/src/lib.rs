//! Core types, configuration, and errors for apisign.
//!
//! This crate provides the building blocks shared by the signing protocol,
//! the transport adapter, and the CLI: the secret [`SignatureKey`], the
//! verbatim [`Timestamp`], and the environment-driven [`SignerConfig`].

mod config;
mod error;
mod types;

pub use config::SignerConfig;
pub use error::{CoreError, CoreResult};
pub use types::{SignatureKey, Timestamp};
