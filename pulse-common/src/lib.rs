//! Common types and utilities shared across Pulse crates.
//!
//! This crate holds the pieces every other crate in the workspace leans on:
//! logging initialisation and the shared error type. It stays deliberately
//! small so the library crates can depend on it without pulling in the
//! HTTP or configuration stacks.
//!
//! # Overview
//!
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`PulseError`] and [`Result`]: Shared error handling for binaries
//!
//! # Examples
//!
//! ```rust
//! use pulse_common::observability::{LogConfig, LogFormat};
//!
//! let cfg = LogConfig {
//!     format: LogFormat::Json,
//!     ..LogConfig::default()
//! };
//! assert_eq!(cfg.app_name, "pulse");
//! assert_eq!(cfg.default_filter, "info");
//! ```
pub mod observability;

/// Error types used across the Pulse workspace.
#[derive(thiserror::Error, Debug)]
pub enum PulseError {
    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Process setup (logging, HTTP client) could not be completed.
    #[error("Setup error: {0}")]
    Setup(String),

    /// The news pipeline failed in a way that aborts the run.
    #[error("Pipeline error: {0:#}")]
    Pipeline(#[from] anyhow::Error),
}

/// Convenient alias for results that use [`PulseError`].
pub type Result<T> = std::result::Result<T, PulseError>;
