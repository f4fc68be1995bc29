// src/core/mod.rs

// Everything that does not touch the terminal lives under `core`: the data
// model, the credential store, the provider proxy and the scan dispatcher.

/// Scanner types, scan requests and the normalized result rows.
pub mod models;

/// Error type shared by every scan strategy.
pub mod errors;

/// Static list of third-party providers per scanner type.
pub mod catalog;

/// Persistent per-scanner API keys and provider choices.
pub mod credentials;

/// Target parsing and validation (IP ranges, hostnames, interfaces).
pub mod target;

/// Runtime configuration loaded from `config.toml` and the environment.
pub mod config;

/// Reshapes generic scan requests into provider-specific HTTP calls.
pub mod proxy;

/// Runs a scan through backend, provider and local-discovery fallbacks.
pub mod dispatcher;
