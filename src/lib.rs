//! Wallet Service
//!
//! Account-to-account transfers over PostgreSQL with a double-entry payment
//! ledger.
//!
//! # Modules
//!
//! - [`wallet`] - Domain types, storage seams, transfer coordinator, facade
//! - [`db`] - Connection pool, health check, migrations
//! - [`gateway`] - HTTP transport (axum) and OpenAPI document
//! - [`config`] - YAML configuration
//! - [`logging`] - tracing subscriber setup

pub mod config;
pub mod db;
pub mod gateway;
pub mod logging;
pub mod wallet;

pub use wallet::{Account, Ledger, RetryPolicy, Wallet, WalletError};
