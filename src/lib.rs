//! `tempmon` library crate.
//!
//! Polls temperature sources and drives GPIO outputs when per-output
//! threshold conditions change. The binary entrypoint lives in `main.rs`;
//! the modules are exposed here so they can be exercised from `tests/`.

pub mod cli;
pub mod config;
pub mod datasources;
pub mod error;
pub mod logging;
pub mod logic;
pub mod models;
pub mod pins;
