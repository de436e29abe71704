//! `trainco2` command-line application.
//!
//! Re-exports internal modules for integration testing. The binary
//! entrypoint lives in `main.rs`.

pub mod cli;
pub mod commands;
pub mod config;
pub mod report;
