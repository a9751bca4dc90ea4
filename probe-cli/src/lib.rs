//! Shared plumbing for the `crypto-snapshot` and `weather-lookup` binaries.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive prompts and configuration
//! - Human-friendly output formatting

pub mod cli;
pub mod logging;
pub mod prompt;
