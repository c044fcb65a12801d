//! Calendar report CLI library.
//!
//! This crate provides the `calreport` command-line interface: argument
//! parsing, configuration loading, event ingestion and report rendering.

mod cli;
pub mod commands;
mod config;
pub mod events;

pub use cli::{Cli, Commands, ReportArgs};
pub use config::Config;
