//! CLI module for the knowledge gateway

pub mod serve;

use clap::{Parser, Subcommand};

/// Copilot Knowledge Gateway - REST management layer for Qdrant-backed
/// knowledge bases
#[derive(Parser)]
#[command(name = "copilot-knowledge-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the knowledge gateway API server
    Serve,
}
