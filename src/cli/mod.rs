//! CLI for the gateway

pub mod serve;

use clap::{Parser, Subcommand};

/// Muse Gateway - API gateway for image generation providers
#[derive(Parser)]
#[command(name = "muse-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the gateway server
    Serve,
}
