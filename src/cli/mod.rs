//! CLI for the ChemLab AI gateway
//!
//! - `serve`: run the HTTP gateway
//! - `providers`: print the provider priority list and which ones have a key

pub mod providers;
pub mod serve;

use clap::{Parser, Subcommand};

/// ChemLab AI gateway - chemistry quiz, reaction and homework endpoints backed by LLM fallback
#[derive(Parser)]
#[command(name = "chemlab-ai-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP gateway
    Serve,

    /// Show the provider chain and credential availability, then exit
    Providers,
}
