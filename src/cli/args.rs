//! CLI argument definitions using clap
//!
//! Commands:
//! - orderstore query --config <path>
//! - orderstore explain --config <path>
//! - orderstore top-countries --config <path> --product <id> --from <ts> --to <ts> [--seller <id>]
//! - orderstore get --config <path> --key <attribute=value>...

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// orderstore - order queries and top-country reports over a key-value table
#[derive(Parser, Debug)]
#[command(name = "orderstore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one JSON query intent read from stdin
    Query {
        /// Path to configuration file
        #[arg(long, default_value = "./orderstore.json")]
        config: PathBuf,
    },

    /// Show the plan for one JSON query intent read from stdin
    Explain {
        /// Path to configuration file
        #[arg(long, default_value = "./orderstore.json")]
        config: PathBuf,
    },

    /// Top countries by purchased quantity of a product within a time window
    TopCountries {
        /// Path to configuration file
        #[arg(long, default_value = "./orderstore.json")]
        config: PathBuf,

        #[arg(long)]
        product: String,

        /// Window start, RFC 3339
        #[arg(long)]
        from: String,

        /// Window end, RFC 3339, inclusive
        #[arg(long)]
        to: String,

        /// Restrict to one seller
        #[arg(long)]
        seller: Option<String>,
    },

    /// Read one order by its full primary key
    Get {
        /// Path to configuration file
        #[arg(long, default_value = "./orderstore.json")]
        config: PathBuf,

        /// Primary key part as attribute=value; repeat for composite keys
        #[arg(long = "key", required = true)]
        keys: Vec<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
