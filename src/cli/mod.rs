//! CLI module for orderstore
//!
//! Provides command-line interface for:
//! - query: one JSON intent from stdin, matching orders on stdout
//! - explain: one JSON intent from stdin, its plan on stdout
//! - top-countries: the top-K country report for a product and window
//! - get: one order by primary key

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{boot, explain, get, load_orders, query, run, run_command, top_countries, Session};
pub use config::{Config, SchemaConfig};
pub use errors::{CliError, CliResult};
pub use io::{read_request, write_error, write_response};
