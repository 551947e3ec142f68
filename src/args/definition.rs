//! Command-line argument definition.

use std::path::PathBuf;

use clap::Parser;

/// Finscope - browse, sort, filter and chart company income statements in the terminal
#[derive(Parser, Debug)]
#[command(name = "finscope")]
#[command(version)]
#[command(about = "Browse, sort, filter and chart company income statements in the terminal", long_about = None)]
pub struct Args {
    /// Company symbol to open (e.g. AAPL, AAPL.NE); defaults to the configured symbol
    #[arg(value_name = "SYMBOL")]
    pub symbol_arg: Option<String>,

    /// Company symbol to open (same as the positional argument)
    #[arg(short, long, conflicts_with = "symbol_arg")]
    pub symbol: Option<String>,

    /// Serve data from a local JSON fixture instead of the network
    #[arg(long, value_name = "FILE")]
    pub fixture: Option<PathBuf>,

    /// Read settings from this file instead of the standard location
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Set the logging level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Enable verbose output (equivalent to --log-level debug)
    #[arg(short, long)]
    pub verbose: bool,

    /// Load the symbol once, print the table to stdout and exit
    #[arg(short, long)]
    pub print: bool,
}

impl Args {
    /// Symbol from either the positional argument or `--symbol`.
    #[must_use]
    pub fn requested_symbol(&self) -> Option<&str> {
        self.symbol_arg
            .as_deref()
            .or(self.symbol.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
