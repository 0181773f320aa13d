//! CLI argument definitions using clap

use clap::{ArgAction, Parser};
use clap_complete::Shell;

/// Redash API client: run one client command and print its JSON result
#[derive(Parser, Debug)]
#[command(name = "redashpy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Redash service URL (falls back to $REDASH_SERVICE_URL, then http://localhost:5000)
    #[arg(short = 'H', long = "host", value_name = "URL")]
    pub host: Option<String>,

    /// API key (falls back to $REDASH_API_KEY)
    #[arg(short = 'k', long = "api-key", value_name = "KEY")]
    pub api_key: Option<String>,

    /// Command to run, e.g. create_query or list_data_sources
    #[arg(short = 'c', long = "command", required_unless_present = "generator")]
    pub command: Option<String>,

    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub debug: u8,

    /// Print shell completions and exit
    #[arg(long = "generate", value_enum, value_name = "SHELL")]
    pub generator: Option<Shell>,

    /// Positional arguments for the command (use `--` before values starting with `-`)
    pub command_args: Vec<String>,
}
