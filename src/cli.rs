/// CLI argument parsing

use clap::{Parser, Subcommand, ValueEnum};

// Build timestamp injected at compile time
pub const VERSION_WITH_BUILD: &str = concat!(env!("CARGO_PKG_VERSION"), " (built: ", env!("BUILD_TIMESTAMP"), ")");

#[derive(Parser)]
#[command(name = "docker-probe")]
#[command(author, version = VERSION_WITH_BUILD, about, long_about = None)]
pub struct Cli {
    /// Docker host to probe (overrides DOCKER_HOST and the config file)
    #[arg(short = 'H', long, global = true)]
    pub host: Option<String>,

    /// Request timeout in seconds
    #[arg(short, long, global = true)]
    pub timeout: Option<u64>,

    /// Output format for the check result
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Log lines only
    Text,
    /// Log lines plus a JSON report on stdout
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ping the daemon and report version/info (default)
    Check,

    /// Show which Docker host would be used, without contacting it
    Host,

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// View configuration
    Show,

    /// Set the fallback Docker host
    SetHost { host: String },

    /// Set the request timeout in seconds
    SetTimeout { seconds: u64 },
}
