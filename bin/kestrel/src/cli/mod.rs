use clap::{value_parser, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

pub mod args;
pub mod commands;

/// The main Kestrel CLI interface
#[derive(Debug, Parser)]
#[command(author, version, about = "Kestrel", long_about = None)]
pub struct Cli {
    /// The command to execute
    #[clap(subcommand)]
    command: Commands,

    /// The verbosity level
    #[clap(long, short, global = true, default_value_t = 2, value_parser = value_parser!(u8).range(..=4))]
    verbosity: u8,
}

impl Cli {
    /// Get the log level based on the verbosity level
    pub fn get_log_level(&self) -> String {
        match self.verbosity {
            0 => "error",
            1 => "warn",
            2 => "info",
            3 => "debug",
            _ => "trace",
        }
        .into()
    }

    /// Log directives of the kestrel crates, appended to `RUST_LOG` if set
    pub fn log_directives(&self, rust_log: Option<String>) -> String {
        let level = self.get_log_level();
        let kestrel =
            format!("kestrel={level},kestrel_contracts={level},kestrel_mempool={level}");
        match rust_log {
            Some(val) if !val.is_empty() => format!("{val},{kestrel}"),
            _ => kestrel,
        }
    }
}

/// Commands to be executed
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the hash of a user operation
    #[command(name = "hash")]
    Hash(commands::HashCommand),

    /// Print the ABI packed user operation
    #[command(name = "pack")]
    Pack(commands::PackCommand),

    /// Print max gas available, max prefund and dynamic gas price of a user operation
    #[command(name = "gas")]
    Gas(commands::GasCommand),

    /// Check a user operation against the pending user operations of its sender
    #[command(name = "check-replacement")]
    CheckReplacement(commands::CheckReplacementCommand),

    /// List the supported entry point versions
    #[command(name = "versions")]
    Versions(commands::VersionsCommand),
}

pub fn run() -> eyre::Result<()> {
    let cli = Cli::parse();

    let directives = cli.log_directives(std::env::var("RUST_LOG").ok());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directives))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Hash(command) => command.execute(),
        Commands::Pack(command) => command.execute(),
        Commands::Gas(command) => command.execute(),
        Commands::CheckReplacement(command) => command.execute(),
        Commands::Versions(command) => command.execute(),
    }
}
