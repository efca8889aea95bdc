use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "opendesk")]
#[command(about = "MCP server that opens folders, files and URLs on the desktop")]
#[command(version)]
pub struct Cli {
    /// Debug-level logging (overridden by OPENDESK_LOG / RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Run the MCP server on stdio (default)
    Serve,

    /// Print the detected platform, configuration and installed openers
    Doctor,
}

impl Cli {
    pub fn subcommand(&self) -> Commands {
        self.command.unwrap_or(Commands::Serve)
    }
}
