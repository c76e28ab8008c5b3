use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sauti", about = "Sauti client tools")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the version.
    Version,
    /// Show the locally persisted session identity.
    Whoami,
}
