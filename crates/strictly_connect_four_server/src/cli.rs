//! Command-line interface for connect_four.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use strictly_connect_four::FirstMover;

/// Connect-Four against an external move-selection oracle
#[derive(Parser, Debug)]
#[command(name = "connect_four")]
#[command(about = "Play Connect-Four against an external oracle", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, global = true, default_value = "connect_four.toml")]
    pub config: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP gateway
    Serve {
        /// Port to bind to (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,
    },

    /// Run one oracle round trip and print the reply
    Solve {
        /// Board rows joined by ';' (e.g. ".......;.......;.......;.......;.......;.......")
        game: String,

        /// Side to move: x or o
        next_player: String,

        /// Search budget
        #[arg(long)]
        num_try: Option<String>,
    },

    /// Play a game in the terminal
    Play {
        /// Who moves first
        #[arg(long, value_enum, default_value = "human")]
        first: First,

        /// Search budget per oracle call (defaults to the config file)
        #[arg(long)]
        num_try: Option<u32>,

        /// Gateway URL. If not provided, the oracle runs as a local process.
        #[arg(long)]
        server_url: Option<String>,
    },
}

/// First-mover choice on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum First {
    /// You move first
    Human,
    /// The engine moves first
    Engine,
}

impl From<First> for FirstMover {
    fn from(first: First) -> Self {
        match first {
            First::Human => FirstMover::Human,
            First::Engine => FirstMover::Engine,
        }
    }
}
