//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Twenty-questions guessing game backed by a persistent binary decision tree
#[derive(Parser, Debug)]
#[command(name = "guesser")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global one
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Tree file (default: `database` setting)
    #[arg(short, long, global = true, env = "GUESSER_FILE", value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play the guessing game (default)
    Play,

    /// Describe an answer by the questions leading to it
    Define {
        /// Answer to describe
        word: String,
    },

    /// Compare two answers
    Compare {
        /// First answer
        first: String,
        /// Second answer
        second: String,
    },

    /// Check the tree structure
    Check,

    /// Print the tree
    Show {
        /// Emit Graphviz DOT source instead of a text tree
        #[arg(long)]
        dot: bool,
    },

    /// Rewrite the tree file in canonical layout
    Format {
        /// Write here instead of overwriting the input
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,
}
