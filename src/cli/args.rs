//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};

/// Drag-and-drop tree engine: reorder, nest and reparent items in a labeled hierarchy
#[derive(Parser, Debug)]
#[command(name = "dragtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Turn debugging information on (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file overlaying the global one
    #[arg(long, global = true, value_hint = ValueHint::FilePath, env = "DRAGTREE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Initial tree (TOML); defaults to the configured seed or the demo tree
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub seed: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the tree
    Show,

    /// Replay an action script and print the resulting tree
    Apply {
        /// Script with one [[action]] table per dispatch
        #[arg(long, value_hint = ValueHint::FilePath)]
        script: PathBuf,

        /// Output format of the final tree
        #[arg(long, value_enum, default_value_t = OutputFormat::Tree)]
        format: OutputFormat,
    },

    /// Print the ids from the top-level ancestor down to an item
    Path {
        /// Item id
        id: String,
    },

    /// List the children of an item (top-level items when omitted)
    Children {
        /// Parent item id
        parent: Option<String>,
    },

    /// List the legal parents an item can be moved under
    Targets {
        /// Item id
        id: String,
    },

    /// List the visible rows with level and mode
    Rows,

    /// Show effective settings
    Config,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Rendered tree
    Tree,
    /// Seed-compatible TOML
    Toml,
}
