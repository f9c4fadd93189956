use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "launchkit")]
#[command(about = "Inspect and edit launcher bookmark stores", long_about = None)]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Store to operate on (apps, recent, system, docs, dirs)
    #[arg(short, long, global = true, default_value = "apps")]
    pub store: String,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List items in store order
    #[command(alias = "ls")]
    List {
        /// Only items whose uri or name contains this
        #[arg(short = 'f', long)]
        search: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Add an item, or update the one with the same uri
    #[command(alias = "a")]
    Add {
        uri: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        mime_type: Option<String>,

        /// Application name and command, e.g. --app Editor "editor %U"
        #[arg(long, num_args = 2, value_names = ["NAME", "EXEC"])]
        app: Option<Vec<String>>,
    },

    /// Remove one or more items
    #[command(alias = "rm")]
    Remove {
        #[arg(required = true, num_args = 1..)]
        uris: Vec<String>,
    },

    /// Move the given uris to the front, in order
    Reorder {
        #[arg(required = true, num_args = 1..)]
        uris: Vec<String>,
    },

    /// Show which file backs the store
    Where,

    /// Show the store laid out on the grid
    Grid,

    /// Drag an item onto a grid bin (0-based)
    #[command(alias = "mv")]
    Move { uri: String, bin: usize },

    /// Print the store every time it changes on disk
    Watch {
        /// Milliseconds between polls
        #[arg(long, default_value_t = 500)]
        interval_ms: u64,

        /// Stop after this many polls
        #[arg(long)]
        polls: Option<u64>,
    },

    /// Show the active network link
    Network {
        /// sysfs network class directory
        #[arg(long, default_value = launchkit::network::SYSFS_NET)]
        root: PathBuf,

        /// Keep refreshing for this many rounds at the configured interval
        #[arg(long)]
        follow: Option<u32>,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (e.g., columns, item-limit, discipline)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}
