pub mod app;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "paged-collection")]
#[command(about = "Browse a JSON record file through a paged collection")]
pub struct Cli {
    /// Log collection activity to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args)]
pub struct Source {
    /// JSON file holding an array of objects
    #[arg(long)]
    pub file: PathBuf,

    /// Filter criteria as key=value, repeatable
    #[arg(long = "filter", value_name = "KEY=VALUE")]
    pub filters: Vec<String>,

    #[arg(long, default_value_t = 20)]
    pub per_page: usize,

    /// Count pages with ceiling division instead of truncation
    #[arg(long)]
    pub ceil: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print one page
    Page {
        #[command(flatten)]
        source: Source,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Load every window with load_more and print each batch
    Drain {
        #[command(flatten)]
        source: Source,
    },
    /// Print the number of matching records
    Count {
        #[command(flatten)]
        source: Source,
    },
    /// Print the first loaded record whose field loosely matches a value
    Find {
        #[command(flatten)]
        source: Source,
        #[arg(long, default_value = "id")]
        key: String,
        #[arg(long)]
        value: String,
    },
}
