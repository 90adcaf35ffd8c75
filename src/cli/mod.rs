pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gleaner")]
#[command(about = "Collects articles, news and repositories into a local store", long_about = None)]
pub struct Cli {
    /// Database file (default: <data dir>/gleaner/gleaner.db)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Number of links extracted concurrently (overrides the config file)
    #[arg(short, long, global = true)]
    pub workers: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract and store the documents behind one or more links
    Crawl {
        /// Links to extract
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Crawl every post linked from a profile page
    Profile {
        /// URL of the profile page
        url: String,
    },
    /// Harvest a paginated feed and store its posts
    Feed {
        /// URL of the feed page
        url: String,

        /// Oldest item to keep, "YYYY-MM-DD HH:MM" in the source calendar
        #[arg(long)]
        min_date: Option<String>,

        /// Maximum number of "load more" clicks
        #[arg(long)]
        max_reveals: Option<u32>,
    },
    /// Show which strategy each router picks for a URL
    Route {
        url: String,
    },
    /// Normalize a source timestamp
    Date {
        /// Raw timestamp, e.g. "24 بهمن 1404 - 10:30" or "2 ساعت پیش"
        raw: String,

        /// Reference time for relative phrases, "YYYY-MM-DD HH:MM" (Gregorian)
        #[arg(long)]
        reference: Option<String>,
    },
    /// Document counts per collection
    Stats,
}
