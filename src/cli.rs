use crate::models::{Platform, PostStatus};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// postdeck - plan client social media posts from the terminal
#[derive(Debug, Parser)]
#[command(name = "postdeck")]
#[command(about = "Plan client social media posts and import content calendars from spreadsheets", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute (if not specified, enters interactive terminal mode)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the client and post collections
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Import clients and posts from pasted spreadsheet text
    Import {
        /// File to import (reads standard input when omitted or "-")
        file: Option<PathBuf>,

        /// Show what would be imported without saving
        #[arg(long)]
        dry_run: bool,
    },

    /// Manage clients
    #[command(alias = "client")]
    Clients {
        #[command(subcommand)]
        action: ClientActions,
    },

    /// Manage posts
    #[command(alias = "post")]
    Posts {
        #[command(subcommand)]
        action: PostActions,
    },

    /// Show totals, status breakdown and upcoming posts
    Overview,

    /// View configuration
    Config {
        #[command(subcommand)]
        action: ConfigActions,
    },
}

#[derive(Debug, Subcommand)]
pub enum ClientActions {
    /// List clients
    List,

    /// Create a new client
    #[command(alias = "create")]
    Add {
        /// Client name
        #[arg(required = true)]
        name: String,

        /// Contact email
        #[arg(long)]
        email: Option<String>,

        /// Accent colour (#RRGGBB)
        #[arg(long)]
        color: Option<String>,

        /// Platforms the client posts to
        #[arg(long, value_delimiter = ',')]
        platforms: Vec<Platform>,
    },

    /// Change fields of an existing client
    Edit {
        /// Client ID
        #[arg(required = true)]
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        /// Remove the stored email
        #[arg(long, conflicts_with = "email")]
        clear_email: bool,

        #[arg(long)]
        color: Option<String>,

        #[arg(long, value_delimiter = ',')]
        platforms: Option<Vec<Platform>>,
    },

    /// Delete a client and all of its posts
    #[command(alias = "remove")]
    Delete {
        /// Client ID
        #[arg(required = true)]
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum PostActions {
    /// List posts ordered by scheduled date
    List {
        /// Only posts for this client ID
        #[arg(long)]
        client: Option<String>,

        /// Only posts with this status
        #[arg(long)]
        status: Option<PostStatus>,
    },

    /// Create a new post
    #[command(alias = "create")]
    Add {
        /// Client ID or name
        #[arg(required = true)]
        client_id: String,

        /// Post content
        #[arg(required = true)]
        content: String,

        /// Scheduled date (YYYY-MM-DD)
        #[arg(required = true)]
        date: String,

        /// Scheduled time (HH:MM)
        #[arg(long, default_value = "09:00")]
        time: String,

        #[arg(long, default_value = "Instagram")]
        platform: Platform,

        #[arg(long, default_value = "draft")]
        status: PostStatus,

        #[arg(long)]
        media_url: Option<String>,
    },

    /// Change fields of an existing post
    Edit {
        /// Post ID
        #[arg(required = true)]
        id: String,

        #[arg(long)]
        content: Option<String>,

        /// New date (YYYY-MM-DD); keeps the current time unless --time is given
        #[arg(long)]
        date: Option<String>,

        /// New time (HH:MM); requires --date
        #[arg(long, requires = "date")]
        time: Option<String>,

        #[arg(long)]
        platform: Option<Platform>,

        #[arg(long)]
        status: Option<PostStatus>,

        #[arg(long)]
        media_url: Option<String>,
    },

    /// Set the status of a post
    Status {
        /// Post ID
        #[arg(required = true)]
        id: String,

        /// draft, scheduled or published
        #[arg(required = true)]
        status: PostStatus,
    },

    /// Delete a post
    #[command(alias = "remove")]
    Delete {
        /// Post ID
        #[arg(required = true)]
        id: String,
    },

    /// Show the next posts due
    Upcoming {
        /// Number of posts to show (defaults to the configured limit)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show posts scheduled on a day
    Day {
        /// Date (YYYY-MM-DD)
        #[arg(required = true)]
        date: String,
    },

    /// Show posts scheduled this week (Sunday to Saturday)
    Week,

    /// Show a month calendar with its posts
    Month {
        /// YYYY-MM, "next" or "prev" (defaults to the current month)
        month: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigActions {
    /// Show configuration
    #[command(aliases = ["list", "get"])]
    Show,

    /// Print the config file location
    Path,
}
