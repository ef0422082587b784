pub mod cli;
pub mod commands;
pub mod config;
pub mod import;
pub mod models;
pub mod planner;
pub mod reconcile;
pub mod schedule;
pub mod state;
pub mod validation;

use env_logger::Env;

/// Install the terminal logger. `verbose` lowers the default level to debug;
/// `RUST_LOG` still takes precedence when set.
pub fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            use chrono::Local;
            use std::io::Write;
            writeln!(
                buf,
                "{} [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();
}

// Re-export commonly used types
pub use config::Config;
pub use import::{import_text, parse, ImportError, ParseResult, ParserOptions, TabularParser};
pub use models::{Client, Platform, Post, PostStatus};
pub use planner::Planner;
pub use reconcile::{merge, MergeResult};
pub use state::{FileStorage, MemoryStorage, Storage};
