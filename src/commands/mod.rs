use crate::cli::{Cli, Commands};
use crate::config::{get_config_path, Config};
use crate::import::ParserOptions;
use crate::models::{Client, Post};
use crate::planner::Planner;
use crate::state::{FileStorage, Storage};
use anyhow::Result;
use chrono::Local;
use log::debug;
use std::path::{Path, PathBuf};

pub mod clients;
pub mod config;
pub mod import;
pub mod overview;
pub mod posts;
pub mod shell;

/// Settings resolved once at start-up and shared by every command
#[derive(Debug, Clone)]
pub struct Session {
    pub config: Config,
    pub config_path: PathBuf,
}

impl Session {
    pub fn load(config_override: Option<&Path>) -> Result<Self> {
        match config_override {
            Some(path) => Ok(Self { config: Config::load_from(path)?, config_path: path.to_path_buf() }),
            None => Ok(Self { config: Config::load()?, config_path: get_config_path()? }),
        }
    }
}

pub fn open_planner(session: &Session, data_dir: Option<&Path>) -> Result<Planner<FileStorage>> {
    let dir = match data_dir {
        Some(dir) => dir.to_path_buf(),
        None => session.config.storage.resolve_data_dir()?,
    };
    debug!("Using data directory {}", dir.display());
    Planner::open(FileStorage::new(dir)?, ParserOptions::from(&session.config.import))
}

pub fn run(cli: Cli) -> Result<()> {
    let session = Session::load(cli.config.as_deref())?;
    let mut planner = open_planner(&session, cli.data_dir.as_deref())?;

    match cli.command {
        Some(command) => execute(command, &mut planner, &session),
        None => shell::run_shell(&mut planner, &session),
    }
}

pub fn execute<S: Storage>(
    command: Commands,
    planner: &mut Planner<S>,
    session: &Session,
) -> Result<()> {
    match command {
        Commands::Import { file, dry_run } => {
            import::handle_import_command(planner, file.as_deref(), dry_run)
        }
        Commands::Clients { action } => clients::handle_clients_command(planner, action),
        Commands::Posts { action } => posts::handle_posts_command(planner, action, session),
        Commands::Overview => overview::print_overview(planner, session),
        Commands::Config { action } => config::handle_config_command(action, session),
    }
}

/// One-line listing used by every post view
pub fn format_post_line(post: &Post, clients: &[Client]) -> String {
    let client = clients
        .iter()
        .find(|c| c.id == post.client_id)
        .map(|c| c.name.as_str())
        .unwrap_or("(unknown client)");
    format!(
        "{}  [{}]  {:<9}  {}  {}  ({})",
        post.scheduled_date.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
        post.status,
        post.platform.as_str(),
        client,
        post.content,
        post.id
    )
}
