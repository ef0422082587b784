//! Application state holder for clients and posts.
//
// Collections are replaced wholesale on every mutation and written back through
// the storage adapter right after. Clients are saved before posts; the two writes
// are not transactional, but in-memory state only changes after both succeed.

use crate::import::{import_text, ImportError, ParserOptions, TabularParser};
use crate::models::{
    Client, ClientChanges, Platform, Post, PostChanges, PostStatus, CLIENT_PALETTE,
};
use crate::reconcile::MergeResult;
use crate::state::{check_collection, StateManager, Storage};
use crate::validation::{
    validate_client_name, validate_email, validate_hex_color, validate_post_content,
};
use anyhow::{anyhow, Result};
use chrono::{DateTime, Local, Utc};
use log::info;

#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    #[error("Client '{0}' not found")]
    ClientNotFound(String),
    #[error("Post '{0}' not found")]
    PostNotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

#[derive(Debug, Clone, Default)]
pub struct NewClient {
    pub name: String,
    pub email: Option<String>,
    pub color: Option<String>,
    pub platforms: Vec<Platform>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub client_id: String,
    pub content: String,
    pub scheduled_date: DateTime<Utc>,
    pub platform: Platform,
    pub status: PostStatus,
    pub media_url: Option<String>,
}

pub struct Planner<S: Storage> {
    state: StateManager<S>,
    clients: Vec<Client>,
    posts: Vec<Post>,
    parser_options: ParserOptions,
    fixed_now: Option<DateTime<Local>>,
}

impl<S: Storage> Planner<S> {
    /// Load both collections from `storage`
    pub fn open(storage: S, parser_options: ParserOptions) -> Result<Self> {
        let state = StateManager::new(storage);
        let clients: Vec<Client> = state.load()?;
        let posts: Vec<Post> = state.load()?;
        info!("Loaded {} client(s) and {} post(s)", clients.len(), posts.len());
        Ok(Self { state, clients, posts, parser_options, fixed_now: None })
    }

    /// Pin the clock used for timestamps and the import year
    pub fn with_fixed_clock(mut self, now: DateTime<Local>) -> Self {
        self.fixed_now = Some(now);
        self
    }

    pub fn now(&self) -> DateTime<Local> {
        self.fixed_now.unwrap_or_else(Local::now)
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn client(&self, id: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    pub fn post(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn posts_for_client(&self, client_id: &str) -> Vec<&Post> {
        self.posts.iter().filter(|p| p.client_id == client_id).collect()
    }

    pub fn storage(&self) -> &S {
        self.state.storage()
    }

    pub fn add_client(&mut self, new: NewClient) -> Result<Client> {
        validate_client_name(&new.name)?;
        let color = new.color.unwrap_or_else(|| CLIENT_PALETTE[0].to_string());
        check_client_fields(Some(color.as_str()), new.email.as_deref())?;

        let mut client = Client::new(new.name.trim(), color, new.platforms, self.stamp());
        client.email = new.email;

        let mut clients = self.clients.clone();
        clients.push(client.clone());
        self.commit_clients(clients)?;
        info!("Added client '{}' ({})", client.name, client.id);
        Ok(client)
    }

    pub fn update_client(&mut self, id: &str, changes: &ClientChanges) -> Result<Client> {
        let current =
            self.client(id).ok_or_else(|| anyhow!(PlannerError::ClientNotFound(id.to_string())))?;
        if let Some(name) = &changes.name {
            validate_client_name(name)?;
        }
        let email = changes.email.as_ref().and_then(|e| e.as_deref());
        check_client_fields(changes.color.as_deref(), email)?;

        let updated = current.with_changes(changes);
        let clients =
            self.clients.iter().map(|c| if c.id == id { updated.clone() } else { c.clone() }).collect();
        self.commit_clients(clients)?;
        Ok(updated)
    }

    /// Remove a client together with every post referencing it.
    /// Returns the number of posts removed.
    pub fn delete_client(&mut self, id: &str) -> Result<usize> {
        if self.client(id).is_none() {
            return Err(anyhow!(PlannerError::ClientNotFound(id.to_string())));
        }

        let clients: Vec<Client> = self.clients.iter().filter(|c| c.id != id).cloned().collect();
        let posts: Vec<Post> = self.posts.iter().filter(|p| p.client_id != id).cloned().collect();
        let removed = self.posts.len() - posts.len();

        self.commit_both(clients, posts)?;
        info!("Deleted client {} and {} post(s)", id, removed);
        Ok(removed)
    }

    pub fn add_post(&mut self, new: NewPost) -> Result<Post> {
        if self.client(&new.client_id).is_none() {
            return Err(anyhow!(PlannerError::ClientNotFound(new.client_id)));
        }
        validate_post_content(&new.content)?;

        let mut post = Post::new(
            new.client_id,
            new.content,
            new.scheduled_date,
            new.platform,
            new.status,
            self.stamp(),
        );
        post.media_url = new.media_url;

        let mut posts = self.posts.clone();
        posts.push(post.clone());
        self.commit_posts(posts)?;
        Ok(post)
    }

    pub fn update_post(&mut self, id: &str, changes: &PostChanges) -> Result<Post> {
        let current =
            self.post(id).ok_or_else(|| anyhow!(PlannerError::PostNotFound(id.to_string())))?;
        if let Some(client_id) = &changes.client_id {
            if self.client(client_id).is_none() {
                return Err(anyhow!(PlannerError::ClientNotFound(client_id.clone())));
            }
        }
        if let Some(content) = &changes.content {
            validate_post_content(content)?;
        }

        let updated = current.with_changes(changes, self.stamp());
        let posts =
            self.posts.iter().map(|p| if p.id == id { updated.clone() } else { p.clone() }).collect();
        self.commit_posts(posts)?;
        Ok(updated)
    }

    pub fn set_post_status(&mut self, id: &str, status: PostStatus) -> Result<Post> {
        self.update_post(id, &PostChanges::new().status(status))
    }

    pub fn delete_post(&mut self, id: &str) -> Result<()> {
        if self.post(id).is_none() {
            return Err(anyhow!(PlannerError::PostNotFound(id.to_string())));
        }
        let posts = self.posts.iter().filter(|p| p.id != id).cloned().collect();
        self.commit_posts(posts)
    }

    /// Parse and merge without touching state or storage
    pub fn preview_import(&self, raw: &str) -> Result<MergeResult, ImportError> {
        import_text(raw, &self.clients, &self.posts, &self.parser())
    }

    /// Parse, merge and persist pasted spreadsheet text
    pub fn import_text(&mut self, raw: &str) -> Result<MergeResult, ImportError> {
        let merged = self.preview_import(raw)?;

        self.commit_both(merged.clients.clone(), merged.posts.clone())
            .map_err(|e| ImportError::Failed(format!("{:#}", e)))?;
        Ok(merged)
    }

    fn parser(&self) -> TabularParser {
        TabularParser::new(self.parser_options.clone()).with_now(self.now())
    }

    fn stamp(&self) -> DateTime<Utc> {
        self.now().with_timezone(&Utc)
    }

    fn commit_clients(&mut self, clients: Vec<Client>) -> Result<()> {
        self.state.save(&clients)?;
        self.clients = clients;
        Ok(())
    }

    fn commit_posts(&mut self, posts: Vec<Post>) -> Result<()> {
        self.state.save(&posts)?;
        self.posts = posts;
        Ok(())
    }

    /// Write both collections, replacing in-memory state only once both writes succeed.
    /// Limits are checked up front so an oversized collection is refused before
    /// anything reaches storage.
    fn commit_both(&mut self, clients: Vec<Client>, posts: Vec<Post>) -> Result<()> {
        check_collection(&clients)?;
        check_collection(&posts)?;
        self.state.save(&clients)?;
        self.state.save(&posts)?;
        self.clients = clients;
        self.posts = posts;
        Ok(())
    }
}

fn check_client_fields(color: Option<&str>, email: Option<&str>) -> Result<()> {
    if let Some(color) = color {
        if !validate_hex_color(color) {
            return Err(anyhow!(PlannerError::InvalidInput(format!(
                "'{}' is not a hex colour like #6366f1",
                color
            ))));
        }
    }
    if let Some(email) = email {
        if !validate_email(email) {
            return Err(anyhow!(PlannerError::InvalidInput(format!(
                "'{}' is not a valid email address",
                email
            ))));
        }
    }
    Ok(())
}
