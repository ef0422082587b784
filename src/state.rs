use crate::models::{Client, Post};
use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

const CLIENTS_KEY: &str = "sm-clients";
const POSTS_KEY: &str = "sm-posts";
// Maximum allowed size for state files to prevent DoS attacks (10MB)
const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
pub const MAX_ITEMS: usize = 10000;

// Trait for collections persisted under a fixed storage key
pub trait Persistent: Sized + Serialize + for<'de> Deserialize<'de> {
    fn storage_key() -> &'static str;
}

impl Persistent for Client {
    fn storage_key() -> &'static str {
        CLIENTS_KEY
    }
}

impl Persistent for Post {
    fn storage_key() -> &'static str {
        POSTS_KEY
    }
}

/// Key-value blob store holding JSON documents
pub trait Storage {
    fn load(&self, key: &str) -> Result<Option<Value>>;
    fn save(&mut self, key: &str, value: &Value) -> Result<()>;
}

/// Stores each key as `<data_dir>/<key>.json`
pub struct FileStorage {
    data_dir: PathBuf,
}

impl FileStorage {
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty()
            || key.contains(['/', '\\'])
            || key.contains("..")
            || key.chars().any(char::is_control)
        {
            return Err(anyhow!("Invalid storage key '{}'", key));
        }
        Ok(self.data_dir.join(format!("{}.json", key)))
    }
}

impl Storage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            debug!("No stored data for '{}'", key);
            return Ok(None);
        }

        // Check file size before loading to prevent DoS attacks
        let metadata = std::fs::metadata(&path)?;
        if metadata.len() > MAX_FILE_SIZE {
            return Err(anyhow!("File size exceeds security limits"));
        }

        let file = File::open(&path)?;
        let reader = BufReader::new(file);
        let value: Value = serde_json::from_reader(reader)
            .map_err(|e| anyhow!("Failed to parse JSON data for '{}': {}", key, e))?;

        check_document_limits(key, &value)?;

        debug!("Loaded '{}' from {}", key, path.display());
        Ok(Some(value))
    }

    fn save(&mut self, key: &str, value: &Value) -> Result<()> {
        let path = self.path_for(key)?;
        check_document_limits(key, value)?;

        // Serialize first so an oversized document never truncates the file
        let bytes = serde_json::to_vec_pretty(value)?;
        if bytes.len() as u64 > MAX_FILE_SIZE {
            return Err(anyhow!("Data for '{}' exceeds the {} byte file limit", key, MAX_FILE_SIZE));
        }

        let file = OpenOptions::new().write(true).create(true).truncate(true).open(&path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&bytes)?;
        writer.flush()?;
        debug!("Saved '{}' to {}", key, path.display());
        Ok(())
    }
}

/// In-process store, used for dry runs and tests
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, Value>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &Value) -> Result<()> {
        self.entries.insert(key.to_string(), value.clone());
        Ok(())
    }
}

/// Typed access to the persisted collections
pub struct StateManager<S: Storage> {
    storage: S,
}

impl<S: Storage> StateManager<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn load<T: Persistent>(&self) -> Result<Vec<T>> {
        match self.storage.load(T::storage_key())? {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| anyhow!("Failed to deserialize '{}': {}", T::storage_key(), e)),
            None => Ok(Vec::new()),
        }
    }

    pub fn save<T: Persistent>(&mut self, items: &[T]) -> Result<()> {
        check_collection::<T>(items)?;
        let value = serde_json::to_value(items)?;
        self.storage.save(T::storage_key(), &value)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

/// Fail when `items` could not be loaded back once saved
pub fn check_collection<T: Persistent>(items: &[T]) -> Result<()> {
    if items.len() > MAX_ITEMS {
        return Err(anyhow!(
            "Too many items in '{}' ({}, maximum {})",
            T::storage_key(),
            items.len(),
            MAX_ITEMS
        ));
    }
    let size = serde_json::to_vec_pretty(items)?.len() as u64;
    if size > MAX_FILE_SIZE {
        return Err(anyhow!(
            "Data for '{}' exceeds the {} byte file limit",
            T::storage_key(),
            MAX_FILE_SIZE
        ));
    }
    Ok(())
}

fn check_document_limits(key: &str, value: &Value) -> Result<()> {
    if let Some(array) = value.as_array() {
        if array.len() > MAX_ITEMS {
            return Err(anyhow!("Too many items in '{}' (maximum {})", key, MAX_ITEMS));
        }
    }
    Ok(())
}

pub fn default_data_dir() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "postdeck", "postdeck")
        .context("Failed to determine data directory")?;
    Ok(proj_dirs.data_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Platform, PostStatus};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn sample_clients() -> Vec<Client> {
        let now = Utc.with_ymd_and_hms(2025, 2, 1, 8, 0, 0).unwrap();
        let mut with_email = Client::new("Acme", "#6366f1", vec![Platform::Instagram], now);
        with_email.email = Some("team@acme.test".to_string());
        vec![
            with_email,
            Client::new("Beta", "#8b5cf6", vec![Platform::YouTube, Platform::TikTok], now),
        ]
    }

    fn sample_posts(clients: &[Client]) -> Vec<Post> {
        let when = Utc.with_ymd_and_hms(2025, 3, 15, 0, 0, 0).unwrap();
        let mut with_media = Post::new(
            clients[0].id.clone(),
            "Launch - teaser",
            when,
            Platform::Instagram,
            PostStatus::Draft,
            when,
        );
        with_media.media_url = Some("https://cdn.example.com/teaser.mp4".to_string());
        vec![
            with_media,
            Post::new(clients[1].id.clone(), "Pack - 4", when, Platform::YouTube, PostStatus::Published, when),
        ]
    }

    #[test]
    fn test_file_storage_round_trip() -> Result<()> {
        let temp_dir = tempdir()?;
        let mut manager = StateManager::new(FileStorage::new(temp_dir.path())?);

        let clients = sample_clients();
        let posts = sample_posts(&clients);
        manager.save(&clients)?;
        manager.save(&posts)?;

        assert!(temp_dir.path().join("sm-clients.json").exists());
        assert!(temp_dir.path().join("sm-posts.json").exists());

        let reloaded = StateManager::new(FileStorage::new(temp_dir.path())?);
        assert_eq!(reloaded.load::<Client>()?, clients);
        assert_eq!(reloaded.load::<Post>()?, posts);
        Ok(())
    }

    #[test]
    fn test_missing_keys_load_as_empty() -> Result<()> {
        let temp_dir = tempdir()?;
        let manager = StateManager::new(FileStorage::new(temp_dir.path())?);
        assert!(manager.load::<Client>()?.is_empty());
        assert!(manager.load::<Post>()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_corrupt_file_is_an_error() -> Result<()> {
        let temp_dir = tempdir()?;
        std::fs::write(temp_dir.path().join("sm-clients.json"), "{not json")?;
        let manager = StateManager::new(FileStorage::new(temp_dir.path())?);
        assert!(manager.load::<Client>().is_err());
        Ok(())
    }

    #[test]
    fn test_rejects_path_like_keys() -> Result<()> {
        let temp_dir = tempdir()?;
        let mut storage = FileStorage::new(temp_dir.path())?;
        assert!(storage.load("../escape").is_err());
        assert!(storage.save("nested/key", &Value::Null).is_err());
        Ok(())
    }

    #[test]
    fn test_oversized_collection_is_not_written() -> Result<()> {
        let temp_dir = tempdir()?;
        let mut manager = StateManager::new(FileStorage::new(temp_dir.path())?);
        let clients = sample_clients();
        let posts = sample_posts(&clients);
        manager.save(&posts)?;

        let when = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let too_many: Vec<Post> = (0..=MAX_ITEMS)
            .map(|_| Post::new("client-1", "Pack", when, Platform::Instagram, PostStatus::Scheduled, when))
            .collect();
        assert!(manager.save(&too_many).is_err());

        // the previous document is still intact and loadable
        let reloaded = StateManager::new(FileStorage::new(temp_dir.path())?);
        assert_eq!(reloaded.load::<Post>()?, posts);
        Ok(())
    }

    #[test]
    fn test_check_collection_limits_bytes() {
        let when = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let long = "a".repeat(2 * 1024 * 1024);
        let posts: Vec<Post> = (0..6)
            .map(|_| Post::new("client-1", long.as_str(), when, Platform::Instagram, PostStatus::Draft, when))
            .collect();
        assert!(check_collection(&posts).is_err());
        assert!(check_collection(&posts[..1]).is_ok());
    }

    #[test]
    fn test_file_storage_rejects_oversized_documents() -> Result<()> {
        let temp_dir = tempdir()?;
        let mut storage = FileStorage::new(temp_dir.path())?;
        let array = Value::Array(vec![Value::Null; MAX_ITEMS + 1]);
        assert!(storage.save("sm-posts", &array).is_err());
        assert!(!temp_dir.path().join("sm-posts.json").exists());
        Ok(())
    }

    #[test]
    fn test_memory_storage_round_trip() -> Result<()> {
        let mut manager = StateManager::new(MemoryStorage::new());
        let clients = sample_clients();
        manager.save(&clients)?;

        assert!(manager.storage().get("sm-clients").is_some());
        assert_eq!(manager.load::<Client>()?, clients);
        Ok(())
    }

    #[test]
    fn test_reads_documents_written_by_other_tools() -> Result<()> {
        let mut storage = MemoryStorage::new();
        storage.save(
            "sm-posts",
            &serde_json::json!([{
                "id": "1712345678901",
                "clientId": "client-1712345678000-0",
                "content": "Pack - 8 posts",
                "scheduledDate": "2025-03-01T00:00:00.000Z",
                "platform": "Instagram",
                "status": "scheduled",
                "createdAt": "2025-02-20T10:00:00.000Z",
                "updatedAt": "2025-02-20T10:00:00.000Z"
            }]),
        )?;

        let posts: Vec<Post> = StateManager::new(storage).load()?;
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].client_id, "client-1712345678000-0");
        assert_eq!(posts[0].media_url, None);
        Ok(())
    }
}
