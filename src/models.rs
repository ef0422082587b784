//! Client and post records shared by the importer, the reconciler and the planner.
//
// The serialized shape (camelCase keys, enum display strings) is the persisted
// format of the `sm-clients` and `sm-posts` collections.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Accent colours handed out round-robin to clients created by an import
pub const CLIENT_PALETTE: [&str; 12] = [
    "#6366f1", "#8b5cf6", "#ec4899", "#f43f5e", "#ef4444", "#f59e0b", "#10b981", "#06b6d4",
    "#3b82f6", "#14b8a6", "#84cc16", "#f97316",
];

/// Colour shown for posts whose client cannot be found
pub const DEFAULT_CLIENT_COLOR: &str = "#6366f1";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseModelError {
    #[error("Unknown platform '{0}'. Expected one of: Facebook, Instagram, Twitter, LinkedIn, TikTok, YouTube")]
    UnknownPlatform(String),
    #[error("Unknown post status '{0}'. Expected one of: draft, scheduled, published")]
    UnknownStatus(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Facebook,
    Instagram,
    Twitter,
    LinkedIn,
    TikTok,
    YouTube,
}

impl Platform {
    pub const ALL: [Platform; 6] = [
        Platform::Facebook,
        Platform::Instagram,
        Platform::Twitter,
        Platform::LinkedIn,
        Platform::TikTok,
        Platform::YouTube,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Facebook => "Facebook",
            Platform::Instagram => "Instagram",
            Platform::Twitter => "Twitter",
            Platform::LinkedIn => "LinkedIn",
            Platform::TikTok => "TikTok",
            Platform::YouTube => "YouTube",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ParseModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Platform::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseModelError::UnknownPlatform(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Scheduled,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Scheduled => "scheduled",
            PostStatus::Published => "published",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = ParseModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(PostStatus::Draft),
            "scheduled" => Ok(PostStatus::Scheduled),
            "published" => Ok(PostStatus::Published),
            _ => Err(ParseModelError::UnknownStatus(s.to_string())),
        }
    }
}

/// Generate an opaque record id such as `client-6f1c...`
pub fn generate_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub color: String,
    pub platforms: Vec<Platform>,
    pub created_at: DateTime<Utc>,
}

impl Client {
    pub fn new(
        name: impl Into<String>,
        color: impl Into<String>,
        platforms: Vec<Platform>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: generate_id("client"),
            name: name.into(),
            email: None,
            color: color.into(),
            platforms,
            created_at: now,
        }
    }

    /// Build a new record from this one with the given fields overridden.
    /// `id` and `created_at` are always carried over.
    pub fn with_changes(&self, changes: &ClientChanges) -> Client {
        Client {
            id: self.id.clone(),
            name: changes.name.clone().unwrap_or_else(|| self.name.clone()),
            email: changes.email.clone().unwrap_or_else(|| self.email.clone()),
            color: changes.color.clone().unwrap_or_else(|| self.color.clone()),
            platforms: changes.platforms.clone().unwrap_or_else(|| self.platforms.clone()),
            created_at: self.created_at,
        }
    }
}

/// Named subset of client fields to override. `email: Some(None)` clears the email.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientChanges {
    pub name: Option<String>,
    pub email: Option<Option<String>>,
    pub color: Option<String>,
    pub platforms: Option<Vec<Platform>>,
}

impl ClientChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn email(mut self, email: Option<String>) -> Self {
        self.email = Some(email);
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn platforms(mut self, platforms: Vec<Platform>) -> Self {
        self.platforms = Some(platforms);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.color.is_none()
            && self.platforms.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub client_id: String,
    pub content: String,
    pub scheduled_date: DateTime<Utc>,
    pub platform: Platform,
    pub status: PostStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(
        client_id: impl Into<String>,
        content: impl Into<String>,
        scheduled_date: DateTime<Utc>,
        platform: Platform,
        status: PostStatus,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: generate_id("post"),
            client_id: client_id.into(),
            content: content.into(),
            scheduled_date,
            platform,
            status,
            media_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Calendar day the post lands on in local time
    pub fn scheduled_local_date(&self) -> NaiveDate {
        self.scheduled_date.with_timezone(&Local).date_naive()
    }

    /// Build a new record with the given fields overridden and `updated_at` refreshed.
    pub fn with_changes(&self, changes: &PostChanges, now: DateTime<Utc>) -> Post {
        Post {
            id: self.id.clone(),
            client_id: changes.client_id.clone().unwrap_or_else(|| self.client_id.clone()),
            content: changes.content.clone().unwrap_or_else(|| self.content.clone()),
            scheduled_date: changes.scheduled_date.unwrap_or(self.scheduled_date),
            platform: changes.platform.unwrap_or(self.platform),
            status: changes.status.unwrap_or(self.status),
            media_url: changes.media_url.clone().unwrap_or_else(|| self.media_url.clone()),
            created_at: self.created_at,
            updated_at: now,
        }
    }
}

/// Named subset of post fields to override. `media_url: Some(None)` clears the URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostChanges {
    pub client_id: Option<String>,
    pub content: Option<String>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub platform: Option<Platform>,
    pub status: Option<PostStatus>,
    pub media_url: Option<Option<String>>,
}

impl PostChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn scheduled_date(mut self, date: DateTime<Utc>) -> Self {
        self.scheduled_date = Some(date);
        self
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn status(mut self, status: PostStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn media_url(mut self, media_url: Option<String>) -> Self {
        self.media_url = Some(media_url);
        self
    }
}
