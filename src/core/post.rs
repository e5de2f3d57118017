//! # Posts
//!
//! The data shape for a community message, plus the payload used to create one.
//!
//! ```text
//! Post
//! ├── id: PostId                 // server-assigned
//! ├── content: String            // trimmed, never empty
//! ├── parent_id: Option<PostId>  // None = top-level
//! ├── username: Option<String>   // None = anonymous
//! └── created_at: DateTime<Utc>  // only used for "5m ago" display
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-assigned identifier of a post.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub String);

impl PostId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PostId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub content: String,
    #[serde(default)]
    pub parent_id: Option<PostId>,
    #[serde(default)]
    pub username: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Display name, falling back to `anonymous` when the author is unknown.
    pub fn author<'a>(&'a self, anonymous: &'a str) -> &'a str {
        self.username
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(anonymous)
    }
}

/// Payload for creating a post or a reply. `id`, `username` and `created_at`
/// are assigned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostCreate {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<PostId>,
}

impl PostCreate {
    /// Builds a payload from raw composer text. Returns `None` when the text
    /// is empty after trimming.
    pub fn new(raw: &str, parent_id: Option<PostId>) -> Option<Self> {
        let content = raw.trim();
        if content.is_empty() {
            return None;
        }
        Some(Self {
            content: content.to_string(),
            parent_id,
        })
    }
}

/// Formats the age of a post relative to `now`.
///
/// Timestamps in the future (clock skew between client and server) read as
/// "just now".
pub fn relative_age(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - created_at).num_seconds();
    if secs < 60 {
        return "just now".to_string();
    }
    let minutes = secs / 60;
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }
    let days = hours / 24;
    if days < 30 {
        return format!("{days}d ago");
    }
    created_at.format("%Y-%m-%d").to_string()
}
