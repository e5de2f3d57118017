//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use chrono::{DateTime, TimeZone, Utc};

use crate::core::post::{Post, PostId};

/// Fixed timestamp so rendered ages are deterministic.
pub fn test_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

/// A top-level post by "tester".
pub fn post(id: &str, content: &str) -> Post {
    Post {
        id: PostId::from(id),
        content: content.to_string(),
        parent_id: None,
        username: Some("tester".to_string()),
        created_at: test_time(),
    }
}

/// A reply to `parent`.
pub fn reply(id: &str, content: &str, parent: &str) -> Post {
    Post {
        parent_id: Some(PostId::from(parent)),
        ..post(id, content)
    }
}

/// Creates a test App with default settings.
pub fn test_app() -> crate::core::state::App {
    crate::core::state::App::new()
}
