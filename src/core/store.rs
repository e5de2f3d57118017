//! # Post Store
//!
//! The single owner of the post collection and of the busy/error status of
//! the fetch, create and reply operations.
//!
//! Transport calls complete later as separate events, so each operation is a
//! `begin()` when it is dispatched and a `commit_*()` when its result arrives.
//! Every commit clears the busy flag, whatever the outcome.

use log::{info, warn};

use crate::api::TransportError;
use crate::core::post::Post;

pub const FETCH_FAILED: &str = "Failed to load posts";
pub const CREATE_FAILED: &str = "Failed to create post";
pub const REPLY_FAILED: &str = "Failed to post reply";
pub const CREATE_SUCCEEDED: &str = "Post created";
pub const REPLY_SUCCEEDED: &str = "Reply posted";

/// Result of an operation as reported to callers: network and server-side
/// failures look the same from here up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub success: bool,
    pub message: Option<String>,
}

impl SubmitOutcome {
    fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
        }
    }

    fn failed(err: &TransportError, fallback: &str) -> Self {
        Self {
            success: false,
            message: Some(err.user_message(fallback)),
        }
    }
}

#[derive(Debug, Default)]
pub struct PostStore {
    posts: Vec<Post>,
    /// One coarse flag for all three operations.
    busy: bool,
    error: Option<String>,
}

impl PostStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Marks an operation as in flight.
    pub fn begin(&mut self) {
        self.busy = true;
    }

    /// Replaces the collection wholesale on success. On failure the previous
    /// collection is kept.
    pub fn commit_fetch(&mut self, result: Result<Vec<Post>, TransportError>) -> SubmitOutcome {
        self.busy = false;
        match result {
            Ok(posts) => {
                info!("Loaded {} posts", posts.len());
                self.posts = posts;
                self.error = None;
                SubmitOutcome {
                    success: true,
                    message: None,
                }
            }
            Err(e) => {
                warn!("Fetch failed: {}", e);
                let outcome = SubmitOutcome::failed(&e, FETCH_FAILED);
                self.error = outcome.message.clone();
                outcome
            }
        }
    }

    /// Prepends the created post so the newest top-level post comes first.
    pub fn commit_create(&mut self, result: Result<Post, TransportError>) -> SubmitOutcome {
        self.busy = false;
        match result {
            Ok(post) => {
                info!("Created post {}", post.id);
                self.posts.insert(0, post);
                SubmitOutcome::ok(CREATE_SUCCEEDED)
            }
            Err(e) => {
                warn!("Create failed: {}", e);
                SubmitOutcome::failed(&e, CREATE_FAILED)
            }
        }
    }

    /// Does not touch the collection: replies change thread shape, so the
    /// caller refetches instead of appending locally.
    pub fn commit_reply(&mut self, result: Result<Post, TransportError>) -> SubmitOutcome {
        self.busy = false;
        match result {
            Ok(post) => {
                info!("Created reply {} under {:?}", post.id, post.parent_id);
                SubmitOutcome::ok(REPLY_SUCCEEDED)
            }
            Err(e) => {
                warn!("Reply failed: {}", e);
                SubmitOutcome::failed(&e, REPLY_FAILED)
            }
        }
    }
}
