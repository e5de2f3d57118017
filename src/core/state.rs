//! # Application State
//!
//! Core business state for Agora. Domain logic only, no TUI types.
//! Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── store: PostStore              // posts + busy flag + last error
//! ├── interaction: Interaction      // expanded threads, open reply composer
//! ├── notice: Option<Notice>        // transient success/error message
//! ├── lifetime: CancellationToken   // parent of every in-flight request
//! ├── board_title: String
//! └── anonymous_name: String
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use tokio_util::sync::CancellationToken;

use crate::core::config::{DEFAULT_ANONYMOUS_NAME, DEFAULT_BOARD_TITLE, ResolvedConfig};
use crate::core::interaction::Interaction;
use crate::core::store::PostStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A fire-and-forget message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

pub struct App {
    pub store: PostStore,
    pub interaction: Interaction,
    pub notice: Option<Notice>,
    /// Cancelled on quit. Every request gets a child token, and completions
    /// carrying a cancelled token are dropped instead of committed.
    pub lifetime: CancellationToken,
    pub board_title: String,
    pub anonymous_name: String,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            store: PostStore::new(),
            interaction: Interaction::new(),
            notice: None,
            lifetime: CancellationToken::new(),
            board_title: DEFAULT_BOARD_TITLE.to_string(),
            anonymous_name: DEFAULT_ANONYMOUS_NAME.to_string(),
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self {
            board_title: config.board_title.clone(),
            anonymous_name: config.anonymous_name.clone(),
            ..Self::new()
        }
    }

    /// Token for a new request, cancelled together with the app.
    pub fn request_token(&self) -> CancellationToken {
        self.lifetime.child_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert!(app.store.posts().is_empty());
        assert!(!app.store.is_busy());
        assert!(app.notice.is_none());
        assert_eq!(app.anonymous_name, "Anonymous");
    }

    #[test]
    fn test_request_tokens_follow_app_lifetime() {
        let app = test_app();
        let token = app.request_token();
        assert!(!token.is_cancelled());
        app.lifetime.cancel();
        assert!(token.is_cancelled());
    }
}
