//! # Core Application Logic
//!
//! This module contains Agora's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Post / PostCreate    │
//!                    │  • Threads (grouping)   │
//!                    │  • PostStore            │
//!                    │  • Interaction          │
//!                    │  • Action / update()    │
//!                    │                         │
//!                    │  No network. No UI.     │
//!                    └───────────┬─────────────┘
//!                                │
//!                    ┌───────────┴───────────┐
//!                    ▼                       ▼
//!             ┌────────────┐          ┌────────────┐
//!             │    TUI     │          │    API     │
//!             │  Adapter   │          │ transport  │
//!             │ (ratatui)  │          │ (reqwest)  │
//!             └────────────┘          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`post`]: The `Post` entity and the `PostCreate` payload
//! - [`thread`]: Grouping a flat collection into top-level posts and replies
//! - [`store`]: The `PostStore`, owner of the collection and the busy flag
//! - [`interaction`]: Expanded threads and the single open reply composer
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`config`]: Config file, env and CLI resolution

pub mod action;
pub mod config;
pub mod interaction;
pub mod post;
pub mod state;
pub mod store;
pub mod thread;
