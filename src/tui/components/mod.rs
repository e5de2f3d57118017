//! # TUI Components
//!
//! UI building blocks for the board.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Built fresh each frame from borrowed data:
//! - `TitleBar`: board title, loading marker, current notice
//! - `PostCard`: one post as a bordered card
//! - `EmptyState`: placeholder when there is nothing to list
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `Composer`: draft editor for new posts and replies
//! - `ThreadView`: scrollable two-level list, backed by `ThreadViewState`
//!
//! Components receive external data as props, never by reaching into `App`.
//! Each file holds the component's state, events, rendering and tests.
//!
//! ```text
//! components/
//! ├── mod.rs
//! ├── title_bar.rs
//! ├── empty_state.rs
//! ├── post_card.rs
//! ├── thread_view.rs   (rows + ScrollView, embeds PostCard and Composer)
//! └── composer/        (Composer + its text Editor)
//! ```

pub mod composer;
mod empty_state;
pub mod post_card;
pub mod thread_view;
mod title_bar;

pub use composer::{Composer, ComposerEvent, ComposerMode};
pub use empty_state::EmptyState;
pub use thread_view::{Row, ThreadView, ThreadViewState, visible_rows};
pub use title_bar::TitleBar;
