//! # Actions
//!
//! Everything that can happen in Agora becomes an `Action`.
//! User submits a post? That's `Action::SubmitPost(payload)`.
//! The server answers? That's `Action::PostCreated { .. }`.
//!
//! `update()` applies an action to the state and returns an `Effect`: the I/O
//! the caller should perform next. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Completions carry the `CancellationToken` their request was spawned with.
//! A cancelled token means the owner is gone, and the result is dropped.

use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;

use crate::api::TransportError;
use crate::core::post::{Post, PostCreate, PostId};
use crate::core::state::{App, Notice};
use crate::core::store::SubmitOutcome;

#[derive(Debug)]
pub enum Action {
    /// Load (or reload) the full collection.
    FetchPosts,
    PostsLoaded {
        token: CancellationToken,
        result: Result<Vec<Post>, TransportError>,
    },
    SubmitPost(PostCreate),
    PostCreated {
        token: CancellationToken,
        result: Result<Post, TransportError>,
    },
    SubmitReply {
        parent_id: PostId,
        payload: PostCreate,
    },
    ReplyCreated {
        token: CancellationToken,
        parent_id: PostId,
        result: Result<Post, TransportError>,
    },
    ToggleReply(PostId),
    ToggleExpanded(PostId),
    DismissNotice,
    Quit,
}

/// Side effects requested by `update()`.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    /// Spawn a fetch of the full collection.
    Fetch,
    /// Spawn creation of a top-level post.
    Create(PostCreate),
    /// Spawn creation of a reply.
    Reply { parent_id: PostId, payload: PostCreate },
    /// A top-level submission finished; the composer clears its draft only on success.
    SubmitResolved { success: bool },
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::FetchPosts => {
            app.store.begin();
            Effect::Fetch
        }
        Action::PostsLoaded { token, result } => {
            if is_stale(&token, "fetch") {
                return Effect::None;
            }
            let outcome = app.store.commit_fetch(result);
            if !outcome.success {
                notify(app, &outcome);
                return Effect::None;
            }
            // A reply target that is gone, or no longer top-level, cannot be answered
            if let Some(target) = app.interaction.composer().target() {
                let still_listed = app
                    .store
                    .posts()
                    .iter()
                    .any(|p| &p.id == target && p.is_top_level());
                if !still_listed {
                    debug!("Reply target {} vanished on refetch, closing composer", target);
                    app.interaction.close_composer();
                }
            }
            Effect::None
        }
        Action::SubmitPost(payload) => {
            app.store.begin();
            Effect::Create(payload)
        }
        Action::PostCreated { token, result } => {
            if is_stale(&token, "create") {
                return Effect::None;
            }
            let outcome = app.store.commit_create(result);
            notify(app, &outcome);
            Effect::SubmitResolved {
                success: outcome.success,
            }
        }
        Action::SubmitReply { parent_id, payload } => {
            app.store.begin();
            Effect::Reply { parent_id, payload }
        }
        Action::ReplyCreated {
            token,
            parent_id,
            result,
        } => {
            if is_stale(&token, "reply") {
                return Effect::None;
            }
            let outcome = app.store.commit_reply(result);
            notify(app, &outcome);
            if outcome.success {
                app.interaction.reply_succeeded(&parent_id);
                // Refetch rather than splice the reply in locally
                app.store.begin();
                Effect::Fetch
            } else {
                Effect::SubmitResolved { success: false }
            }
        }
        Action::ToggleReply(id) => {
            app.interaction.toggle_reply(&id);
            Effect::None
        }
        Action::ToggleExpanded(id) => {
            app.interaction.toggle_expanded(&id);
            Effect::None
        }
        Action::DismissNotice => {
            app.notice = None;
            Effect::None
        }
        Action::Quit => {
            info!("Quit requested, cancelling in-flight requests");
            app.lifetime.cancel();
            Effect::Quit
        }
    }
}

fn is_stale(token: &CancellationToken, operation: &str) -> bool {
    if token.is_cancelled() {
        debug!("Dropping {} completion: owner cancelled", operation);
        return true;
    }
    false
}

fn notify(app: &mut App, outcome: &SubmitOutcome) {
    let Some(message) = outcome.message.clone() else {
        return;
    };
    app.notice = Some(if outcome.success {
        info!("Notice: {}", message);
        Notice::success(message)
    } else {
        warn!("Notice: {}", message);
        Notice::error(message)
    });
}
