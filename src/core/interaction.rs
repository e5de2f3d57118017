//! # Interaction State
//!
//! View-only state for the thread view: which threads are expanded and which
//! post (if any) has the reply composer open.
//!
//! Nothing here is persisted; it lives as long as the running app.

use std::collections::HashSet;

use crate::core::post::PostId;

/// The single inline reply composer. At most one post can have it open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReplyComposer {
    #[default]
    Closed,
    OpenFor(PostId),
}

impl ReplyComposer {
    pub fn target(&self) -> Option<&PostId> {
        match self {
            ReplyComposer::Closed => None,
            ReplyComposer::OpenFor(id) => Some(id),
        }
    }
}

#[derive(Debug, Default)]
pub struct Interaction {
    composer: ReplyComposer,
    expanded: HashSet<PostId>,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn composer(&self) -> &ReplyComposer {
        &self.composer
    }

    pub fn is_composing(&self, id: &PostId) -> bool {
        self.composer.target() == Some(id)
    }

    /// Opens the composer for `id`, closing any other. Toggling the post that
    /// already has it open closes it.
    pub fn toggle_reply(&mut self, id: &PostId) {
        self.composer = if self.is_composing(id) {
            ReplyComposer::Closed
        } else {
            ReplyComposer::OpenFor(id.clone())
        };
    }

    pub fn close_composer(&mut self) {
        self.composer = ReplyComposer::Closed;
    }

    pub fn is_expanded(&self, id: &PostId) -> bool {
        self.expanded.contains(id)
    }

    pub fn toggle_expanded(&mut self, id: &PostId) {
        if !self.expanded.remove(id) {
            self.expanded.insert(id.clone());
        }
    }

    /// A reply under `parent` went through: show it and put the composer away.
    pub fn reply_succeeded(&mut self, parent: &PostId) {
        self.expanded.insert(parent.clone());
        self.composer = ReplyComposer::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_collapsed_and_closed() {
        let interaction = Interaction::new();
        assert_eq!(interaction.composer(), &ReplyComposer::Closed);
        assert!(!interaction.is_expanded(&PostId::from("1")));
    }

    #[test]
    fn test_toggle_reply_is_keyed_by_identity() {
        let a = PostId::from("a");
        let b = PostId::from("b");
        let mut interaction = Interaction::new();

        interaction.toggle_reply(&a);
        assert_eq!(interaction.composer(), &ReplyComposer::OpenFor(a.clone()));

        // Opening another post's composer closes the first
        interaction.toggle_reply(&b);
        assert!(interaction.is_composing(&b));
        assert!(!interaction.is_composing(&a));

        // Toggling the open one closes it
        interaction.toggle_reply(&b);
        assert_eq!(interaction.composer(), &ReplyComposer::Closed);
    }

    #[test]
    fn test_expansion_is_independent_per_post() {
        let a = PostId::from("a");
        let b = PostId::from("b");
        let mut interaction = Interaction::new();

        interaction.toggle_expanded(&a);
        assert!(interaction.is_expanded(&a));
        assert!(!interaction.is_expanded(&b));

        interaction.toggle_expanded(&b);
        interaction.toggle_expanded(&a);
        assert!(!interaction.is_expanded(&a));
        assert!(interaction.is_expanded(&b));
    }

    #[test]
    fn test_reply_succeeded_forces_expansion_and_closes() {
        let p = PostId::from("p");
        let mut interaction = Interaction::new();
        interaction.toggle_reply(&p);

        interaction.reply_succeeded(&p);
        assert!(interaction.is_expanded(&p));
        assert_eq!(interaction.composer(), &ReplyComposer::Closed);

        // Already expanded stays expanded
        interaction.reply_succeeded(&p);
        assert!(interaction.is_expanded(&p));
    }
}
