//! # Thread Grouping
//!
//! Derives the two-tier thread structure from the flat post collection.
//!
//! ```text
//! [1:A, 2:B(→1), 3:C, 4:D(→1)]
//!        │
//!        ▼  Threads::group()
//! top_level:         [1, 3]
//! replies_by_parent: { "1": [2, 4] }
//! ```
//!
//! Grouping borrows from the store and never mutates it, so it is recomputed
//! every frame. Replies of replies are filed under their immediate parent and
//! are never merged into the root's bucket.

use std::collections::HashMap;

use crate::core::post::Post;

#[derive(Debug, Default)]
pub struct Threads<'a> {
    /// Posts without a parent, in collection order.
    pub top_level: Vec<&'a Post>,
    /// Parent id → direct replies, in collection order. May contain buckets
    /// for parents that are not in the collection (orphans).
    pub replies_by_parent: HashMap<&'a str, Vec<&'a Post>>,
}

impl<'a> Threads<'a> {
    pub fn group(posts: &'a [Post]) -> Self {
        let mut threads = Threads::default();
        for post in posts {
            match &post.parent_id {
                None => threads.top_level.push(post),
                Some(parent) => threads
                    .replies_by_parent
                    .entry(parent.as_str())
                    .or_default()
                    .push(post),
            }
        }
        threads
    }

    /// Direct replies of `id`; empty when it has none.
    pub fn replies_of(&self, id: &str) -> &[&'a Post] {
        self.replies_by_parent
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn reply_count(&self, id: &str) -> usize {
        self.replies_of(id).len()
    }

    pub fn is_empty(&self) -> bool {
        self.top_level.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{post, reply};

    fn ids(posts: &[&Post]) -> Vec<String> {
        posts.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_groups_scenario() {
        let posts = vec![post("1", "A"), reply("2", "B", "1"), post("3", "C")];
        let threads = Threads::group(&posts);

        assert_eq!(ids(&threads.top_level), vec!["1", "3"]);
        assert_eq!(threads.replies_by_parent.len(), 1);
        assert_eq!(ids(threads.replies_of("1")), vec!["2"]);
        assert!(threads.replies_of("3").is_empty());
    }

    #[test]
    fn test_empty_input() {
        let threads = Threads::group(&[]);
        assert!(threads.top_level.is_empty());
        assert!(threads.replies_by_parent.is_empty());
        assert!(threads.is_empty());
    }

    #[test]
    fn test_order_is_preserved() {
        let posts = vec![
            post("10", "first"),
            reply("11", "r1", "10"),
            post("5", "second"),
            reply("12", "r2", "10"),
            post("1", "third"),
            reply("13", "r3", "10"),
        ];
        let threads = Threads::group(&posts);

        // No re-sorting by id
        assert_eq!(ids(&threads.top_level), vec!["10", "5", "1"]);
        assert_eq!(ids(threads.replies_of("10")), vec!["11", "12", "13"]);
    }

    #[test]
    fn test_orphan_reply_is_keyed_under_missing_parent() {
        let posts = vec![post("1", "A"), reply("2", "lost", "404")];
        let threads = Threads::group(&posts);

        assert_eq!(ids(&threads.top_level), vec!["1"]);
        assert_eq!(ids(threads.replies_of("404")), vec!["2"]);
        assert_eq!(threads.reply_count("1"), 0);
    }

    #[test]
    fn test_reply_of_reply_files_under_immediate_parent() {
        let posts = vec![post("1", "root"), reply("2", "child", "1"), reply("3", "grandchild", "2")];
        let threads = Threads::group(&posts);

        assert_eq!(ids(threads.replies_of("1")), vec!["2"]);
        assert_eq!(ids(threads.replies_of("2")), vec!["3"]);
    }

    #[test]
    fn test_every_post_lands_in_exactly_one_place() {
        let posts = vec![
            post("a", "1"),
            reply("b", "2", "a"),
            reply("c", "3", "b"),
            post("d", "4"),
            reply("e", "5", "missing"),
            reply("f", "6", "d"),
            reply("g", "7", "a"),
        ];
        let threads = Threads::group(&posts);

        let mut seen: Vec<&str> = threads.top_level.iter().map(|p| p.id.as_str()).collect();
        for bucket in threads.replies_by_parent.values() {
            seen.extend(bucket.iter().map(|p| p.id.as_str()));
        }
        seen.sort_unstable();

        let mut expected: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
        expected.sort_unstable();
        assert_eq!(seen, expected);

        for p in &threads.top_level {
            assert!(p.is_top_level());
        }
        for (parent, bucket) in &threads.replies_by_parent {
            for p in bucket {
                assert_eq!(p.parent_id.as_ref().map(|id| id.as_str()), Some(*parent));
            }
        }
    }
}
