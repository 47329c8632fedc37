//! Build [`Comment`] trees from raw nested records.

use serde_yaml::{Mapping, Value};

use super::{Comment, INVALID_BODY, Vote};
use crate::config::DEFAULT_MAX_DEPTH;
use crate::markdown;
use crate::snapshot;
use crate::user::AuthorRegistry;

/// Top-level comments and the number of nodes at every depth.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentTree {
    pub comments: Vec<Comment>,
    pub count: usize,
}

/// Turns raw comment records into a tree, resolving authors on the way.
#[derive(Debug, Clone)]
pub struct CommentTreeBuilder<'a> {
    registry: &'a AuthorRegistry,
    max_depth: usize,
}

impl<'a> CommentTreeBuilder<'a> {
    pub fn new(registry: &'a AuthorRegistry) -> Self {
        Self {
            registry,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Deepest level turned into [`Comment`]s; top-level comments are
    /// level 1. Anything below is only counted.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    /// Build a comment list. Entries that are not mappings are skipped.
    pub fn build(&self, records: &[Value]) -> CommentTree {
        let mut count = 0;
        let comments = self.build_level(records, 1, &mut count);

        tracing::debug!(count, "comment tree built");
        CommentTree { comments, count }
    }

    fn build_level(
        &self,
        records: &[Value],
        depth: usize,
        count: &mut usize,
    ) -> Vec<Comment> {
        let mut comments = Vec::with_capacity(records.len());

        for record in records.iter().filter_map(Value::as_mapping) {
            *count += 1;

            let children = snapshot::list(record, "comments");
            let (replies, hidden_replies) = if depth < self.max_depth {
                (self.build_level(children, depth + 1, count), 0)
            } else {
                let hidden = count_records(children);
                if hidden > 0 {
                    tracing::debug!(depth, hidden, "replies below depth limit");
                }
                *count += hidden;
                (Vec::new(), hidden)
            };

            comments.push(self.comment(record, replies, hidden_replies));
        }

        comments
    }

    fn comment(
        &self,
        record: &Mapping,
        replies: Vec<Comment>,
        hidden_replies: usize,
    ) -> Comment {
        // Only non-empty text is a body; numbers, booleans and null are not.
        let body = record
            .get("body")
            .and_then(Value::as_str)
            .filter(|body| !body.is_empty());

        // A comment without text never keeps its author.
        let (author, body_html) = match body {
            Some(body) => (
                self.registry
                    .author_of(snapshot::string(record, "author_id").as_deref()),
                markdown::to_html(body),
            ),
            None => (self.registry.deleted(), INVALID_BODY.to_owned()),
        };

        Comment {
            body_html,
            author,
            is_moderator: snapshot::flag(record, "is_moderator"),
            current_user_vote: Vote::parse(record.get("current_user_vote")),
            replies,
            hidden_replies,
        }
    }
}

/// Count comment records at every depth without recursing.
fn count_records(records: &[Value]) -> usize {
    let mut stack = vec![records];
    let mut count = 0;

    while let Some(level) = stack.pop() {
        for record in level.iter().filter_map(Value::as_mapping) {
            count += 1;
            stack.push(snapshot::list(record, "comments"));
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::DELETED;

    fn registry() -> AuthorRegistry {
        let raw: Mapping =
            serde_yaml::from_str("alice: {}\nbob: {}\ncarol: {}\n").unwrap();
        AuthorRegistry::build(&raw, Some("alice"))
    }

    fn records(yaml: &str) -> Vec<Value> {
        serde_yaml::from_str(yaml).unwrap()
    }

    /// Nodes in a subtree, hidden replies included.
    fn size(comment: &Comment) -> usize {
        1 + comment.hidden_replies + comment.replies.iter().map(size).sum::<usize>()
    }

    fn bodies(comments: &[Comment]) -> Vec<String> {
        comments.iter().map(|c| c.body_html.clone()).collect()
    }

    #[test]
    fn test_count_matches_tree_size() {
        let registry = registry();
        let cases = [
            "[]",
            "- {author_id: alice, body: a}",
            "- {author_id: alice, body: a, comments: [{body: b}, {body: c}]}\n- {body: d}",
            "- body: a\n  comments:\n    - body: b\n      comments:\n        - body: c\n          comments:\n            - body: d\n- body: e\n",
        ];

        for (case, expected) in cases.iter().zip([0, 1, 4, 5]) {
            let tree = CommentTreeBuilder::new(&registry).build(&records(case));
            assert_eq!(tree.count, expected, "{case}");
            assert_eq!(
                tree.count,
                tree.comments.iter().map(size).sum::<usize>()
            );
        }
    }

    #[test]
    fn test_empty_body_uses_deleted_author() {
        let registry = registry();
        let tree = CommentTreeBuilder::new(&registry).build(&records(
            "- {author_id: alice, body: ''}\n- {author_id: bob}\n- {author_id: carol, body: ~}\n",
        ));

        assert_eq!(tree.count, 3);
        for comment in &tree.comments {
            assert_eq!(comment.author.username, DELETED);
            assert_eq!(comment.body_html, INVALID_BODY);
        }
    }

    #[test]
    fn test_author_resolution() {
        let registry = registry();
        let tree = CommentTreeBuilder::new(&registry).build(&records(
            "- {author_id: alice, body: op}\n- {author_id: stranger, body: who}\n- {body: anon}\n",
        ));

        assert_eq!(tree.comments[0].author.username, "alice");
        assert!(tree.comments[0].author.is_original_poster);
        assert_eq!(tree.comments[1].author.username, DELETED);
        assert_eq!(tree.comments[2].author.username, DELETED);
    }

    #[test]
    fn test_reply_order_preserved() {
        let registry = registry();
        let tree = CommentTreeBuilder::new(&registry).build(&records(
            "- body: first\n  comments:\n    - body: x\n    - body: y\n    - body: z\n- body: second\n",
        ));

        assert_eq!(
            bodies(&tree.comments),
            ["<p>first</p>\n", "<p>second</p>\n"]
        );
        assert_eq!(
            bodies(&tree.comments[0].replies),
            ["<p>x</p>\n", "<p>y</p>\n", "<p>z</p>\n"]
        );
    }

    #[test]
    fn test_malformed_children() {
        let registry = registry();
        let tree = CommentTreeBuilder::new(&registry).build(&records(
            "- {body: a, comments: not-a-list}\n- {body: b, comments: {x: 1}}\n- just a string\n- 42\n",
        ));

        assert_eq!(tree.count, 2);
        assert!(tree.comments.iter().all(|c| c.replies.is_empty()));
    }

    #[test]
    fn test_flags() {
        let registry = registry();
        let tree = CommentTreeBuilder::new(&registry).build(&records(
            "- {body: a, is_moderator: true, current_user_vote: up}\n- {body: b, is_moderator: 'no', current_user_vote: false}\n",
        ));

        assert!(tree.comments[0].is_moderator);
        assert_eq!(tree.comments[0].current_user_vote, Vote::Up);
        assert!(!tree.comments[1].is_moderator);
        assert_eq!(tree.comments[1].current_user_vote, Vote::Down);
    }

    #[test]
    fn test_depth_limit_counts_hidden_replies() {
        let registry = registry();
        let chain = "- body: '1'\n  comments:\n    - body: '2'\n      comments:\n        - body: '3'\n          comments:\n            - body: '4'\n            - body: '5'\n";
        let tree = CommentTreeBuilder::new(&registry)
            .max_depth(2)
            .build(&records(chain));

        assert_eq!(tree.count, 5);
        let second = &tree.comments[0].replies[0];
        assert!(second.replies.is_empty());
        assert_eq!(second.hidden_replies, 3);
    }

    #[test]
    fn test_count_records() {
        let raw = records("- comments: [{}, {comments: [{}]}]\n- {}\n- nope\n");
        assert_eq!(count_records(&raw), 5);
    }

    #[test]
    fn test_non_text_body_is_invalid() {
        let registry = registry();
        let tree = CommentTreeBuilder::new(&registry).build(&records(
            concat!(
                "- {author_id: alice, body: false}\n",
                "- {author_id: alice, body: 0}\n",
                "- {author_id: alice, body: [a]}\n",
                "- {author_id: alice, body: '0'}\n",
            ),
        ));

        for comment in &tree.comments[..3] {
            assert!(comment.author.is_deleted());
            assert_eq!(comment.body_html, INVALID_BODY);
        }
        assert_eq!(tree.comments[3].author.username, "alice");
        assert_eq!(tree.comments[3].body_html, "<p>0</p>\n");
    }
}
