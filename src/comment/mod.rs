//! Discussion tree: model, construction and markup.

mod builder;
mod render;

pub use builder::{CommentTree, CommentTreeBuilder};
pub use render::{MODERATOR_BADGE, ORIGINAL_POSTER_BADGE, badge, render, render_all};

use std::sync::Arc;

use serde_yaml::Value;

use crate::user::User;

/// Body shown when a comment has no text.
pub const INVALID_BODY: &str = "[invalid]";

/// Vote cast on a comment by the viewing user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Vote {
    Up,
    Down,
    #[default]
    None,
}

impl Vote {
    /// `true`/`"up"` is an upvote and `false`/`"down"` a downvote, strings
    /// compared case-insensitively. Everything else is no vote.
    pub fn parse(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Bool(true)) => Vote::Up,
            Some(Value::Bool(false)) => Vote::Down,
            Some(Value::String(s)) if s.eq_ignore_ascii_case("up") => Vote::Up,
            Some(Value::String(s)) if s.eq_ignore_ascii_case("down") => Vote::Down,
            _ => Vote::None,
        }
    }

    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            Vote::Up => Some("up"),
            Vote::Down => Some("down"),
            Vote::None => None,
        }
    }
}

/// One node of the discussion.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    /// Rendered markdown, or [`INVALID_BODY`].
    pub body_html: String,
    pub author: Arc<User>,
    pub is_moderator: bool,
    pub current_user_vote: Vote,
    /// Direct replies in document order.
    pub replies: Vec<Comment>,
    /// Descendants left out because of the depth limit.
    pub hidden_replies: usize,
}
