//! The post being rendered, resolved from a [`Snapshot`].

use std::sync::{Arc, LazyLock};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex_lite::Regex;
use serde_yaml::Value;

use crate::comment::{Comment, CommentTreeBuilder};
use crate::snapshot::{self, Snapshot};
use crate::user::{AuthorRegistry, User};

static RELATIVE_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:just now|(?:\d+|an?)\s+(?:second|minute|hour|day|week|month|year)s?\s+ago)$",
    )
    .unwrap()
});

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// When the post was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostDate {
    Absolute(DateTime<Utc>),
    /// Human interval such as `3 hours ago`.
    Relative(String),
    /// Absent or not understood.
    Unparsed,
}

impl PostDate {
    /// Accepts RFC 3339, `YYYY-MM-DD[ HH:MM:SS]`, unix seconds and
    /// relative intervals.
    pub fn parse(value: Option<&Value>) -> Self {
        let Some(value) = value else {
            return PostDate::Unparsed;
        };

        if let Some(seconds) = value.as_i64() {
            return DateTime::from_timestamp(seconds, 0)
                .map(PostDate::Absolute)
                .unwrap_or(PostDate::Unparsed);
        }

        let Some(text) = snapshot::scalar(value) else {
            return PostDate::Unparsed;
        };
        let text = text.trim();

        if let Ok(date) = DateTime::parse_from_rfc3339(text) {
            return PostDate::Absolute(date.with_timezone(&Utc));
        }
        for format in NAIVE_FORMATS {
            if let Ok(date) = NaiveDateTime::parse_from_str(text, format) {
                return PostDate::Absolute(date.and_utc());
            }
        }
        if let Some(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
        {
            return PostDate::Absolute(date.and_utc());
        }
        if RELATIVE_DATE.is_match(text) {
            return PostDate::Relative(text.to_owned());
        }

        PostDate::Unparsed
    }
}

/// Post metadata and its discussion.
///
/// Optional fields stay `None` here; page defaults are applied when the
/// page is assembled.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub title: Option<String>,
    pub subrealm: Option<String>,
    pub flair_text: Option<String>,
    pub flair_color: Option<String>,
    pub flair_css_class: Option<String>,
    /// Markdown source.
    pub body: Option<String>,
    pub author: Arc<User>,
    pub is_moderator: bool,
    pub date: PostDate,
    pub comments: Vec<Comment>,
    pub comment_count: usize,
}

impl Post {
    /// Resolve authors and build the comment tree.
    pub fn from_snapshot(snapshot: &Snapshot, max_depth: usize) -> Self {
        let post = snapshot.post();
        let author_id = snapshot::string(&post, "author_id");

        let registry = AuthorRegistry::build(&snapshot.authors(), author_id.as_deref());
        let tree = CommentTreeBuilder::new(&registry)
            .max_depth(max_depth)
            .build(snapshot::list(&post, "comments"));

        let author = match &author_id {
            Some(id) => registry.resolve_or_unknown(id),
            None => registry.deleted(),
        };

        Self {
            title: snapshot::string(&post, "title"),
            subrealm: snapshot::string(&post, "subrealm"),
            flair_text: snapshot::string(&post, "flair_text"),
            flair_color: snapshot::string(&post, "flair_color"),
            flair_css_class: snapshot::string(&post, "flair_css_class"),
            body: snapshot::string(&post, "body"),
            author,
            is_moderator: snapshot::flag(&post, "is_moderator"),
            date: PostDate::parse(post.get("date")),
            comments: tree.comments,
            comment_count: tree.count,
        }
    }
}
