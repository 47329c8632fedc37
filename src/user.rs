//! Comment authors and their lookup table.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, LazyLock};

use regex_lite::{NoExpand, Regex};
use serde_yaml::{Mapping, Value};

use crate::snapshot;

/// Username of the fallback author.
pub const DELETED: &str = "[deleted]";
/// Avatar used when an author has none.
pub const DEFAULT_PROFILE_IMAGE: &str = "/favicon.ico";

static NAMESPACE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[a-zA-Z]/)?").unwrap());

static VALID_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^u/[a-zA-Z0-9_-]+$").unwrap());

/// Replace an optional one-letter namespace (`r/`, `u/`, `m/`, ...) with
/// `prefix`, adding it when there was none.
pub fn with_namespace(name: &str, prefix: &str) -> String {
    NAMESPACE_PREFIX.replace(name, NoExpand(prefix)).into_owned()
}

/// A resolved comment or post author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Key the author was registered under.
    pub id: String,
    /// Canonical `u/` name.
    pub name: String,
    /// Name without the `u/` prefix.
    pub username: String,
    pub profile_image_url: String,
    pub flair_class: BTreeMap<String, String>,
    pub is_original_poster: bool,
    pub is_valid: bool,
}

impl User {
    /// Build a user from its raw record.
    ///
    /// `flair` is only read when it is a mapping; any other shape gives an
    /// empty flair.
    pub fn resolve(
        author_id: &str,
        record: &Mapping,
        post_author_id: Option<&str>,
    ) -> Self {
        let name = with_namespace(author_id, "u/");
        let username = name.strip_prefix("u/").unwrap_or(&name).to_owned();

        let flair_class = snapshot::mapping(record, "flair")
            .map(|flair| {
                flair
                    .iter()
                    .filter_map(|(key, value)| {
                        Some((snapshot::scalar(key)?, snapshot::scalar(value)?))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            id: author_id.to_owned(),
            is_valid: VALID_NAME.is_match(&name),
            is_original_poster: post_author_id == Some(author_id),
            profile_image_url: snapshot::string(record, "profile_image_url")
                .unwrap_or_else(|| DEFAULT_PROFILE_IMAGE.to_owned()),
            flair_class,
            username,
            name,
        }
    }

    /// The fallback author.
    pub fn deleted() -> Self {
        Self::resolve(DELETED, &Mapping::new(), None)
    }

    pub fn is_deleted(&self) -> bool {
        self.id == DELETED
    }
}

/// Lookup from author id to [`User`], built once per render.
#[derive(Debug, Clone)]
pub struct AuthorRegistry {
    authors: HashMap<String, Arc<User>>,
    deleted: Arc<User>,
    post_author_id: Option<String>,
}

impl AuthorRegistry {
    /// Resolve every entry of the raw `authors` mapping.
    ///
    /// Entries whose record is not a mapping are resolved as empty records.
    pub fn build(raw: &Mapping, post_author_id: Option<&str>) -> Self {
        let empty = Mapping::new();
        let authors: HashMap<String, Arc<User>> = raw
            .iter()
            .filter_map(|(id, record)| {
                let id = snapshot::scalar(id)?;
                let record = match record {
                    Value::Mapping(record) => record,
                    _ => &empty,
                };
                let user = User::resolve(&id, record, post_author_id);
                Some((id, Arc::new(user)))
            })
            .collect();

        tracing::debug!(authors = authors.len(), "author registry built");

        Self {
            authors,
            deleted: Arc::new(User::deleted()),
            post_author_id: post_author_id.map(str::to_owned),
        }
    }

    pub fn get(&self, author_id: &str) -> Option<&Arc<User>> {
        self.authors.get(author_id)
    }

    /// The shared fallback author.
    pub fn deleted(&self) -> Arc<User> {
        Arc::clone(&self.deleted)
    }

    /// Author of a comment: the registered user if there is one with a
    /// valid name, the deleted sentinel otherwise.
    pub fn author_of(&self, author_id: Option<&str>) -> Arc<User> {
        author_id
            .and_then(|id| self.get(id))
            .filter(|user| user.is_valid)
            .map(Arc::clone)
            .unwrap_or_else(|| self.deleted())
    }

    /// Registered user, or one resolved on the fly from an empty record.
    pub fn resolve_or_unknown(&self, author_id: &str) -> Arc<User> {
        match self.get(author_id) {
            Some(user) => Arc::clone(user),
            None => Arc::new(User::resolve(
                author_id,
                &Mapping::new(),
                self.post_author_id.as_deref(),
            )),
        }
    }
}
