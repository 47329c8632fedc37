//! Page assembly from the static template.
//!
//! Recognized tokens are replaced in a single scan of the template, so text
//! coming from the data file is never itself scanned for tokens.

use std::sync::LazyLock;

use chrono::SecondsFormat;
use html_escape::encode_quoted_attribute as escape;
use regex_lite::{Captures, Regex};

use crate::comment::{self, MODERATOR_BADGE};
use crate::markdown;
use crate::post::{Post, PostDate};
use crate::user::with_namespace;

pub const DEFAULT_TITLE: &str = "(untitled) RealmTester post";
pub const DEFAULT_REALM: &str = "RealmTester";
pub const DEFAULT_FLAIR: &str = "unknown";
pub const DEFAULT_FLAIR_COLOR: &str = "#ff4500";
pub const DEFAULT_BODY: &str = "[empty]";
/// Shown when the post date is missing or not understood.
pub const DATE_PLACEHOLDER: &str = "enable interactivity";

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^#?[0-9a-f]{6}$").unwrap());

static TOKENS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"<title>RealmTester post</title>",
        r"|\{\{RealmTester\.(?:title|realm|subrealm|body|author|mark|date)\}\}",
        r"|\{\{flair_(?:text|css_class)\}\}",
        r"|/\*flair_color\*/",
        r#"|data-flair_hidden hidden="hidden""#,
        r"|\s*<!--comments-->\s*",
        r"|\s*<!--comment_counted-->\s*",
    ))
    .unwrap()
});

/// Flair background: a six digit hex colour, `transparent` when the value
/// is anything else, [`DEFAULT_FLAIR_COLOR`] when there is none.
pub fn flair_color(raw: Option<&str>) -> String {
    match raw {
        None => DEFAULT_FLAIR_COLOR.to_owned(),
        Some(color) if HEX_COLOR.is_match(color) => {
            if color.starts_with('#') {
                color.to_owned()
            } else {
                format!("#{color}")
            }
        },
        Some(_) => "transparent".to_owned(),
    }
}

/// `<time>` element for the post date.
pub fn date_html(date: &PostDate) -> String {
    match date {
        PostDate::Absolute(date) => format!(
            r#"<time datetime="{}">{} UTC</time>"#,
            date.to_rfc3339_opts(SecondsFormat::Secs, true),
            date.format("%Y-%m-%d %H:%M"),
        ),
        PostDate::Relative(text) => format!("<time>{}</time>", escape(text)),
        PostDate::Unparsed => {
            format!(r#"<time data-placeholder="">{DATE_PLACEHOLDER}</time>"#)
        },
    }
}

/// Values substituted into the template, defaults already applied.
///
/// Text fields are stored unescaped; markup fields are inserted as is.
#[derive(Debug, Clone, PartialEq)]
pub struct PageValues {
    pub title: String,
    /// Realm with its `m/` prefix.
    pub realm: String,
    pub flair_text: Option<String>,
    pub flair_css_class: String,
    pub flair_color: String,
    pub body_html: String,
    pub author: String,
    pub mark: &'static str,
    pub date_html: String,
    pub comments_html: String,
    pub comment_count: usize,
}

impl PageValues {
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone().unwrap_or_else(|| DEFAULT_TITLE.to_owned()),
            realm: with_namespace(
                post.subrealm.as_deref().unwrap_or(DEFAULT_REALM),
                "m/",
            ),
            flair_text: post.flair_text.clone(),
            flair_css_class: post
                .flair_css_class
                .clone()
                .unwrap_or_else(|| DEFAULT_FLAIR.to_owned()),
            flair_color: flair_color(post.flair_color.as_deref()),
            body_html: markdown::to_html(post.body.as_deref().unwrap_or(DEFAULT_BODY)),
            author: post.author.username.clone(),
            mark: if post.is_moderator { MODERATOR_BADGE } else { "" },
            date_html: date_html(&post.date),
            comments_html: comment::render_all(&post.comments),
            comment_count: post.comment_count,
        }
    }

    /// Realm name without its prefix.
    pub fn realm_name(&self) -> &str {
        self.realm.strip_prefix("m/").unwrap_or(&self.realm)
    }

    fn substitute(&self, token: &str) -> String {
        match token.trim() {
            "<title>RealmTester post</title>" => {
                format!("<title>{} (RealmTester)</title>", escape(&self.title))
            },
            "{{RealmTester.title}}" => escape(&self.title).into_owned(),
            "{{RealmTester.realm}}" => escape(self.realm_name()).into_owned(),
            "{{RealmTester.subrealm}}" => escape(&self.realm).into_owned(),
            "{{RealmTester.body}}" => self.body_html.clone(),
            "{{RealmTester.author}}" => escape(&self.author).into_owned(),
            "{{RealmTester.mark}}" => self.mark.to_owned(),
            "{{RealmTester.date}}" => self.date_html.clone(),
            "{{flair_text}}" => {
                escape(self.flair_text.as_deref().unwrap_or(DEFAULT_FLAIR)).into_owned()
            },
            "{{flair_css_class}}" => escape(&self.flair_css_class).into_owned(),
            "/*flair_color*/" => {
                format!("background-color:{}", escape(&self.flair_color))
            },
            r#"data-flair_hidden hidden="hidden""# => {
                if self.flair_text.as_deref().is_some_and(|text| !text.is_empty()) {
                    r#"data-until-found="""#.to_owned()
                } else {
                    token.to_owned()
                }
            },
            "<!--comments-->" => self.comments_html.clone(),
            "<!--comment_counted-->" => self.comment_count.to_string(),
            _ => token.to_owned(),
        }
    }
}

/// Fill every recognized token of `template`.
pub fn assemble(template: &str, values: &PageValues) -> String {
    TOKENS
        .replace_all(template, |caps: &Captures<'_>| values.substitute(&caps[0]))
        .into_owned()
}

/// Render `post` into `template`.
pub fn render_post(template: &str, post: &Post) -> String {
    assemble(template, &PageValues::from_post(post))
}

/// Minimal page shown instead of the post when the data cannot be loaded.
pub fn error_page(message: &str) -> String {
    format!(
        concat!(
            r#"<!DOCTYPE html><html lang="en"><head><meta charset="utf-8">"#,
            r#"<title>Error (RealmTester)</title></head>"#,
            r#"<body style="font-family:monospace"><h1>Unable to render post</h1>"#,
            r#"<pre>{}</pre></body></html>"#,
        ),
        escape(message)
    )
}
