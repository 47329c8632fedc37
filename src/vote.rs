//! SVG vote badge.

use std::fmt::Write;
use std::sync::LazyLock;

use html_escape::encode_text as escape;
use regex_lite::Regex;

pub const UP_COLOR: &str = "#ff7126";
pub const DOWN_COLOR: &str = "#aaaaff";
pub const NEUTRAL_COLOR: &str = "white";
const ARROW_COLOR: &str = "#000000";

const PATH_UP: &str = "M 128 192 l 64 -64 l 64 64 h -32 v 192 h -64 v -192 Z";
const PATH_DOWN: &str = "M 768 320 l 64 64 l 64 -64 h -32 v -192 h -64 v 192 Z";

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").unwrap());

/// Which arrow is lit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Up,
    Down,
    Neutral,
}

impl Side {
    /// `u` and `d` pick a side; anything else is neutral.
    pub fn parse(vote: Option<&str>) -> Self {
        match vote {
            Some("u") => Side::Up,
            Some("d") => Side::Down,
            _ => Side::Neutral,
        }
    }

    fn background(&self) -> &'static str {
        match self {
            Side::Up => UP_COLOR,
            Side::Down => DOWN_COLOR,
            Side::Neutral => NEUTRAL_COLOR,
        }
    }
}

/// Counter label: the integer value of an all-digit string, `NaN`
/// otherwise.
pub fn counter_label(counter: &str) -> String {
    if DIGITS.is_match(counter) {
        let trimmed = counter.trim_start_matches('0');
        if trimmed.is_empty() { "0" } else { trimmed }.to_owned()
    } else {
        "NaN".to_owned()
    }
}

/// Render the badge. `counter` defaults to `0`.
pub fn badge(vote: Option<&str>, counter: Option<&str>) -> String {
    let side = Side::parse(vote);
    let label = counter_label(counter.unwrap_or("0"));

    let (up_fill, down_fill) = match side {
        Side::Up => (UP_COLOR, ARROW_COLOR),
        Side::Down => (ARROW_COLOR, DOWN_COLOR),
        Side::Neutral => (ARROW_COLOR, ARROW_COLOR),
    };

    let mut svg = String::from(
        r#"<svg viewBox="0 0 1024 512" width="1024" height="512" xmlns="http://www.w3.org/2000/svg">"#,
    );
    let _ = write!(
        svg,
        r#"<rect width="1024" height="512" fill="{}"/>"#,
        side.background()
    );
    let _ = write!(
        svg,
        r#"<path d="{PATH_UP}" fill="{up_fill}" stroke-width="8" stroke="{ARROW_COLOR}"/>"#
    );
    let _ = write!(
        svg,
        concat!(
            r#"<text fill="black" id="text" font-size="256" dominant-baseline="middle" "#,
            r#"text-anchor="middle" font-family="monospace" y="256" x="512">{}</text>"#,
        ),
        escape(&label)
    );
    let _ = write!(
        svg,
        r#"<path d="{PATH_DOWN}" fill="{down_fill}" stroke-width="8" stroke="{ARROW_COLOR}"/>"#
    );
    svg.push_str("</svg>");
    svg
}
