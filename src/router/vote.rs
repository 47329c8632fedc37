use axum::extract::Query;
use axum::http::header;
use axum::response::IntoResponse;

use crate::vote;

/// Handler returning the SVG vote badge.
///
/// Raw pairs are taken so repeated or unknown keys never reject the
/// request; the last value of a key wins.
pub async fn handler(Query(pairs): Query<Vec<(String, String)>>) -> impl IntoResponse {
    let last = |key: &str| {
        pairs
            .iter()
            .rev()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    };

    (
        [(header::CONTENT_TYPE, super::SVG)],
        vote::badge(last("vote"), last("counter")),
    )
}
