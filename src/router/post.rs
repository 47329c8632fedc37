//! The post page.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;

use crate::config::Configuration;
use crate::error::{Result, ServerError};
use crate::page;
use crate::post::Post;
use crate::snapshot::Snapshot;

/// Handler rendering the post from the current data file.
///
/// The data file and template are read again on every request.
pub async fn handler(
    State(config): State<Arc<Configuration>>,
) -> Result<Html<String>> {
    let snapshot = Snapshot::load(&config.data).await?;
    let template = tokio::fs::read_to_string(&config.template)
        .await
        .map_err(|err| ServerError::io(&config.template, err))?;

    let post = Post::from_snapshot(&snapshot, config.max_depth);
    metrics::counter!("comments_rendered_total").increment(post.comment_count as u64);
    tracing::debug!(comments = post.comment_count, "post rendered");

    Ok(Html(page::render_post(&template, &post)))
}

#[cfg(test)]
mod tests {
    use axum::http::{StatusCode, header};

    use crate::router::tests::{body, missing_state, state};
    use crate::*;

    const POST: &str = r#"
post:
  title: Testing <realms>
  subrealm: r/tests
  flair_text: Meta
  author_id: alice
  body: Hello **there**
  date: 5 minutes ago
  comments:
    - author_id: bob
      body: top
      is_moderator: true
      comments:
        - author_id: alice
          body: op reply
          is_moderator: true
        - author_id: alice
          body: second reply
    - author_id: carol
      body: ""
authors:
  alice: {profile_image_url: /alice.png}
  bob: {}
  carol: {}
"#;

    #[tokio::test]
    async fn test_post_handler() {
        let (_dir, state) = state(POST, "comments.yaml");
        let response = make_request(app(state), Method::GET, "/").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );

        let body = body(response).await;
        assert!(body.contains("<title>Testing &lt;realms&gt; (RealmTester)</title>"));
        assert!(body.contains("<strong>there</strong>"));
        assert!(body.contains("<time>5 minutes ago</time>"));
        assert!(body.contains(r#"data-until-found="""#));
        assert!(body.contains(">4<"));

        // Moderator badge over the OP badge on alice's moderator reply.
        let op_reply = body.find("op reply").unwrap();
        let op_reply_head = &body[..op_reply];
        let last_article = op_reply_head.rfind("<article").unwrap();
        assert!(op_reply_head[last_article..].contains(comment::MODERATOR_BADGE));
        assert!(!op_reply_head[last_article..].contains(comment::ORIGINAL_POSTER_BADGE));

        // The plain reply by alice gets the OP badge.
        let second = body.find("second reply").unwrap();
        let second_head = &body[..second];
        let last_article = second_head.rfind("<article").unwrap();
        assert!(second_head[last_article..].contains(comment::ORIGINAL_POSTER_BADGE));

        // Order is kept and carol's empty comment is shown as deleted.
        let top = body.find("<p>top</p>").unwrap();
        let invalid = body.find(comment::INVALID_BODY).unwrap();
        assert!(top < op_reply && op_reply < second && second < invalid);
        assert!(!body.contains(">carol<"));
        assert!(body.contains(r#"<span class="username">[deleted]</span>[invalid]"#));
    }

    #[tokio::test]
    async fn test_post_without_comments() {
        let (_dir, state) = state("post:\n  title: Quiet\n", "comments.yaml");
        let response = make_request(app(state), Method::GET, "/").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body(response).await;
        assert!(body.contains(r#"<span id="comment-count">0</span>"#));
        assert!(body.contains(r#"<section class="section-comment"></section>"#));
    }

    #[tokio::test]
    async fn test_post_from_json() {
        let (_dir, state) = state(
            r#"{"post": {"title": "From JSON", "comments": [{"body": "a", "comments": [{"body": "b"}]}]}}"#,
            "comments.json",
        );
        let response = make_request(app(state), Method::GET, "/").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body(response).await;
        assert!(body.contains("From JSON"));
        assert!(body.contains(r#"<span id="comment-count">2</span>"#));
    }

    #[tokio::test]
    async fn test_malformed_data_renders_error_page() {
        let (_dir, state) = state("post: [unclosed\n", "comments.yaml");
        let response = make_request(app(state), Method::GET, "/").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body(response).await;
        assert!(body.contains("font-family:monospace"));
        assert!(!body.contains("section-comment"));
        assert!(!body.contains("{{"));
    }

    #[tokio::test]
    async fn test_missing_data_renders_error_page() {
        let response = make_request(app(missing_state()), Method::GET, "/").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body(response).await;
        assert!(body.contains("cannot read"));
    }
}
