//! Comment markup.

use std::fmt::Write;

use html_escape::encode_quoted_attribute as escape;

use super::Comment;

pub const MODERATOR_BADGE: &str = r#"<span class="badge badge-mod">MOD</span>"#;
pub const ORIGINAL_POSTER_BADGE: &str = r#"<span class="badge badge-op">OP</span>"#;

/// Badge shown next to the author; moderator wins over original poster.
pub fn badge(comment: &Comment) -> &'static str {
    if comment.is_moderator {
        MODERATOR_BADGE
    } else if comment.author.is_original_poster {
        ORIGINAL_POSTER_BADGE
    } else {
        ""
    }
}

/// Render one comment and its replies.
pub fn render(comment: &Comment) -> String {
    let mut out = String::new();
    write_comment(&mut out, comment);
    out
}

/// Render a comment list, no separator between items.
pub fn render_all(comments: &[Comment]) -> String {
    let mut out = String::new();
    for comment in comments {
        write_comment(&mut out, comment);
    }
    out
}

fn write_comment(out: &mut String, comment: &Comment) {
    out.push_str(r#"<div class="comment" role="none"><article"#);
    if let Some(vote) = comment.current_user_vote.as_str() {
        let _ = write!(out, r#" data-vote="{vote}""#);
    }
    let _ = write!(
        out,
        r#"><img class="avatar" src="{}" alt=""><span class="username">{}</span>{}{}</article>"#,
        escape(&comment.author.profile_image_url),
        escape(&comment.author.username),
        badge(comment),
        comment.body_html,
    );

    // Always emitted, even without replies.
    out.push_str(r#"<div role="none" class="replies">"#);
    for reply in &comment.replies {
        write_comment(out, reply);
    }
    if comment.hidden_replies > 0 {
        let _ = write!(
            out,
            r#"<div class="truncated">{} more replies</div>"#,
            comment.hidden_replies
        );
    }
    out.push_str("</div></div>");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::comment::Vote;
    use crate::user::User;

    fn user(id: &str, op: Option<&str>) -> Arc<User> {
        Arc::new(User::resolve(id, &serde_yaml::Mapping::new(), op))
    }

    fn comment(author: Arc<User>, body: &str, replies: Vec<Comment>) -> Comment {
        Comment {
            body_html: body.to_owned(),
            author,
            is_moderator: false,
            current_user_vote: Vote::None,
            replies,
            hidden_replies: 0,
        }
    }

    #[test]
    fn test_render_leaf() {
        let html = render(&comment(user("bob", None), "<p>hi</p>", vec![]));
        assert_eq!(
            html,
            concat!(
                r#"<div class="comment" role="none"><article>"#,
                r#"<img class="avatar" src="/favicon.ico" alt="">"#,
                r#"<span class="username">bob</span><p>hi</p></article>"#,
                r#"<div role="none" class="replies"></div></div>"#,
            )
        );
    }

    #[test]
    fn test_badge_precedence() {
        let op = user("alice", Some("alice"));

        let mut both = comment(Arc::clone(&op), "", vec![]);
        both.is_moderator = true;
        assert_eq!(badge(&both), MODERATOR_BADGE);
        assert!(render(&both).contains(MODERATOR_BADGE));
        assert!(!render(&both).contains(ORIGINAL_POSTER_BADGE));

        let only_op = comment(op, "", vec![]);
        assert_eq!(badge(&only_op), ORIGINAL_POSTER_BADGE);

        let plain = comment(user("bob", Some("alice")), "", vec![]);
        assert_eq!(badge(&plain), "");
    }

    #[test]
    fn test_username_escaped_body_raw() {
        let mut author = User::deleted();
        author.username = "<b>&\"".to_owned();
        let html = render(&comment(Arc::new(author), "<em>raw</em>", vec![]));

        assert!(html.contains("&lt;b&gt;&amp;&quot;"));
        assert!(html.contains("<em>raw</em>"));
    }

    #[test]
    fn test_replies_nested_in_order() {
        let a = user("a", None);
        let tree = comment(
            Arc::clone(&a),
            "1",
            vec![
                comment(Arc::clone(&a), "2", vec![comment(Arc::clone(&a), "3", vec![])]),
                comment(a, "4", vec![]),
            ],
        );
        let html = render(&tree);

        let positions: Vec<usize> = ["</span>1", "</span>2", "</span>3", "</span>4"]
            .iter()
            .map(|needle| html.find(needle).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(html.matches(r#"class="replies""#).count(), 4);
        assert!(html.contains(concat!(
            r#"</span>3</article><div role="none" class="replies"></div></div>"#,
            r#"</div></div><div class="comment""#,
        )));
        assert!(html.ends_with("</div></div></div></div>"));
    }

    #[test]
    fn test_vote_and_truncation_marker() {
        let mut c = comment(user("a", None), "x", vec![]);
        c.current_user_vote = Vote::Down;
        c.hidden_replies = 7;
        let html = render(&c);

        assert!(html.contains(r#"<article data-vote="down">"#));
        assert!(html.contains(r#"<div class="truncated">7 more replies</div></div></div>"#));
    }

    #[test]
    fn test_render_all() {
        let a = user("a", None);
        let html = render_all(&[
            comment(Arc::clone(&a), "one", vec![]),
            comment(a, "two", vec![]),
        ]);
        assert_eq!(html.matches(r#"<div class="comment""#).count(), 2);
        assert!(html.find("one").unwrap() < html.find("two").unwrap());
        assert_eq!(render_all(&[]), "");
    }
}
