#[path = "common/mod.rs"]
mod common;

use common::*;
use ytetl::{extract_comments, CommentPages, EtlError, VideoRef};

fn video(id: &str) -> VideoRef {
    VideoRef {
        video_id: id.to_string(),
        title: "Rust in 100 Seconds".to_string(),
        published_at: "2023-01-10T15:00:00Z".to_string(),
    }
}

/// Two pages, three threads with reply counts 2, 0, 1:
/// expect 3 + 3 = 6 records, each top-level comment followed by its replies.
#[test]
fn yields_top_level_plus_replies_in_order_across_pages() {
    let source = ScriptedSource::new()
        .thread_page(
            "v1",
            None,
            thread_page(
                vec![
                    thread(
                        comment("t1", "v1", "2023-01-11T00:00:00Z"),
                        2,
                        Some(vec![comment("t1r1", "v1", "2023-01-11T01:00:00Z"), comment("t1r2", "v1", "2023-01-11T02:00:00Z")]),
                    ),
                    thread(comment("t2", "v1", "2023-01-12T00:00:00Z"), 0, None),
                ],
                Some("p2"),
            ),
        )
        .thread_page(
            "v1",
            Some("p2"),
            thread_page(
                vec![thread(
                    comment("t3", "v1", "2023-01-13T00:00:00Z"),
                    1,
                    Some(vec![comment("t3r1", "v1", "2023-01-13T05:00:00Z")]),
                )],
                None,
            ),
        );

    let rows = extract_comments(&source, &video("v1")).unwrap();
    let texts: Vec<_> = rows.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, vec!["t1", "t1r1", "t1r2", "t2", "t3", "t3r1"]);

    // inherited video fields, own comment date
    assert!(rows.iter().all(|r| r.video_title == "Rust in 100 Seconds"));
    assert!(rows.iter().all(|r| r.video_date == "2023-01-10T15:00:00Z"));
    assert_eq!(rows[5].comment_date, "2023-01-13T05:00:00Z");
}

/// A page without a continuation token ends the walk: exactly two requests,
/// the first without a token and the second with the token from page one.
#[test]
fn stops_after_page_without_continuation_token() {
    let source = ScriptedSource::new()
        .thread_page("v1", None, thread_page(vec![thread(comment("a", "v1", "2023-01-11T00:00:00Z"), 0, None)], Some("p2")))
        .thread_page("v1", Some("p2"), thread_page(vec![thread(comment("b", "v1", "2023-01-11T00:00:00Z"), 0, None)], None))
        // would be requested only if the walk ignored the missing token
        .thread_page("v1", Some("p3"), thread_page(vec![thread(comment("c", "v1", "2023-01-11T00:00:00Z"), 0, None)], None));

    let rows = extract_comments(&source, &video("v1")).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(source.thread_calls("v1"), vec![None, Some("p2".to_string())]);
}

/// A single page with no token still contributes its threads.
#[test]
fn single_page_video_is_fully_extracted() {
    let source = ScriptedSource::new().thread_page(
        "v1",
        None,
        thread_page(
            vec![
                thread(comment("only", "v1", "2023-01-11T00:00:00Z"), 1, Some(vec![comment("reply", "v1", "2023-01-11T00:00:00Z")])),
            ],
            None,
        ),
    );
    let rows = extract_comments(&source, &video("v1")).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(source.thread_calls("v1").len(), 1);
}

/// Replies are emitted only when the count is positive *and* the payload embeds them.
/// A shortfall between `totalReplyCount` and the embedded set is counted, not fetched.
#[test]
fn follows_only_embedded_replies() {
    let source = ScriptedSource::new().thread_page(
        "v1",
        None,
        thread_page(
            vec![
                // count says 3, nothing embedded
                thread(comment("no-embed", "v1", "2023-01-11T00:00:00Z"), 3, None),
                // embedded but count is zero
                thread(comment("zero-count", "v1", "2023-01-11T00:00:00Z"), 0, Some(vec![comment("ghost", "v1", "2023-01-11T00:00:00Z")])),
                // count 7, five embedded
                thread(
                    comment("partial", "v1", "2023-01-11T00:00:00Z"),
                    7,
                    Some((0..5).map(|i| comment(&format!("r{}", i), "v1", "2023-01-11T00:00:00Z")).collect()),
                ),
            ],
            None,
        ),
    );

    let mut pages = CommentPages::new(&source, video("v1"));
    let rows: Vec<_> = pages.by_ref().collect::<Result<_, _>>().unwrap();
    let texts: Vec<_> = rows.iter().map(|r: &ytetl::CommentRecord| r.text.clone()).collect();
    assert_eq!(texts, vec!["no-embed", "zero-count", "partial", "r0", "r1", "r2", "r3", "r4"]);
    assert_eq!(pages.replies_not_embedded(), 3 + 2);
    assert_eq!(pages.requests(), 1);
}

/// A reply's own `videoId` is kept verbatim even when it differs from the parent video.
#[test]
fn reply_video_id_is_preserved() {
    let source = ScriptedSource::new().thread_page(
        "v1",
        None,
        thread_page(
            vec![thread(comment("top", "v1", "2023-01-11T00:00:00Z"), 1, Some(vec![comment("reply", "v1-mirror", "2023-01-11T00:00:00Z")]))],
            None,
        ),
    );
    let rows = extract_comments(&source, &video("v1")).unwrap();
    assert_eq!(rows[0].video_id, "v1");
    assert_eq!(rows[1].video_id, "v1-mirror");
}

/// Pages are requested lazily: pulling one record issues one request.
#[test]
fn pages_are_fetched_on_demand() {
    let source = ScriptedSource::new()
        .thread_page("v1", None, thread_page(vec![thread(comment("a", "v1", "2023-01-11T00:00:00Z"), 0, None)], Some("p2")))
        .thread_page("v1", Some("p2"), thread_page(vec![thread(comment("b", "v1", "2023-01-11T00:00:00Z"), 0, None)], None));

    let first: Vec<_> = CommentPages::new(&source, video("v1")).take(1).collect();
    assert_eq!(first.len(), 1);
    assert_eq!(source.thread_calls("v1").len(), 1);
}

/// An error on a later page aborts the video: the sequence yields the error
/// once and then ends, with no partial salvage through `extract_comments`.
#[test]
fn page_error_aborts_the_video() {
    let source = ScriptedSource::new()
        .thread_page("v1", None, thread_page(vec![thread(comment("a", "v1", "2023-01-11T00:00:00Z"), 0, None)], Some("p2")))
        .fail_threads("v1", Some("p2"));

    let mut pages = CommentPages::new(&source, video("v1"));
    assert!(matches!(pages.next(), Some(Ok(_))));
    assert!(matches!(pages.next(), Some(Err(EtlError::Extraction { .. }))));
    assert!(pages.next().is_none());

    let err = extract_comments(&source, &video("v1")).unwrap_err();
    assert!(matches!(err, EtlError::Extraction { .. }));
    assert!(err.to_string().contains("v1"));
}

/// A page that does not decode is an extraction error, not a panic.
#[test]
fn malformed_page_is_an_extraction_error() {
    let source = ScriptedSource::new().thread_page("v1", None, serde_json::json!({ "items": [{ "snippet": {} }] }));
    let err = extract_comments(&source, &video("v1")).unwrap_err();
    assert!(matches!(err, EtlError::Extraction { .. }));
}

/// A video with comments disabled-but-empty returns no records after one request.
#[test]
fn empty_video_yields_nothing() {
    let source = ScriptedSource::new().thread_page("v1", None, thread_page(vec![], None));
    let rows = extract_comments(&source, &video("v1")).unwrap();
    assert!(rows.is_empty());
    assert_eq!(source.thread_calls("v1").len(), 1);
}
