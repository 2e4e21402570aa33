use std::sync::Arc;

use super::*;
use crate::clock::ManualClock;
use crate::types::CommentRecord;

const T0: i64 = 1_700_000_000_000;

fn comment(story_id: &str, comment_id: &str, score: i32, timestamp: i64) -> ScoredComment {
    ScoredComment {
        record: CommentRecord {
            subreddit: "rust".to_string(),
            story_id: story_id.to_string(),
            story_url: format!("https://www.reddit.com/r/rust/comments/{story_id}/story/"),
            story_title: format!("Story {story_id}"),
            comment_id: comment_id.to_string(),
            text: String::new(),
            fetch_timestamp: timestamp,
        },
        sentiment_score: score,
    }
}

fn setup() -> (Arc<ManualClock>, Aggregator) {
    let clock = Arc::new(ManualClock::new(T0));
    let aggregator = Aggregator::new(clock.clone());
    (clock, aggregator)
}

#[test]
fn counts_n_positive_comments_for_one_story() {
    let (clock, mut agg) = setup();
    for i in 0..7 {
        clock.set(T0 + i * 1_000);
        agg.update(&comment("abc", &format!("c{i}"), 2, T0 + i * 1_000));
    }

    let top_all = agg.top_n(Category::All, 1);
    assert_eq!(top_all[0].all_count(), 7);
    let top_pos = agg.top_n(Category::Positive, 1);
    assert_eq!(top_pos[0].positive_count(), 7);
    assert_eq!(top_pos[0].negative_count(), 0);
}

#[test]
fn three_scores_split_into_categories() {
    let (clock, mut agg) = setup();
    for (i, score) in [5, -1, 2].into_iter().enumerate() {
        let ts = T0 + i64::try_from(i).unwrap() * 1_000;
        clock.set(ts);
        agg.update(&comment("abc", &format!("c{i}"), score, ts));
    }

    let all = agg.top_n(Category::All, 1);
    assert_eq!(all[0].story_id, "abc");
    assert_eq!(all[0].all_count(), 3);
    let pos = agg.top_n(Category::Positive, 1);
    assert_eq!(pos[0].story_id, "abc");
    assert_eq!(pos[0].positive_count(), 2);
    let neg = agg.top_n(Category::Negative, 1);
    assert_eq!(neg[0].story_id, "abc");
    assert_eq!(neg[0].negative_count(), 1);
}

#[test]
fn zero_score_only_counts_toward_all() {
    let (_clock, mut agg) = setup();
    agg.update(&comment("abc", "c1", 0, T0));
    let story = agg.get("abc").unwrap();
    assert_eq!(story.all_count(), 1);
    assert_eq!(story.positive_count(), 0);
    assert_eq!(story.negative_count(), 0);
}

#[test]
fn identity_fields_come_from_first_comment() {
    let (_clock, mut agg) = setup();
    agg.update(&comment("abc", "c1", 1, T0));
    let mut renamed = comment("abc", "c2", 1, T0);
    renamed.record.story_title = "Edited title".to_string();
    renamed.record.story_url = "https://example.com/other".to_string();
    agg.update(&renamed);

    let story = agg.get("abc").unwrap();
    assert_eq!(story.story_title, "Story abc");
    assert_eq!(
        story.story_url,
        "https://www.reddit.com/r/rust/comments/abc/story/"
    );
    assert_eq!(story.all_count(), 2);
}

#[test]
fn stale_story_is_evicted_on_next_update_of_any_story() {
    let (clock, mut agg) = setup();
    agg.update(&comment("old", "c1", -3, T0));

    clock.set(T0 + 3_601_000);
    agg.update(&comment("fresh", "c2", 1, T0 + 3_601_000));

    assert!(agg.get("old").is_none());
    assert_eq!(agg.len(), 1);
    for category in Category::ALL {
        assert!(agg
            .top_n(category, 10)
            .iter()
            .all(|s| s.story_id != "old"));
    }
}

#[test]
fn story_exactly_at_window_edge_is_kept() {
    let (clock, mut agg) = setup();
    agg.update(&comment("edge", "c1", 1, T0));

    clock.set(T0 + WINDOW_MS);
    agg.update(&comment("other", "c2", 1, T0 + WINDOW_MS));

    assert!(agg.get("edge").is_some());
}

#[test]
fn old_timestamps_are_pruned_but_story_survives() {
    let (clock, mut agg) = setup();
    agg.update(&comment("abc", "c1", 1, T0));
    agg.update(&comment("abc", "c2", -1, T0 + 1_000));

    clock.set(T0 + WINDOW_MS + 500);
    agg.update(&comment("abc", "c3", 1, T0 + WINDOW_MS + 500));

    let story = agg.get("abc").unwrap();
    assert_eq!(story.all_count(), 2, "c1 is outside the window");
    assert_eq!(story.positive_count(), 1);
    assert_eq!(story.negative_count(), 1);
}

#[test]
fn sweep_prunes_stories_that_were_not_updated() {
    let (clock, mut agg) = setup();
    agg.update(&comment("quiet", "c1", 1, T0));
    agg.update(&comment("quiet", "c2", 1, T0 + 30 * 60_000));

    clock.set(T0 + WINDOW_MS + 1_000);
    agg.update(&comment("busy", "c3", 1, T0 + WINDOW_MS + 1_000));

    let quiet = agg.get("quiet").expect("last comment still inside window");
    assert_eq!(quiet.all_count(), 1);
    assert_eq!(quiet.oldest(Category::All), Some(T0 + 30 * 60_000));
}

#[test]
fn out_of_order_arrival_is_pruned_correctly() {
    let (clock, mut agg) = setup();
    agg.update(&comment("abc", "late", 1, T0 + 10_000));
    agg.update(&comment("abc", "early", 1, T0));

    let story = agg.get("abc").unwrap();
    assert_eq!(story.oldest(Category::All), Some(T0));
    assert_eq!(story.last_comment_timestamp, T0 + 10_000);

    clock.set(T0 + WINDOW_MS + 5_000);
    agg.update(&comment("abc", "now", 1, T0 + WINDOW_MS + 5_000));
    let story = agg.get("abc").unwrap();
    assert_eq!(story.all_count(), 2, "only the early comment expired");
    assert_eq!(story.oldest(Category::All), Some(T0 + 10_000));
}

#[test]
fn ranking_is_descending_by_category_count() {
    let (_clock, mut agg) = setup();
    agg.update(&comment("one", "a1", -1, T0));
    for i in 0..3 {
        agg.update(&comment("three", &format!("b{i}"), 1, T0));
    }
    for i in 0..2 {
        agg.update(&comment("two", &format!("c{i}"), -1, T0));
    }

    let ids: Vec<&str> = agg
        .top_n(Category::All, 10)
        .iter()
        .map(|s| s.story_id.as_str())
        .collect();
    assert_eq!(ids, ["three", "two", "one"]);

    let neg: Vec<&str> = agg
        .top_n(Category::Negative, 2)
        .iter()
        .map(|s| s.story_id.as_str())
        .collect();
    assert_eq!(neg, ["two", "one"]);
}

#[test]
fn ties_break_by_first_seen_order() {
    let (_clock, mut agg) = setup();
    for id in ["delta", "alpha", "charlie", "bravo"] {
        agg.update(&comment(id, &format!("{id}-1"), 1, T0));
    }

    let ids: Vec<&str> = agg
        .top_n(Category::All, 4)
        .iter()
        .map(|s| s.story_id.as_str())
        .collect();
    assert_eq!(ids, ["delta", "alpha", "charlie", "bravo"]);
}

#[test]
fn top_n_is_idempotent_without_updates() {
    let (_clock, mut agg) = setup();
    for (i, id) in ["a", "b", "c", "d", "e", "f"].into_iter().enumerate() {
        for j in 0..(i % 3) {
            agg.update(&comment(id, &format!("{id}{j}"), 1, T0));
        }
        agg.update(&comment(id, &format!("{id}-z"), -1, T0));
    }

    let first: Vec<String> = agg
        .top_n(Category::All, 5)
        .iter()
        .map(|s| s.story_id.clone())
        .collect();
    for _ in 0..5 {
        let again: Vec<String> = agg
            .top_n(Category::All, 5)
            .iter()
            .map(|s| s.story_id.clone())
            .collect();
        assert_eq!(first, again);
    }
}

#[test]
fn top_n_zero_is_empty_and_large_n_returns_everything() {
    let (_clock, mut agg) = setup();
    agg.update(&comment("a", "1", 1, T0));
    agg.update(&comment("b", "2", 1, T0));

    assert!(agg.top_n(Category::All, 0).is_empty());
    assert_eq!(agg.top_n(Category::All, 50).len(), 2);
}

#[test]
fn empty_table_ranks_to_nothing() {
    let (_clock, agg) = setup();
    assert!(agg.is_empty());
    assert!(agg.top_n(Category::Positive, 5).is_empty());
}

#[test]
fn timestamp_window_prune_reports_removed_count() {
    let mut window = TimestampWindow::default();
    for ts in [5, 1, 3, 9, 7] {
        window.insert(ts);
    }
    assert_eq!(window.oldest(), Some(1));
    assert_eq!(window.prune(4), 2);
    assert_eq!(window.len(), 3);
    assert_eq!(window.oldest(), Some(5));
    assert_eq!(window.prune(100), 3);
    assert!(window.is_empty());
}
