//! Trending Token Tests
//!
//! Tests for the trend aggregate fed by the post store.

use chirpdb::config::StoreConfig;
use chirpdb::model::{PostRecord, Timestamp};
use chirpdb::ranking::TRENDING_SLOTS;
use chirpdb::store::PostStore;
use chrono::{Duration, TimeZone, Utc};

fn t(n: i64) -> Timestamp {
    Utc.with_ymd_and_hms(2024, 8, 1, 0, 0, 0).unwrap() + Duration::minutes(n)
}

/// Three "#cs" posts and one "#go": "#cs" first, eight empty slots.
#[test]
fn test_trend_scenario() {
    let mut posts = PostStore::default();
    posts.add_post(PostRecord::new(1, 7, "learning #cs today", t(0)));
    posts.add_post(PostRecord::new(2, 7, "#go is fun", t(1)));
    posts.add_post(PostRecord::new(3, 8, "more #cs", t(2)));
    posts.add_post(PostRecord::new(4, 9, "#cs again", t(3)));

    let top = posts.top_trending();
    assert_eq!(top.len(), TRENDING_SLOTS);
    assert_eq!(top[0].as_deref(), Some("#cs"));
    assert_eq!(top[1].as_deref(), Some("#go"));
    assert_eq!(top.iter().filter(|slot| slot.is_none()).count(), 8);
}

/// No posts yet: ten empty slots.
#[test]
fn test_empty_trends() {
    let posts = PostStore::default();
    assert!(posts.top_trending().iter().all(Option::is_none));
}

/// A bare marker is a token like any other; repeats in one post count each time.
#[test]
fn test_token_rules() {
    let mut posts = PostStore::default();
    posts.add_post(PostRecord::new(1, 1, "# #rust #rust c#", t(0)));
    posts.add_post(PostRecord::new(2, 1, "#go #go #go", t(1)));

    let top = posts.top_trending();
    assert_eq!(top[0].as_deref(), Some("#go"));
    assert_eq!(top[1].as_deref(), Some("#rust"));
    assert_eq!(top[2].as_deref(), Some("#"));
    assert_eq!(top[3], None);
    assert_eq!(posts.trends().entry("#rust").map(|e| e.occurrences()), Some(2));
    assert!(posts.trends().entry("c#").is_none());
}

/// Posts made only of bare markers still produce a trend.
#[test]
fn test_bare_marker_posts_trend() {
    let mut posts = PostStore::default();
    posts.add_post(PostRecord::new(1, 1, "# # #", t(0)));

    let top = posts.top_trending();
    assert_eq!(top[0].as_deref(), Some("#"));
    assert_eq!(posts.trends().len(), 1);
    assert_eq!(posts.metrics().snapshot().trend_tokens_recorded, 3);
}

/// Equal counts: the more recently seen token wins by default.
#[test]
fn test_recent_token_breaks_ties() {
    let mut posts = PostStore::default();
    posts.add_post(PostRecord::new(1, 1, "#old", t(0)));
    posts.add_post(PostRecord::new(2, 1, "#new", t(9)));

    let top = posts.top_trending();
    assert_eq!(top[0].as_deref(), Some("#new"));
    assert_eq!(top[1].as_deref(), Some("#old"));
}

/// A custom marker changes which tokens are tracked.
#[test]
fn test_custom_marker() {
    let config = StoreConfig::from_json(r#"{ "trend_marker": "$" }"#).unwrap();
    let mut posts = PostStore::new(&config);
    posts.add_post(PostRecord::new(1, 1, "$RUST up, #ignored", t(0)));

    let top = posts.top_trending();
    assert_eq!(top[0].as_deref(), Some("$RUST"));
    assert_eq!(top[1], None);
}

/// More than ten tokens: only the ten strongest are reported.
#[test]
fn test_top_trending_truncates() {
    let mut posts = PostStore::default();
    for id in 0..12u64 {
        let text = format!("#t{id}");
        for repeat in 0..=id {
            posts.add_post(PostRecord::new(id * 100 + repeat, 1, text.clone(), t(id as i64)));
        }
    }

    let top = posts.top_trending();
    assert!(top.iter().all(Option::is_some));
    assert_eq!(top[0].as_deref(), Some("#t11"));
    assert_eq!(top[9].as_deref(), Some("#t2"));
}
