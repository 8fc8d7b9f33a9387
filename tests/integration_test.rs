use std::io::Write;

use chrono::Duration;
use chrono::Utc;
use promptrank::aggregator;
use promptrank::models::TimeRange;
use promptrank::snapshot::Snapshot;
use promptrank::AppConfig;
use promptrank::PromptRank;
use promptrank::PromptRankError;
use promptrank::Result;

fn write_snapshot(json: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

fn recent_snapshot_json(version: u64) -> String {
    let now = Utc::now();
    let fresh = (now - Duration::days(2)).to_rfc3339();
    let stale = (now - Duration::days(40)).to_rfc3339();

    format!(
        r#"{{
        "version": {version},
        "items": [
            {{"id": "p1", "user_id": "alice", "title": "Code reviewer", "upvotes": 12, "bookmarks": 4,
              "tags": ["coding", "review"], "created_at": "{fresh}"}},
            {{"id": "p2", "user_id": "bob", "title": "Story starter", "upvotes": 3, "bookmarks": 9,
              "tags": ["writing"], "created_at": "{stale}"}},
            {{"id": "p3", "user_id": "alice", "title": "SQL helper", "upvotes": 1, "bookmarks": 0,
              "tags": ["coding"], "created_at": "{stale}"}},
            {{"id": "p4", "user_id": "carol", "title": "Haiku", "upvotes": 0, "bookmarks": 0,
              "tags": [], "created_at": "{fresh}"}}
        ],
        "events": {{
            "upvotes": [
                {{"prompt_id": "p1", "user_id": "bob", "created_at": "{fresh}"}},
                {{"prompt_id": "p2", "user_id": "alice", "created_at": "{fresh}"}},
                {{"prompt_id": "p3", "user_id": "bob", "created_at": "{stale}"}}
            ],
            "bookmarks": [
                {{"prompt_id": "p1", "user_id": "carol", "created_at": "{fresh}"}}
            ]
        }}
    }}"#
    )
}

#[tokio::test]
async fn test_analytics_from_snapshot_file() -> Result<()> {
    let file = write_snapshot(&recent_snapshot_json(1));
    let app = PromptRank::new(AppConfig::default());

    let snapshot = app.load_snapshot(Some(file.path())).await?;
    let summary = app.analytics(&snapshot, "alice", Some(TimeRange::Week))?;

    assert_eq!(summary.rank, 1);
    assert_eq!(summary.totals.total_prompts, 2);
    assert_eq!(summary.totals.total_upvotes, 13);
    assert_eq!(summary.totals.total_bookmarks, 4);
    assert!((summary.average_upvotes - 6.5).abs() < f64::EPSILON);
    assert_eq!(summary.top_performer.as_ref().map(|t| t.id.as_str()), Some("p1"));
    assert_eq!(summary.growth.new_item_count, 1);
    assert_eq!(summary.growth.new_upvote_event_count, 1);
    assert_eq!(summary.growth.new_bookmark_event_count, 1);
    assert_eq!(summary.top_tags[0].tag, "coding");
    assert_eq!(summary.top_tags[0].count, 2);

    let quarter = app.analytics(&snapshot, "alice", Some(TimeRange::Quarter))?;
    assert_eq!(quarter.growth.new_item_count, 2);
    assert_eq!(quarter.growth.new_upvote_event_count, 2);
    Ok(())
}

#[tokio::test]
async fn test_ranking_is_cached_per_version() -> Result<()> {
    let app = PromptRank::new(AppConfig::default());
    let first = Snapshot::from_json(&recent_snapshot_json(4))?;

    let ranking = app.ranking(&first).await?;
    let owners: Vec<&str> = ranking.iter().map(|s| s.owner_id.as_str()).collect();
    assert_eq!(owners, vec!["alice", "bob", "carol"]);
    assert_eq!(ranking[0].composite_score, 17);
    assert_eq!(ranking[1].composite_score, 12);
    assert_eq!(ranking[2].composite_score, 0);

    app.ranking(&first).await?;
    let stats = app.cache().stats().await;
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);

    // Same answer as the uncached computation
    assert_eq!(*ranking, aggregator::compute_ranking(&first.items)?);
    Ok(())
}

#[tokio::test]
async fn test_unknown_owner_gets_zeros_not_errors() -> Result<()> {
    let file = write_snapshot(&recent_snapshot_json(2));
    let app = PromptRank::new(AppConfig::default());
    let snapshot = app.load_snapshot(Some(file.path())).await?;

    let summary = app.analytics(&snapshot, "dave", None)?;
    assert_eq!(summary.rank, 0);
    assert_eq!(summary.totals.total_prompts, 0);
    assert!(summary.top_performer.is_none());
    assert!(summary.top_tags.is_empty());
    assert!(summary.average_upvotes.abs() < f64::EPSILON);
    Ok(())
}

#[tokio::test]
async fn test_negative_counter_rejects_whole_snapshot() {
    let json = r#"{"items": [
        {"id": "p1", "user_id": "alice", "upvotes": 2, "bookmarks": 0, "created_at": "2024-01-01T00:00:00Z"},
        {"id": "p2", "user_id": "bob", "upvotes": 1, "bookmarks": -3, "created_at": "2024-01-01T00:00:00Z"}
    ]}"#;
    let file = write_snapshot(json);
    let app = PromptRank::new(AppConfig::default());

    let err = app.load_snapshot(Some(file.path())).await.unwrap_err();
    assert!(matches!(err, PromptRankError::InvalidInput(_)));
    assert!(err.to_string().contains("p2"));
}

#[tokio::test]
async fn test_duplicate_tag_within_item_rejected() {
    let json = r#"{"items": [
        {"id": "p1", "user_id": "alice", "tags": ["ai", "ai"], "created_at": "2024-01-01T00:00:00Z"}
    ]}"#;
    assert!(matches!(
        Snapshot::from_json(json),
        Err(PromptRankError::InvalidInput(_))
    ));
}

#[test]
fn test_recent_activity_report() -> Result<()> {
    let snapshot = Snapshot::from_json(&recent_snapshot_json(3))?;
    let recent = aggregator::recent_activity(&snapshot.items, "alice", 5)?;
    let ids: Vec<&str> = recent.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p3"]);
    Ok(())
}
