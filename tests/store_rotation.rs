use news_curator::article::Article;
use news_curator::store::{self, ArticleStore, ACTIVE_CAP};

fn article(n: usize) -> Article {
    Article {
        title: format!("title {n}"),
        description: format!("description {n}"),
        fingerprint: format!("fp-{n}"),
        ..Article::default()
    }
}

#[test]
fn missing_store_files_load_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArticleStore::new(dir.path(), "world");
    assert!(store.load().unwrap().is_empty());
    assert!(store.load_archive().unwrap().is_empty());
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArticleStore::new(dir.path(), "world");
    let articles = vec![article(1), article(2)];
    store.save(&articles).unwrap();
    assert_eq!(store.load().unwrap(), articles);
    assert!(dir.path().join("world-news.json").exists());
}

#[test]
fn corrupt_store_is_an_error_not_an_empty_list() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("world-news.json"), "{not json").unwrap();
    let store = ArticleStore::new(dir.path(), "world");
    assert!(store.load().is_err());
}

#[test]
fn rotation_at_or_below_cap_changes_nothing() {
    let mut active: Vec<_> = (0..ACTIVE_CAP).map(article).collect();
    let demoted = store::rotate(&mut active);
    assert!(demoted.is_empty());
    assert_eq!(active.len(), ACTIVE_CAP);
}

#[test]
fn rotation_demotes_the_tail_in_original_order() {
    let mut active: Vec<_> = (0..ACTIVE_CAP + 7).map(article).collect();
    let demoted = store::rotate(&mut active);

    assert_eq!(active.len(), ACTIVE_CAP);
    assert_eq!(demoted.len(), 7);
    let fps: Vec<_> = demoted.iter().map(|a| a.fingerprint.as_str()).collect();
    let expected: Vec<_> = (ACTIVE_CAP..ACTIVE_CAP + 7)
        .map(|n| format!("fp-{n}"))
        .collect();
    assert_eq!(fps, expected.iter().map(String::as_str).collect::<Vec<_>>());
}

#[test]
fn legacy_records_round_trip_untouched() {
    // A record as earlier deployments wrote it, enrichment fields included.
    let raw = r#"[{
        "source": {"id": null, "name": "Example"},
        "author": "a",
        "title": "t",
        "description": "d",
        "url": "https://example.com/x",
        "urlToImage": null,
        "publishedAt": "2026-08-20T10:00:00Z",
        "content": "c",
        "hash": "abc123",
        "posted": true,
        "keyword": "chips",
        "embeddings": [0.25, 0.5],
        "recommendation": "keep"
    }]"#;

    let list: Vec<Article> = serde_json::from_str(raw).unwrap();
    assert_eq!(list[0].fingerprint, "abc123");
    assert!(list[0].posted);
    assert_eq!(list[0].embeddings.as_deref(), Some(&[0.25_f32, 0.5][..]));
    assert_eq!(list[0].recommendation.as_deref(), Some("keep"));

    let back = serde_json::to_string(&list).unwrap();
    assert!(back.contains("\"hash\":\"abc123\""));
    assert!(back.contains("\"urlToImage\""));
    assert!(back.contains("\"embeddings\":[0.25,0.5]"));
}

#[test]
fn archive_and_active_files_are_separate() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArticleStore::new(dir.path(), "world");
    store.save(&[article(1)]).unwrap();
    store.save_archive(&[article(2), article(3)]).unwrap();

    assert_eq!(store.load().unwrap().len(), 1);
    assert_eq!(store.load_archive().unwrap().len(), 2);
    assert!(dir.path().join("archive-world-news.json").exists());
}
