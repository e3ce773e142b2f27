use std::time::Duration;

use news_curator::config::GroupConfig;
use news_curator::ingest::MockSearch;
use news_curator::publish::MockPublisher;
use news_curator::runner::PipelineRunner;
use news_curator::store::ArticleStore;
use news_curator::supervisor;
use news_curator::text::translate::MockTranslator;

fn config(group: &str) -> GroupConfig {
    GroupConfig {
        group: group.to_string(),
        keywords: vec!["chips".to_string()],
        exclude_domains: Vec::new(),
        blocked_words: Vec::new(),
        search_api_key: "sk".to_string(),
        consumer_key: "ck".to_string(),
        consumer_secret: "cs".to_string(),
        refresh_token: "rt".to_string(),
        phase: 1,
        interval_minutes: 5,
        language: "en".to_string(),
    }
}

fn runner(dir: &std::path::Path, group: &str, search: MockSearch) -> PipelineRunner {
    PipelineRunner::new(
        config(group),
        Vec::new(),
        ArticleStore::new(dir, group),
        Box::new(search),
        Box::new(MockTranslator::prefixing("")),
        Box::new(MockPublisher::default()),
    )
}

// Paused clock: idle sleeps between cycles elapse instantly, so ten minutes
// of virtual supervision run in microseconds.
#[tokio::test(start_paused = true)]
async fn one_halted_group_does_not_stop_its_sibling() {
    let dir = tempfile::tempdir().unwrap();
    // The bad group's store is unreadable, so its first cycle is fatal.
    std::fs::write(dir.path().join("bad-news.json"), "{corrupt").unwrap();

    let good_search = MockSearch::default();
    let runners = vec![
        runner(dir.path(), "bad", MockSearch::default()),
        runner(dir.path(), "good", good_search.clone()),
    ];

    let supervision = supervisor::run_groups(runners);
    let outcome = tokio::time::timeout(Duration::from_secs(600), supervision).await;

    // The healthy group idles forever, so supervision never returns.
    assert!(outcome.is_err(), "the healthy group should still be running");
    let calls = good_search.calls.lock().unwrap().len();
    assert!(
        calls >= 2,
        "the sibling should keep cycling after the other group halted, saw {calls} ingests"
    );
}

#[tokio::test(start_paused = true)]
async fn supervision_returns_once_every_group_halts() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a-news.json"), "{corrupt").unwrap();
    std::fs::write(dir.path().join("b-news.json"), "{corrupt").unwrap();

    let runners = vec![
        runner(dir.path(), "a", MockSearch::default()),
        runner(dir.path(), "b", MockSearch::default()),
    ];

    let outcome =
        tokio::time::timeout(Duration::from_secs(5), supervisor::run_groups(runners)).await;
    assert!(outcome.is_ok(), "supervision should end when all groups halt");
}
