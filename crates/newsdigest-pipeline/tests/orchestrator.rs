//! End-to-end runs of `TargetOrchestrator` against in-memory collaborators.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use chrono::{DateTime, FixedOffset, Utc};
use newsdigest_core::{
    FeedSource, KeywordTarget, NewsItem, Notifier, Summarizer, SummarizerFactory,
    SummarizerProvider,
};
use newsdigest_pipeline::{
    DayWindow, NotifiedCache, Stage, TargetOrchestrator, TargetOutcome, MAX_ITEMS_PER_TARGET,
};

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

#[derive(Default)]
struct FakeFeed {
    by_keyword: HashMap<String, Result<Vec<NewsItem>, String>>,
}

impl FakeFeed {
    fn with(mut self, keyword: &str, items: Vec<NewsItem>) -> Self {
        self.by_keyword.insert(keyword.to_string(), Ok(items));
        self
    }

    fn failing(mut self, keyword: &str) -> Self {
        self.by_keyword
            .insert(keyword.to_string(), Err(format!("{keyword}: HTTP 503")));
        self
    }
}

impl FeedSource for FakeFeed {
    type Error = String;

    async fn fetch_keyword(&self, keyword: &str) -> Result<Vec<NewsItem>, String> {
        self.by_keyword
            .get(keyword)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Fails for any article whose text contains "unsummarizable".
struct FakeSummarizer;

impl Summarizer for FakeSummarizer {
    type Error = String;

    async fn summarize(&self, text: &str) -> Result<String, String> {
        if text.contains("unsummarizable") {
            return Err("model error".to_string());
        }
        let title = text.lines().next().unwrap_or_default();
        Ok(format!("summary: {title}"))
    }
}

#[derive(Default)]
struct FakeFactory {
    broken: HashSet<&'static str>,
    created: Rc<RefCell<Vec<SummarizerProvider>>>,
}

impl SummarizerFactory for FakeFactory {
    type Summarizer = FakeSummarizer;
    type Error = String;

    fn create(&self, provider: SummarizerProvider) -> Result<FakeSummarizer, String> {
        self.created.borrow_mut().push(provider);
        if self.broken.contains(provider.to_string().as_str()) {
            return Err("missing api key".to_string());
        }
        Ok(FakeSummarizer)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Delivery {
    recipient: String,
    label: String,
    items: Vec<NewsItem>,
}

#[derive(Default)]
struct NotifierLog {
    deliveries: Vec<Delivery>,
    errors: Vec<(String, String)>,
}

#[derive(Default)]
struct FakeNotifier {
    failing_recipients: HashSet<&'static str>,
    failing_error_recipients: HashSet<&'static str>,
    log: Rc<RefCell<NotifierLog>>,
}

impl Notifier for FakeNotifier {
    type Error = String;

    async fn deliver(
        &self,
        recipient_id: &str,
        items: &[NewsItem],
        label: &str,
    ) -> Result<(), String> {
        if items.is_empty() {
            return Ok(());
        }
        if self.failing_recipients.contains(recipient_id) {
            return Err(format!("push to {recipient_id} rejected"));
        }
        self.log.borrow_mut().deliveries.push(Delivery {
            recipient: recipient_id.to_string(),
            label: label.to_string(),
            items: items.to_vec(),
        });
        Ok(())
    }

    async fn deliver_error(&self, recipient_id: &str, message: &str) -> Result<(), String> {
        if self.failing_error_recipients.contains(recipient_id) {
            return Err("error push rejected".to_string());
        }
        self.log
            .borrow_mut()
            .errors
            .push((recipient_id.to_string(), message.to_string()));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

const TODAY: &str = "2025-01-15T10:00:00+09:00";
const YESTERDAY: &str = "2025-01-14T10:00:00+09:00";

fn window() -> DayWindow {
    let now = DateTime::parse_from_rfc3339("2025-01-15T12:00:00+09:00")
        .unwrap()
        .with_timezone(&Utc);
    DayWindow::containing(now, FixedOffset::east_opt(9 * 3600).unwrap())
}

fn item(url: &str, title: &str, published: &str) -> NewsItem {
    let ts = DateTime::parse_from_rfc3339(published).unwrap();
    NewsItem::new(title, url, ts, "")
}

fn target(name: &str, recipient: &str, keywords: &[&str]) -> KeywordTarget {
    KeywordTarget {
        name: name.to_string(),
        recipient_id: recipient.to_string(),
        keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        summarizer: SummarizerProvider::Ollama,
    }
}

fn urls(items: &[NewsItem]) -> Vec<&str> {
    items.iter().map(|i| i.url.as_str()).collect()
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn same_day_items_are_ranked_summarized_delivered_and_committed() {
    let feed = FakeFeed::default()
        .with(
            "AI",
            vec![
                item("https://n/b", "Python only, unsummarizable", TODAY),
                item("https://n/c", "AI and Python from yesterday", YESTERDAY),
            ],
        )
        .with("Python", vec![item("https://n/a", "AI meets Python", TODAY)]);
    let notifier = FakeNotifier::default();
    let log = Rc::clone(&notifier.log);
    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("notified_urls.json");

    let mut orchestrator = TargetOrchestrator::new(
        feed,
        FakeFactory::default(),
        notifier,
        NotifiedCache::load(&cache_path),
        window(),
    );
    let report = orchestrator
        .run(&[target("tech", "U1", &["AI", "Python"])])
        .await;

    assert_eq!(report.targets[0].outcome, TargetOutcome::Committed { delivered: 2 });

    let log = log.borrow();
    assert_eq!(log.deliveries.len(), 1);
    let delivery = &log.deliveries[0];
    assert_eq!(delivery.recipient, "U1");
    assert_eq!(delivery.label, "tech");
    assert_eq!(urls(&delivery.items), vec!["https://n/a", "https://n/b"]);
    assert_eq!(delivery.items[0].relevance_score, Some(1.0));
    assert_eq!(delivery.items[1].relevance_score, Some(0.5));
    assert_eq!(
        delivery.items[0].summary.as_deref(),
        Some("summary: AI meets Python")
    );
    assert_eq!(delivery.items[1].summary, None);
    assert!(log.errors.is_empty());

    let reloaded = NotifiedCache::load(&cache_path);
    assert_eq!(reloaded.len(), 2);
    assert!(reloaded.is_notified("https://n/a"));
    assert!(reloaded.is_notified("https://n/b"));
    assert!(!reloaded.is_notified("https://n/c"));
}

#[tokio::test]
async fn delivery_failure_reports_error_and_does_not_commit() {
    let feed = FakeFeed::default()
        .with("AI", vec![item("https://n/x", "AI for X", TODAY)])
        .with("Rust", vec![item("https://n/y", "Rust for Y", TODAY)]);
    let notifier = FakeNotifier {
        failing_recipients: HashSet::from(["UX"]),
        ..FakeNotifier::default()
    };
    let log = Rc::clone(&notifier.log);
    let dir = tempfile::tempdir().unwrap();

    let mut orchestrator = TargetOrchestrator::new(
        feed,
        FakeFactory::default(),
        notifier,
        NotifiedCache::load(dir.path().join("cache.json")),
        window(),
    );
    let report = orchestrator
        .run(&[target("x", "UX", &["AI"]), target("y", "UY", &["Rust"])])
        .await;

    match &report.targets[0].outcome {
        TargetOutcome::Failed {
            stage,
            error,
            error_notified,
        } => {
            assert_eq!(*stage, Stage::Notifying);
            assert!(error.contains("push to UX rejected"));
            assert!(error_notified);
        }
        other => panic!("expected Failed, got {other:?}"),
    }
    assert_eq!(report.targets[1].outcome, TargetOutcome::Committed { delivered: 1 });

    let log = log.borrow();
    assert_eq!(log.errors.len(), 1);
    assert_eq!(log.errors[0].0, "UX");
    assert!(log.errors[0].1.contains("'x'"));
    assert_eq!(log.deliveries.len(), 1);
    assert_eq!(log.deliveries[0].recipient, "UY");

    let cache = orchestrator.cache();
    assert!(!cache.is_notified("https://n/x"));
    assert!(cache.is_notified("https://n/y"));
}

#[tokio::test]
async fn nothing_new_is_skipped_without_notification() {
    let feed = FakeFeed::default().with("AI", vec![item("https://n/old", "AI", YESTERDAY)]);
    let notifier = FakeNotifier::default();
    let log = Rc::clone(&notifier.log);
    let factory = FakeFactory::default();
    let created = Rc::clone(&factory.created);
    let dir = tempfile::tempdir().unwrap();

    let mut orchestrator = TargetOrchestrator::new(
        feed,
        factory,
        notifier,
        NotifiedCache::load(dir.path().join("cache.json")),
        window(),
    );
    let report = orchestrator.run(&[target("t", "U1", &["AI"])]).await;

    assert_eq!(report.targets[0].outcome, TargetOutcome::Skipped);
    assert!(log.borrow().deliveries.is_empty());
    assert!(log.borrow().errors.is_empty());
    assert!(created.borrow().is_empty(), "no summarizer for a skipped target");
}

#[tokio::test]
async fn second_run_does_not_redeliver() {
    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("cache.json");
    let make_feed = || FakeFeed::default().with("AI", vec![item("https://n/1", "AI", TODAY)]);

    let mut first = TargetOrchestrator::new(
        make_feed(),
        FakeFactory::default(),
        FakeNotifier::default(),
        NotifiedCache::load(&cache_path),
        window(),
    );
    let report = first.run(&[target("t", "U1", &["AI"])]).await;
    assert_eq!(report.targets[0].outcome, TargetOutcome::Committed { delivered: 1 });

    let mut second = TargetOrchestrator::new(
        make_feed(),
        FakeFactory::default(),
        FakeNotifier::default(),
        NotifiedCache::load(&cache_path),
        window(),
    );
    let report = second.run(&[target("t", "U1", &["AI"])]).await;
    assert_eq!(report.targets[0].outcome, TargetOutcome::Skipped);
}

#[tokio::test]
async fn notified_set_is_shared_across_targets_in_one_run() {
    let feed = FakeFeed::default().with("AI", vec![item("https://n/shared", "AI", TODAY)]);
    let notifier = FakeNotifier::default();
    let log = Rc::clone(&notifier.log);
    let dir = tempfile::tempdir().unwrap();

    let mut orchestrator = TargetOrchestrator::new(
        feed,
        FakeFactory::default(),
        notifier,
        NotifiedCache::load(dir.path().join("cache.json")),
        window(),
    );
    let report = orchestrator
        .run(&[target("a", "U1", &["AI"]), target("b", "U2", &["AI"])])
        .await;

    assert_eq!(report.targets[0].outcome, TargetOutcome::Committed { delivered: 1 });
    assert_eq!(report.targets[1].outcome, TargetOutcome::Skipped);
    assert_eq!(log.borrow().deliveries.len(), 1);
}

#[tokio::test]
async fn total_feed_failure_fails_target_in_collecting() {
    let feed = FakeFeed::default().failing("AI").failing("Python");
    let notifier = FakeNotifier::default();
    let log = Rc::clone(&notifier.log);
    let dir = tempfile::tempdir().unwrap();

    let mut orchestrator = TargetOrchestrator::new(
        feed,
        FakeFactory::default(),
        notifier,
        NotifiedCache::load(dir.path().join("cache.json")),
        window(),
    );
    let report = orchestrator
        .run(&[target("t", "U1", &["AI", "Python"])])
        .await;

    assert!(matches!(
        report.targets[0].outcome,
        TargetOutcome::Failed {
            stage: Stage::Collecting,
            error_notified: true,
            ..
        }
    ));
    assert_eq!(log.borrow().errors.len(), 1);
}

#[tokio::test]
async fn partial_feed_failure_still_delivers() {
    let feed = FakeFeed::default()
        .failing("AI")
        .with("Python", vec![item("https://n/py", "Python", TODAY)]);
    let dir = tempfile::tempdir().unwrap();

    let mut orchestrator = TargetOrchestrator::new(
        feed,
        FakeFactory::default(),
        FakeNotifier::default(),
        NotifiedCache::load(dir.path().join("cache.json")),
        window(),
    );
    let report = orchestrator
        .run(&[target("t", "U1", &["AI", "Python"])])
        .await;

    assert_eq!(report.targets[0].outcome, TargetOutcome::Committed { delivered: 1 });
}

#[tokio::test]
async fn summarizer_construction_failure_fails_target_in_summarizing() {
    let feed = FakeFeed::default().with("AI", vec![item("https://n/1", "AI", TODAY)]);
    let notifier = FakeNotifier::default();
    let log = Rc::clone(&notifier.log);
    let factory = FakeFactory {
        broken: HashSet::from(["ollama"]),
        ..FakeFactory::default()
    };
    let dir = tempfile::tempdir().unwrap();

    let mut orchestrator = TargetOrchestrator::new(
        feed,
        factory,
        notifier,
        NotifiedCache::load(dir.path().join("cache.json")),
        window(),
    );
    let report = orchestrator.run(&[target("t", "U1", &["AI"])]).await;

    assert!(matches!(
        report.targets[0].outcome,
        TargetOutcome::Failed {
            stage: Stage::Summarizing,
            ..
        }
    ));
    assert!(log.borrow().deliveries.is_empty());
    assert!(orchestrator.cache().is_empty());
}

#[tokio::test]
async fn failed_error_notification_does_not_stop_the_run() {
    let feed = FakeFeed::default()
        .failing("AI")
        .with("Rust", vec![item("https://n/r", "Rust", TODAY)]);
    let notifier = FakeNotifier {
        failing_error_recipients: HashSet::from(["U1"]),
        ..FakeNotifier::default()
    };
    let dir = tempfile::tempdir().unwrap();

    let mut orchestrator = TargetOrchestrator::new(
        feed,
        FakeFactory::default(),
        notifier,
        NotifiedCache::load(dir.path().join("cache.json")),
        window(),
    );
    let report = orchestrator
        .run(&[target("a", "U1", &["AI"]), target("b", "U2", &["Rust"])])
        .await;

    assert!(matches!(
        report.targets[0].outcome,
        TargetOutcome::Failed {
            error_notified: false,
            ..
        }
    ));
    assert_eq!(report.targets[1].outcome, TargetOutcome::Committed { delivered: 1 });
    assert_eq!(report.failed_count(), 1);
    assert_eq!(report.committed_count(), 1);
}

#[tokio::test]
async fn at_most_ten_items_are_delivered() {
    let many: Vec<NewsItem> = (0..15)
        .map(|i| item(&format!("https://n/{i}"), "AI", TODAY))
        .collect();
    let feed = FakeFeed::default().with("AI", many);
    let notifier = FakeNotifier::default();
    let log = Rc::clone(&notifier.log);
    let dir = tempfile::tempdir().unwrap();

    let mut orchestrator = TargetOrchestrator::new(
        feed,
        FakeFactory::default(),
        notifier,
        NotifiedCache::load(dir.path().join("cache.json")),
        window(),
    );
    let report = orchestrator.run(&[target("t", "U1", &["AI"])]).await;

    assert_eq!(
        report.targets[0].outcome,
        TargetOutcome::Committed {
            delivered: MAX_ITEMS_PER_TARGET
        }
    );
    let log = log.borrow();
    assert_eq!(log.deliveries[0].items.len(), MAX_ITEMS_PER_TARGET);
    assert_eq!(log.deliveries[0].items[0].url, "https://n/0");
    assert_eq!(orchestrator.cache().len(), MAX_ITEMS_PER_TARGET);
    assert!(!orchestrator.cache().is_notified("https://n/10"));
}

#[tokio::test]
async fn preview_has_no_side_effects() {
    let feed = FakeFeed::default().with(
        "AI",
        vec![
            item("https://n/low", "unrelated", TODAY),
            item("https://n/high", "AI", TODAY),
        ],
    );
    let notifier = FakeNotifier::default();
    let log = Rc::clone(&notifier.log);
    let dir = tempfile::tempdir().unwrap();

    let orchestrator = TargetOrchestrator::new(
        feed,
        FakeFactory::default(),
        notifier,
        NotifiedCache::load(dir.path().join("cache.json")),
        window(),
    );
    let items = orchestrator
        .preview(&target("t", "U1", &["AI"]))
        .await
        .unwrap();

    assert_eq!(urls(&items), vec!["https://n/high", "https://n/low"]);
    assert!(items.iter().all(|i| i.summary.is_none()));
    assert!(log.borrow().deliveries.is_empty());
    assert!(orchestrator.cache().is_empty());
}
