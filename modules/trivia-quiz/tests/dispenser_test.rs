//! Dispenser behavior across the batch lifecycle, including upstream fetches
//! through a stubbed question source.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use trivia_common::{QuizItem, RawQuestion};
use trivia_quiz::{BatchStatus, Dispenser, PoolRequest, QuestionSource, QuizError};

fn item(id: &str) -> QuizItem {
    QuizItem {
        id: id.into(),
        question: format!("Question {id}?"),
        options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
        correct_answer: "a".into(),
        difficulty: "medium".into(),
        category: "Geography".into(),
        kind: "multiple".into(),
    }
}

fn batch(n: usize) -> Vec<QuizItem> {
    (0..n).map(|i| item(&format!("q{i}"))).collect()
}

fn raw(i: usize) -> RawQuestion {
    RawQuestion {
        question: format!("Which river is number {i}?"),
        correct_answer: "Nile".into(),
        incorrect_answers: vec!["Amazon".into(), "Danube".into(), "Volga".into()],
        category: "Geography".into(),
        difficulty: "easy".into(),
        kind: "multiple".into(),
    }
}

#[test]
fn n_draws_are_distinct_then_exhausted() {
    let dispenser = Dispenser::with_seed(11);
    dispenser.fetch_batch("alice", batch(10));

    let mut ids = HashSet::new();
    for _ in 0..10 {
        let drawn = dispenser.draw_next("alice").unwrap().into_item().unwrap();
        assert!(ids.insert(drawn.id), "id delivered twice");
    }
    assert_eq!(ids.len(), 10);

    assert!(dispenser.draw_next("alice").unwrap().is_exhausted());
    assert!(dispenser.draw_next("alice").unwrap().is_exhausted(), "stays exhausted");
}

#[test]
fn draw_without_batch_fails() {
    let dispenser = Dispenser::with_seed(0);
    assert!(matches!(
        dispenser.draw_next("nobody"),
        Err(QuizError::NoBatchLoaded)
    ));
}

#[test]
fn empty_pool_leaves_no_batch() {
    let dispenser = Dispenser::with_seed(0);
    dispenser.fetch_batch("bob", batch(3));
    assert_eq!(dispenser.fetch_batch("bob", Vec::new()), BatchStatus::Empty);
    assert!(matches!(
        dispenser.draw_next("bob"),
        Err(QuizError::NoBatchLoaded)
    ));
}

#[test]
fn refetch_after_exhaustion_starts_fresh() {
    let dispenser = Dispenser::with_seed(5);
    dispenser.fetch_batch("carol", batch(2));
    dispenser.draw_next("carol").unwrap();
    dispenser.draw_next("carol").unwrap();
    assert_eq!(dispenser.status("carol"), BatchStatus::Exhausted);

    // Same ids as before are served again: a new batch clears the seen set.
    assert_eq!(
        dispenser.fetch_batch("carol", batch(2)),
        BatchStatus::Active { remaining: 2 }
    );
    assert!(dispenser.draw_next("carol").unwrap().into_item().is_some());
}

#[test]
fn refetch_discards_unseen_items() {
    let dispenser = Dispenser::with_seed(5);
    dispenser.fetch_batch("dave", batch(5));
    dispenser.draw_next("dave").unwrap();

    dispenser.fetch_batch("dave", vec![item("only")]);
    let drawn = dispenser.draw_next("dave").unwrap().into_item().unwrap();
    assert_eq!(drawn.id, "only");
    assert!(dispenser.draw_next("dave").unwrap().is_exhausted());
}

#[test]
fn sessions_are_isolated() {
    let dispenser = Dispenser::with_seed(3);
    dispenser.fetch_batch("erin", batch(1));
    dispenser.fetch_batch("frank", batch(1));

    dispenser.draw_next("erin").unwrap();
    assert_eq!(dispenser.status("erin"), BatchStatus::Exhausted);
    assert_eq!(dispenser.status("frank"), BatchStatus::Active { remaining: 1 });
}

#[test]
fn end_session_releases_only_that_batch() {
    let dispenser = Dispenser::with_seed(4);
    dispenser.fetch_batch("kim", batch(2));
    dispenser.fetch_batch("lee", batch(2));
    dispenser.draw_next("kim").unwrap();
    dispenser.draw_next("kim").unwrap();

    dispenser.end_session("kim");
    assert_eq!(dispenser.status("kim"), BatchStatus::Empty);
    assert!(matches!(
        dispenser.draw_next("kim"),
        Err(QuizError::NoBatchLoaded)
    ));
    assert_eq!(dispenser.status("lee"), BatchStatus::Active { remaining: 2 });

    // Ending an unknown session is a no-op.
    dispenser.end_session("nobody");
    assert_eq!(dispenser.status("lee"), BatchStatus::Active { remaining: 2 });
}

#[test]
fn concurrent_draws_never_duplicate() {
    let dispenser = Arc::new(Dispenser::with_seed(21));
    dispenser.fetch_batch("shared", batch(200));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let dispenser = Arc::clone(&dispenser);
            std::thread::spawn(move || {
                let mut ids = Vec::new();
                while let Some(item) = dispenser.draw_next("shared").unwrap().into_item() {
                    ids.push(item.id);
                }
                ids
            })
        })
        .collect();

    let mut all = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(all.insert(id), "duplicate delivery");
        }
    }
    assert_eq!(all.len(), 200);
}

// --- Upstream fetches ---

struct StubSource {
    pages: usize,
    calls: AtomicUsize,
}

impl StubSource {
    fn new(pages: usize) -> Self {
        Self {
            pages,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl QuestionSource for StubSource {
    async fn fetch_page(&self, request: &PoolRequest) -> anyhow::Result<Vec<RawQuestion>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let n = (request.amount as usize).min(self.pages);
        Ok((0..n).map(raw).collect())
    }

    fn name(&self) -> &str {
        "stub"
    }
}

struct FailingSource;

#[async_trait]
impl QuestionSource for FailingSource {
    async fn fetch_page(&self, _request: &PoolRequest) -> anyhow::Result<Vec<RawQuestion>> {
        anyhow::bail!("upstream returned 503")
    }

    fn name(&self) -> &str {
        "failing"
    }
}

struct SlowSource;

#[async_trait]
impl QuestionSource for SlowSource {
    async fn fetch_page(&self, _request: &PoolRequest) -> anyhow::Result<Vec<RawQuestion>> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "slow"
    }
}

#[tokio::test]
async fn fetch_from_loads_a_shuffled_batch() {
    let dispenser = Dispenser::with_seed(1);
    let source = StubSource::new(50);

    let status = dispenser
        .fetch_from("gina", &source, &PoolRequest::new(10), Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(status, BatchStatus::Active { remaining: 10 });
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);

    let drawn = dispenser.draw_next("gina").unwrap().into_item().unwrap();
    assert_eq!(drawn.options.len(), 4);
    assert!(drawn.options.contains(&drawn.correct_answer));
    assert!(!drawn.id.is_empty());
}

#[tokio::test]
async fn failed_fetch_keeps_current_batch() {
    let dispenser = Dispenser::with_seed(1);
    dispenser.fetch_batch("hank", batch(3));

    let err = dispenser
        .fetch_from("hank", &FailingSource, &PoolRequest::new(10), Duration::from_secs(5))
        .await
        .unwrap_err();
    assert!(matches!(err, QuizError::UpstreamFetchFailed(ref msg) if msg.contains("503")));
    assert_eq!(dispenser.status("hank"), BatchStatus::Active { remaining: 3 });
}

#[tokio::test(start_paused = true)]
async fn slow_fetch_times_out() {
    let dispenser = Dispenser::with_seed(1);

    let err = dispenser
        .fetch_from("ivy", &SlowSource, &PoolRequest::new(10), Duration::from_secs(2))
        .await
        .unwrap_err();
    assert!(matches!(err, QuizError::UpstreamFetchFailed(_)));
    assert_eq!(dispenser.status("ivy"), BatchStatus::Empty);
}

#[tokio::test]
async fn upstream_with_no_results_leaves_session_empty() {
    let dispenser = Dispenser::with_seed(1);
    let status = dispenser
        .fetch_from("jo", &StubSource::new(0), &PoolRequest::new(10), Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(status, BatchStatus::Empty);
    assert!(matches!(
        dispenser.draw_next("jo"),
        Err(QuizError::NoBatchLoaded)
    ));
}
