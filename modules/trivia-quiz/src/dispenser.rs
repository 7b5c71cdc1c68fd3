use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{info, warn};
use trivia_common::QuizItem;

use crate::error::{QuizError, Result};
use crate::pool::BatchPool;
use crate::question::build_batch;
use crate::source::{PoolRequest, QuestionSource};

/// Outcome of a draw against a loaded batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Draw {
    Item(QuizItem),
    Exhausted { exhausted: bool },
}

impl Draw {
    fn exhausted() -> Self {
        Draw::Exhausted { exhausted: true }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Draw::Exhausted { .. })
    }

    pub fn into_item(self) -> Option<QuizItem> {
        match self {
            Draw::Item(item) => Some(item),
            Draw::Exhausted { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BatchStatus {
    Empty,
    Active { remaining: usize },
    Exhausted,
}

struct Inner {
    sessions: HashMap<String, BatchPool>,
    rng: StdRng,
}

/// Quiz batches keyed by caller session; each session owns at most one.
/// Every operation takes the one lock, so two draws for the same session
/// never see the same unseen set.
///
/// A session's batch lives until it is replaced or `end_session` drops it.
/// Exhausted batches are kept so `draw_next` keeps reporting exhaustion;
/// expiring idle sessions is up to the caller.
pub struct Dispenser {
    inner: Mutex<Inner>,
}

impl Default for Dispenser {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispenser {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Deterministic draw order and option shuffles.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            inner: Mutex::new(Inner {
                sessions: HashMap::new(),
                rng,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Replace the session's batch with `items`, discarding anything unseen.
    /// An empty pool leaves the session with no batch.
    pub fn fetch_batch(&self, session: &str, items: Vec<QuizItem>) -> BatchStatus {
        let mut inner = self.lock();
        load(&mut inner, session, items)
    }

    /// Next unseen item, chosen uniformly at random.
    pub fn draw_next(&self, session: &str) -> Result<Draw> {
        let mut inner = self.lock();
        let Inner { sessions, rng } = &mut *inner;
        let pool = sessions.get_mut(session).ok_or(QuizError::NoBatchLoaded)?;

        Ok(match pool.draw(rng) {
            Some(item) => Draw::Item(item),
            None => Draw::exhausted(),
        })
    }

    pub fn status(&self, session: &str) -> BatchStatus {
        let inner = self.lock();
        match inner.sessions.get(session) {
            None => BatchStatus::Empty,
            Some(pool) if pool.is_exhausted() => BatchStatus::Exhausted,
            Some(pool) => BatchStatus::Active {
                remaining: pool.remaining(),
            },
        }
    }

    /// Drop the session's batch and free its slot. Later draws report
    /// `NoBatchLoaded` until a new batch is fetched.
    pub fn end_session(&self, session: &str) {
        self.lock().sessions.remove(session);
    }

    /// Fetch a fresh pool from `source` and load it. The fetch runs without
    /// the lock held; on failure or timeout the current batch is untouched.
    pub async fn fetch_from(
        &self,
        session: &str,
        source: &dyn QuestionSource,
        request: &PoolRequest,
        timeout: Duration,
    ) -> Result<BatchStatus> {
        let raws = match tokio::time::timeout(timeout, source.fetch_page(request)).await {
            Ok(Ok(raws)) => raws,
            Ok(Err(e)) => {
                warn!(source = source.name(), error = %e, "Question fetch failed");
                return Err(QuizError::UpstreamFetchFailed(e.to_string()));
            }
            Err(_) => {
                warn!(source = source.name(), timeout_secs = timeout.as_secs(), "Question fetch timed out");
                return Err(QuizError::UpstreamFetchFailed(format!(
                    "{} timed out after {}s",
                    source.name(),
                    timeout.as_secs()
                )));
            }
        };

        let mut inner = self.lock();
        let items = build_batch(raws, &mut inner.rng);
        Ok(load(&mut inner, session, items))
    }
}

fn load(inner: &mut Inner, session: &str, items: Vec<QuizItem>) -> BatchStatus {
    let pool = BatchPool::new(items);
    if pool.is_empty() {
        inner.sessions.remove(session);
        info!(session, "Loaded empty quiz batch");
        return BatchStatus::Empty;
    }

    let remaining = pool.remaining();
    inner.sessions.insert(session.to_string(), pool);
    info!(session, items = remaining, "Loaded quiz batch");
    BatchStatus::Active { remaining }
}
