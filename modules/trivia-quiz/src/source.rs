use anyhow::Result;
use async_trait::async_trait;
use opentdb_client::{OpenTdbClient, Question};
use serde::{Deserialize, Serialize};
use trivia_common::{Config, RawQuestion};

use crate::search::SnippetPage;

/// What to ask the upstream pool for. `None` leaves a filter unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolRequest {
    pub amount: u32,
    pub category: Option<u32>,
    pub difficulty: Option<String>,
    pub kind: Option<String>,
}

impl PoolRequest {
    pub fn new(amount: u32) -> Self {
        Self {
            amount,
            category: None,
            difficulty: None,
            kind: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.quiz_batch_size).category(config.quiz_category)
    }

    pub fn category(mut self, category: u32) -> Self {
        self.category = Some(category);
        self
    }

    pub fn difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = Some(difficulty.into());
        self
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

// --- QuestionSource trait ---

/// Upstream pool of quiz questions.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn fetch_page(&self, request: &PoolRequest) -> Result<Vec<RawQuestion>>;
    fn name(&self) -> &str;
}

#[async_trait]
impl QuestionSource for OpenTdbClient {
    async fn fetch_page(&self, request: &PoolRequest) -> Result<Vec<RawQuestion>> {
        let questions = self
            .questions(
                request.amount,
                request.category,
                request.difficulty.as_deref(),
                request.kind.as_deref(),
            )
            .await?;
        Ok(questions.into_iter().map(raw_question).collect())
    }

    fn name(&self) -> &str {
        "opentdb"
    }
}

/// Open Trivia DB client for the configured base URL and fetch timeout.
pub fn opentdb_source(config: &Config) -> opentdb_client::Result<OpenTdbClient> {
    OpenTdbClient::new(&config.opentdb_base_url, config.fetch_timeout)
}

fn raw_question(q: Question) -> RawQuestion {
    RawQuestion {
        question: q.question,
        correct_answer: q.correct_answer,
        incorrect_answers: q.incorrect_answers,
        category: q.category,
        difficulty: q.difficulty,
        kind: q.kind,
    }
}

// --- SnippetSource trait ---

/// Web search collaborator for free-text trivia lookups. Implementations
/// return the raw result texts; filtering happens in `select_trivia_snippets`.
#[async_trait]
pub trait SnippetSource: Send + Sync {
    async fn fetch_snippets(&self, query: &str) -> Result<SnippetPage>;
}
