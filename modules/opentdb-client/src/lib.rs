pub mod error;
pub mod types;

pub use error::{OpenTdbError, Result};
pub use types::{ApiResponse, EncodedQuestion, Question};

use std::time::Duration;

use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://opentdb.com";

pub struct OpenTdbClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenTdbClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one page of questions. `difficulty` and `kind` are passed through
    /// only when set; the category is the numeric Open Trivia DB id.
    pub async fn questions(
        &self,
        amount: u32,
        category: Option<u32>,
        difficulty: Option<&str>,
        kind: Option<&str>,
    ) -> Result<Vec<Question>> {
        let endpoint = format!("{}/api.php", self.base_url);

        let mut query: Vec<(&str, String)> = vec![
            ("amount", amount.to_string()),
            ("encode", "base64".to_string()),
        ];
        if let Some(category) = category {
            query.push(("category", category.to_string()));
        }
        if let Some(difficulty) = difficulty {
            query.push(("difficulty", difficulty.to_string()));
        }
        if let Some(kind) = kind {
            query.push(("type", kind.to_string()));
        }

        let resp = self.client.get(&endpoint).query(&query).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(OpenTdbError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ApiResponse = resp.json().await?;
        debug!(
            response_code = body.response_code,
            results = body.results.len(),
            "Open Trivia DB page"
        );
        body.into_questions()
    }
}
