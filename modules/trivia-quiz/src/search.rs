use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{QuizError, Result};
use crate::source::SnippetSource;

const MAX_SNIPPETS: usize = 15;
/// Below this many primary hits, paragraphs are searched too.
const PARAGRAPH_FALLBACK_BELOW: usize = 10;
const MIN_SNIPPET_CHARS: usize = 20;

/// Raw texts from one search results page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetPage {
    /// Result descriptions.
    pub snippets: Vec<String>,
    /// Free paragraph text from the same page.
    pub paragraphs: Vec<String>,
}

/// Keep question-like texts from a results page.
///
/// A text qualifies when it is longer than 20 characters and contains a
/// `?`. Primary snippets come first; paragraphs are considered only when
/// fewer than 10 snippets qualified, and must also mention `query`. At most
/// 15 distinct texts are returned. With nothing left the result is a single
/// explanatory message.
pub fn select_trivia_snippets(query: &str, page: &SnippetPage) -> Vec<String> {
    let mut results: Vec<String> = Vec::new();

    for text in &page.snippets {
        if results.len() >= MAX_SNIPPETS {
            break;
        }
        push_question_like(&mut results, text);
    }

    if results.len() < PARAGRAPH_FALLBACK_BELOW {
        let needle = query.to_lowercase();
        for text in &page.paragraphs {
            if results.len() >= MAX_SNIPPETS {
                break;
            }
            if text.to_lowercase().contains(&needle) {
                push_question_like(&mut results, text);
            }
        }
    }

    if results.is_empty() {
        results.push(no_results_message(query));
    }
    results
}

fn push_question_like(results: &mut Vec<String>, text: &str) {
    let text = text.trim();
    if text.chars().count() > MIN_SNIPPET_CHARS
        && text.contains('?')
        && !results.iter().any(|r| r == text)
    {
        results.push(text.to_string());
    }
}

fn no_results_message(query: &str) -> String {
    format!("Could not find trivia questions for '{query}'. Try a different category.")
}

/// Search `source` for trivia about `query` and keep the question-like hits.
pub async fn search_trivia(source: &dyn SnippetSource, query: &str) -> Result<Vec<String>> {
    let search_query = format!("trivia questions about {query}");
    let page = source.fetch_snippets(&search_query).await.map_err(|e| {
        warn!(query, error = %e, "Trivia search failed");
        QuizError::UpstreamFetchFailed(e.to_string())
    })?;

    let results = select_trivia_snippets(query, &page);
    info!(query, results = results.len(), "Trivia search");
    Ok(results)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;

    fn page(snippets: &[&str], paragraphs: &[&str]) -> SnippetPage {
        SnippetPage {
            snippets: snippets.iter().map(|s| s.to_string()).collect(),
            paragraphs: paragraphs.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn keeps_long_question_like_snippets() {
        let results = select_trivia_snippets(
            "painters",
            &page(
                &[
                    "Who painted the Mona Lisa in the 1500s?",
                    "Short one?",
                    "A long statement without a question mark at all",
                ],
                &[],
            ),
        );
        assert_eq!(results, vec!["Who painted the Mona Lisa in the 1500s?"]);
    }

    #[test]
    fn duplicates_are_dropped() {
        let q = "Which planet is known as the red planet?";
        let padded = format!("  {q}  ");
        let results = select_trivia_snippets("space", &page(&[q, q, padded.as_str()], &[]));
        assert_eq!(results, vec![q]);
    }

    #[test]
    fn capped_at_fifteen() {
        let snippets: Vec<String> = (0..30)
            .map(|i| format!("Trivia question number {i} goes here?"))
            .collect();
        let refs: Vec<&str> = snippets.iter().map(String::as_str).collect();
        assert_eq!(select_trivia_snippets("x", &page(&refs, &[])).len(), 15);
    }

    #[test]
    fn paragraphs_fill_in_when_snippets_are_scarce() {
        let results = select_trivia_snippets(
            "World Capitals",
            &page(
                &["What is the capital of Australia, really?"],
                &[
                    "Quiz on world capitals: what is the capital of Peru?",
                    "What is the tallest mountain on Earth, anyway?",
                ],
            ),
        );
        assert_eq!(results.len(), 2);
        assert_eq!(results[1], "Quiz on world capitals: what is the capital of Peru?");
    }

    #[test]
    fn paragraphs_skipped_when_snippets_suffice() {
        let snippets: Vec<String> = (0..10)
            .map(|i| format!("Chemistry question number {i} here?"))
            .collect();
        let refs: Vec<&str> = snippets.iter().map(String::as_str).collect();
        let results = select_trivia_snippets(
            "chemistry",
            &page(&refs, &["A chemistry paragraph that asks why?"]),
        );
        assert_eq!(results.len(), 10);
    }

    #[test]
    fn nothing_found_yields_message() {
        let results = select_trivia_snippets("knots", &page(&["nope"], &["also nope"]));
        assert_eq!(
            results,
            vec!["Could not find trivia questions for 'knots'. Try a different category."]
        );
    }

    struct FixedSearch(SnippetPage);

    #[async_trait]
    impl SnippetSource for FixedSearch {
        async fn fetch_snippets(&self, query: &str) -> anyhow::Result<SnippetPage> {
            assert!(query.starts_with("trivia questions about "));
            Ok(self.0.clone())
        }
    }

    struct DownSearch;

    #[async_trait]
    impl SnippetSource for DownSearch {
        async fn fetch_snippets(&self, _query: &str) -> anyhow::Result<SnippetPage> {
            anyhow::bail!("connection refused")
        }
    }

    #[tokio::test]
    async fn search_filters_the_fetched_page() {
        let source = FixedSearch(page(&["Who composed the Four Seasons, and when?"], &[]));
        let results = search_trivia(&source, "composers").await.unwrap();
        assert_eq!(results, vec!["Who composed the Four Seasons, and when?"]);
    }

    #[tokio::test]
    async fn search_failure_is_upstream_error() {
        let err = search_trivia(&DownSearch, "composers").await.unwrap_err();
        assert!(matches!(err, QuizError::UpstreamFetchFailed(_)));
    }
}
