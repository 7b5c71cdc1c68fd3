use thiserror::Error;

pub type Result<T> = std::result::Result<T, QuizError>;

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("No quiz batch loaded for this session")]
    NoBatchLoaded,

    #[error("Failed to fetch questions: {0}")]
    UpstreamFetchFailed(String),
}
