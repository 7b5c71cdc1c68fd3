use thiserror::Error;

pub type Result<T> = std::result::Result<T, OpenTdbError>;

#[derive(Debug, Error)]
pub enum OpenTdbError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Open Trivia DB returned response code {0}")]
    ResponseCode(u8),

    #[error("Failed to decode question field: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for OpenTdbError {
    fn from(err: reqwest::Error) -> Self {
        OpenTdbError::Network(err.to_string())
    }
}
