use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{OpenTdbError, Result};

/// Open Trivia DB response codes.
pub const RESPONSE_OK: u8 = 0;
/// Not enough questions for the query.
pub const RESPONSE_NO_RESULTS: u8 = 1;

/// Body of `GET /api.php`. With `encode=base64` every string field of every
/// result is base64.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    pub response_code: u8,
    #[serde(default)]
    pub results: Vec<EncodedQuestion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EncodedQuestion {
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub difficulty: String,
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

/// A question with every field decoded to plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub difficulty: String,
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

impl EncodedQuestion {
    pub fn decode(&self) -> Result<Question> {
        Ok(Question {
            category: decode_field(&self.category)?,
            kind: decode_field(&self.kind)?,
            difficulty: decode_field(&self.difficulty)?,
            question: decode_field(&self.question)?,
            correct_answer: decode_field(&self.correct_answer)?,
            incorrect_answers: self
                .incorrect_answers
                .iter()
                .map(|a| decode_field(a))
                .collect::<Result<_>>()?,
        })
    }
}

impl ApiResponse {
    /// Decoded questions, or an error for any response code other than
    /// success or "no results" (which yields an empty page).
    pub fn into_questions(self) -> Result<Vec<Question>> {
        match self.response_code {
            RESPONSE_OK => self.results.iter().map(EncodedQuestion::decode).collect(),
            RESPONSE_NO_RESULTS => Ok(Vec::new()),
            code => Err(OpenTdbError::ResponseCode(code)),
        }
    }
}

fn decode_field(value: &str) -> Result<String> {
    let bytes = STANDARD
        .decode(value)
        .map_err(|e| OpenTdbError::Decode(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| OpenTdbError::Decode(e.to_string()))
}
