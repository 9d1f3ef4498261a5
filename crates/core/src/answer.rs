//! Question/answer exchanges and their wire shape

use crate::Triple;
use serde::{Deserialize, Serialize};

/// Where an answer came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    /// Genuine language-model output
    Real,
    /// Templated text because no model is configured
    Mock,
    /// Templated text because the model call failed
    Error,
}

impl AnswerSource {
    /// Human-readable provenance label sent to clients
    pub fn label(&self) -> &'static str {
        match self {
            AnswerSource::Real => "Real OpenAI Response",
            AnswerSource::Mock => "Mock Data (OpenAI API key not configured)",
            AnswerSource::Error => "Error - Using Mock Data",
        }
    }
}

/// One answered question together with the context used for it
#[derive(Debug, Clone)]
pub struct Exchange {
    pub question: String,
    /// Retrieved chunks joined by newlines
    pub text_context: String,
    pub graph_context: Vec<Triple>,
    pub answer: String,
    pub source: AnswerSource,
    pub error: Option<String>,
    pub note: Option<String>,
}

impl Exchange {
    /// Project the exchange onto the response body of `POST /ask`
    pub fn to_response(&self) -> AskResponse {
        AskResponse {
            question: self.question.clone(),
            answer: self.answer.clone(),
            sources: self.source.label().to_string(),
            error: self.error.clone(),
            note: self.note.clone(),
        }
    }
}

/// Response body of `POST /ask`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskResponse {
    pub question: String,
    pub answer: String,
    pub sources: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
