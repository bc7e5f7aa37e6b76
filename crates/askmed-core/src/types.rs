use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A submitted question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub text: String,
    pub submitted_at: DateTime<Utc>,
}

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            submitted_at: Utc::now(),
        }
    }
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

/// The display-ready outcome of a query at one point in time.
///
/// `answer` is always post-processed text and changes while chunks arrive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResult {
    pub question: String,
    pub answer: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub cached: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub error: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub streaming: bool,
}

impl AnswerResult {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            timestamp: Utc::now(),
            cached: false,
            error: false,
            streaming: false,
        }
    }

    pub fn streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    pub fn cached(mut self, cached: bool) -> Self {
        self.cached = cached;
        self
    }

    pub fn failed(mut self) -> Self {
        self.error = true;
        self
    }
}

/// A finalized result kept for later recall.
pub type HistoryEntry = AnswerResult;
