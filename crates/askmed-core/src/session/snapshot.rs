use crate::types::{AnswerResult, HistoryEntry};
use serde::Serialize;

/// Where the active query is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    Connecting,
    Streaming,
    /// The single-shot call is in flight.
    FallingBack,
    Completed,
    /// The stream broke after content arrived; the partial answer stays visible.
    Errored,
    /// Both stream and fallback failed; the result carries `error = true`.
    Failed,
}

impl SessionPhase {
    /// No further snapshots follow for this query until the next submit.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Errored | Self::Failed)
    }
}

/// Everything the front-end needs to draw the current answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub result: Option<AnswerResult>,
    pub follow_ups: Vec<String>,
    pub loading: bool,
    pub streaming: bool,
}

impl SessionSnapshot {
    pub fn idle() -> Self {
        Self {
            phase: SessionPhase::Idle,
            result: None,
            follow_ups: Vec::new(),
            loading: false,
            streaming: false,
        }
    }

    /// The empty answer shown between submit and the first content.
    pub fn placeholder(question: &str, phase: SessionPhase) -> Self {
        Self {
            phase,
            result: Some(AnswerResult::new(question, "")),
            follow_ups: Vec::new(),
            loading: true,
            streaming: false,
        }
    }

    pub fn answer(&self) -> Option<&str> {
        self.result.as_ref().map(|r| r.answer.as_str())
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self::idle()
    }
}

/// Published to the front-end after every state change.
#[derive(Debug, Clone)]
pub enum SessionUpdate {
    Snapshot(SessionSnapshot),
    History(Vec<HistoryEntry>),
}
