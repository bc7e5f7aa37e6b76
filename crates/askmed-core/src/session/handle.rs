use crate::error::{AskError, Result};
use tokio::sync::mpsc;

/// Requests accepted by a running session task.
#[derive(Debug, Clone)]
pub enum SessionCommand {
    Submit(String),
    SelectFollowUp(String),
    SelectHistory(usize),
    AskDirect(String),
    Cancel,
    ClearHistory,
}

/// Cloneable sender side of a spawned `QuerySession`.
///
/// Dropping every handle shuts the session task down.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<SessionCommand>,
}

impl SessionHandle {
    pub(crate) fn new(commands: mpsc::UnboundedSender<SessionCommand>) -> Self {
        Self { commands }
    }

    pub fn submit(&self, question: impl Into<String>) -> Result<()> {
        self.send(SessionCommand::Submit(question.into()))
    }

    pub fn select_follow_up(&self, question: impl Into<String>) -> Result<()> {
        self.send(SessionCommand::SelectFollowUp(question.into()))
    }

    pub fn select_history(&self, index: usize) -> Result<()> {
        self.send(SessionCommand::SelectHistory(index))
    }

    pub fn ask_direct(&self, question: impl Into<String>) -> Result<()> {
        self.send(SessionCommand::AskDirect(question.into()))
    }

    pub fn cancel(&self) -> Result<()> {
        self.send(SessionCommand::Cancel)
    }

    pub fn clear_history(&self) -> Result<()> {
        self.send(SessionCommand::ClearHistory)
    }

    pub fn send(&self, command: SessionCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| AskError::SessionClosed)
    }
}
