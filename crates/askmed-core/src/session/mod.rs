//! Query orchestration.
//!
//! `QuerySession` owns the active query: it drives the answer stream, falls
//! back to the single-shot call when the stream fails before any content,
//! commits finished answers to history, and publishes a snapshot after every
//! state change. All mutation happens on whichever task owns the session.

mod handle;
mod snapshot;

pub use handle::{SessionCommand, SessionHandle};
pub use snapshot::{SessionPhase, SessionSnapshot, SessionUpdate};

use crate::answer;
use crate::constants::messages::FALLBACK_FAILURE;
use crate::error::{AskError, Result};
use crate::fallback::{FallbackAnswer, FallbackCaller};
use crate::history::HistoryStore;
use crate::stream::{ChannelEvent, StreamChannel, StreamTransport};
use crate::types::{AnswerResult, Query};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

type FallbackOutcome = (u64, Result<FallbackAnswer>);

enum SessionEvent {
    Channel(ChannelEvent),
    Fallback {
        generation: u64,
        outcome: Result<FallbackAnswer>,
    },
}

pub struct QuerySession {
    channel: StreamChannel,
    fallback: Arc<dyn FallbackCaller>,
    history: HistoryStore,
    updates: mpsc::UnboundedSender<SessionUpdate>,
    accumulator: String,
    query: Option<Query>,
    snapshot: SessionSnapshot,
    // Bumped on every submit and cancel; fallback results from older generations are dropped.
    generation: u64,
    fallback_tx: mpsc::UnboundedSender<FallbackOutcome>,
    fallback_rx: mpsc::UnboundedReceiver<FallbackOutcome>,
    pending_fallback: Option<JoinHandle<()>>,
}

impl QuerySession {
    pub fn new(
        transport: Arc<dyn StreamTransport>,
        fallback: Arc<dyn FallbackCaller>,
        updates: mpsc::UnboundedSender<SessionUpdate>,
    ) -> Self {
        let (fallback_tx, fallback_rx) = mpsc::unbounded_channel();
        Self {
            channel: StreamChannel::new(transport),
            fallback,
            history: HistoryStore::new(),
            updates,
            accumulator: String::new(),
            query: None,
            snapshot: SessionSnapshot::idle(),
            generation: 0,
            fallback_tx,
            fallback_rx,
            pending_fallback: None,
        }
    }

    pub fn with_history(mut self, history: HistoryStore) -> Self {
        self.history = history;
        self
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn snapshot(&self) -> &SessionSnapshot {
        &self.snapshot
    }

    pub fn query(&self) -> Option<&Query> {
        self.query.as_ref()
    }

    /// Raw text received on the current channel.
    pub fn accumulator(&self) -> &str {
        &self.accumulator
    }

    /// True when no channel is open and no fallback call is pending.
    pub fn is_settled(&self) -> bool {
        !self.channel.is_open() && self.pending_fallback.is_none()
    }

    /// Ask `question` over the answer stream, superseding any in-flight query.
    ///
    /// Blank input is rejected without touching any state.
    pub fn submit(&mut self, question: &str) -> Result<()> {
        let question = validate(question)?;
        self.begin(&question, SessionPhase::Connecting);
        self.channel.open(&question);
        Ok(())
    }

    pub fn select_follow_up(&mut self, question: &str) -> Result<()> {
        self.submit(question)
    }

    /// Ask the question of the history entry at `index` again.
    pub fn select_history(&mut self, index: usize) -> Result<()> {
        let question = self
            .history
            .get(index)
            .map(|entry| entry.question.clone())
            .ok_or_else(|| AskError::Validation(format!("no history entry at {index}")))?;
        self.submit(&question)
    }

    /// Skip the stream and use the single-shot call.
    pub fn ask_direct(&mut self, question: &str) -> Result<()> {
        let question = validate(question)?;
        self.begin(&question, SessionPhase::FallingBack);
        self.start_fallback(question);
        Ok(())
    }

    /// Drop the active query and return to idle. History is kept.
    pub fn cancel(&mut self) {
        self.channel.close();
        if let Some(task) = self.pending_fallback.take() {
            task.abort();
        }
        self.generation += 1;
        self.accumulator.clear();
        self.query = None;
        self.snapshot = SessionSnapshot::idle();
        self.publish_snapshot();
    }

    pub fn clear(&mut self) {
        self.cancel();
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.publish_history();
    }

    pub fn apply(&mut self, command: SessionCommand) {
        let outcome = match command {
            SessionCommand::Submit(question) => self.submit(&question),
            SessionCommand::SelectFollowUp(question) => self.select_follow_up(&question),
            SessionCommand::SelectHistory(index) => self.select_history(index),
            SessionCommand::AskDirect(question) => self.ask_direct(&question),
            SessionCommand::Cancel => {
                self.cancel();
                Ok(())
            }
            SessionCommand::ClearHistory => {
                self.clear_history();
                Ok(())
            }
        };
        if let Err(e) = outcome {
            tracing::debug!("Ignoring command: {}", e);
        }
    }

    /// Handle the next stream or fallback event. Returns `false` once settled.
    pub async fn step(&mut self) -> bool {
        match self.next_event().await {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    /// Process events until the current query reaches a terminal state.
    pub async fn drive(&mut self) {
        while self.step().await {}
    }

    /// Move the session onto its own task and return a handle for sending commands.
    pub fn spawn(self) -> (SessionHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(self.run(rx));
        (SessionHandle::new(tx), task)
    }

    /// Serve commands and stream events until every handle is dropped.
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<SessionCommand>) {
        loop {
            let busy = !self.is_settled();
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.apply(command),
                    None => break,
                },
                Some(event) = self.next_event(), if busy => self.handle_event(event),
            }
        }
        self.channel.close();
        if let Some(task) = self.pending_fallback.take() {
            task.abort();
        }
        tracing::debug!("Query session stopped");
    }

    async fn next_event(&mut self) -> Option<SessionEvent> {
        let channel_open = self.channel.is_open();
        let fallback_pending = self.pending_fallback.is_some();

        tokio::select! {
            Some(event) = self.channel.next_event(), if channel_open => {
                Some(SessionEvent::Channel(event))
            }
            Some((generation, outcome)) = self.fallback_rx.recv(), if fallback_pending => {
                Some(SessionEvent::Fallback { generation, outcome })
            }
            else => None,
        }
    }

    fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Channel(ChannelEvent::Chunk(text)) => self.on_chunk(&text),
            SessionEvent::Channel(ChannelEvent::Complete) => self.on_complete(),
            SessionEvent::Channel(ChannelEvent::Error(reason)) => self.on_stream_error(&reason),
            SessionEvent::Fallback {
                generation,
                outcome,
            } => {
                if generation != self.generation {
                    tracing::debug!(generation, "Discarding stale fallback answer");
                    return;
                }
                self.pending_fallback = None;
                match outcome {
                    Ok(answer) => self.on_fallback_answer(answer),
                    Err(e) => self.on_fallback_failure(&e),
                }
            }
        }
    }

    fn begin(&mut self, question: &str, phase: SessionPhase) {
        if !self.is_settled() {
            self.cancel();
        }
        self.generation += 1;
        self.accumulator.clear();
        self.query = Some(Query::new(question));
        self.snapshot = SessionSnapshot::placeholder(question, phase);
        self.publish_snapshot();
    }

    fn current_question(&self) -> Option<String> {
        self.query.as_ref().map(|q| q.text.clone())
    }

    fn on_chunk(&mut self, text: &str) {
        let Some(question) = self.current_question() else {
            return;
        };
        self.accumulator.push_str(text);

        // Partial pass; never committed.
        let processed = answer::process(&self.accumulator);
        self.snapshot = SessionSnapshot {
            phase: SessionPhase::Streaming,
            result: Some(AnswerResult::new(question, processed.body).streaming(true)),
            follow_ups: processed.follow_ups,
            loading: false,
            streaming: true,
        };
        self.publish_snapshot();
    }

    fn on_complete(&mut self) {
        let Some(question) = self.current_question() else {
            return;
        };
        let processed = answer::process(&self.accumulator);
        let result = AnswerResult::new(question, processed.body);

        self.snapshot = SessionSnapshot {
            phase: SessionPhase::Completed,
            result: Some(result.clone()),
            follow_ups: processed.follow_ups,
            loading: false,
            streaming: false,
        };
        self.publish_snapshot();

        self.history.add(result);
        self.publish_history();
        self.channel.close();
        tracing::debug!(bytes = self.accumulator.len(), "Answer stream completed");
    }

    fn on_stream_error(&mut self, reason: &str) {
        self.channel.close();
        let Some(question) = self.current_question() else {
            return;
        };

        if self.accumulator.is_empty() {
            tracing::warn!("Answer stream failed before any content, falling back: {}", reason);
            self.snapshot.phase = SessionPhase::FallingBack;
            self.snapshot.loading = true;
            self.snapshot.streaming = false;
            self.publish_snapshot();
            self.start_fallback(question);
            return;
        }

        // The partial answer stays on screen as-is and is not recorded.
        tracing::warn!(
            bytes = self.accumulator.len(),
            "Answer stream interrupted: {}",
            reason
        );
        self.snapshot.phase = SessionPhase::Errored;
        self.snapshot.loading = false;
        self.snapshot.streaming = false;
        if let Some(result) = self.snapshot.result.as_mut() {
            result.streaming = false;
        }
        self.publish_snapshot();
    }

    fn start_fallback(&mut self, question: String) {
        let caller = self.fallback.clone();
        let tx = self.fallback_tx.clone();
        let generation = self.generation;

        self.pending_fallback = Some(tokio::spawn(async move {
            let outcome = caller.request(&question).await;
            let _ = tx.send((generation, outcome));
        }));
    }

    fn on_fallback_answer(&mut self, fallback: FallbackAnswer) {
        let Some(question) = self.current_question() else {
            return;
        };
        let processed = answer::process(&fallback.answer);
        let result = AnswerResult::new(question, processed.body).cached(fallback.cached);

        self.snapshot = SessionSnapshot {
            phase: SessionPhase::Completed,
            result: Some(result.clone()),
            follow_ups: processed.follow_ups,
            loading: false,
            streaming: false,
        };
        self.publish_snapshot();

        self.history.add(result);
        self.publish_history();
    }

    fn on_fallback_failure(&mut self, error: &AskError) {
        let Some(question) = self.current_question() else {
            return;
        };
        tracing::warn!("Fallback request failed: {}", error);

        self.snapshot = SessionSnapshot {
            phase: SessionPhase::Failed,
            result: Some(AnswerResult::new(question, FALLBACK_FAILURE).failed()),
            follow_ups: Vec::new(),
            loading: false,
            streaming: false,
        };
        self.publish_snapshot();
    }

    fn publish_snapshot(&self) {
        let _ = self
            .updates
            .send(SessionUpdate::Snapshot(self.snapshot.clone()));
    }

    fn publish_history(&self) {
        let _ = self.updates.send(SessionUpdate::History(self.history.list()));
    }
}

fn validate(question: &str) -> Result<String> {
    let question = question.trim();
    if question.is_empty() {
        return Err(AskError::Validation("question is blank".to_string()));
    }
    Ok(question.to_string())
}
