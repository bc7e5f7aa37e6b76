pub mod answer;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod fallback;
pub mod history;
pub mod session;
pub mod stream;
pub mod types;

// Re-export key types
pub use client::{AskClient, HealthStatus, ServerHistoryItem};
pub use config::Settings;
pub use error::AskError;
pub use fallback::{FallbackAnswer, FallbackCaller};
pub use history::HistoryStore;
pub use session::{
    QuerySession, SessionCommand, SessionHandle, SessionPhase, SessionSnapshot, SessionUpdate,
};
pub use stream::{ChannelEvent, PayloadStream, StreamChannel, StreamTransport};
pub use types::{AnswerResult, HistoryEntry, Query};
