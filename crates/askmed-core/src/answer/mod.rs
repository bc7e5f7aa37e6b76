//! Answer text processing: follow-up extraction and display annotation.
//!
//! Both passes are pure and deterministic. The session runs them on the raw
//! accumulator after every chunk (partial pass) and once more on completion.

mod enhance;
mod follow_ups;

pub use enhance::enhance;
pub use follow_ups::{extract_follow_ups, FollowUpExtraction};

/// Displayable body plus the follow-up questions parsed from its tail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessedAnswer {
    pub body: String,
    pub follow_ups: Vec<String>,
}

/// Extract the follow-up block, then annotate the remaining body.
pub fn process(raw: &str) -> ProcessedAnswer {
    let FollowUpExtraction { body, questions } = extract_follow_ups(raw);
    ProcessedAnswer {
        body: enhance(&body),
        follow_ups: questions,
    }
}
