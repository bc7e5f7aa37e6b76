use crate::constants::limits::HISTORY_MAX_ENTRIES;
use crate::types::HistoryEntry;
use std::collections::VecDeque;

/// Bounded, most-recent-first record of finalized answers, unique by question text.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    entries: VecDeque<HistoryEntry>,
    max_entries: usize,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries: HISTORY_MAX_ENTRIES,
        }
    }

    /// Capacity is held to `1..=HISTORY_MAX_ENTRIES`.
    pub fn with_max_entries(mut self, max: usize) -> Self {
        let clamped = max.clamp(1, HISTORY_MAX_ENTRIES);
        if clamped != max {
            tracing::warn!(
                requested = max,
                "History capacity out of range, using {}",
                clamped
            );
        }
        self.max_entries = clamped;
        self.trim_if_needed();
        self
    }

    /// Replace any entry with the same question, put the new one in front, drop overflow.
    pub fn add(&mut self, entry: HistoryEntry) {
        self.entries.retain(|e| e.question != entry.question);
        self.entries.push_front(entry);
        self.trim_if_needed();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in most-recent-first order.
    pub fn list(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn find(&self, question: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.question == question)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    fn trim_if_needed(&mut self) {
        self.entries.truncate(self.max_entries);
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}
