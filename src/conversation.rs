//! Conversation history store and dialogue session
//!
//! The store keeps the full transcript unbounded for display; only
//! `recent_window` applies the retention bound used for model grounding.
//! `append` is the only mutator and always adds to the end.

use crate::types::ConversationTurn;
use serde::{Deserialize, Serialize};

/// Default number of most-recent turns entering the grounded prompt
pub const DEFAULT_RETENTION_WINDOW: usize = 6;

/// Ordered, append-only conversation history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationStore {
    turns: Vec<ConversationTurn>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self { turns: Vec::new() }
    }

    /// Append a turn to the end of the history
    pub fn append(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    /// The most recent `max_turns` turns, oldest first, without mutating
    /// the store. Appending beyond the bound never drops earlier turns from
    /// the underlying history, only from this windowed view.
    pub fn recent_window(&self, max_turns: usize) -> &[ConversationTurn] {
        let start = self.turns.len().saturating_sub(max_turns);
        &self.turns[start..]
    }

    /// Full transcript for display purposes
    pub fn all(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// Total number of stored turns
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Check if the history is empty
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Explicit per-conversation state passed into and returned from each
/// orchestrator call. Replaces ambient session globals: a caller owns the
/// session and hands it to `handle_query` by `&mut`, which also gives the
/// single-writer discipline the store needs under concurrent callers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DialogueSession {
    pub store: ConversationStore,
}

impl DialogueSession {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    fn filled(n: usize) -> ConversationStore {
        let mut store = ConversationStore::new();
        for i in 0..n {
            if i % 2 == 0 {
                store.append(ConversationTurn::user(format!("q{i}")));
            } else {
                store.append(ConversationTurn::assistant(format!("a{i}")));
            }
        }
        store
    }

    #[test]
    fn test_append_preserves_order() {
        let store = filled(4);
        let all = store.all();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].text, "q0");
        assert_eq!(all[3].text, "a3");
    }

    #[test]
    fn test_recent_window_bounds_and_order() {
        let store = filled(10);
        let window = store.recent_window(6);
        assert_eq!(window.len(), 6);
        // Oldest first within the window
        assert_eq!(window[0].text, "q4");
        assert_eq!(window[5].text, "a9");
        assert_eq!(window[0].role, Role::User);
    }

    #[test]
    fn test_window_never_exceeds_bound() {
        for n in 0..12 {
            let store = filled(n);
            assert!(store.recent_window(6).len() <= 6);
            assert_eq!(store.recent_window(6).len(), n.min(6));
        }
    }

    #[test]
    fn test_window_does_not_drop_underlying_history() {
        let store = filled(20);
        let _ = store.recent_window(6);
        assert_eq!(store.len(), 20);
        assert_eq!(store.all().len(), 20);
    }

    #[test]
    fn test_window_larger_than_history() {
        let store = filled(3);
        assert_eq!(store.recent_window(100).len(), 3);
    }

    #[test]
    fn test_zero_window() {
        let store = filled(5);
        assert!(store.recent_window(0).is_empty());
    }
}
