//! Conversation history management.
//!
//! Per-user log of (input, output) turns with turn-based trimming and LRU
//! eviction of whole users, so neither dimension grows without bound.

use indexmap::IndexMap;
use tokio::sync::RwLock;

/// Default maximum number of users to track before LRU eviction.
const DEFAULT_MAX_USERS: usize = 10_000;

/// One exchange: what the user wrote and what they were shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    /// User text as received.
    pub input: String,
    /// Reply text as sent.
    pub output: String,
}

impl Turn {
    /// Create a turn.
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }
}

/// Per-user conversation history with LRU eviction.
///
/// Keeps at most `max_turns` turns per user and at most `max_users` users;
/// the least recently touched user is dropped first.
///
/// # Example
///
/// ```rust
/// use brain_core::ConversationHistory;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let history = ConversationHistory::new(5);
///
///     history.add_turn("42", "цель 75", "План готов").await;
///     history.add_turn("42", "да", "План применён").await;
///
///     let turns = history.turns("42").await;
///     assert_eq!(turns.len(), 2);
/// }
/// ```
#[derive(Debug)]
pub struct ConversationHistory {
    /// Insertion order doubles as recency order.
    histories: RwLock<IndexMap<String, Vec<Turn>>>,
    max_turns: usize,
    max_users: usize,
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new(10)
    }
}

impl ConversationHistory {
    /// Create a history keeping `max_turns` turns per user.
    pub fn new(max_turns: usize) -> Self {
        Self::with_limits(max_turns, DEFAULT_MAX_USERS)
    }

    /// Create a history with custom limits.
    ///
    /// # Arguments
    ///
    /// * `max_turns` - Maximum number of turns kept per user
    /// * `max_users` - Maximum number of users tracked before LRU eviction
    pub fn with_limits(max_turns: usize, max_users: usize) -> Self {
        Self {
            histories: RwLock::new(IndexMap::new()),
            max_turns,
            max_users: max_users.max(1),
        }
    }

    /// Get the turns recorded for a user, oldest first.
    ///
    /// This marks the user as recently used.
    pub async fn turns(&self, user: &str) -> Vec<Turn> {
        let mut histories = self.histories.write().await;

        match histories.shift_remove(user) {
            Some(entry) => {
                let result = entry.clone();
                histories.insert(user.to_string(), entry);
                result
            }
            None => Vec::new(),
        }
    }

    /// Append a turn for a user, trimming and evicting as needed.
    pub async fn add_turn(&self, user: &str, input: &str, output: &str) {
        let mut histories = self.histories.write().await;

        let mut history = histories.shift_remove(user).unwrap_or_default();
        history.push(Turn::new(input, output));

        if history.len() > self.max_turns {
            let excess = history.len() - self.max_turns;
            history.drain(0..excess);
        }

        histories.insert(user.to_string(), history);

        while histories.len() > self.max_users {
            histories.shift_remove_index(0);
        }
    }

    /// Forget everything recorded for a user.
    pub async fn clear(&self, user: &str) {
        self.histories.write().await.shift_remove(user);
    }

    /// Forget all users.
    pub async fn clear_all(&self) {
        self.histories.write().await.clear();
    }

    /// Number of users currently tracked.
    pub async fn user_count(&self) -> usize {
        self.histories.read().await.len()
    }

    /// Configured per-user turn limit.
    pub fn max_turns(&self) -> usize {
        self.max_turns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_add_and_get_turns() {
        let history = ConversationHistory::new(5);

        history.add_turn("1", "привет", "Привет!").await;
        history.add_turn("1", "я съел яблоко", "Сохранено").await;

        let turns = history.turns("1").await;
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0], Turn::new("привет", "Привет!"));
        assert_eq!(turns[1].input, "я съел яблоко");
    }

    #[tokio::test]
    async fn test_turn_trimming() {
        let history = ConversationHistory::new(2);

        history.add_turn("1", "first", "r1").await;
        history.add_turn("1", "second", "r2").await;
        history.add_turn("1", "third", "r3").await;

        let turns = history.turns("1").await;
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].input, "second");
        assert_eq!(turns[1].input, "third");
    }

    #[tokio::test]
    async fn test_users_are_separate() {
        let history = ConversationHistory::new(5);

        history.add_turn("a", "hello a", "hi a").await;
        history.add_turn("b", "hello b", "hi b").await;

        assert_eq!(history.turns("a").await[0].output, "hi a");
        assert_eq!(history.turns("b").await[0].output, "hi b");
    }

    #[tokio::test]
    async fn test_clear_user() {
        let history = ConversationHistory::new(5);

        history.add_turn("a", "x", "y").await;
        history.add_turn("b", "x", "y").await;
        history.clear("a").await;

        assert!(history.turns("a").await.is_empty());
        assert_eq!(history.turns("b").await.len(), 1);
        assert_eq!(history.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_lru_eviction() {
        let history = ConversationHistory::with_limits(5, 3);

        history.add_turn("1", "x", "y").await;
        history.add_turn("2", "x", "y").await;
        history.add_turn("3", "x", "y").await;
        history.add_turn("4", "x", "y").await;

        assert_eq!(history.user_count().await, 3);
        assert!(history.turns("1").await.is_empty());
        assert!(!history.turns("4").await.is_empty());
    }

    #[tokio::test]
    async fn test_lru_access_order() {
        let history = ConversationHistory::with_limits(5, 3);

        history.add_turn("1", "x", "y").await;
        history.add_turn("2", "x", "y").await;
        history.add_turn("3", "x", "y").await;

        // Touch "1" so "2" becomes the oldest.
        let _ = history.turns("1").await;
        history.add_turn("4", "x", "y").await;

        assert!(history.turns("2").await.is_empty());
        assert!(!history.turns("1").await.is_empty());
        assert!(!history.turns("3").await.is_empty());
    }
}
