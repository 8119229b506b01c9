use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serenity::model::id::UserId;
use tracing::debug;

/// How many of a user's most recent turns are replayed into each prompt.
pub const HISTORY_WINDOW: usize = 5;

/// One completed question/answer exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    pub question: String,
    pub answer: String,
    pub asked_at: DateTime<Utc>,
}

impl ChatTurn {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            asked_at: Utc::now(),
        }
    }
}

/// Per-user conversation history for the lifetime of the process.
#[derive(Default)]
pub struct ConversationStore {
    turns: DashMap<UserId, Vec<ChatTurn>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last `HISTORY_WINDOW` turns for `user`, oldest first.
    pub fn recent(&self, user: UserId) -> Vec<ChatTurn> {
        self.turns
            .get(&user)
            .map(|turns| {
                let start = turns.len().saturating_sub(HISTORY_WINDOW);
                turns[start..].to_vec()
            })
            .unwrap_or_default()
    }

    pub fn record(&self, user: UserId, turn: ChatTurn) {
        let mut turns = self.turns.entry(user).or_default();
        turns.push(turn);
        debug!("User {} now has {} recorded turns", user, turns.len());
    }

    /// Total number of turns ever recorded for `user`.
    pub fn len(&self, user: UserId) -> usize {
        self.turns.get(&user).map_or(0, |turns| turns.len())
    }

    pub fn is_empty(&self, user: UserId) -> bool {
        self.len(user) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unknown_user_has_no_history() {
        let store = ConversationStore::new();
        assert!(store.recent(UserId::new(1)).is_empty());
        assert!(store.is_empty(UserId::new(1)));
    }

    #[test]
    fn recent_keeps_only_the_last_five_turns_in_order() {
        let store = ConversationStore::new();
        let user = UserId::new(7);
        for i in 1..=8 {
            store.record(user, ChatTurn::new(format!("q{i}"), format!("a{i}")));
        }

        let recent = store.recent(user);
        let questions: Vec<_> = recent.iter().map(|t| t.question.as_str()).collect();

        assert_eq!(questions, vec!["q4", "q5", "q6", "q7", "q8"]);
        assert_eq!(store.len(user), 8);
    }

    #[test]
    fn users_do_not_share_history() {
        let store = ConversationStore::new();
        store.record(UserId::new(1), ChatTurn::new("hello", "hi"));

        assert_eq!(store.len(UserId::new(1)), 1);
        assert!(store.recent(UserId::new(2)).is_empty());
    }
}
