//! The question-answering side of the bot: per-user history, prompt assembly,
//! the completion client and song-request detection.

pub mod completion;
pub mod history;
pub mod intent;
pub mod prompt;

use serenity::model::id::UserId;
use tracing::{error, info};

use completion::CompletionClient;
use history::{ChatTurn, ConversationStore};

/// What `Conversation::ask` produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    /// False when `text` is the rendered endpoint error.
    pub completed: bool,
}

/// Answers questions with the user's recent history as context.
pub struct Conversation {
    store: ConversationStore,
    client: CompletionClient,
}

impl Conversation {
    pub fn new(client: CompletionClient) -> Self {
        Self {
            store: ConversationStore::new(),
            client,
        }
    }

    pub fn history(&self) -> &ConversationStore {
        &self.store
    }

    /// Produces an answer for `question` and records the exchange.
    ///
    /// Endpoint failures become the answer text itself (`⚠️ 오류 발생: ...`) and are
    /// recorded like any other turn.
    pub async fn ask(&self, user: UserId, question: &str) -> Answer {
        let history = self.store.recent(user);
        info!(
            "Answering question from user {} with {} prior turns",
            user,
            history.len()
        );

        let dialogue = prompt::build_dialogue(&history, question);
        let answer = match self.client.complete(prompt::SYSTEM_PROMPT, &dialogue).await {
            Ok(text) => Answer {
                text,
                completed: true,
            },
            Err(e) => {
                error!("Completion failed for user {}: {}", user, e);
                Answer {
                    text: format!("⚠️ 오류 발생: {e}"),
                    completed: false,
                }
            }
        };

        self.store
            .record(user, ChatTurn::new(question, answer.text.as_str()));
        answer
    }
}
