//! Commands that talk to the completion endpoint.

/// Submodule defining the `대화` command.
pub mod chat;

use crate::progress::StatusMessage;
use crate::{CommandResult, Context};

/// The maximum character length allowed for a single Discord message.
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// Shown when the endpoint answered with nothing to display.
pub const EMPTY_ANSWER: &str = "(답변이 비어 있어요)";

/// Splits `text` into pieces of at most `limit` characters, never cutting a
/// character in half.
pub fn split_message(text: &str, limit: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut iter = text.chars();
    let mut pos = 0;
    while pos < text.len() {
        let len: usize = iter.by_ref().take(limit).map(char::len_utf8).sum();
        chunks.push(&text[pos..pos + len]);
        pos += len;
    }
    chunks
}

/// Replaces the status message with the first chunk of `answer` and sends the
/// remainder as follow-up messages.
pub async fn deliver_answer(
    ctx: Context<'_>,
    status: &impl StatusMessage,
    answer: &str,
) -> CommandResult {
    let mut chunks = split_message(answer, MAX_MESSAGE_LENGTH).into_iter();
    status.edit(chunks.next().unwrap_or(EMPTY_ANSWER)).await?;
    for chunk in chunks {
        ctx.say(chunk).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn short_text_is_a_single_chunk() {
        assert_eq!(
            split_message("NATO는 중립 클랜이에요.", 2000),
            vec!["NATO는 중립 클랜이에요."]
        );
    }

    #[test]
    fn empty_text_has_no_chunks() {
        assert!(split_message("", 2000).is_empty());
    }

    #[test]
    fn limit_counts_characters_not_bytes() {
        let text = "가".repeat(4500);

        let chunks = split_message(&text, MAX_MESSAGE_LENGTH);

        assert_eq!(
            chunks.iter().map(|c| c.chars().count()).collect::<Vec<_>>(),
            vec![2000, 2000, 500]
        );
        assert_eq!(chunks.concat(), text);
    }
}
