use tracing::info;

use super::*;
use crate::chat::{Answer, intent};
use crate::progress::{Progress, ReplyStatus};

pub const THINKING: &str = "DMZ 봇에게 물어보는 중";

/// Ask the DMZ bot a question
#[poise::command(
    prefix_command,
    slash_command,
    rename = "대화",
    category = "AI",
    broadcast_typing
)]
pub async fn chat(
    ctx: Context<'_>,
    #[description = "DMZ에 대해 궁금한 것"]
    #[rest]
    question: String,
) -> CommandResult {
    let author = ctx.author();
    info!("{} asked: {}", author.name, question);

    let status = ReplyStatus::send(ctx, THINKING).await?;
    let answer = Progress::new(&status, THINKING)
        .run(ctx.data().conversation.ask(author.id, &question))
        .await;
    deliver_answer(ctx, &status, &answer.text).await?;

    if let Some(title) = requested_song(&question, &answer) {
        info!("Question from {} requests a song: {}", author.name, title);
        request_song(ctx, &title).await?;
    }

    Ok(())
}

/// A song asked for in `question`, honoured only when the model actually answered.
fn requested_song(question: &str, answer: &Answer) -> Option<String> {
    if !answer.completed {
        return None;
    }
    intent::song_request(question)
}

#[cfg(feature = "music")]
async fn request_song(ctx: Context<'_>, title: &str) -> CommandResult {
    use crate::commands::music;

    if music::ensure_voice(ctx).await? {
        music::play_query(ctx, title).await?;
    }
    Ok(())
}

#[cfg(not(feature = "music"))]
async fn request_song(_ctx: Context<'_>, title: &str) -> CommandResult {
    tracing::debug!("Music is disabled, ignoring song request for {}", title);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn answer(completed: bool) -> Answer {
        Answer {
            text: "네, 틀어드릴게요!".to_string(),
            completed,
        }
    }

    #[test]
    fn song_is_requested_after_a_real_answer() {
        let question = r#""Hype Boy" 노래를 틀어줘"#;
        assert_eq!(
            requested_song(question, &answer(true)).as_deref(),
            Some("Hype Boy")
        );
    }

    #[test]
    fn failed_completion_plays_nothing() {
        let question = r#""Hype Boy" 노래를 틀어줘"#;
        assert_eq!(requested_song(question, &answer(false)), None);
    }

    #[test]
    fn plain_question_plays_nothing() {
        assert_eq!(requested_song("NATO는 어떤 클랜이야?", &answer(true)), None);
    }
}
