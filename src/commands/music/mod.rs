pub mod join;
pub mod leave;
pub mod play;
pub mod skip;
pub mod stop;

use serenity::model::id::{ChannelId, GuildId, UserId};
use tracing::{info, warn};

use crate::music::player::{now_playing_message, playback_error_message};
use crate::music::{MusicError, MusicResult, PlayOutcome};
use crate::progress::{Progress, ReplyStatus, StatusMessage};
use crate::{CommandResult, Context, Error};

pub const JOINED: &str = "✅ 음성 채널에 들어왔어요!";
pub const NOT_IN_VOICE: &str = "❌ 먼저 음성 채널에 들어가주세요.";
pub const SEARCHING: &str = "🎵 곡을 찾는 중";
pub const NO_MATCH: &str = "❌ 유튜브에서 결과를 찾지 못했어요.";
pub const SKIPPED: &str = "⏭️ 다음 곡으로 넘어갈게요!";
pub const STOPPED: &str = "🛑 음악을 중지했어요.";
pub const LEFT: &str = "👋 음성 채널에서 나갈게요!";
pub const NOTHING_PLAYING: &str = "❌ 지금 재생 중인 곡이 없어요.";
pub const NOT_CONNECTED: &str = "❌ 음성 채널에 들어가 있지 않아요.";

pub fn queued_message(title: &str) -> String {
    format!("🎵 대기열에 추가됨: **{title}**")
}

/// Final text of the `play` status message.
pub fn outcome_message(outcome: &MusicResult<PlayOutcome>) -> String {
    match outcome {
        Ok(PlayOutcome::Playing { title }) => now_playing_message(title),
        Ok(PlayOutcome::Queued { title, .. }) => queued_message(title),
        Ok(PlayOutcome::Cancelled) => STOPPED.to_string(),
        Err(MusicError::NoMatch(_)) => NO_MATCH.to_string(),
        Err(e) => playback_error_message(e),
    }
}

pub(crate) fn guild_id(ctx: Context<'_>) -> Result<GuildId, Error> {
    Ok(ctx.guild_id().ok_or(MusicError::NotInGuild)?)
}

/// Looks up the voice channel `user_id` is currently in from the cache.
pub(crate) fn user_voice_channel(
    ctx: Context<'_>,
    guild_id: GuildId,
    user_id: UserId,
) -> MusicResult<ChannelId> {
    let guild = ctx
        .serenity_context()
        .cache
        .guild(guild_id)
        .ok_or(MusicError::NotInGuild)?;

    guild
        .voice_states
        .get(&user_id)
        .and_then(|state| state.channel_id)
        .ok_or(MusicError::UserNotInVoiceChannel)
}

/// Makes sure the bot is in voice, joining the author's channel if needed.
/// Replies and returns `false` when the author is not in a voice channel.
pub(crate) async fn ensure_voice(ctx: Context<'_>) -> Result<bool, Error> {
    let guild_id = guild_id(ctx)?;
    let jukebox = &ctx.data().jukebox;
    if jukebox.is_connected(guild_id) {
        return Ok(true);
    }

    match user_voice_channel(ctx, guild_id, ctx.author().id) {
        Ok(channel_id) => {
            jukebox.join(guild_id, channel_id).await?;
            ctx.say(JOINED).await?;
            Ok(true)
        }
        Err(e) => {
            warn!("Cannot join voice for {}: {}", ctx.author().name, e);
            ctx.say(NOT_IN_VOICE).await?;
            Ok(false)
        }
    }
}

/// Queues `query` behind an animated status message, which ends up showing
/// the outcome.
pub(crate) async fn play_query(ctx: Context<'_>, query: &str) -> CommandResult {
    let guild_id = guild_id(ctx)?;
    info!("Play request in guild {}: {}", guild_id, query);

    let status = ReplyStatus::send(ctx, SEARCHING).await?;
    let outcome = Progress::new(&status, SEARCHING)
        .run(ctx.data().jukebox.enqueue(guild_id, ctx.channel_id(), query))
        .await;

    status.edit(&outcome_message(&outcome)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn outcome_messages() {
        assert_eq!(
            outcome_message(&Ok(PlayOutcome::Playing {
                title: "Hype Boy".into()
            })),
            "🎶 Now playing: **Hype Boy**"
        );
        assert_eq!(
            outcome_message(&Ok(PlayOutcome::Queued {
                title: "Ditto".into(),
                position: 2
            })),
            "🎵 대기열에 추가됨: **Ditto**"
        );
        assert_eq!(outcome_message(&Ok(PlayOutcome::Cancelled)), STOPPED);
    }

    #[test]
    fn search_miss_and_failures_are_told_apart() {
        assert_eq!(
            outcome_message(&Err(MusicError::NoMatch("zzz".into()))),
            NO_MATCH
        );
        assert_eq!(
            outcome_message(&Err(MusicError::AudioSourceError("HTTP 403".into()))),
            "❌ 음악 재생 중 오류 발생: Audio source error: HTTP 403"
        );
    }
}
