//! A Discord bot that answers DMZ questions through a hosted LLM and runs a
//! per-guild YouTube music queue.

use poise::serenity_prelude as serenity;
use tracing::error;

pub mod chat;
pub mod commands;
pub mod config;
pub mod events;
pub mod progress;

/// Music queue and voice playback (requires the `music` feature).
#[cfg(feature = "music")]
pub mod music;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
pub type CommandResult = Result<(), Error>;

/// User data shared by every command invocation.
pub struct Data {
    pub conversation: chat::Conversation,
    #[cfg(feature = "music")]
    pub jukebox: std::sync::Arc<music::Jukebox>,
}

/// Converts command failures into a user-facing reply instead of letting them escape.
pub async fn on_error(err: poise::FrameworkError<'_, Data, Error>) {
    match err {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(
                "Command '{}' failed for user {}: {}",
                ctx.command().qualified_name,
                ctx.author().name,
                error
            );
            if let Err(e) = ctx.say(format!("⚠️ 오류 발생: {error}")).await {
                error!("Failed to report command error: {}", e);
            }
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                error!("Error while handling framework error: {}", e);
            }
        }
    }
}

/// Intents needed for prefix commands and for reading members' voice states from the cache.
pub fn gateway_intents() -> serenity::GatewayIntents {
    serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILD_VOICE_STATES
}
