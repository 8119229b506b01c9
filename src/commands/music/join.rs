use super::*;

/// Join your voice channel
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn join(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;

    let channel_id = match user_voice_channel(ctx, guild_id, ctx.author().id) {
        Ok(channel_id) => channel_id,
        Err(e) => {
            warn!("{} asked to join without being in voice: {}", ctx.author().name, e);
            ctx.say(NOT_IN_VOICE).await?;
            return Ok(());
        }
    };

    ctx.data().jukebox.join(guild_id, channel_id).await?;
    ctx.say(JOINED).await?;

    Ok(())
}
