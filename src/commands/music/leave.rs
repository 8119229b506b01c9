use super::*;

/// Leave the voice channel
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn left(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;

    match ctx.data().jukebox.leave(guild_id).await {
        Ok(()) => ctx.say(LEFT).await?,
        Err(MusicError::NotConnected) => ctx.say(NOT_CONNECTED).await?,
        Err(e) => return Err(e.into()),
    };

    Ok(())
}
