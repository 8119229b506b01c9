use super::*;

/// Stop the music and clear the queue
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn stop(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;

    if ctx.data().jukebox.stop(guild_id).await {
        ctx.say(STOPPED).await?;
    } else {
        ctx.say(NOTHING_PLAYING).await?;
    }

    Ok(())
}
