use super::*;

/// Skip the currently playing song
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn skip(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;

    if ctx.data().jukebox.skip(guild_id).await? {
        ctx.say(SKIPPED).await?;
    } else {
        ctx.say(NOTHING_PLAYING).await?;
    }

    Ok(())
}
