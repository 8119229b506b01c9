use super::*;

/// Play a song from YouTube or a direct URL
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn play(
    ctx: Context<'_>,
    #[description = "URL or search query"]
    #[rest]
    query: String,
) -> CommandResult {
    if ensure_voice(ctx).await? {
        play_query(ctx, &query).await?;
    }
    Ok(())
}
