use poise::serenity_prelude as serenity;
use serenity::ActivityData;
use tracing::{debug, info};

use crate::{Data, Error};

pub const PRESENCE: &str = "DMZ 하는 중";

/// Gateway events the bot reacts to outside of commands.
pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    _data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            info!(
                "Logged in as {} ({})",
                data_about_bot.user.name, data_about_bot.user.id
            );
            ctx.set_activity(Some(ActivityData::playing(PRESENCE)));
        }
        serenity::FullEvent::Resume { .. } => {
            debug!("Gateway session resumed");
        }
        _ => {}
    }
    Ok(())
}
