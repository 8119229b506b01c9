//! This module aggregates all the command modules for the bot.

use crate::{CommandResult, Context, Data, Error};

/// The `대화` command.
pub mod ai;

/// Voice channel and queue commands (requires the `music` feature).
#[cfg(feature = "music")]
pub mod music;

/// Show this help menu
#[poise::command(prefix_command, slash_command, category = "General")]
pub async fn help(
    ctx: Context<'_>,
    #[description = "Specific command to show help about"]
    #[autocomplete = "poise::builtins::autocomplete_command"]
    command: Option<String>,
) -> CommandResult {
    poise::builtins::help(
        ctx,
        command.as_deref(),
        poise::builtins::HelpConfiguration {
            extra_text_at_bottom: "DMZ 봇: 질문은 대화, 음악은 join / play / skip / stop / left",
            ..Default::default()
        },
    )
    .await
    .map_err(|e| e.into())
}

#[poise::command(prefix_command, hide_in_help)]
pub async fn register(ctx: Context<'_>) -> CommandResult {
    poise::builtins::register_application_commands_buttons(ctx)
        .await
        .map_err(|e| e.into())
}

/// Every command the bot registers.
pub fn all() -> Vec<poise::Command<Data, Error>> {
    #[cfg_attr(not(feature = "music"), allow(unused_mut))]
    let mut commands = vec![register(), help(), ai::chat::chat()];

    #[cfg(feature = "music")]
    {
        use music::{join::*, leave::*, play::*, skip::*, stop::*};

        commands.extend(vec![join(), play(), skip(), stop(), left()]);
    }

    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_command_is_exposed_under_its_korean_name() {
        let commands = all();
        assert!(commands.iter().any(|c| c.name == "대화"));
        assert!(commands.iter().any(|c| c.name == "help"));
    }

    #[cfg(feature = "music")]
    #[test]
    fn music_commands_are_registered() {
        let names: Vec<String> = all().into_iter().map(|c| c.name).collect();
        for name in ["join", "play", "skip", "stop", "left"] {
            assert!(names.iter().any(|n| n == name), "missing {name}");
        }
    }
}
