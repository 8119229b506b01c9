use ::serenity::all::{ClientBuilder, ShardManager};
use dotenv::dotenv;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use dmz_bot::chat::Conversation;
use dmz_bot::chat::completion::CompletionClient;
use dmz_bot::config::Config;
use dmz_bot::{Data, Error, commands, events};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize logging with debug level for our crate
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dmz_bot=debug,warn")),
        )
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_target(true)
        .with_ansi(true)
        .pretty()
        .init();

    dotenv().ok();

    let config = Config::from_env()?;
    info!(
        "Starting with model {} at {}",
        config.llm_model, config.llm_base_url
    );

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(config.command_prefix.clone()),
                ..Default::default()
            },
            on_error: |err| Box::pin(dmz_bot::on_error(err)),
            event_handler: |ctx, event, framework, data| {
                Box::pin(events::event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup({
            let config = config.clone();
            move |ctx, _ready, framework| {
                Box::pin(async move {
                    poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                    let data = build_data(ctx, &config).await?;
                    spawn_shutdown_listener(framework.shard_manager().clone(), &data);
                    Ok(data)
                })
            }
        });

    let client_builder =
        ClientBuilder::new(&config.discord_token, dmz_bot::gateway_intents())
            .framework(framework.build());

    // Create and run client
    build_and_start_client(client_builder).await
}

async fn build_data(
    #[allow(unused_variables)] ctx: &poise::serenity_prelude::Context,
    config: &Config,
) -> Result<Data, Error> {
    let conversation = Conversation::new(CompletionClient::from_config(config));

    #[cfg(feature = "music")]
    {
        use dmz_bot::music::{Jukebox, MusicError, YtDlp};

        let songbird = songbird::get(ctx)
            .await
            .ok_or(MusicError::NoVoiceManager)?;
        let jukebox = Jukebox::start(songbird, ctx.http.clone(), Arc::new(YtDlp::default()));

        Ok(Data {
            conversation,
            jukebox,
        })
    }

    #[cfg(not(feature = "music"))]
    Ok(Data { conversation })
}

/// Leaves voice and stops the shards on Ctrl-C.
fn spawn_shutdown_listener(shard_manager: Arc<ShardManager>, data: &Data) {
    #[cfg(feature = "music")]
    let jukebox = data.jukebox.clone();
    #[cfg(not(feature = "music"))]
    let _ = data;

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            return;
        }
        info!("Ctrl-C received, shutting down");

        #[cfg(feature = "music")]
        jukebox.shutdown().await;

        shard_manager.shutdown_all().await;
    });
}

async fn build_and_start_client(client_builder: ClientBuilder) -> Result<(), Error> {
    #[cfg(feature = "music")]
    {
        use songbird::SerenityInit;

        let mut client = client_builder.register_songbird().await?;
        client.start().await.map_err(Into::into)
    }

    #[cfg(not(feature = "music"))]
    {
        let mut client = client_builder.await?;
        client.start().await.map_err(Into::into)
    }
}
