use dashmap::DashMap;
use futures::future::join_all;
use serenity::async_trait;
use serenity::http::Http;
use serenity::model::id::{ChannelId, GuildId};
use songbird::events::{Event, EventContext, EventHandler, TrackEvent};
use songbird::tracks::{PlayMode, TrackHandle};
use songbird::{Call, Songbird};
use std::sync::{Arc, Weak};
use tokio::sync::Mutex;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, error, info, warn};

use super::session::{Advance, Enqueued, GuildSession, Pending, PlaybackState, QueueEntry, Ticket};
use super::source::{self, LINK_PLACEHOLDER_TITLE, ResolvedStream, TrackSource};
use super::transcode::Transcoder;
use super::{MusicError, MusicResult};

pub const QUEUE_DRAINED_MESSAGE: &str = "⏹️ 더 이상 재생할 곡이 없어요.";

pub fn now_playing_message(title: &str) -> String {
    format!("🎶 Now playing: **{title}**")
}

pub fn playback_error_message(err: &MusicError) -> String {
    format!("❌ 음악 재생 중 오류 발생: {err}")
}

/// Result of a `play` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    /// The session was idle and this track started.
    Playing { title: String },
    /// Appended behind the current track.
    Queued { title: String, position: usize },
    /// The session was stopped while the track was resolving.
    Cancelled,
}

/// Messages handed from songbird's event callbacks to the player loop.
#[derive(Debug)]
enum PlayerEvent {
    TrackEnded {
        guild_id: GuildId,
        ticket: Ticket,
        error: Option<String>,
    },
    /// Continue draining after a failed resolution.
    Resume { guild_id: GuildId, pending: Pending },
}

enum Started {
    Playing(String),
    Stale,
}

#[derive(Default)]
struct GuildPlayer {
    session: GuildSession,
    track: Option<TrackHandle>,
    /// Where "now playing" notices for this guild go.
    announce_to: Option<ChannelId>,
}

/// Owns every guild's music session and drives playback through songbird.
pub struct Jukebox {
    songbird: Arc<Songbird>,
    http: Arc<Http>,
    source: Arc<dyn TrackSource>,
    transcoder: Transcoder,
    players: DashMap<GuildId, Arc<Mutex<GuildPlayer>>>,
    events: UnboundedSender<PlayerEvent>,
}

impl Jukebox {
    /// Creates the jukebox and spawns its event loop on the current runtime.
    pub fn start(
        songbird: Arc<Songbird>,
        http: Arc<Http>,
        source: Arc<dyn TrackSource>,
    ) -> Arc<Self> {
        let (events, receiver) = unbounded_channel();
        let jukebox = Arc::new(Self {
            songbird,
            http,
            source,
            transcoder: Transcoder::default(),
            players: DashMap::new(),
            events,
        });

        tokio::spawn(run_event_loop(Arc::downgrade(&jukebox), receiver));
        info!("Jukebox started");
        jukebox
    }

    fn player(&self, guild_id: GuildId) -> Arc<Mutex<GuildPlayer>> {
        Arc::clone(&self.players.entry(guild_id).or_default())
    }

    fn call(&self, guild_id: GuildId) -> MusicResult<Arc<Mutex<Call>>> {
        self.songbird.get(guild_id).ok_or(MusicError::NotConnected)
    }

    pub fn is_connected(&self, guild_id: GuildId) -> bool {
        self.songbird.get(guild_id).is_some()
    }

    pub async fn state(&self, guild_id: GuildId) -> PlaybackState {
        self.player(guild_id).lock().await.session.state()
    }

    pub async fn join(&self, guild_id: GuildId, channel_id: ChannelId) -> MusicResult<()> {
        info!("Joining voice channel {} in guild {}", channel_id, guild_id);
        self.songbird
            .join(guild_id, channel_id)
            .await
            .map_err(|e| MusicError::JoinError(e.to_string()))?;
        Ok(())
    }

    /// Resolves `query` into a queue entry and appends it. Starts playback
    /// right away when the guild's session is idle.
    pub async fn enqueue(
        &self,
        guild_id: GuildId,
        announce_to: ChannelId,
        query: &str,
    ) -> MusicResult<PlayOutcome> {
        let call = self.call(guild_id)?;
        let entry = source::entry_for_query(self.source.as_ref(), query).await?;
        let title = entry.title.clone();

        let decision = {
            let player = self.player(guild_id);
            let mut player = player.lock().await;
            player.announce_to = Some(announce_to);
            player.session.enqueue(entry)
        };

        match decision {
            Enqueued::Queued { position } => {
                info!("Queued '{}' at position {} in guild {}", title, position, guild_id);
                Ok(PlayOutcome::Queued { title, position })
            }
            Enqueued::StartNow(pending) => {
                match self.play_pending(guild_id, &call, pending).await? {
                    Started::Playing(title) => Ok(PlayOutcome::Playing { title }),
                    Started::Stale => Ok(PlayOutcome::Cancelled),
                }
            }
        }
    }

    /// Stops the current track; its end event advances the queue.
    /// Returns false when nothing is playing.
    pub async fn skip(&self, guild_id: GuildId) -> MusicResult<bool> {
        let player = self.player(guild_id);
        let player = player.lock().await;
        match (&player.track, player.session.state()) {
            (Some(track), PlaybackState::Playing) => {
                info!("Skipping current track in guild {}", guild_id);
                track
                    .stop()
                    .map_err(|e| MusicError::TrackControl(e.to_string()))?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Halts playback and clears the queue. Returns whether anything was active.
    pub async fn stop(&self, guild_id: GuildId) -> bool {
        let player = self.player(guild_id);
        let mut player = player.lock().await;
        let was_active = player.session.stop();
        if let Some(track) = player.track.take() {
            if let Err(e) = track.stop() {
                warn!("Failed to stop track in guild {}: {}", guild_id, e);
            }
        }
        info!("Stopped playback in guild {} (was active: {})", guild_id, was_active);
        was_active
    }

    /// Stops everything and disconnects from voice.
    pub async fn leave(&self, guild_id: GuildId) -> MusicResult<()> {
        if !self.is_connected(guild_id) {
            return Err(MusicError::NotConnected);
        }
        self.release(guild_id).await;
        self.songbird
            .remove(guild_id)
            .await
            .map_err(|e| MusicError::JoinError(e.to_string()))?;
        info!("Left voice channel in guild {}", guild_id);
        Ok(())
    }

    /// Stops the guild's session and forgets its announcement channel. The
    /// player itself is kept so its epoch keeps counting up.
    async fn release(&self, guild_id: GuildId) {
        self.stop(guild_id).await;
        self.player(guild_id).lock().await.announce_to = None;
    }

    /// Leaves every guild the jukebox has played in.
    pub async fn shutdown(&self) {
        let guilds: Vec<GuildId> = self.players.iter().map(|entry| *entry.key()).collect();
        info!("Shutting down playback in {} guild(s)", guilds.len());

        let results = join_all(guilds.iter().map(|guild_id| self.leave(*guild_id))).await;
        for (guild_id, result) in guilds.iter().zip(results) {
            match result {
                Ok(()) | Err(MusicError::NotConnected) => {}
                Err(e) => warn!("Failed to leave voice in guild {}: {}", guild_id, e),
            }
        }
    }

    /// Resolves and starts `pending`. On failure the session moves on to the
    /// next entry through the event loop and the error is returned.
    async fn play_pending(
        &self,
        guild_id: GuildId,
        call: &Arc<Mutex<Call>>,
        pending: Pending,
    ) -> MusicResult<Started> {
        let epoch = pending.epoch;
        let player = self.player(guild_id);
        let prepared = match self.source.resolve(&pending.entry.locator).await {
            Ok(resolved) => self
                .transcoder
                .spawn(&resolved.stream_url)
                .map(|input| (input, resolved)),
            Err(e) => Err(e),
        };

        let mut player = player.lock().await;

        match prepared {
            Ok((input, resolved)) => {
                let title = display_title(&pending.entry, &resolved);
                let Some(ticket) = player.session.start(pending) else {
                    info!(
                        "Discarding '{}': guild {} was stopped while it resolved",
                        title, guild_id
                    );
                    return Ok(Started::Stale);
                };

                let track = call.lock().await.play_input(input);
                self.watch(guild_id, ticket, &track);
                player.track = Some(track);

                info!("Now playing '{}' in guild {}", title, guild_id);
                Ok(Started::Playing(title))
            }
            Err(e) => {
                error!(
                    "Failed to prepare '{}' in guild {}: {}",
                    pending.entry.locator, guild_id, e
                );
                if let Some(Advance::Next(next)) = player.session.fail(epoch) {
                    self.post(PlayerEvent::Resume {
                        guild_id,
                        pending: next,
                    });
                }
                Err(e)
            }
        }
    }

    fn watch(&self, guild_id: GuildId, ticket: Ticket, track: &TrackHandle) {
        let notifier = TrackEndNotifier {
            guild_id,
            ticket,
            events: self.events.clone(),
        };
        for event in [TrackEvent::End, TrackEvent::Error] {
            if let Err(e) = track.add_event(Event::Track(event), notifier.clone()) {
                error!("Failed to register {:?} handler in guild {}: {}", event, guild_id, e);
            }
        }
    }

    fn post(&self, event: PlayerEvent) {
        if let Err(e) = self.events.send(event) {
            warn!("Player event loop is gone, dropping {:?}", e.0);
        }
    }

    async fn handle_event(&self, event: PlayerEvent) {
        let (guild_id, pending) = match event {
            PlayerEvent::TrackEnded {
                guild_id,
                ticket,
                error,
            } => {
                if let Some(error) = error {
                    error!("🔴 Playback error in guild {}: {}", guild_id, error);
                }

                let player = self.player(guild_id);
                let mut player = player.lock().await;
                let advance = player.session.finish(ticket);
                match advance {
                    None => {
                        debug!("Ignoring end of a replaced track in guild {}", guild_id);
                        return;
                    }
                    Some(Advance::Drained) => {
                        player.track = None;
                        drop(player);
                        info!("Queue drained in guild {}", guild_id);
                        self.announce(guild_id, QUEUE_DRAINED_MESSAGE).await;
                        return;
                    }
                    Some(Advance::Next(next)) => {
                        player.track = None;
                        (guild_id, next)
                    }
                }
            }
            PlayerEvent::Resume { guild_id, pending } => (guild_id, pending),
        };

        let call = match self.call(guild_id) {
            Ok(call) => call,
            Err(e) => {
                warn!("Cannot continue playback in guild {}: {}", guild_id, e);
                self.player(guild_id).lock().await.session.stop();
                return;
            }
        };

        match self.play_pending(guild_id, &call, pending).await {
            Ok(Started::Playing(title)) => {
                self.announce(guild_id, &now_playing_message(&title)).await
            }
            Ok(Started::Stale) => {}
            Err(e) => self.announce(guild_id, &playback_error_message(&e)).await,
        }
    }

    async fn announce(&self, guild_id: GuildId, content: &str) {
        let channel = self.player(guild_id).lock().await.announce_to;
        let Some(channel) = channel else {
            debug!("No announcement channel for guild {}", guild_id);
            return;
        };
        if let Err(e) = channel.say(&*self.http, content).await {
            warn!("Failed to announce in channel {}: {}", channel, e);
        }
    }
}

/// Link entries are announced with their real title once it is known.
fn display_title(entry: &QueueEntry, resolved: &ResolvedStream) -> String {
    match &resolved.title {
        Some(title) if entry.title == LINK_PLACEHOLDER_TITLE => title.clone(),
        _ => entry.title.clone(),
    }
}

async fn run_event_loop(jukebox: Weak<Jukebox>, mut events: UnboundedReceiver<PlayerEvent>) {
    while let Some(event) = events.recv().await {
        let Some(jukebox) = jukebox.upgrade() else {
            break;
        };
        // Resolving the next track takes seconds; other guilds must not wait on it.
        tokio::spawn(async move { jukebox.handle_event(event).await });
    }
    debug!("Player event loop finished");
}

/// Forwards songbird track end/error events to the player loop.
#[derive(Clone)]
struct TrackEndNotifier {
    guild_id: GuildId,
    ticket: Ticket,
    events: UnboundedSender<PlayerEvent>,
}

#[async_trait]
impl EventHandler for TrackEndNotifier {
    async fn act(&self, ctx: &EventContext<'_>) -> Option<Event> {
        let error = match ctx {
            EventContext::Track(tracks) => {
                tracks.iter().find_map(|(state, _)| match &state.playing {
                    PlayMode::Errored(e) => Some(format!("{e:?}")),
                    _ => None,
                })
            }
            _ => None,
        };

        let event = PlayerEvent::TrackEnded {
            guild_id: self.guild_id,
            ticket: self.ticket,
            error,
        };
        if self.events.send(event).is_err() {
            warn!("Player event loop is gone, track end in guild {} dropped", self.guild_id);
        }
        None
    }
}
