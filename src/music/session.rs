use std::collections::VecDeque;

/// One pending track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    /// Page URL or direct link handed to the resolver.
    pub locator: String,
    pub title: String,
}

impl QueueEntry {
    pub fn new(locator: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
            title: title.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Idle,
    Resolving,
    Playing,
}

/// What `enqueue` decided to do with a new entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enqueued {
    /// The session was idle; the entry was taken straight off the queue and
    /// the caller should resolve and start it.
    StartNow(Pending),
    /// Something is already in progress; the entry waits at this 1-based position.
    Queued { position: usize },
}

/// What to do after a track ended or failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Resolve and start this entry next.
    Next(Pending),
    /// Nothing left; the session is idle.
    Drained,
}

/// Identifies one started track, so completion events from replaced tracks can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    epoch: u64,
    serial: u64,
}

/// An entry taken off the queue and awaiting resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pending {
    pub entry: QueueEntry,
    pub epoch: u64,
}

/// Queue and playback state of one guild's voice session.
///
/// `stop` bumps the epoch; anything taken off the queue under an older
/// epoch is stale and must not start.
#[derive(Debug, Default)]
pub struct GuildSession {
    pending: VecDeque<QueueEntry>,
    state: PlaybackState,
    now_playing: Option<(Ticket, QueueEntry)>,
    epoch: u64,
    serial: u64,
}

impl GuildSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_current(&self, epoch: u64) -> bool {
        self.epoch == epoch
    }

    pub fn pending(&self) -> impl Iterator<Item = &QueueEntry> {
        self.pending.iter()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn now_playing(&self) -> Option<&QueueEntry> {
        self.now_playing.as_ref().map(|(_, entry)| entry)
    }

    /// Appends `entry`. An idle session hands it back at once for resolution.
    pub fn enqueue(&mut self, entry: QueueEntry) -> Enqueued {
        self.pending.push_back(entry);
        match self.state {
            PlaybackState::Idle => match self.advance() {
                Advance::Next(pending) => Enqueued::StartNow(pending),
                Advance::Drained => unreachable!("queue cannot be empty right after a push"),
            },
            PlaybackState::Resolving | PlaybackState::Playing => Enqueued::Queued {
                position: self.pending.len(),
            },
        }
    }

    fn advance(&mut self) -> Advance {
        self.now_playing = None;
        match self.pending.pop_front() {
            Some(entry) => {
                self.state = PlaybackState::Resolving;
                Advance::Next(Pending {
                    entry,
                    epoch: self.epoch,
                })
            }
            None => {
                self.state = PlaybackState::Idle;
                Advance::Drained
            }
        }
    }

    /// Marks a resolved entry as playing. Returns `None` if the session was
    /// stopped while it resolved.
    pub fn start(&mut self, pending: Pending) -> Option<Ticket> {
        if !self.is_current(pending.epoch) {
            return None;
        }
        self.serial += 1;
        let ticket = Ticket {
            epoch: self.epoch,
            serial: self.serial,
        };
        self.state = PlaybackState::Playing;
        self.now_playing = Some((ticket, pending.entry));
        Some(ticket)
    }

    /// Records that resolving the entry taken under `epoch` failed.
    /// Returns `None` if the session was stopped meanwhile.
    pub fn fail(&mut self, epoch: u64) -> Option<Advance> {
        if !self.is_current(epoch) || self.state != PlaybackState::Resolving {
            return None;
        }
        Some(self.advance())
    }

    /// Handles the end of the track holding `ticket`. Returns `None` when that
    /// track is no longer the current one.
    pub fn finish(&mut self, ticket: Ticket) -> Option<Advance> {
        let is_current = matches!(&self.now_playing, Some((current, _)) if *current == ticket);
        if !is_current {
            return None;
        }
        Some(self.advance())
    }

    /// Clears the queue and goes idle. Returns whether anything was resolving or playing.
    pub fn stop(&mut self) -> bool {
        let was_active = self.state != PlaybackState::Idle;
        self.pending.clear();
        self.now_playing = None;
        self.state = PlaybackState::Idle;
        self.epoch += 1;
        was_active
    }
}
