//! Animated "working..." status messages shown while slow calls run.
//!
//! The animation runs concurrently with the guarded work inside the same task
//! and is dropped as soon as the work finishes, so it can never race the
//! caller's final edit.

use poise::CreateReply;
use serenity::async_trait;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::{Context, Error};

/// Suffixes cycled through on each tick.
pub const FRAMES: [&str; 6] = [".", "..", "...", ".", "..", "..."];

pub const TICK: Duration = Duration::from_millis(500);

/// A message whose content can be replaced.
#[async_trait]
pub trait StatusMessage: Send + Sync {
    async fn edit(&self, content: &str) -> Result<(), Error>;
}

/// The reply a command sent, editable through poise.
pub struct ReplyStatus<'a> {
    ctx: Context<'a>,
    handle: poise::ReplyHandle<'a>,
}

impl<'a> ReplyStatus<'a> {
    /// Sends `content` as the command's reply and wraps the resulting message.
    pub async fn send(ctx: Context<'a>, content: &str) -> Result<Self, Error> {
        let handle = ctx.say(content).await?;
        Ok(Self { ctx, handle })
    }
}

#[async_trait]
impl StatusMessage for ReplyStatus<'_> {
    async fn edit(&self, content: &str) -> Result<(), Error> {
        self.handle
            .edit(self.ctx, CreateReply::default().content(content))
            .await?;
        Ok(())
    }
}

pub struct Progress<'a, S: StatusMessage + ?Sized> {
    status: &'a S,
    prefix: &'a str,
    tick: Duration,
}

impl<'a, S: StatusMessage + ?Sized> Progress<'a, S> {
    pub fn new(status: &'a S, prefix: &'a str) -> Self {
        Self {
            status,
            prefix,
            tick: TICK,
        }
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Drives `work` to completion while animating the status message.
    ///
    /// The animation is torn down before this returns, on every path. No
    /// final edit is made; that is the caller's job.
    pub async fn run<F: Future>(&self, work: F) -> F::Output {
        let work = std::pin::pin!(work);
        let animation = std::pin::pin!(self.animate());

        tokio::select! {
            biased;
            output = work => output,
            never = animation => match never {},
        }
    }

    async fn animate(&self) -> std::convert::Infallible {
        let mut frame = 0;
        loop {
            tokio::time::sleep(self.tick).await;
            let content = format!("{} {}", self.prefix, FRAMES[frame % FRAMES.len()]);
            if let Err(e) = self.status.edit(&content).await {
                warn!("Failed to update progress message: {}", e);
            }
            frame += 1;
        }
    }
}
