// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Threaded playback control.
//!
//! This module provides the [`Player`], which owns the single event-loop thread
//! that all playback state lives on, and the [`PlayerHandle`] used by the rest
//! of the application to drive it. The handle never touches the engine; it only
//! sends events to the loop, so it is cheap to clone and safe to call from any
//! thread, including from inside a listener callback.

pub(crate) mod events;
pub(crate) mod ticker;

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
        mpsc::{self, Sender},
    },
    thread::{self, JoinHandle, ThreadId},
    time::Duration,
};

use thiserror::Error;
use tracing::debug;

use crate::{
    broadcast::{ChangeBroadcaster, Listener, SubscriptionId},
    engine::{PlaybackEngine, PlayerCommand, SnapshotCell},
    model::{PlaybackSnapshot, Track},
    player::{
        events::{EventLoop, PlayerEvent},
        ticker::{TickEpoch, Ticker},
    },
    provider::PlaylistProvider,
    tasks,
};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlayerError {
    #[error("player has shut down")]
    Closed,
}

/// Owner of the playback event loop.
///
/// Dropping the player (or calling [`Player::shutdown`]) stops the loop, which
/// drops the engine and with it any running ticker.
pub struct Player {
    handle: PlayerHandle,
    thread: Option<JoinHandle<()>>,
}

impl Player {
    /// Spawns the event loop with the given tick interval.
    pub fn spawn(tick_interval: Duration) -> Self {
        let (event_tx, event_rx) = mpsc::channel::<PlayerEvent>();

        let broadcaster = Arc::new(ChangeBroadcaster::new());
        let epoch = TickEpoch::default();
        let ticker = Ticker::new(tick_interval, event_tx.clone(), epoch.clone());
        let engine = PlaybackEngine::new(Arc::clone(&broadcaster), Box::new(ticker));
        let snapshot = engine.snapshot_cell();
        let fetch_failures = Arc::new(AtomicU64::new(0));

        let event_loop = EventLoop {
            engine,
            epoch,
            fetch_failures: Arc::clone(&fetch_failures),
        };
        let thread = thread::spawn(move || event_loop.run(event_rx));

        let handle = PlayerHandle {
            event_tx,
            broadcaster,
            snapshot,
            fetch_failures,
            loop_thread: thread.thread().id(),
        };

        Self {
            handle,
            thread: Some(thread),
        }
    }

    pub fn handle(&self) -> PlayerHandle {
        self.handle.clone()
    }

    /// Stops the event loop and waits for it to finish.
    ///
    /// Events already queued ahead of the shutdown are still processed.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = self.handle.event_tx.send(PlayerEvent::Exit);
            if thread.join().is_err() {
                debug!("player event loop panicked");
            }
        }
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.stop();
    }
}

/// A handle to the playback engine.
///
/// This struct acts as a command proxy; commands are queued onto the player's
/// event loop and applied there in order. Sending only fails once the player
/// has shut down.
#[derive(Clone)]
pub struct PlayerHandle {
    event_tx: Sender<PlayerEvent>,
    broadcaster: Arc<ChangeBroadcaster>,
    snapshot: SnapshotCell,
    fetch_failures: Arc<AtomicU64>,
    loop_thread: ThreadId,
}

impl PlayerHandle {
    /// Replaces the playlist and returns to the stopped state.
    pub fn load(&self, tracks: Vec<Track>) -> Result<(), PlayerError> {
        self.command(PlayerCommand::Load(tracks))
    }

    /// Starts playback of the current track; ignored when nothing is loaded.
    pub fn play(&self) -> Result<(), PlayerError> {
        self.command(PlayerCommand::Play)
    }

    /// Pauses playback.
    pub fn pause(&self) -> Result<(), PlayerError> {
        self.command(PlayerCommand::Pause)
    }

    /// Moves to the next track, wrapping at the end of the playlist.
    pub fn skip_next(&self) -> Result<(), PlayerError> {
        self.command(PlayerCommand::SkipNext)
    }

    /// Moves to the previous track, wrapping at the start of the playlist.
    pub fn skip_previous(&self) -> Result<(), PlayerError> {
        self.command(PlayerCommand::SkipPrevious)
    }

    /// Fetches a playlist in the background and loads it once it arrives.
    ///
    /// A failed fetch leaves the current playlist in place. The returned handle
    /// finishes once the result has been queued onto the event loop.
    pub fn fetch_playlist(&self, provider: Arc<dyn PlaylistProvider>) -> JoinHandle<()> {
        tasks::spawn_fetch_task(provider, self.event_tx.clone())
    }

    /// Number of playlist fetches that have failed so far.
    pub fn fetch_failures(&self) -> u64 {
        self.fetch_failures.load(Ordering::SeqCst)
    }

    /// Registers a listener for state changes.
    ///
    /// A listener that captures this handle keeps the broadcaster alive
    /// through it; such listeners must be unsubscribed before shutdown, or
    /// should capture [`PlayerHandle::snapshot_cell`] instead.
    ///
    /// # Arguments
    ///
    /// * `listener` - Called on the event loop after every change.
    pub fn subscribe(&self, listener: Arc<dyn Listener>) -> SubscriptionId {
        self.broadcaster.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.broadcaster.unsubscribe(id)
    }

    /// The most recently committed playback state.
    pub fn snapshot(&self) -> Arc<PlaybackSnapshot> {
        self.snapshot.get()
    }

    /// The cell the engine publishes snapshots into, for listeners that only
    /// need to read state.
    pub fn snapshot_cell(&self) -> SnapshotCell {
        self.snapshot.clone()
    }

    /// Blocks until every event queued before this call has been processed.
    ///
    /// Called from the event loop itself (from a listener) this returns at
    /// once instead of waiting on its own thread.
    pub fn sync(&self) -> Result<(), PlayerError> {
        if thread::current().id() == self.loop_thread {
            return Ok(());
        }

        let (reply_tx, reply_rx) = mpsc::channel();
        self.send(PlayerEvent::Sync(reply_tx))?;
        reply_rx.recv().map_err(|_| PlayerError::Closed)
    }

    fn command(&self, command: PlayerCommand) -> Result<(), PlayerError> {
        self.send(PlayerEvent::Command(command))
    }

    fn send(&self, event: PlayerEvent) -> Result<(), PlayerError> {
        self.event_tx.send(event).map_err(|_| PlayerError::Closed)
    }
}
