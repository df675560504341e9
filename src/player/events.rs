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

//! Player event distribution.
//!
//! This module defines the events accepted by the player's event loop and the
//! loop itself.
//!
//! # Architecture
//!
//! The loop is the single writer for playback state:
//!
//! 1. **Capture**: Commands from [`PlayerHandle`](crate::player::PlayerHandle)s,
//!    ticks from the [`Ticker`](crate::player::ticker::Ticker) and completed
//!    playlist fetches all arrive as [`PlayerEvent`]s on one channel.
//! 2. **Process**: Each event is applied to the [`PlaybackEngine`] in arrival
//!    order.
//! 3. **Notify**: The engine notifies listeners before the next event is
//!    taken, so commands issued by a listener queue up behind the current one.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
    mpsc::{Receiver, Sender},
};

use tracing::{debug, info, warn};

use crate::{
    engine::{PlaybackEngine, PlayerCommand},
    model::Track,
    player::ticker::TickEpoch,
    provider::ProviderError,
};

#[derive(Debug)]
pub(crate) enum PlayerEvent {
    Command(PlayerCommand),

    Tick(u64),

    PlaylistFetched(Result<Vec<Track>, ProviderError>),

    Sync(Sender<()>),

    Exit,
}

pub(crate) struct EventLoop {
    pub(crate) engine: PlaybackEngine,
    pub(crate) epoch: TickEpoch,
    pub(crate) fetch_failures: Arc<AtomicU64>,
}

impl EventLoop {
    /// Processes events until an exit is requested or every sender is gone.
    pub(crate) fn run(mut self, event_rx: Receiver<PlayerEvent>) {
        debug!("player event loop started");

        while let Ok(event) = event_rx.recv() {
            if matches!(event, PlayerEvent::Exit) {
                break;
            }
            self.process_event(event);
        }

        debug!("player event loop finished");
    }

    fn process_event(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::Command(command) => self.engine.apply(command),

            PlayerEvent::Tick(epoch) => {
                if self.epoch.is_current(epoch) {
                    self.engine.tick();
                }
            }

            // Any completion is applied, even one that finishes after a newer
            // load or fetch was issued.
            PlayerEvent::PlaylistFetched(Ok(tracks)) => {
                info!(tracks = tracks.len(), "playlist fetched");
                self.engine.load(tracks);
            }
            PlayerEvent::PlaylistFetched(Err(e)) => {
                self.fetch_failures.fetch_add(1, Ordering::SeqCst);
                warn!("Failed to load songs: {e}");
            }

            PlayerEvent::Sync(reply_tx) => {
                let _ = reply_tx.send(());
            }

            PlayerEvent::Exit => {}
        }
    }
}
