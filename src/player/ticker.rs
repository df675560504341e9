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

//! Periodic tick source for the event loop.
//!
//! The [`Ticker`] never touches engine state. While armed, a background thread
//! sends [`PlayerEvent::Tick`] into the event loop once per interval, and the
//! loop calls [`PlaybackEngine::tick`](crate::engine::PlaybackEngine::tick).
//!
//! Each arming gets a new epoch. A tick carries the epoch it was produced
//! under, so a tick that was already queued when the ticker was disarmed is
//! recognised as stale and dropped by the loop.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
        mpsc::{self, RecvTimeoutError, Sender},
    },
    thread,
    time::Duration,
};

use tracing::trace;

use crate::{engine::TickSource, player::events::PlayerEvent};

/// The current arming generation, shared between the ticker and the loop.
#[derive(Clone, Debug, Default)]
pub(crate) struct TickEpoch(Arc<AtomicU64>);

impl TickEpoch {
    pub(crate) fn is_current(&self, epoch: u64) -> bool {
        self.0.load(Ordering::SeqCst) == epoch
    }

    fn advance(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }
}

pub(crate) struct Ticker {
    interval: Duration,
    event_tx: Sender<PlayerEvent>,
    epoch: TickEpoch,
    stop_tx: Option<Sender<()>>,
}

impl Ticker {
    pub(crate) fn new(interval: Duration, event_tx: Sender<PlayerEvent>, epoch: TickEpoch) -> Self {
        Self {
            interval,
            event_tx,
            epoch,
            stop_tx: None,
        }
    }
}

impl TickSource for Ticker {
    /// Starts a fresh tick thread, restarting the interval if already armed.
    fn arm(&mut self) {
        self.disarm();

        let epoch = self.epoch.advance();
        let interval = self.interval;
        let event_tx = self.event_tx.clone();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        thread::spawn(move || {
            trace!(epoch, "ticker armed");
            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if event_tx.send(PlayerEvent::Tick(epoch)).is_err() {
                            break;
                        }
                    }
                    // Disarmed, either explicitly or by dropping the ticker.
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            trace!(epoch, "ticker stopped");
        });

        self.stop_tx = Some(stop_tx);
    }

    fn disarm(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            self.epoch.advance();
            let _ = stop_tx.send(());
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.disarm();
    }
}
