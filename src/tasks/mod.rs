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

//! Background work that must stay off the player's event loop.

use std::{
    sync::{Arc, mpsc::Sender},
    thread::{self, JoinHandle},
};

use tracing::debug;

use crate::{player::events::PlayerEvent, provider::PlaylistProvider};

/// Runs one playlist fetch on its own thread.
///
/// The result, success or failure, is sent back to the event loop as a
/// [`PlayerEvent::PlaylistFetched`]; nothing here touches playback state.
pub(crate) fn spawn_fetch_task(
    provider: Arc<dyn PlaylistProvider>,
    event_tx: Sender<PlayerEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let result = provider.fetch();

        if event_tx.send(PlayerEvent::PlaylistFetched(result)).is_err() {
            debug!("player shut down before playlist fetch completed");
        }
    })
}
