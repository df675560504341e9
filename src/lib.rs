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

//! Playback coordination core.
//!
//! This crate owns the current playlist, the playback cursor, elapsed time and
//! play/pause/stop status. It advances time on a fixed tick and tells every
//! registered listener whenever that state changes.
//!
//! # Organization
//!
//! * [`engine`]: The [`PlaybackEngine`] state machine.
//! * [`broadcast`]: Listener registration and change notification.
//! * [`player`]: The single event-loop thread the engine lives on, and the
//!   [`PlayerHandle`] used to drive it.
//! * [`provider`]: Playlist sources, fetched in the background and adopted
//!   through the event loop.
//! * [`config`]: The application configuration file.

pub mod broadcast;
pub mod config;
pub mod engine;
pub mod model;
pub mod player;
pub mod provider;
pub mod util;

mod tasks;

pub use broadcast::{ChangeBroadcaster, Listener, SubscriptionId};
pub use engine::{PlaybackEngine, PlayerCommand};
pub use model::{PlaybackSnapshot, PlaybackStatus, Track};
pub use player::{Player, PlayerError, PlayerHandle};
pub use provider::{PlaylistProvider, ProviderError};
