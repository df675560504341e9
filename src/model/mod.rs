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

//! Domain models and core data structures.
//!
//! This module defines the values that flow between the playback engine, the
//! playlist providers and the presentation layer: tracks, playback status and
//! the read-only snapshot handed to listeners.

pub mod playlist;

use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

/// A single playable track.
///
/// Tracks are created by a playlist provider and never mutated afterwards.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub duration_seconds: u32,
}

impl Track {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        duration_seconds: u32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            duration_seconds,
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.title, self.artist)
    }
}

/// Represents the current playback status of the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackStatus {
    Playing,
    Paused,
    #[default]
    Stopped,
}

/// An immutable, point-in-time view of the engine state.
///
/// Snapshots are produced by the engine after each mutation; listeners pull the
/// latest one rather than receiving state as an argument.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaybackSnapshot {
    pub current_track: Option<Track>,
    pub current_index: Option<usize>,
    pub status: PlaybackStatus,
    pub elapsed_seconds: u32,
    pub playlist: Arc<[Track]>,
}

impl PlaybackSnapshot {
    /// Fraction of the current track that has elapsed, in `0.0..=1.0`.
    ///
    /// Returns `None` when there is no current track or it has zero length.
    pub fn progress(&self) -> Option<f64> {
        let track = self.current_track.as_ref()?;
        if track.duration_seconds == 0 {
            return None;
        }
        let ratio = f64::from(self.elapsed_seconds) / f64::from(track.duration_seconds);
        Some(ratio.clamp(0.0, 1.0))
    }

    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }
}
