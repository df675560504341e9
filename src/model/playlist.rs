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

//! Playlist and cursor management.
//!
//! This module provides the ordered list of tracks the engine plays from,
//! together with a cursor that always points at a valid track or at nothing
//! when the playlist is empty.

use std::sync::Arc;

use crate::model::Track;

#[derive(Debug, Clone, Default)]
pub struct Playlist {
    tracks: Arc<[Track]>,
    current: Option<usize>,
}

impl Playlist {
    pub fn new(tracks: Vec<Track>) -> Self {
        let current = if tracks.is_empty() { None } else { Some(0) };
        Self {
            tracks: tracks.into(),
            current,
        }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> Arc<[Track]> {
        Arc::clone(&self.tracks)
    }

    pub fn current(&self) -> Option<&Track> {
        self.current.and_then(|index| self.tracks.get(index))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// The cursor as a signed index, `-1` when the playlist is empty.
    pub fn cursor(&self) -> isize {
        self.current.map_or(-1, |index| index as isize)
    }

    /// Moves the cursor forward by one, wrapping to the first track.
    pub fn next(&mut self) -> Option<&Track> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }
        let index = self.current.map_or(0, |index| (index + 1) % len);
        self.current = Some(index);
        self.tracks.get(index)
    }

    /// Moves the cursor back by one, wrapping to the last track.
    pub fn previous(&mut self) -> Option<&Track> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }
        let index = self.current.map_or(len - 1, |index| (index + len - 1) % len);
        self.current = Some(index);
        self.tracks.get(index)
    }
}
