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

//! Playlist sources.
//!
//! A [`PlaylistProvider`] produces an ordered list of tracks on request. The
//! call may block for as long as it needs to; the player always runs it on a
//! worker thread and hands the result back to the event loop.

mod audiodb;

pub use audiodb::{AudioDbProvider, DEFAULT_AUDIODB_URL};

use std::collections::HashSet;

use thiserror::Error;
use tracing::debug;

use crate::model::Track;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("Failed to read response body: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not parse track list: {0}")]
    Parse(#[from] serde_json::Error),

    /// The source cannot be queried at all, e.g. it is not configured. Also
    /// the variant for providers outside this crate with no better fit.
    #[error("Playlist source unavailable: {0}")]
    Unavailable(String),
}

/// Supplies a list of tracks, single-shot per call.
pub trait PlaylistProvider: Send + Sync {
    fn fetch(&self) -> Result<Vec<Track>, ProviderError>;
}

/// Serves a fixed list of tracks held in memory.
#[derive(Debug, Clone)]
pub struct LocalProvider {
    tracks: Vec<Track>,
}

impl LocalProvider {
    /// Tracks with an empty or repeated id are dropped.
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            tracks: unique_tracks(tracks),
        }
    }
}

impl Default for LocalProvider {
    fn default() -> Self {
        Self::new(default_local_tracks())
    }
}

impl PlaylistProvider for LocalProvider {
    fn fetch(&self) -> Result<Vec<Track>, ProviderError> {
        Ok(self.tracks.clone())
    }
}

/// Drops tracks with an empty id and every repeat of an id already seen,
/// keeping the first occurrence in order.
pub(crate) fn unique_tracks(tracks: Vec<Track>) -> Vec<Track> {
    let total = tracks.len();
    let mut seen = HashSet::new();

    let kept: Vec<Track> = tracks
        .into_iter()
        .filter(|track| !track.id.is_empty() && seen.insert(track.id.clone()))
        .collect();

    if kept.len() != total {
        debug!(dropped = total - kept.len(), "dropped tracks with empty or duplicate ids");
    }
    kept
}

pub(crate) fn default_local_tracks() -> Vec<Track> {
    vec![
        Track::new("local-1", "Local Song 1", "Local Artist", 180),
        Track::new("local-2", "Local Song 2", "Local Artist", 240),
    ]
}
