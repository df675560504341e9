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

//! Console rendering of playback state.
//!
//! This module turns a [`PlaybackSnapshot`] into the text written to the
//! terminal: a single status line redrawn in place after every change, and an
//! on-demand listing of the playlist.

mod icons;

use std::io::{self, Write};

use playcore::{PlaybackSnapshot, PlaybackStatus, util::format::format_time};

use crate::render::icons::{ICON_PAUSE, ICON_PLAY, ICON_STOP};

const NO_TRACK_MESSAGE: &str = "Playlist loaded. Select a song.";

// Erase the current terminal line and return to its start.
const CLEAR_LINE: &str = "\r\x1b[2K";

/// Redraws the status line in place.
pub(crate) fn print_status(snapshot: &PlaybackSnapshot) {
    let mut stdout = io::stdout().lock();
    let _ = write!(stdout, "{CLEAR_LINE}{}", status_line(snapshot));
    let _ = stdout.flush();
}

pub(crate) fn print_playlist(snapshot: &PlaybackSnapshot) {
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout);
    for line in playlist_lines(snapshot) {
        let _ = writeln!(stdout, "{line}");
    }
    let _ = stdout.flush();
}

pub(crate) fn print_help() {
    println!("[p] play/pause  [n] next  [b] previous  [r] reload  [l] list  [q] quit");
}

pub(crate) fn status_line(snapshot: &PlaybackSnapshot) -> String {
    let icon = match snapshot.status {
        PlaybackStatus::Playing => ICON_PLAY,
        PlaybackStatus::Paused => ICON_PAUSE,
        PlaybackStatus::Stopped => ICON_STOP,
    };

    match &snapshot.current_track {
        Some(track) => format!(
            "{icon} {track}  [{} / {}]",
            format_time(snapshot.elapsed_seconds),
            format_time(track.duration_seconds),
        ),
        None => format!("{icon} {NO_TRACK_MESSAGE}"),
    }
}

pub(crate) fn playlist_lines(snapshot: &PlaybackSnapshot) -> Vec<String> {
    snapshot
        .playlist
        .iter()
        .enumerate()
        .map(|(index, track)| {
            let marker = if snapshot.current_index == Some(index) { ">" } else { " " };
            format!(
                "{marker} {:>2}. {track} ({})",
                index + 1,
                format_time(track.duration_seconds)
            )
        })
        .collect()
}
