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

//! The playback state machine.
//!
//! [`PlaybackEngine`] owns the playlist, the cursor, the elapsed time and the
//! playback status. Every command is total: a command issued at a bad time
//! (playing with nothing loaded, skipping an empty playlist) quietly does
//! nothing rather than failing.
//!
//! After each mutation the engine publishes a fresh [`PlaybackSnapshot`] into
//! its [`SnapshotCell`] and then asks the [`ChangeBroadcaster`] to notify every
//! listener, so a listener always observes the committed state.
//!
//! The engine is not thread-aware. The runtime in [`crate::player`] confines it
//! to a single event-loop thread.

mod snapshot;

pub use snapshot::SnapshotCell;

use std::sync::Arc;

use tracing::{debug, trace};

use crate::{
    broadcast::ChangeBroadcaster,
    model::{PlaybackSnapshot, PlaybackStatus, Track, playlist::Playlist},
};

/// Something that can periodically drive [`PlaybackEngine::tick`].
///
/// The engine arms it when playback starts and disarms it when playback is
/// paused or the playlist is replaced.
pub trait TickSource: Send {
    fn arm(&mut self);
    fn disarm(&mut self);
}

/// A tick source that does nothing, for engines driven by hand.
#[derive(Debug, Default)]
pub struct ManualTicks;

impl TickSource for ManualTicks {
    fn arm(&mut self) {}
    fn disarm(&mut self) {}
}

/// The mutating commands accepted by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCommand {
    Load(Vec<Track>),
    Play,
    Pause,
    SkipNext,
    SkipPrevious,
}

pub struct PlaybackEngine {
    playlist: Playlist,
    status: PlaybackStatus,
    elapsed_seconds: u32,
    ticks: Box<dyn TickSource>,
    broadcaster: Arc<ChangeBroadcaster>,
    published: SnapshotCell,
}

impl PlaybackEngine {
    pub fn new(broadcaster: Arc<ChangeBroadcaster>, ticks: Box<dyn TickSource>) -> Self {
        Self {
            playlist: Playlist::default(),
            status: PlaybackStatus::Stopped,
            elapsed_seconds: 0,
            ticks,
            broadcaster,
            published: SnapshotCell::default(),
        }
    }

    /// The cell this engine publishes its snapshots into.
    pub fn snapshot_cell(&self) -> SnapshotCell {
        self.published.clone()
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            current_track: self.playlist.current().cloned(),
            current_index: self.playlist.current_index(),
            status: self.status,
            elapsed_seconds: self.elapsed_seconds,
            playlist: self.playlist.tracks(),
        }
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.playlist.current()
    }

    /// The cursor, `-1` when the playlist is empty.
    pub fn cursor(&self) -> isize {
        self.playlist.cursor()
    }

    pub fn apply(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::Load(tracks) => self.load(tracks),
            PlayerCommand::Play => self.play(),
            PlayerCommand::Pause => self.pause(),
            PlayerCommand::SkipNext => self.skip_next(),
            PlayerCommand::SkipPrevious => self.skip_previous(),
        }
    }

    /// Replaces the playlist wholesale and returns to the stopped state.
    pub fn load(&mut self, tracks: Vec<Track>) {
        debug!(tracks = tracks.len(), "loading playlist");

        self.ticks.disarm();
        self.playlist = Playlist::new(tracks);
        self.elapsed_seconds = 0;
        self.status = PlaybackStatus::Stopped;

        self.commit();
    }

    /// Starts playback of the current track and arms the tick source.
    pub fn play(&mut self) {
        if self.playlist.current().is_none() {
            trace!("play ignored, no current track");
            return;
        }

        self.status = PlaybackStatus::Playing;
        self.ticks.arm();

        self.commit();
    }

    /// Pauses from any status, including when nothing is loaded.
    pub fn pause(&mut self) {
        self.status = PlaybackStatus::Paused;
        self.ticks.disarm();

        self.commit();
    }

    /// Selects the next track, wrapping to the first, and rewinds to its start.
    pub fn skip_next(&mut self) {
        if self.playlist.next().is_none() {
            trace!("skip next ignored, playlist is empty");
            return;
        }
        self.track_selected();
    }

    /// Selects the previous track, wrapping to the last, and rewinds to its start.
    pub fn skip_previous(&mut self) {
        if self.playlist.previous().is_none() {
            trace!("skip previous ignored, playlist is empty");
            return;
        }
        self.track_selected();
    }

    /// Advances playback by one second.
    ///
    /// A tick at the end of the current track moves on to the next one (wrapping
    /// at the end of the playlist) and keeps playing.
    pub fn tick(&mut self) {
        if self.status != PlaybackStatus::Playing {
            return;
        }
        let Some(duration) = self.playlist.current().map(|t| t.duration_seconds) else {
            return;
        };

        if self.elapsed_seconds < duration {
            self.elapsed_seconds += 1;
        } else {
            self.playlist.next();
            self.elapsed_seconds = 0;
            debug!(index = ?self.playlist.current_index(), "track finished, advancing");
        }

        self.commit();
    }

    // Selecting a track readies it but only keeps playing if it already was.
    fn track_selected(&mut self) {
        self.elapsed_seconds = 0;
        if self.status != PlaybackStatus::Playing {
            self.status = PlaybackStatus::Paused;
        }
        debug!(index = ?self.playlist.current_index(), status = ?self.status, "track selected");

        self.commit();
    }

    fn commit(&mut self) {
        self.published.publish(self.snapshot());
        self.broadcaster.notify_all();
    }
}

impl Drop for PlaybackEngine {
    fn drop(&mut self) {
        self.ticks.disarm();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    #[derive(Default)]
    struct TickLog {
        armed: AtomicUsize,
        disarmed: AtomicUsize,
    }

    struct RecordingTicks(Arc<TickLog>);

    impl TickSource for RecordingTicks {
        fn arm(&mut self) {
            self.0.armed.fetch_add(1, Ordering::SeqCst);
        }
        fn disarm(&mut self) {
            self.0.disarmed.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Fixture {
        engine: PlaybackEngine,
        notifications: Arc<AtomicUsize>,
        ticks: Arc<TickLog>,
    }

    impl Fixture {
        fn new() -> Self {
            let broadcaster = Arc::new(ChangeBroadcaster::new());
            let notifications = Arc::new(AtomicUsize::new(0));
            let counter = Arc::clone(&notifications);
            broadcaster.subscribe(Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
            let ticks = Arc::new(TickLog::default());
            let engine =
                PlaybackEngine::new(broadcaster, Box::new(RecordingTicks(Arc::clone(&ticks))));
            Self {
                engine,
                notifications,
                ticks,
            }
        }

        fn notified(&self) -> usize {
            self.notifications.load(Ordering::SeqCst)
        }
    }

    fn track(id: &str, duration: u32) -> Track {
        Track::new(id, format!("Song {id}"), "Artist", duration)
    }

    fn two_tracks() -> Vec<Track> {
        vec![track("A", 180), track("B", 240)]
    }

    #[test]
    fn starts_stopped_and_empty() {
        let fixture = Fixture::new();
        let snapshot = fixture.engine.snapshot();
        assert_eq!(snapshot.status, PlaybackStatus::Stopped);
        assert_eq!(snapshot.current_track, None);
        assert_eq!(snapshot.elapsed_seconds, 0);
        assert!(snapshot.playlist.is_empty());
        assert_eq!(fixture.engine.cursor(), -1);
    }

    #[test]
    fn load_selects_first_track_and_notifies_once() {
        let mut fixture = Fixture::new();
        fixture.engine.load(two_tracks());

        assert_eq!(fixture.notified(), 1);
        assert_eq!(fixture.engine.cursor(), 0);
        assert_eq!(fixture.engine.current_track().map(|t| t.id.as_str()), Some("A"));
        assert_eq!(fixture.engine.status(), PlaybackStatus::Stopped);
    }

    #[test]
    fn load_resets_status_and_elapsed_time() {
        let mut fixture = Fixture::new();
        fixture.engine.load(two_tracks());
        fixture.engine.play();
        fixture.engine.tick();
        fixture.engine.skip_next();

        fixture.engine.load(vec![track("C", 10)]);

        assert_eq!(fixture.engine.status(), PlaybackStatus::Stopped);
        assert_eq!(fixture.engine.elapsed_seconds(), 0);
        assert_eq!(fixture.engine.cursor(), 0);
        assert!(fixture.ticks.disarmed.load(Ordering::SeqCst) >= 2);
    }

    #[test]
    fn empty_load_clears_everything_and_play_is_a_no_op() {
        let mut fixture = Fixture::new();
        fixture.engine.load(two_tracks());
        fixture.engine.play();

        fixture.engine.load(vec![]);
        let after_load = fixture.notified();
        fixture.engine.play();

        let snapshot = fixture.engine.snapshot();
        assert_eq!(snapshot.current_track, None);
        assert_eq!(snapshot.status, PlaybackStatus::Stopped);
        assert_eq!(fixture.engine.cursor(), -1);
        assert_eq!(fixture.notified(), after_load);
    }

    #[test]
    fn play_arms_ticks_and_pause_disarms_them() {
        let mut fixture = Fixture::new();
        fixture.engine.load(two_tracks());
        let disarmed = fixture.ticks.disarmed.load(Ordering::SeqCst);

        fixture.engine.play();
        assert_eq!(fixture.ticks.armed.load(Ordering::SeqCst), 1);
        assert_eq!(fixture.engine.status(), PlaybackStatus::Playing);

        fixture.engine.pause();
        assert_eq!(fixture.ticks.disarmed.load(Ordering::SeqCst), disarmed + 1);
        assert_eq!(fixture.engine.status(), PlaybackStatus::Paused);
        assert_eq!(fixture.notified(), 3);
    }

    #[test]
    fn pause_without_a_track_still_notifies() {
        let mut fixture = Fixture::new();
        fixture.engine.pause();
        assert_eq!(fixture.engine.status(), PlaybackStatus::Paused);
        assert_eq!(fixture.notified(), 1);
    }

    #[test]
    fn skipping_an_empty_playlist_does_nothing() {
        let mut fixture = Fixture::new();
        fixture.engine.skip_next();
        fixture.engine.skip_previous();
        assert_eq!(fixture.notified(), 0);
        assert_eq!(fixture.engine.status(), PlaybackStatus::Stopped);
        assert_eq!(fixture.engine.cursor(), -1);
    }

    #[test]
    fn skip_next_cycles_back_to_the_start() {
        let mut fixture = Fixture::new();
        let tracks: Vec<Track> = (0..5).map(|i| track(&i.to_string(), 30)).collect();
        fixture.engine.load(tracks);
        fixture.engine.skip_next();
        let start = fixture.engine.cursor();

        for _ in 0..5 {
            fixture.engine.skip_next();
        }

        assert_eq!(fixture.engine.cursor(), start);
    }

    #[test]
    fn skip_next_then_previous_restores_cursor_and_resets_time() {
        let mut fixture = Fixture::new();
        fixture.engine.load(vec![track("A", 10), track("B", 10), track("C", 10)]);
        fixture.engine.play();
        fixture.engine.tick();
        fixture.engine.tick();

        fixture.engine.skip_next();
        assert_eq!(fixture.engine.elapsed_seconds(), 0);
        assert_eq!(fixture.engine.cursor(), 1);

        fixture.engine.tick();
        fixture.engine.skip_previous();
        assert_eq!(fixture.engine.elapsed_seconds(), 0);
        assert_eq!(fixture.engine.cursor(), 0);
        assert_eq!(fixture.engine.status(), PlaybackStatus::Playing);
    }

    #[test]
    fn skip_previous_then_next_restores_cursor_and_resets_time() {
        let mut fixture = Fixture::new();
        fixture.engine.load(vec![track("A", 10), track("B", 10), track("C", 10)]);
        fixture.engine.play();
        fixture.engine.tick();
        fixture.engine.tick();

        fixture.engine.skip_previous();
        assert_eq!(fixture.engine.cursor(), 2);
        assert_eq!(fixture.engine.elapsed_seconds(), 0);

        fixture.engine.tick();
        assert_eq!(fixture.engine.elapsed_seconds(), 1);

        fixture.engine.skip_next();
        assert_eq!(fixture.engine.cursor(), 0);
        assert_eq!(fixture.engine.elapsed_seconds(), 0);
        assert_eq!(fixture.engine.status(), PlaybackStatus::Playing);
    }

    #[test]
    fn skip_previous_from_stopped_wraps_and_pauses() {
        let mut fixture = Fixture::new();
        fixture.engine.load(two_tracks());

        fixture.engine.skip_previous();

        assert_eq!(fixture.engine.cursor(), 1);
        assert_eq!(fixture.engine.current_track().map(|t| t.id.as_str()), Some("B"));
        assert_eq!(fixture.engine.status(), PlaybackStatus::Paused);
        assert_eq!(fixture.ticks.armed.load(Ordering::SeqCst), 0);
        assert_eq!(fixture.notified(), 2);
    }

    #[test]
    fn tick_when_not_playing_changes_nothing() {
        let mut fixture = Fixture::new();
        fixture.engine.tick();
        fixture.engine.load(two_tracks());
        fixture.engine.tick();
        fixture.engine.skip_next();
        fixture.engine.tick();

        let before = fixture.engine.snapshot();
        let notified = fixture.notified();
        fixture.engine.tick();

        assert_eq!(fixture.engine.snapshot(), before);
        assert_eq!(fixture.notified(), notified);
        assert_eq!(notified, 2);
    }

    #[test]
    fn ticks_run_to_the_duration_then_advance() {
        let mut fixture = Fixture::new();
        fixture.engine.load(vec![track("A", 3), track("B", 5)]);
        fixture.engine.play();

        for expected in 1..=3 {
            fixture.engine.tick();
            assert_eq!(fixture.engine.elapsed_seconds(), expected);
            assert_eq!(fixture.engine.cursor(), 0);
        }

        fixture.engine.tick();
        assert_eq!(fixture.engine.cursor(), 1);
        assert_eq!(fixture.engine.elapsed_seconds(), 0);
        assert_eq!(fixture.engine.status(), PlaybackStatus::Playing);
    }

    #[test]
    fn auto_advance_wraps_from_the_last_track() {
        let mut fixture = Fixture::new();
        fixture.engine.load(vec![track("A", 1), track("B", 1)]);
        fixture.engine.skip_previous();
        fixture.engine.play();

        fixture.engine.tick();
        fixture.engine.tick();

        assert_eq!(fixture.engine.cursor(), 0);
        assert_eq!(fixture.engine.status(), PlaybackStatus::Playing);
    }

    #[test]
    fn each_playing_tick_notifies_once() {
        let mut fixture = Fixture::new();
        fixture.engine.load(vec![track("A", 2)]);
        fixture.engine.play();
        let before = fixture.notified();

        for _ in 0..6 {
            fixture.engine.tick();
        }

        assert_eq!(fixture.notified(), before + 6);
    }

    #[test]
    fn zero_length_track_advances_on_first_tick() {
        let mut fixture = Fixture::new();
        fixture.engine.load(vec![track("A", 0), track("B", 4)]);
        fixture.engine.play();
        fixture.engine.tick();
        assert_eq!(fixture.engine.current_track().map(|t| t.id.as_str()), Some("B"));
    }

    #[test]
    fn first_track_of_180_seconds_hands_over_to_the_second() {
        let mut fixture = Fixture::new();
        fixture.engine.load(two_tracks());
        fixture.engine.play();

        for _ in 0..180 {
            fixture.engine.tick();
        }
        assert_eq!(fixture.engine.elapsed_seconds(), 180);
        assert_eq!(fixture.engine.current_track().map(|t| t.id.as_str()), Some("A"));

        fixture.engine.tick();
        let snapshot = fixture.engine.snapshot();
        assert_eq!(snapshot.current_track.map(|t| t.id), Some("B".to_string()));
        assert_eq!(snapshot.elapsed_seconds, 0);
        assert_eq!(snapshot.status, PlaybackStatus::Playing);
    }

    #[test]
    fn listeners_see_the_committed_snapshot() {
        let broadcaster = Arc::new(ChangeBroadcaster::new());
        let mut engine = PlaybackEngine::new(Arc::clone(&broadcaster), Box::new(ManualTicks));
        let cell = engine.snapshot_cell();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let listener_seen = Arc::clone(&seen);
        let listener_cell = cell.clone();
        broadcaster.subscribe(Arc::new(move || {
            let snapshot = listener_cell.get();
            listener_seen
                .lock()
                .unwrap()
                .push((snapshot.current_index, snapshot.status));
        }));

        engine.load(two_tracks());
        engine.skip_next();
        engine.play();

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                (Some(0), PlaybackStatus::Stopped),
                (Some(1), PlaybackStatus::Paused),
                (Some(1), PlaybackStatus::Playing),
            ]
        );
    }

    #[test]
    fn apply_dispatches_commands() {
        let mut fixture = Fixture::new();
        fixture.engine.apply(PlayerCommand::Load(two_tracks()));
        fixture.engine.apply(PlayerCommand::SkipNext);
        fixture.engine.apply(PlayerCommand::Play);
        assert_eq!(fixture.engine.status(), PlaybackStatus::Playing);
        fixture.engine.apply(PlayerCommand::SkipPrevious);
        assert_eq!(fixture.engine.cursor(), 0);
        fixture.engine.apply(PlayerCommand::Pause);
        assert_eq!(fixture.engine.status(), PlaybackStatus::Paused);
        assert_eq!(fixture.notified(), 5);
    }

    #[test]
    fn dropping_the_engine_disarms_ticks() {
        let fixture = Fixture::new();
        let ticks = Arc::clone(&fixture.ticks);
        drop(fixture);
        assert_eq!(ticks.disarmed.load(Ordering::SeqCst), 1);
    }
}
