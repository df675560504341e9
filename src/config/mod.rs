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

//! Application configuration.
//!
//! This module manages the application configuration file.

use std::{sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    model::Track,
    provider::{
        AudioDbProvider, DEFAULT_AUDIODB_URL, LocalProvider, PlaylistProvider,
        default_local_tracks,
    },
};

const CONFIG_NAME: &str = "playcore";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistSource {
    Local,
    AudioDb,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    pub version: u32,
    pub source: PlaylistSource,
    pub audiodb_url: String,
    pub request_timeout_secs: u64,
    pub tick_interval_ms: u64,
    pub local_tracks: Vec<Track>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            version: 1,
            source: PlaylistSource::AudioDb,
            audiodb_url: DEFAULT_AUDIODB_URL.to_string(),
            request_timeout_secs: 10,
            tick_interval_ms: 1000,
            local_tracks: default_local_tracks(),
        }
    }
}

impl PlayerConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    /// Builds the playlist source selected by this configuration.
    pub fn provider(&self) -> Arc<dyn PlaylistProvider> {
        match self.source {
            PlaylistSource::Local => Arc::new(LocalProvider::new(self.local_tracks.clone())),
            PlaylistSource::AudioDb => Arc::new(AudioDbProvider::new(
                self.audiodb_url.clone(),
                Duration::from_secs(self.request_timeout_secs),
            )),
        }
    }
}

pub fn load_config() -> PlayerConfig {
    confy::load(CONFIG_NAME, None).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_tick_once_per_second() {
        let config = PlayerConfig::default();
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
        assert_eq!(config.source, PlaylistSource::AudioDb);
        assert_eq!(config.local_tracks.len(), 2);
    }

    #[test]
    fn zero_tick_interval_is_clamped() {
        let config = PlayerConfig {
            tick_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.tick_interval(), Duration::from_millis(1));
    }

    #[test]
    fn local_source_serves_configured_tracks() {
        let config = PlayerConfig {
            source: PlaylistSource::Local,
            local_tracks: vec![Track::new("x", "X", "Y", 5)],
            ..Default::default()
        };
        let tracks = config.provider().fetch().unwrap();
        assert_eq!(tracks, vec![Track::new("x", "X", "Y", 5)]);
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let config: PlayerConfig =
            serde_json::from_str(r#"{"source":"Local","tick_interval_ms":250}"#).unwrap();
        assert_eq!(config.source, PlaylistSource::Local);
        assert_eq!(config.tick_interval(), Duration::from_millis(250));
        assert_eq!(config.audiodb_url, DEFAULT_AUDIODB_URL);
    }
}
