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

//! TheAudioDB "most loved tracks" playlist source.

use std::{io::Read, time::Duration};

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use ureq::Agent;

use crate::{
    model::Track,
    provider::{PlaylistProvider, ProviderError, unique_tracks},
};

pub const DEFAULT_AUDIODB_URL: &str =
    "https://www.theaudiodb.com/api/v1/json/2/mostloved.php?format=track";

const UNKNOWN_TITLE: &str = "Unknown Title";
const UNKNOWN_ARTIST: &str = "Unknown Artist";
const DEFAULT_DURATION_MILLIS: u64 = 180_000;

/// Fetches the most loved tracks over HTTP and maps them to [`Track`]s.
pub struct AudioDbProvider {
    url: String,
    agent: Agent,
}

impl AudioDbProvider {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();

        Self {
            url: url.into(),
            agent: config.into(),
        }
    }
}

impl PlaylistProvider for AudioDbProvider {
    fn fetch(&self) -> Result<Vec<Track>, ProviderError> {
        if self.url.trim().is_empty() {
            return Err(ProviderError::Unavailable(
                "no AudioDB URL configured".to_string(),
            ));
        }

        debug!(url = %self.url, "fetching loved tracks");

        let response = self.agent.get(&self.url).call()?;
        let (_parts, body) = response.into_parts();

        let mut text = String::new();
        body.into_reader().read_to_string(&mut text)?;

        parse_loved_tracks(&text)
    }
}

#[derive(Deserialize)]
struct LovedResponse {
    #[serde(default)]
    loved: Option<Vec<LovedTrack>>,
}

// The API serves every field as a string, but numbers are accepted too.
#[derive(Deserialize)]
struct LovedTrack {
    #[serde(rename = "idTrack", default)]
    id: Option<Value>,
    #[serde(rename = "strTrack", default)]
    title: Option<Value>,
    #[serde(rename = "strArtist", default)]
    artist: Option<Value>,
    #[serde(rename = "intDuration", default)]
    duration_millis: Option<Value>,
}

impl LovedTrack {
    fn into_track(self) -> Option<Track> {
        let id = text(self.id).filter(|id| !id.is_empty())?;
        let title = text(self.title).unwrap_or_else(|| UNKNOWN_TITLE.to_string());
        let artist = text(self.artist).unwrap_or_else(|| UNKNOWN_ARTIST.to_string());
        let millis = integer(self.duration_millis).unwrap_or(DEFAULT_DURATION_MILLIS);
        let duration_seconds = u32::try_from(millis / 1000).unwrap_or(u32::MAX);

        Some(Track {
            id,
            title,
            artist,
            duration_seconds,
        })
    }
}

/// Maps a `mostloved.php` response body to tracks.
///
/// Entries without an id, and repeats of an id already seen, are dropped. A
/// missing or `null` list is an empty playlist; a body that is not valid JSON
/// is an error.
pub(crate) fn parse_loved_tracks(body: &str) -> Result<Vec<Track>, ProviderError> {
    let response: LovedResponse = serde_json::from_str(body)?;

    let tracks = unique_tracks(
        response
            .loved
            .unwrap_or_default()
            .into_iter()
            .filter_map(LovedTrack::into_track)
            .collect(),
    );

    debug!(tracks = tracks.len(), "parsed loved tracks");
    Ok(tracks)
}

fn text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn integer(value: Option<Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
