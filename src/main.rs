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

mod render;

use std::{
    io::{self, BufRead},
    sync::Arc,
};

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use playcore::{Player, PlayerHandle, config};

const DEFAULT_LOG_FILTER: &str = "playcore=info";

#[derive(Debug, PartialEq)]
enum ConsoleCommand {
    TogglePlay,
    Next,
    Previous,
    Reload,
    List,
    Quit,
}

impl ConsoleCommand {
    fn parse(line: &str) -> Option<Self> {
        match line.trim_end_matches(['\r', '\n']) {
            "p" | " " => Some(Self::TogglePlay),
            "n" => Some(Self::Next),
            "b" => Some(Self::Previous),
            "r" => Some(Self::Reload),
            "l" => Some(Self::List),
            "q" => Some(Self::Quit),
            _ => None,
        }
    }
}

fn main() -> Result<()> {
    init_logging();

    let config = config::load_config();

    let player = Player::spawn(config.tick_interval());
    let handle = player.handle();

    let snapshot = handle.snapshot_cell();
    let subscription = handle.subscribe(Arc::new(move || {
        render::print_status(&snapshot.get());
    }));

    info!(source = ?config.source, "loading songs");
    handle.fetch_playlist(config.provider());

    render::print_help();
    let res = run(&handle, &config);

    handle.unsubscribe(subscription);
    player.shutdown();

    res.context("Application error occurred")
}

fn init_logging() {
    // Logs go to stderr so they do not fight with the status line on stdout.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(handle: &PlayerHandle, config: &config::PlayerConfig) -> Result<()> {
    let stdin = io::stdin();

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read command")?;

        let Some(command) = ConsoleCommand::parse(&line) else {
            render::print_help();
            continue;
        };

        match command {
            ConsoleCommand::TogglePlay => {
                if handle.snapshot().is_playing() {
                    handle.pause()?;
                } else {
                    handle.play()?;
                }
            }
            ConsoleCommand::Next => handle.skip_next()?,
            ConsoleCommand::Previous => handle.skip_previous()?,
            ConsoleCommand::Reload => {
                handle.fetch_playlist(config.provider());
            }
            ConsoleCommand::List => render::print_playlist(&handle.snapshot()),
            ConsoleCommand::Quit => break,
        }
    }

    Ok(())
}
