/// Interactive command loop
///
/// Each stdin line is parsed as one player gesture and applied through the
/// controller. Failures are printed and the loop keeps going.
use cadence_core::{Catalog, RepeatMode};
use cadence_playback::{MemoryEngine, PlaybackController, PlayerStatus};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct ReplLine {
    #[command(subcommand)]
    command: ReplCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ReplCommand {
    /// Show catalog listings and their tracks
    #[command(alias = "ls")]
    Listings,
    /// Play a track from a listing (both numbers 1-based)
    Select { listing: usize, track: usize },
    /// Skip to the next track
    #[command(alias = "n")]
    Next,
    /// Skip to the previous track
    #[command(aliases = ["p", "previous"])]
    Prev,
    Play,
    Pause,
    Stop,
    /// Play or pause
    #[command(alias = "t")]
    Toggle,
    /// Cycle repeat mode, or set one (off, track, queue)
    Repeat { mode: Option<RepeatMode> },
    /// Shuffle the current queue once
    Shuffle,
    /// Mute, or unmute to full volume
    Mute,
    /// Set volume (0.0-1.0)
    Volume { level: f32 },
    /// Seek to a fraction of the track (0.0-1.0)
    Seek { fraction: f32 },
    /// Let playback time pass
    Tick { seconds: u64 },
    /// Show what is playing
    #[command(alias = "s")]
    Status,
    /// Show the engine queue
    #[command(alias = "q")]
    Queue,
    #[command(alias = "exit")]
    Quit,
}

/// Parse one input line
pub fn parse_line(line: &str) -> Result<ReplCommand, clap::Error> {
    ReplLine::try_parse_from(line.split_whitespace()).map(|parsed| parsed.command)
}

/// Read commands from stdin until `quit` or end of input
pub async fn run(
    controller: &PlaybackController<MemoryEngine>,
    catalog: &Catalog,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_listings(catalog);
    prompt()?;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            prompt()?;
            continue;
        }

        match parse_line(&line) {
            Ok(ReplCommand::Quit) => break,
            Ok(command) => {
                debug!("Command: {:?}", command);
                if let Err(e) = execute(controller, catalog, command).await {
                    println!("error: {e}");
                }
            }
            Err(e) => println!("{e}"),
        }

        prompt()?;
    }

    Ok(())
}

fn prompt() -> std::io::Result<()> {
    print!("cadence> ");
    std::io::stdout().flush()
}

async fn execute(
    controller: &PlaybackController<MemoryEngine>,
    catalog: &Catalog,
    command: ReplCommand,
) -> cadence_playback::Result<()> {
    match command {
        ReplCommand::Listings => print_listings(catalog),
        ReplCommand::Select { listing, track } => {
            let Some(selected) = listing
                .checked_sub(1)
                .and_then(|i| catalog.listings.get(i))
            else {
                println!("No listing #{listing}");
                return Ok(());
            };
            let Some(song) = track.checked_sub(1).and_then(|i| selected.tracks.get(i)) else {
                println!("No track #{track} in \"{}\"", selected.name);
                return Ok(());
            };

            controller
                .select_from_catalog(catalog, &selected.name, &song.url)
                .await?;
            print_status(&controller.status().await?);
        }
        ReplCommand::Next => {
            controller.next().await?;
            print_status(&controller.status().await?);
        }
        ReplCommand::Prev => {
            controller.previous().await?;
            print_status(&controller.status().await?);
        }
        ReplCommand::Play => controller.play().await?,
        ReplCommand::Pause => controller.pause().await?,
        ReplCommand::Stop => controller.stop().await?,
        ReplCommand::Toggle => {
            let playing = controller.toggle_play_pause().await?;
            println!("{}", if playing { "playing" } else { "paused" });
        }
        ReplCommand::Repeat { mode } => println!("{}", change_repeat(controller, mode).await?),
        ReplCommand::Shuffle => {
            let queue = controller.shuffle().await?;
            println!("Shuffled {} tracks", queue.len());
            print_status(&controller.status().await?);
        }
        ReplCommand::Mute => {
            let muted = controller.toggle_mute().await?;
            println!("{}", if muted { "muted" } else { "unmuted" });
        }
        ReplCommand::Volume { level } => {
            let applied = controller.set_volume(level).await?;
            println!("volume {:.0}%", applied * 100.0);
        }
        ReplCommand::Seek { fraction } => {
            controller.seek_to_fraction(fraction).await?;
            print_status(&controller.status().await?);
        }
        ReplCommand::Tick { seconds } => {
            controller
                .engine()
                .advance_clock(Duration::from_secs(seconds))
                .await;
            print_status(&controller.status().await?);
        }
        ReplCommand::Status => print_status(&controller.status().await?),
        ReplCommand::Queue => {
            let queue = controller.queue().await?;
            let active = controller.active_index().await?;
            for (i, track) in queue.iter().enumerate() {
                let marker = if Some(i) == active { ">" } else { " " };
                println!("{marker} {:>2}. {} - {}", i + 1, track.title, track.artist);
            }
        }
        ReplCommand::Quit => {}
    }
    Ok(())
}

/// Set or cycle the repeat mode and describe the outcome
async fn change_repeat(
    controller: &PlaybackController<MemoryEngine>,
    mode: Option<RepeatMode>,
) -> cadence_playback::Result<String> {
    let mode = match mode {
        Some(mode) => {
            controller.set_repeat_mode(mode).await?;
            mode
        }
        None => {
            let mode = controller.cycle_repeat_mode().await?;
            if controller.active_index().await?.is_none() {
                return Ok(format!("Queue is empty, repeat stays {}", mode));
            }
            mode
        }
    };
    Ok(format!("[{}] {}", mode.icon(), mode.label()))
}

fn print_listings(catalog: &Catalog) {
    for (i, listing) in catalog.listings.iter().enumerate() {
        println!("{}. {} ({} tracks)", i + 1, listing.name, listing.len());
        for (j, track) in listing.tracks.iter().enumerate() {
            println!("   {:>2}. {} - {}", j + 1, track.title, track.artist);
        }
    }
}

fn print_status(status: &PlayerStatus) {
    println!("{}", format_status(status));
}

/// One-line now-playing summary
pub fn format_status(status: &PlayerStatus) -> String {
    let Some(track) = &status.active_track else {
        return "Nothing queued".to_string();
    };

    let icon = if status.is_playing() { "▶" } else { "⏸" };
    let volume = if status.is_muted() {
        "muted".to_string()
    } else {
        format!("{:.0}%", status.volume * 100.0)
    };

    format!(
        "{icon} {} - {}  {} {}  [{}/{}]  repeat: {}  volume: {volume}",
        track.title,
        track.artist,
        status.progress.elapsed_label(),
        status.progress.remaining_label(),
        status.active_index.map_or(0, |i| i + 1),
        status.queue_length,
        status.repeat_mode,
    )
}
