use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use subsync::playback::{NarrationSession, PlaybackClock, SessionConfig, TextSink};
use subsync::{Config, SubtitleTrack};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "subsync")]
#[command(version, about = "Synchronized subtitles for narrated playback")]
#[command(long_about = "Play a WebVTT-style transcript against a simulated clock, printing each cue as it becomes active.")]
struct Cli {
    /// Transcript file (WebVTT-style)
    transcript: PathBuf,

    /// Print the parsed track as JSON and exit
    #[arg(long)]
    dump_json: bool,

    /// Polling cadence in milliseconds
    #[arg(short, long)]
    interval_ms: Option<u64>,

    /// Simulated playback rate (2.0 = twice as fast)
    #[arg(short, long)]
    rate: Option<f64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

/// Wall-clock playback position, scaled by the configured rate.
struct SimulatedClock {
    started: Instant,
    rate: f64,
}

impl PlaybackClock for SimulatedClock {
    fn position(&self) -> Option<Duration> {
        Some(self.started.elapsed().mul_f64(self.rate))
    }
}

/// Prints active cue text above the playback position bar.
struct TerminalSink {
    bar: ProgressBar,
}

impl TextSink for TerminalSink {
    fn show(&self, text: &str) {
        // A terminal cannot un-print; clearing the display is a no-op here.
        if !text.is_empty() {
            self.bar.println(format!("  {}", style(text).cyan()));
        }
    }
}

#[derive(Serialize)]
struct TrackDump {
    metadata: DumpMetadata,
    cues: Vec<DumpCue>,
}

#[derive(Serialize)]
struct DumpMetadata {
    source_file: String,
    cue_count: usize,
}

#[derive(Serialize)]
struct DumpCue {
    index: usize,
    start: f64,
    start_formatted: String,
    text: String,
}

fn dump_track(track: &SubtitleTrack, source: &Path) -> String {
    let dump = TrackDump {
        metadata: DumpMetadata {
            source_file: source.display().to_string(),
            cue_count: track.len(),
        },
        cues: track
            .cues()
            .iter()
            .enumerate()
            .map(|(i, cue)| DumpCue {
                index: i + 1,
                start: cue.start.as_secs_f64(),
                start_formatted: format_timestamp(cue.start),
                text: cue.text.clone(),
            })
            .collect(),
    };

    serde_json::to_string_pretty(&dump).unwrap_or_else(|_| "{}".to_string())
}

fn format_timestamp(d: Duration) -> String {
    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    let millis = d.subsec_millis();
    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    // Load configuration, then apply CLI overrides
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(ms) = cli.interval_ms {
        config.poll_interval_ms = ms;
    }
    if let Some(rate) = cli.rate {
        config.playback_rate = rate;
    }
    config
        .validate()
        .context("Configuration validation failed")?;

    // A missing transcript is not fatal: playback continues in silence.
    let track = match SubtitleTrack::load(&cli.transcript) {
        Ok(track) => track,
        Err(e) => {
            warn!("{}; continuing without subtitles", e);
            SubtitleTrack::empty()
        }
    };

    if cli.dump_json {
        println!("{}", dump_track(&track, &cli.transcript));
        return Ok(());
    }

    info!("Transcript: {}", cli.transcript.display());
    info!("Cues:       {}", track.len());
    info!("Rate:       {}x", config.playback_rate);

    let total = track
        .last_start()
        .map(|start| start + config.tail())
        .unwrap_or_default();
    if total.is_zero() {
        info!("No cues to play");
        return Ok(());
    }

    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let flag = interrupted.clone();
        ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
            .context("Failed to install Ctrl+C handler")?;
    }

    let bar = ProgressBar::new(total.as_secs());
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.green} {pos}/{len}s")
            .unwrap(),
    );

    let clock = Arc::new(SimulatedClock {
        started: Instant::now(),
        rate: config.playback_rate,
    });
    let sink = Arc::new(TerminalSink { bar: bar.clone() });

    let session = NarrationSession::start(
        track,
        clock.clone(),
        sink,
        SessionConfig {
            poll_interval: config.poll_interval(),
        },
    );

    // Track the simulated position until the tail runs out or Ctrl+C.
    loop {
        let position = clock.position().unwrap_or_default();
        if position >= total || interrupted.load(Ordering::Relaxed) {
            break;
        }
        bar.set_position(position.as_secs().min(total.as_secs()));
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    session.stop().await;

    if interrupted.load(Ordering::Relaxed) {
        bar.abandon();
        info!("Playback interrupted");
    } else {
        bar.finish_and_clear();
        println!("{} Narration finished", style("✓").green());
    }

    Ok(())
}
