// WebVTT-style transcript parsing
use super::Cue;
use regex::Regex;
use std::time::Duration;
use tracing::debug;

/// Timing separator between the start and end timestamps of a cue block.
const TIMING_SEPARATOR: &str = " --> ";

/// Parse a raw WebVTT-style transcript into cues, in source order.
///
/// Blocks are separated by blank lines. A block that cannot be parsed is
/// skipped rather than failing the whole transcript, so one bad cue never
/// blanks the experience. The optional `WEBVTT` header block falls out the
/// same way: it has no timing line.
pub fn parse_cues(raw: &str) -> Vec<Cue> {
    // Blank-line boundary: two or more consecutive newlines.
    let block_boundary = Regex::new(r"\n{2,}").expect("Invalid regex");

    let normalized = raw.replace("\r\n", "\n");
    let mut cues = Vec::new();

    for block in block_boundary.split(&normalized) {
        match parse_block(block) {
            Some(cue) => cues.push(cue),
            None => {
                if !block.trim().is_empty() {
                    debug!("Skipping non-cue block: {:?}", block.lines().next());
                }
            }
        }
    }

    cues
}

fn parse_block(block: &str) -> Option<Cue> {
    let lines: Vec<&str> = block.lines().filter(|line| !line.trim().is_empty()).collect();
    if lines.len() < 2 {
        return None;
    }

    let timing_idx = lines.iter().position(|line| line.contains("-->"))?;
    let timing_line = lines[timing_idx];

    let mut timing_parts = timing_line.splitn(2, TIMING_SEPARATOR);
    let start = parse_timestamp(timing_parts.next()?)?;

    // The end time only validates the block; cue duration is implied by the
    // next cue's start.
    if let Some(end_token) = timing_parts.next() {
        if parse_timestamp(end_token).is_none() {
            debug!("Unparseable end time in timing line: {:?}", timing_line);
        }
    }

    let text = lines[timing_idx + 1..].join(" ");

    Some(Cue { start, text })
}

/// Parse an `HH:MM:SS.mmm` timestamp token into a playback position.
///
/// Comma decimal separators (the SRT convention) are normalized to periods
/// first; anything that does not then split into three numeric components
/// is rejected.
fn parse_timestamp(token: &str) -> Option<Duration> {
    let normalized = token.trim().replace(',', ".");
    let parts: Vec<&str> = normalized.split(':').collect();
    if parts.len() != 3 {
        return None;
    }

    let hours: f64 = parts[0].parse().ok()?;
    let minutes: f64 = parts[1].parse().ok()?;
    let seconds: f64 = parts[2].parse().ok()?;
    if hours < 0.0 || minutes < 0.0 || seconds < 0.0 {
        return None;
    }

    let total = hours * 3600.0 + minutes * 60.0 + seconds;
    Duration::try_from_secs_f64(total).ok()
}
