pub mod vtt;

use crate::error::{Result, SubsyncError};
use std::path::Path;
use std::time::Duration;

/// A single timed caption entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    /// Playback position at which this cue becomes active.
    pub start: Duration,
    /// Display text, already flattened to a single line. May be empty.
    pub text: String,
}

/// Ordered collection of all cues for one playback session.
///
/// Immutable after construction; if the transcript changes, build a new
/// track. Cues are held in non-decreasing start order (stable, so cues
/// sharing a start time keep their source order), which is what the
/// active-cue lookup relies on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtitleTrack {
    cues: Vec<Cue>,
}

impl SubtitleTrack {
    /// A track with no cues. Every lookup resolves to empty text.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a track from parsed cues, normalizing them into start order.
    fn from_cues(mut cues: Vec<Cue>) -> Self {
        cues.sort_by_key(|cue| cue.start);
        Self { cues }
    }

    /// Parse a raw WebVTT-style transcript into a track.
    ///
    /// Never fails: malformed blocks are skipped individually, so the worst
    /// case is an empty track.
    pub fn parse(raw: &str) -> Self {
        Self::from_cues(vtt::parse_cues(raw))
    }

    /// Read and parse a transcript file.
    ///
    /// An unreadable file yields [`SubsyncError::TranscriptUnavailable`];
    /// callers should continue with [`SubtitleTrack::empty`] rather than
    /// abort playback.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SubsyncError::TranscriptUnavailable(format!("{}: {}", path.display(), e))
        })?;
        Ok(Self::parse(&raw))
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Start time of the last cue, if any.
    pub fn last_start(&self) -> Option<Duration> {
        self.cues.last().map(|cue| cue.start)
    }

    /// The cue active at `position`: the greatest cue whose start is at or
    /// before `position`. A cue stays active until the next cue's start;
    /// the last cue stays active indefinitely. `None` before the first cue.
    pub fn cue_at(&self, position: Duration) -> Option<&Cue> {
        let idx = self.cues.partition_point(|cue| cue.start <= position);
        if idx == 0 {
            None
        } else {
            Some(&self.cues[idx - 1])
        }
    }

    /// Text to display at `position`; empty when no cue is active.
    pub fn text_at(&self, position: Duration) -> &str {
        self.cue_at(position).map(|cue| cue.text.as_str()).unwrap_or("")
    }

    /// Float-seconds variant of [`text_at`](Self::text_at) for collaborators
    /// that report playback position as seconds. Negative or non-finite
    /// positions precede all cues and resolve to empty text.
    pub fn text_at_secs(&self, seconds: f64) -> &str {
        if !seconds.is_finite() || seconds < 0.0 {
            return "";
        }
        // Positions beyond Duration's range still sit after the last cue.
        let position = Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX);
        self.text_at(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(cues: &[(f64, &str)]) -> SubtitleTrack {
        SubtitleTrack::from_cues(
            cues.iter()
                .map(|(secs, text)| Cue {
                    start: Duration::from_secs_f64(*secs),
                    text: text.to_string(),
                })
                .collect(),
        )
    }

    #[test]
    fn test_resolve_before_first_cue() {
        let track = track(&[(1.0, "A"), (4.0, "B")]);
        assert_eq!(track.text_at_secs(0.0), "");
        assert_eq!(track.text_at_secs(0.5), "");
    }

    #[test]
    fn test_resolve_boundary_belongs_to_later_cue() {
        let track = track(&[(1.0, "A"), (4.0, "B")]);
        assert_eq!(track.text_at_secs(1.0), "A");
        assert_eq!(track.text_at_secs(3.999), "A");
        assert_eq!(track.text_at_secs(4.0), "B");
    }

    #[test]
    fn test_resolve_last_cue_stays_active() {
        let track = track(&[(1.0, "A"), (4.0, "B"), (7.5, "C")]);
        assert_eq!(track.text_at_secs(7.5), "C");
        assert_eq!(track.text_at_secs(100.0), "C");
        assert_eq!(track.text_at(Duration::from_secs(86400)), "C");
    }

    #[test]
    fn test_resolve_empty_track() {
        let track = SubtitleTrack::empty();
        assert_eq!(track.text_at_secs(0.0), "");
        assert_eq!(track.text_at_secs(42.0), "");
        assert!(track.cue_at(Duration::from_secs(1)).is_none());
    }

    #[test]
    fn test_resolve_negative_position() {
        let track = track(&[(1.0, "A")]);
        assert_eq!(track.text_at_secs(-3.0), "");
        assert_eq!(track.text_at_secs(f64::NAN), "");
    }

    #[test]
    fn test_lookup_is_stateless_across_seeks() {
        let track = track(&[(1.0, "A"), (4.0, "B"), (7.5, "C")]);
        assert_eq!(track.text_at_secs(8.0), "C");
        assert_eq!(track.text_at_secs(2.0), "A");
        assert_eq!(track.text_at_secs(5.0), "B");
    }

    #[test]
    fn test_unsorted_cues_are_normalized() {
        let track = track(&[(4.0, "B"), (1.0, "A"), (7.5, "C")]);
        assert_eq!(track.cues()[0].text, "A");
        assert_eq!(track.text_at_secs(2.0), "A");
        assert_eq!(track.text_at_secs(4.5), "B");
    }

    #[test]
    fn test_equal_start_times_keep_source_order() {
        let track = track(&[(1.0, "first"), (1.0, "second")]);
        assert_eq!(track.cues()[0].text, "first");
        // The later entry wins the lookup, since both starts are <= position.
        assert_eq!(track.text_at_secs(1.0), "second");
    }

    #[test]
    fn test_last_start() {
        assert_eq!(SubtitleTrack::empty().last_start(), None);
        let track = track(&[(1.0, "A"), (7.5, "C")]);
        assert_eq!(track.last_start(), Some(Duration::from_secs_f64(7.5)));
    }
}
