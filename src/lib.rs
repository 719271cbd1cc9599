pub mod config;
pub mod error;
pub mod playback;
pub mod subtitle;

pub use config::Config;
pub use error::{Result, SubsyncError};
pub use playback::{NarrationSession, PlaybackClock, SessionConfig, TextSink};
pub use subtitle::{Cue, SubtitleTrack};
