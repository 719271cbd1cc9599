pub mod session;

pub use session::{NarrationSession, SessionConfig};

use std::time::Duration;

/// Reports the current position of some audio playback source.
pub trait PlaybackClock: Send + Sync {
    /// Current playback position, or `None` while nothing is playing.
    fn position(&self) -> Option<Duration>;
}

/// Receives the text that should currently be on screen.
pub trait TextSink: Send + Sync {
    /// Called with the new active text; an empty string clears the display.
    fn show(&self, text: &str);
}
