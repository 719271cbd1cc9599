use super::{PlaybackClock, TextSink};
use crate::subtitle::SubtitleTrack;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Configuration for a narration session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How often the playback position is polled.
    pub poll_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(200),
        }
    }
}

/// Drives subtitle display for one playback session.
///
/// Owns a scheduled task that polls the playback clock at a fixed cadence,
/// resolves the active cue against the track, and forwards the text to the
/// sink whenever it changes. Each tick is a fresh, stateless lookup, so
/// seeks in either direction need no special handling.
///
/// The task's lifetime is scoped to the session: [`stop`](Self::stop)
/// cancels it cooperatively and waits for it to wind down, and dropping the
/// session aborts it outright.
pub struct NarrationSession {
    cancelled: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl NarrationSession {
    /// Spawn the polling task and start forwarding subtitle text.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(
        track: SubtitleTrack,
        clock: Arc<dyn PlaybackClock>,
        sink: Arc<dyn TextSink>,
        config: SessionConfig,
    ) -> Self {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(config.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            let mut last_shown: Option<String> = None;

            loop {
                ticker.tick().await;
                if flag.load(Ordering::Relaxed) {
                    break;
                }

                let Some(position) = clock.position() else {
                    continue;
                };

                let text = track.text_at(position);
                if last_shown.as_deref() != Some(text) {
                    sink.show(text);
                    last_shown = Some(text.to_string());
                }
            }

            debug!("Narration session wound down");
        });

        Self {
            cancelled,
            handle: Some(handle),
        }
    }

    /// Whether the polling task is still running.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Request cancellation and wait for the task to observe it.
    pub async fn stop(mut self) {
        self.cancelled.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for NarrationSession {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
