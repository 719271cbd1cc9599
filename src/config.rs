use crate::error::{Result, SubsyncError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Polling cadence for the narration session, in milliseconds.
    pub poll_interval_ms: u64,
    /// Simulated playback rate for the demo player (1.0 = real time).
    pub playback_rate: f64,
    /// How long playback keeps running after the last cue starts, in seconds.
    pub tail_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval_ms: 200,
            playback_rate: 1.0,
            tail_secs: 5,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Load from config file if it exists
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path)?;
                if let Ok(file_config) = toml::from_str::<Config>(&contents) {
                    config = file_config;
                }
            }
        }

        // Override with environment variables
        if let Ok(interval) = std::env::var("SUBSYNC_POLL_INTERVAL_MS") {
            if let Ok(ms) = interval.parse() {
                config.poll_interval_ms = ms;
            }
        }
        if let Ok(rate) = std::env::var("SUBSYNC_PLAYBACK_RATE") {
            if let Ok(r) = rate.parse() {
                config.playback_rate = r;
            }
        }
        if let Ok(tail) = std::env::var("SUBSYNC_TAIL_SECS") {
            if let Ok(t) = tail.parse() {
                config.tail_secs = t;
            }
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(SubsyncError::Config(
                "Poll interval must be greater than 0".to_string(),
            ));
        }

        if !self.playback_rate.is_finite() || self.playback_rate <= 0.0 {
            return Err(SubsyncError::Config(format!(
                "Playback rate must be a positive number, got {}",
                self.playback_rate
            )));
        }

        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn tail(&self) -> Duration {
        Duration::from_secs(self.tail_secs)
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("subsync").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.poll_interval_ms, 200);
        assert_eq!(config.playback_rate, 1.0);
        assert_eq!(config.tail_secs, 5);
    }

    #[test]
    fn test_poll_interval_conversion() {
        let config = Config::default();
        assert_eq!(config.poll_interval(), Duration::from_millis(200));
        assert_eq!(config.tail(), Duration::from_secs(5));
    }

    #[test]
    fn test_validate_default_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_interval() {
        let config = Config {
            poll_interval_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_rate() {
        let mut config = Config::default();

        config.playback_rate = 0.0;
        assert!(config.validate().is_err());

        config.playback_rate = -2.0;
        assert!(config.validate().is_err());

        config.playback_rate = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_roundtrips_through_toml() {
        let config = Config {
            poll_interval_ms: 100,
            playback_rate: 2.0,
            tail_secs: 3,
        };

        let serialized = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(parsed.poll_interval_ms, 100);
        assert_eq!(parsed.playback_rate, 2.0);
        assert_eq!(parsed.tail_secs, 3);
    }
}
