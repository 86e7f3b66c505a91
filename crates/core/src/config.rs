use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_METRICS_HZ: u32 = 10;
pub const DEFAULT_WINDOW_CAPACITY: usize = 30;
pub const DEFAULT_WPM_WINDOW_SECS: u64 = 30;
pub const DEFAULT_NOISE_FLOOR: f64 = 0.05;
pub const DEFAULT_MAX_HISTORY: usize = 3000;

/// Publish rate of the metrics ticker, in events per second.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetricsRate(u32);

impl MetricsRate {
    pub fn new(hz: u32) -> Result<Self, ConfigError> {
        if hz == 0 {
            return Err(ConfigError::ZeroRate);
        }
        // The tick period is expressed in whole milliseconds.
        if hz > 1000 {
            return Err(ConfigError::RateTooHigh(hz));
        }
        Ok(Self(hz))
    }

    pub fn hz(&self) -> u32 {
        self.0
    }

    pub fn period(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.0))
    }
}

impl Default for MetricsRate {
    fn default() -> Self {
        Self(DEFAULT_METRICS_HZ)
    }
}

/// Expected ambient loudness; samples below twice this value count as silence.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct NoiseFloor(f64);

impl NoiseFloor {
    pub fn new(value: f64) -> Result<Self, ConfigError> {
        if !value.is_finite() || value <= 0.0 || value >= 1.0 {
            return Err(ConfigError::NoiseFloorOutOfRange(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Loudness below this threshold is treated as a pause.
    pub fn silence_threshold(&self) -> f64 {
        2.0 * self.0
    }
}

impl Default for NoiseFloor {
    fn default() -> Self {
        Self(DEFAULT_NOISE_FLOOR)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionConfig {
    /// Fixed cadence of the publish ticker.
    pub metrics_rate: MetricsRate,

    /// Sample capacity of each rolling window (one sample per tick).
    pub window_capacity: usize,

    /// Trailing window over which words-per-minute is computed.
    pub wpm_window: Duration,

    /// Ambient loudness used for adaptive pause detection.
    pub noise_floor: NoiseFloor,

    /// Maximum number of retained per-tick events; oldest evicted beyond it.
    pub max_history: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            metrics_rate: MetricsRate::default(),
            window_capacity: DEFAULT_WINDOW_CAPACITY,
            wpm_window: Duration::from_secs(DEFAULT_WPM_WINDOW_SECS),
            noise_floor: NoiseFloor::default(),
            max_history: DEFAULT_MAX_HISTORY,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("metrics rate must be > 0 Hz")]
    ZeroRate,
    #[error("metrics rate must be at most 1000 Hz, got {0}")]
    RateTooHigh(u32),
    #[error("noise floor must be in (0, 1), got {0}")]
    NoiseFloorOutOfRange(f64),
}
