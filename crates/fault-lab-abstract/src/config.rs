use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::packet::PACKET_SIZE;

/// Parameters of one stress-test run. Built once at startup and never mutated
/// while the run is in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    /// Number of routers taking part; router ids are `0..num_routers`.
    pub num_routers: u32,
    /// Source/destination pairs generated per traffic-pattern round.
    pub num_packets: u32,
    /// Per-packet probability of bit-error injection, in `[0.0, 1.0]`.
    pub error_rate: f64,
    /// Scales the simulated transmission delay by `1.0 + stress_level`.
    pub stress_level: f64,
    /// Wall-clock bound of the run in seconds, checked between rounds.
    pub test_duration: u64,
    /// Payload length of every synthesized packet.
    pub packet_size: usize,
    /// Fixed seed for a reproducible run. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            num_routers: 64,
            num_packets: 1000,
            error_rate: 0.001,
            stress_level: 0.5,
            test_duration: 60,
            packet_size: PACKET_SIZE,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("num_routers must be at least 2 to form distinct pairs, got {0}")]
    TooFewRouters(u32),
    #[error("num_packets must be positive")]
    NoPackets,
    #[error("error_rate must lie in [0.0, 1.0], got {0}")]
    ErrorRateOutOfRange(f64),
    #[error("stress_level must be a finite, non-negative number, got {0}")]
    InvalidStressLevel(f64),
    #[error("stress_level {0} scales the simulated delay beyond what a Duration can hold")]
    StressLevelTooLarge(f64),
    #[error("test_duration must be at least one second")]
    ZeroDuration,
    #[error("packet_size must be at least one byte")]
    EmptyPacket,
}

impl TestConfig {
    /// Check every field against its declared range. Called before a run
    /// starts; a failure here is fatal to the run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_routers < 2 {
            return Err(ConfigError::TooFewRouters(self.num_routers));
        }
        if self.num_packets == 0 {
            return Err(ConfigError::NoPackets);
        }
        if !(0.0..=1.0).contains(&self.error_rate) {
            // NaN fails `contains` as well
            return Err(ConfigError::ErrorRateOutOfRange(self.error_rate));
        }
        if !self.stress_level.is_finite() || self.stress_level < 0.0 {
            return Err(ConfigError::InvalidStressLevel(self.stress_level));
        }
        // Longest possible delay is 1.0s scaled by the stress factor
        if Duration::try_from_secs_f64(1.0 + self.stress_level).is_err() {
            return Err(ConfigError::StressLevelTooLarge(self.stress_level));
        }
        if self.test_duration == 0 {
            return Err(ConfigError::ZeroDuration);
        }
        if self.packet_size == 0 {
            return Err(ConfigError::EmptyPacket);
        }
        Ok(())
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.test_duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(TestConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_single_router() {
        let config = TestConfig {
            num_routers: 1,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::TooFewRouters(1)));
    }

    #[test]
    fn rejects_out_of_range_fields() {
        let base = TestConfig::default();

        let cfg = TestConfig {
            num_packets: 0,
            ..base.clone()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::NoPackets));

        let cfg = TestConfig {
            error_rate: 1.5,
            ..base.clone()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ErrorRateOutOfRange(1.5)));

        let cfg = TestConfig {
            error_rate: f64::NAN,
            ..base.clone()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::ErrorRateOutOfRange(_))
        ));

        let cfg = TestConfig {
            stress_level: -0.1,
            ..base.clone()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidStressLevel(-0.1)));

        let cfg = TestConfig {
            test_duration: 0,
            ..base.clone()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroDuration));

        let cfg = TestConfig {
            packet_size: 0,
            ..base
        };
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyPacket));
    }

    #[test]
    fn rejects_stress_level_beyond_duration_range() {
        let cfg = TestConfig {
            stress_level: 1e22,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::StressLevelTooLarge(1e22)));

        let cfg = TestConfig {
            stress_level: 1e6,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn boundary_rates_are_accepted() {
        for rate in [0.0, 1.0] {
            let cfg = TestConfig {
                error_rate: rate,
                stress_level: 2.0,
                ..Default::default()
            };
            assert_eq!(cfg.validate(), Ok(()));
        }
    }
}
