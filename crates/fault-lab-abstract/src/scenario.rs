use crate::config::TestConfig;
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct StressScenario {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub config: TestConfigOverride,
    #[serde(default)]
    pub assertions: Vec<StressAssertion>,
}

/// Partial configuration layered over a base `TestConfig`.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct TestConfigOverride {
    pub num_routers: Option<u32>,
    pub num_packets: Option<u32>,
    pub error_rate: Option<f64>,
    pub stress_level: Option<f64>,
    pub test_duration: Option<u64>,
    pub packet_size: Option<usize>,
    pub seed: Option<u64>,
}

impl TestConfigOverride {
    pub fn apply_to(&self, config: &mut TestConfig) {
        if let Some(v) = self.num_routers {
            config.num_routers = v;
        }
        if let Some(v) = self.num_packets {
            config.num_packets = v;
        }
        if let Some(v) = self.error_rate {
            config.error_rate = v;
        }
        if let Some(v) = self.stress_level {
            config.stress_level = v;
        }
        if let Some(v) = self.test_duration {
            config.test_duration = v;
        }
        if let Some(v) = self.packet_size {
            config.packet_size = v;
        }
        if let Some(v) = self.seed {
            config.seed = Some(v);
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StressAssertion {
    /// Reliability must be at least `pct` percent
    MinReliability { pct: f64 },
    /// Reliability must be at most `pct` percent
    MaxReliability { pct: f64 },
    /// Average simulated latency must not exceed `secs`
    MaxAvgLatency { secs: f64 },
    /// At least `count` transmissions must have completed
    MinTotalPackets { count: u64 },
    /// No more than `count` transmissions may have been corrupted
    MaxErrorPackets { count: u64 },
}
