pub mod config;
pub mod interface;
pub mod packet;
pub mod scenario;

pub use interface::{DelayOnlyNetwork, NetworkUnderTest, TransmitError};
pub use packet::{PACKET_SIZE, Packet, RouterId, TrafficPair};

pub use config::{ConfigError, TestConfig};
pub use scenario::{StressAssertion, StressScenario, TestConfigOverride};
