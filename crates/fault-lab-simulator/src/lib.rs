pub mod clock;
pub mod engine;
pub mod error;
pub mod injector;
pub mod scenario_runner;
pub mod stats;
pub mod trace;
pub mod traffic;

pub use clock::{Clock, SimulatedClock, SystemClock};
pub use engine::{CancelHandle, DriverState, StressTest};
pub use error::SimError;
pub use injector::{BitFlip, FaultInjector};
pub use stats::{RunStatistics, StatsError};
pub use trace::{RunTrace, StressReport};
pub use traffic::TrafficGenerator;
