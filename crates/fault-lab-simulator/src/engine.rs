use crate::clock::{Clock, SystemClock};
use crate::error::SimError;
use crate::injector::FaultInjector;
use crate::stats::RunStatistics;
use crate::trace::{RunTrace, StressReport};
use crate::traffic::TrafficGenerator;
use bytes::BytesMut;
use fault_lab_abstract::{DelayOnlyNetwork, NetworkUnderTest, Packet, TestConfig, TrafficPair};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Bounds of the base transmission delay in seconds, before stress scaling.
const MIN_DELAY_SECS: f64 = 0.1;
const MAX_DELAY_SECS: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    NotStarted,
    Running,
    Completed,
}

/// Requests early termination of a running stress test. Honoured between
/// transmissions only.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

pub struct StressTest {
    config: TestConfig,
    rng: StdRng,
    clock: Box<dyn Clock>,
    network: Box<dyn NetworkUnderTest + Send>,

    generator: TrafficGenerator,
    injector: FaultInjector,
    stats: RunStatistics,

    state: DriverState,
    // Clock reading when `run` was entered
    run_start: Duration,
    rounds: u64,
    cancel: CancelHandle,
    cancelled: bool,
}

impl StressTest {
    /// Validate `config` and prepare a run against the wall clock and a
    /// delay-only network.
    pub fn new(config: TestConfig) -> Result<Self, SimError> {
        config.validate()?;
        if config.stress_level > 1.0 {
            warn!(
                "stress_level {} is above the intended [0.0, 1.0] range",
                config.stress_level
            );
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let generator = TrafficGenerator::new(&config)?;
        let injector = FaultInjector::new(config.error_rate);

        Ok(Self {
            config,
            rng,
            clock: Box::new(SystemClock::new()),
            network: Box::new(DelayOnlyNetwork),
            generator,
            injector,
            stats: RunStatistics::new(),
            state: DriverState::NotStarted,
            run_start: Duration::ZERO,
            rounds: 0,
            cancel: CancelHandle::new(),
            cancelled: false,
        })
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_network(mut self, network: impl NetworkUnderTest + Send + 'static) -> Self {
        self.network = Box::new(network);
        self
    }

    /// Share an externally owned cancel handle (e.g. one wired to Ctrl-C).
    pub fn with_cancel_handle(mut self, cancel: CancelHandle) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn config(&self) -> &TestConfig {
        &self.config
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn statistics(&self) -> &RunStatistics {
        &self.stats
    }

    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    fn elapsed(&self) -> Duration {
        self.clock.elapsed().saturating_sub(self.run_start)
    }

    /// Run rounds until `test_duration` has elapsed, then summarize.
    ///
    /// The duration is checked only before each round, so the final round
    /// always runs to completion and the run may overshoot by up to one
    /// round's worth of delays. A run that recorded nothing (only possible
    /// when cancelled before the first transmission) yields
    /// [`StatsError::EmptyRun`](crate::stats::StatsError::EmptyRun).
    pub fn run(&mut self) -> Result<StressReport, SimError> {
        if self.state != DriverState::NotStarted {
            return Err(SimError::AlreadyRun);
        }
        self.state = DriverState::Running;
        self.run_start = self.clock.elapsed();
        info!(
            "Starting stress test: {} routers, {} packets/round, error rate {}, stress {}, {}s",
            self.config.num_routers,
            self.config.num_packets,
            self.config.error_rate,
            self.config.stress_level,
            self.config.test_duration
        );

        let duration = self.config.duration();
        'rounds: while self.elapsed() < duration {
            if self.cancel.is_cancelled() {
                self.cancelled = true;
                break;
            }
            let pattern = self.generator.generate(&mut self.rng);
            self.rounds += 1;
            debug!(
                "Round {} at {:.3}s: {} pairs",
                self.rounds,
                self.elapsed().as_secs_f64(),
                pattern.len()
            );

            for pair in pattern {
                if self.cancel.is_cancelled() {
                    self.cancelled = true;
                    break 'rounds;
                }
                self.transmit(pair);
            }
        }

        self.state = DriverState::Completed;
        if self.cancelled {
            info!(
                "Stress test cancelled after {} transmissions",
                self.stats.total_packets()
            );
        }

        let report = self.stats.summarize()?;
        info!("Test Statistics:");
        for line in report.lines() {
            info!("{}", line);
        }
        Ok(report)
    }

    /// Synthesize, corrupt, hand over, delay and record one packet.
    fn transmit(&mut self, pair: TrafficPair) {
        let mut payload = BytesMut::zeroed(self.config.packet_size);
        self.rng.fill(&mut payload[..]);

        let mut corrupted = self
            .injector
            .inject(&mut self.rng, &mut payload[..])
            .is_some();
        let packet = Packet::new(pair, payload);

        if let Err(err) = self.network.transmit(&packet, corrupted) {
            warn!("{}", err);
            corrupted = true;
        }

        let delay_secs = self.rng.random_range(MIN_DELAY_SECS..MAX_DELAY_SECS)
            * (1.0 + self.config.stress_level);
        // `validate` bounds stress_level so the delay always fits
        let delay = Duration::try_from_secs_f64(delay_secs).unwrap_or(Duration::MAX);
        self.clock.sleep(delay);

        let elapsed = self.elapsed();
        self.stats.record_transmission(delay, corrupted, elapsed);
    }

    /// Serializable snapshot of a completed run.
    pub fn export_trace(&self) -> Result<RunTrace, SimError> {
        let report = self.stats.summarize()?;
        Ok(RunTrace {
            config: self.config.clone(),
            report,
            rounds: self.rounds,
            elapsed_secs: self.elapsed().as_secs_f64(),
            cancelled: self.cancelled,
            latency_samples: self.stats.latency_samples().to_vec(),
            throughput_samples: self.stats.throughput_samples().to_vec(),
        })
    }
}
