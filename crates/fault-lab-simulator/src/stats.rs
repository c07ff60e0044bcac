use std::time::Duration;
use thiserror::Error;

use crate::trace::StressReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StatsError {
    #[error("no transmissions were recorded; cannot compute a report")]
    EmptyRun,
}

/// Run-wide counters and samples. Owned by one run; the only mutation path is
/// [`RunStatistics::record_transmission`].
#[derive(Debug, Clone, Default)]
pub struct RunStatistics {
    total_packets: u64,
    error_packets: u64,
    latency_samples: Vec<f64>,
    throughput_samples: Vec<f64>,
}

impl RunStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one finished transmission as a single unit: count it, count the
    /// error if any, append its latency and a throughput sample of
    /// `total_packets / elapsed`. The throughput sample is skipped while no
    /// time has elapsed since the run started.
    pub fn record_transmission(&mut self, latency: Duration, corrupted: bool, elapsed: Duration) {
        self.total_packets += 1;
        if corrupted {
            self.error_packets += 1;
        }
        self.latency_samples.push(latency.as_secs_f64());

        let elapsed = elapsed.as_secs_f64();
        if elapsed > 0.0 {
            self.throughput_samples
                .push(self.total_packets as f64 / elapsed);
        }
    }

    pub fn total_packets(&self) -> u64 {
        self.total_packets
    }

    pub fn error_packets(&self) -> u64 {
        self.error_packets
    }

    pub fn latency_samples(&self) -> &[f64] {
        &self.latency_samples
    }

    pub fn throughput_samples(&self) -> &[f64] {
        &self.throughput_samples
    }

    pub fn summarize(&self) -> Result<StressReport, StatsError> {
        if self.total_packets == 0 {
            return Err(StatsError::EmptyRun);
        }
        let reliability_pct =
            (1.0 - self.error_packets as f64 / self.total_packets as f64) * 100.0;
        Ok(StressReport {
            total_packets: self.total_packets,
            error_packets: self.error_packets,
            reliability_pct,
            avg_latency: mean(&self.latency_samples),
            avg_throughput: mean(&self.throughput_samples),
        })
    }
}

fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}
