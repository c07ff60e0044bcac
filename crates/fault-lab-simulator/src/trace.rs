use fault_lab_abstract::TestConfig;
use serde::Serialize;
use std::fmt;

/// Final summary of a stress-test run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StressReport {
    pub total_packets: u64,
    pub error_packets: u64,
    /// Share of uncorrupted transmissions, 0-100.
    pub reliability_pct: f64,
    /// Mean simulated delay in seconds.
    pub avg_latency: f64,
    /// Mean of the per-transmission throughput samples, packets/second.
    pub avg_throughput: f64,
}

impl StressReport {
    /// The report as individual status lines, in output order.
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Total Packets: {}", self.total_packets),
            format!("Error Packets: {}", self.error_packets),
            format!("Reliability: {:.2}%", self.reliability_pct),
            format!("Average Latency: {:.3} seconds", self.avg_latency),
            format!("Average Throughput: {:.2} packets/second", self.avg_throughput),
        ]
    }
}

impl fmt::Display for StressReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Test Statistics:")?;
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Everything a finished run produced, for `--trace-out`.
#[derive(Debug, Clone, Serialize)]
pub struct RunTrace {
    pub config: TestConfig,
    pub report: StressReport,
    pub rounds: u64,
    pub elapsed_secs: f64,
    pub cancelled: bool,
    pub latency_samples: Vec<f64>,
    pub throughput_samples: Vec<f64>,
}
