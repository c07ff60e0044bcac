use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use fault_lab_abstract::{TestConfig, TestConfigOverride};
use fault_lab_simulator::{CancelHandle, RunTrace, StressTest, scenario_runner};

#[derive(Parser, Debug)]
#[command(author, version, about = "Fault-injection stress test for a simulated router network")]
struct Args {
    /// Load base test parameters from a TOML file.
    #[arg(long, conflicts_with = "scenario")]
    config: Option<PathBuf>,

    /// Run a scenario file and check its assertions. Individual flags below
    /// override the scenario's configuration.
    #[arg(long)]
    scenario: Option<PathBuf>,

    #[arg(long)]
    num_routers: Option<u32>,
    #[arg(long)]
    num_packets: Option<u32>,
    #[arg(long)]
    error_rate: Option<f64>,
    #[arg(long)]
    stress_level: Option<f64>,

    /// Test duration in seconds.
    #[arg(long)]
    duration: Option<u64>,

    /// Payload bytes per packet.
    #[arg(long)]
    packet_size: Option<usize>,

    /// Seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,

    /// Write a JSON trace of the finished run.
    #[arg(long)]
    trace_out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt::init();
    info!("fault-lab-sim starting…");

    let cancel = CancelHandle::new();
    spawn_ctrl_c_watcher(cancel.clone());

    let trace = if let Some(path) = args.scenario.clone() {
        let overrides = args.overrides();
        tokio::task::spawn_blocking(move || {
            scenario_runner::run_scenario(&path, &overrides, cancel)
        })
            .await
            .context("Scenario task panicked")??
    } else {
        let config = args.build_config()?;
        tokio::task::spawn_blocking(move || run_stress_test(config, cancel))
            .await
            .context("Stress test task panicked")??
    };

    if let Some(trace_path) = &args.trace_out {
        write_trace(trace_path, &trace)?;
    }

    Ok(())
}

impl Args {
    /// Defaults, then the `--config` file, then individual flags.
    fn build_config(&self) -> Result<TestConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => TestConfig::default(),
        };
        self.overrides().apply_to(&mut config);
        Ok(config)
    }

    fn overrides(&self) -> TestConfigOverride {
        TestConfigOverride {
            num_routers: self.num_routers,
            num_packets: self.num_packets,
            error_rate: self.error_rate,
            stress_level: self.stress_level,
            test_duration: self.duration,
            packet_size: self.packet_size,
            seed: self.seed,
        }
    }
}

fn spawn_ctrl_c_watcher(cancel: CancelHandle) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current transmission");
            cancel.cancel();
        }
    });
}

fn run_stress_test(config: TestConfig, cancel: CancelHandle) -> Result<RunTrace> {
    let mut test = StressTest::new(config)
        .context("Invalid test configuration")?
        .with_cancel_handle(cancel);
    test.run().context("Stress test produced no report")?;
    Ok(test.export_trace()?)
}

fn load_config(path: &Path) -> Result<TestConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: TestConfig = toml::from_str(&content).context("Failed to parse config file")?;
    Ok(config)
}

fn write_trace(path: &Path, trace: &RunTrace) -> Result<()> {
    let data = serde_json::to_vec_pretty(trace).context("Failed to serialize run trace")?;
    fs::write(path, &data)
        .with_context(|| format!("Failed to write trace file {}", path.display()))?;
    info!("Trace written to {}", path.display());
    Ok(())
}
