use anyhow::{Context, Result};
use fault_lab_abstract::{StressAssertion, StressScenario, TestConfig, TestConfigOverride};
use std::fs;
use std::path::Path;
use tracing::{error, info};

use crate::clock::{Clock, SystemClock};
use crate::engine::{CancelHandle, StressTest};
use crate::trace::{RunTrace, StressReport};

/// Result of checking one assertion against a report.
#[derive(Debug, Clone, PartialEq)]
pub struct AssertionOutcome {
    pub assertion: StressAssertion,
    pub passed: bool,
    pub detail: String,
}

pub fn load_scenario(path: &Path) -> Result<StressScenario> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
    parse_scenario(&content)
}

pub fn parse_scenario(content: &str) -> Result<StressScenario> {
    toml::from_str(content).context("Failed to parse scenario file")
}

/// The effective configuration of a scenario: defaults, then the scenario's
/// own overrides, then `overrides` from the caller (e.g. command-line flags).
pub fn scenario_config(
    scenario: &StressScenario,
    overrides: &TestConfigOverride,
) -> TestConfig {
    let mut config = TestConfig::default();
    scenario.config.apply_to(&mut config);
    overrides.apply_to(&mut config);
    config
}

/// Load and run a scenario against the wall clock, then check its assertions.
/// Fails listing every assertion that did not hold.
pub fn run_scenario(
    path: &Path,
    overrides: &TestConfigOverride,
    cancel: CancelHandle,
) -> Result<RunTrace> {
    let scenario = load_scenario(path)?;
    execute(&scenario, overrides, SystemClock::new(), cancel)
}

/// Run an already loaded scenario on `clock` and check its assertions.
pub fn execute(
    scenario: &StressScenario,
    overrides: &TestConfigOverride,
    clock: impl Clock + 'static,
    cancel: CancelHandle,
) -> Result<RunTrace> {
    info!("Running scenario '{}': {}", scenario.name, scenario.description);

    let mut test = StressTest::new(scenario_config(scenario, overrides))
        .with_context(|| format!("Scenario '{}' has an invalid configuration", scenario.name))?
        .with_clock(clock)
        .with_cancel_handle(cancel);
    let report = test.run()?;
    check_assertions(scenario, &report)?;
    Ok(test.export_trace()?)
}

/// Evaluate and log every assertion of `scenario`; error if any failed.
pub fn check_assertions(scenario: &StressScenario, report: &StressReport) -> Result<()> {
    let outcomes = evaluate(&scenario.assertions, report);
    let failures: Vec<&AssertionOutcome> = outcomes.iter().filter(|o| !o.passed).collect();

    for outcome in &outcomes {
        if outcome.passed {
            info!("PASS {}", outcome.detail);
        } else {
            error!("FAIL {}", outcome.detail);
        }
    }

    if !failures.is_empty() {
        let details: Vec<&str> = failures.iter().map(|o| o.detail.as_str()).collect();
        anyhow::bail!(
            "Scenario '{}' failed {} of {} assertion(s): {}",
            scenario.name,
            failures.len(),
            outcomes.len(),
            details.join("; ")
        );
    }
    Ok(())
}

pub fn evaluate(assertions: &[StressAssertion], report: &StressReport) -> Vec<AssertionOutcome> {
    assertions
        .iter()
        .map(|assertion| {
            let (passed, detail) = match assertion {
                StressAssertion::MinReliability { pct } => (
                    report.reliability_pct >= *pct,
                    format!("reliability {:.2}% >= {pct}%", report.reliability_pct),
                ),
                StressAssertion::MaxReliability { pct } => (
                    report.reliability_pct <= *pct,
                    format!("reliability {:.2}% <= {pct}%", report.reliability_pct),
                ),
                StressAssertion::MaxAvgLatency { secs } => (
                    report.avg_latency <= *secs,
                    format!("average latency {:.3}s <= {secs}s", report.avg_latency),
                ),
                StressAssertion::MinTotalPackets { count } => (
                    report.total_packets >= *count,
                    format!("total packets {} >= {count}", report.total_packets),
                ),
                StressAssertion::MaxErrorPackets { count } => (
                    report.error_packets <= *count,
                    format!("error packets {} <= {count}", report.error_packets),
                ),
            };
            AssertionOutcome {
                assertion: assertion.clone(),
                passed,
                detail,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SimulatedClock;

    const SCENARIO: &str = r#"
name = "saturated-links"
description = "Every packet is corrupted"

[config]
num_routers = 4
num_packets = 10
error_rate = 1.0
stress_level = 0.0
test_duration = 1
seed = 11

[[assertions]]
type = "max_reliability"
pct = 0.0

[[assertions]]
type = "min_total_packets"
count = 10

[[assertions]]
type = "max_avg_latency"
secs = 1.0
"#;

    #[test]
    fn parses_scenario_file() {
        let scenario = parse_scenario(SCENARIO).unwrap();
        assert_eq!(scenario.name, "saturated-links");
        assert_eq!(scenario.assertions.len(), 3);
        assert_eq!(
            scenario.assertions[0],
            StressAssertion::MaxReliability { pct: 0.0 }
        );

        let config = scenario_config(&scenario, &TestConfigOverride::default());
        assert_eq!(config.num_routers, 4);
        assert_eq!(config.error_rate, 1.0);
        assert_eq!(config.seed, Some(11));
        assert_eq!(config.packet_size, TestConfig::default().packet_size);
    }

    #[test]
    fn scenario_assertions_hold_on_simulated_run() {
        let scenario = parse_scenario(SCENARIO).unwrap();
        let trace = execute(
            &scenario,
            &TestConfigOverride::default(),
            SimulatedClock::new(),
            CancelHandle::new(),
        )
        .unwrap();
        assert_eq!(trace.report.total_packets, 10);
        assert_eq!(trace.config.seed, Some(11));
    }

    #[test]
    fn caller_overrides_win_over_scenario() {
        let scenario = parse_scenario(SCENARIO).unwrap();
        let overrides = TestConfigOverride {
            num_packets: Some(20),
            seed: Some(99),
            ..Default::default()
        };
        let config = scenario_config(&scenario, &overrides);
        assert_eq!(config.num_packets, 20);
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.num_routers, 4);
        assert_eq!(config.error_rate, 1.0);
    }

    #[test]
    fn bundled_scenario_files_load_and_pass() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../scenarios");

        let reference = load_scenario(&dir.join("reference.toml")).unwrap();
        assert_eq!(
            scenario_config(&reference, &TestConfigOverride::default()),
            TestConfig::default()
        );
        assert_eq!(reference.assertions.len(), 2);

        let saturated = load_scenario(&dir.join("saturated.toml")).unwrap();
        assert_eq!(saturated.name, "saturated-links");
        assert_eq!(
            saturated.assertions,
            vec![
                StressAssertion::MaxReliability { pct: 0.0 },
                StressAssertion::MinTotalPackets { count: 10 },
                StressAssertion::MaxAvgLatency { secs: 1.0 },
            ]
        );
        execute(
            &saturated,
            &TestConfigOverride::default(),
            SimulatedClock::new(),
            CancelHandle::new(),
        )
        .unwrap();
    }

    #[test]
    fn missing_scenario_file_is_an_error() {
        let err = run_scenario(
            Path::new("does/not/exist.toml"),
            &TestConfigOverride::default(),
            CancelHandle::new(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Failed to read scenario file"));
    }

    #[test]
    fn failing_assertions_are_all_reported() {
        let report = StressReport {
            total_packets: 5,
            error_packets: 2,
            reliability_pct: 60.0,
            avg_latency: 0.7,
            avg_throughput: 1.1,
        };
        let assertions = vec![
            StressAssertion::MinReliability { pct: 99.0 },
            StressAssertion::MaxAvgLatency { secs: 1.0 },
            StressAssertion::MaxErrorPackets { count: 1 },
        ];
        let outcomes = evaluate(&assertions, &report);
        let passed: Vec<bool> = outcomes.iter().map(|o| o.passed).collect();
        assert_eq!(passed, vec![false, true, false]);

        let scenario = StressScenario {
            name: "strict".to_string(),
            description: String::new(),
            config: Default::default(),
            assertions,
        };
        let err = check_assertions(&scenario, &report).unwrap_err().to_string();
        assert!(err.contains("failed 2 of 3"), "{err}");
    }

    #[test]
    fn rejects_malformed_scenario() {
        assert!(parse_scenario("name = 3").is_err());
        assert!(parse_scenario("name = \"x\"\n[[assertions]]\ntype = \"bogus\"").is_err());
    }
}
