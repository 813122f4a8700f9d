//! Output writers for benchmark results
//!
//! This module persists run reports to disk in JSON format and renders the
//! short per-case summary printed at the end of a run.

use crate::types::{CaseOutcome, CaseReport, RunReport};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Write a run report to a JSON file
///
/// # Arguments
/// * `report` - Run report to write
/// * `output_path` - Path to output JSON file
pub fn write_json(report: &RunReport, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent).map_err(Error::Io)?;
    }

    let json = serde_json::to_string_pretty(report)
        .map_err(|e| Error::Benchmark(format!("Failed to serialize results: {}", e)))?;

    fs::write(output_path, json).map_err(Error::Io)?;

    Ok(())
}

/// Outcome counts over a set of cases
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub completed: usize,
    pub setup_failed: usize,
    pub correctness_failed: usize,
    pub infra_failed: usize,
}

impl RunSummary {
    pub fn from_cases(cases: &[CaseReport]) -> Self {
        let mut summary = Self {
            total: cases.len(),
            ..Default::default()
        };

        for case in cases {
            match case.outcome {
                CaseOutcome::Completed => summary.completed += 1,
                CaseOutcome::SetupFailed { .. } => summary.setup_failed += 1,
                CaseOutcome::CorrectnessFailed { .. } => summary.correctness_failed += 1,
                CaseOutcome::InfraFailed { .. } => summary.infra_failed += 1,
            }
        }

        summary
    }

    pub fn all_completed(&self) -> bool {
        self.completed == self.total
    }
}

fn outcome_cell(outcome: &CaseOutcome) -> String {
    match outcome {
        CaseOutcome::Completed => "ok".to_string(),
        CaseOutcome::SetupFailed { message } => format!("setup failed: {message}"),
        CaseOutcome::CorrectnessFailed {
            index,
            expected,
            actual,
        } => format!("MISMATCH at #{index} (expected {expected}, got {actual})"),
        CaseOutcome::InfraFailed { index, detail } => format!("infra error at #{index}: {detail}"),
    }
}

/// Plain-text table, one row per case
pub fn format_summary(cases: &[CaseReport]) -> String {
    let width = cases.iter().map(|c| c.case.len()).max().unwrap_or(4).max(4);

    let header = format!("{:<width$}  {:>12}  {:>14}  status", "case", "mean (ms)", "instances/s");
    let rows = cases.iter().map(|case| {
        let mean = case
            .statistics
            .as_ref()
            .map(|s| format!("{:.3}", s.mean.as_secs_f64() * 1000.0))
            .unwrap_or_else(|| "-".to_string());
        let rate = case
            .instances_per_sec
            .map(|r| format!("{r:.0}"))
            .unwrap_or_else(|| "-".to_string());
        format!("{:<width$}  {:>12}  {:>14}  {}", case.case, mean, rate, outcome_cell(&case.outcome))
    });

    let summary = RunSummary::from_cases(cases);
    let footer = format!(
        "{} cases: {} completed, {} setup failed, {} infra failed, {} correctness failed",
        summary.total, summary.completed, summary.setup_failed, summary.infra_failed, summary.correctness_failed
    );

    std::iter::once(header)
        .chain(rows)
        .chain(std::iter::once(footer))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BenchmarkConfig;
    use crate::types::{DurationStatistics, IterationResult};
    use std::time::Duration;
    use tempfile::TempDir;

    fn completed_case() -> CaseReport {
        let duration = Duration::from_millis(2);
        CaseReport {
            case: "jsonschema/realistic 10".to_string(),
            suite: "realistic 10".to_string(),
            adapter: "jsonschema".to_string(),
            adapter_version: "0.28".to_string(),
            instance_count: 10,
            valid_count: 0,
            outcome: CaseOutcome::Completed,
            iterations: vec![IterationResult {
                iteration: 1,
                duration,
                prepare_duration: None,
            }],
            statistics: Some(DurationStatistics {
                mean: duration,
                median: duration,
                std_dev_ms: 0.0,
                min: duration,
                max: duration,
                p95: duration,
                p99: duration,
                sample_count: 1,
            }),
            mean_prepare_duration: None,
            instances_per_sec: Some(5000.0),
        }
    }

    fn failed_case() -> CaseReport {
        CaseReport {
            case: "boon/realistic 10".to_string(),
            adapter: "boon".to_string(),
            outcome: CaseOutcome::CorrectnessFailed {
                index: 3,
                expected: false,
                actual: true,
            },
            iterations: vec![],
            statistics: None,
            instances_per_sec: None,
            ..completed_case()
        }
    }

    #[test]
    fn test_write_json() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("results.json");

        let report = RunReport::new(BenchmarkConfig::default(), vec![completed_case()]);

        write_json(&report, &output_path).unwrap();

        assert!(output_path.exists());

        let contents = fs::read_to_string(&output_path).unwrap();
        let parsed: RunReport = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed.cases.len(), 1);
        assert_eq!(parsed.cases[0].adapter, "jsonschema");
        assert_eq!(parsed.config.seed, report.config.seed);
    }

    #[test]
    fn test_write_json_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("subdir/results.json");

        let report = RunReport::new(BenchmarkConfig::default(), vec![]);

        write_json(&report, &output_path).unwrap();

        assert!(output_path.exists());
        assert!(output_path.parent().unwrap().exists());
    }

    #[test]
    fn test_summary_counts() {
        let summary = RunSummary::from_cases(&[completed_case(), failed_case()]);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.correctness_failed, 1);
        assert!(!summary.all_completed());
    }

    #[test]
    fn test_format_summary_rows() {
        let text = format_summary(&[completed_case(), failed_case()]);
        assert!(text.contains("jsonschema/realistic 10"));
        assert!(text.contains("2.000"));
        assert!(text.contains("MISMATCH at #3"));
        assert!(text.ends_with("1 correctness failed"));
        assert_eq!(text.lines().count(), 4);
        assert!(text.lines().next().unwrap().starts_with("case"));
    }
}
