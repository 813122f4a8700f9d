//! Report types shared by the runner and the output writers

use crate::config::BenchmarkConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Lifecycle of one (suite, adapter) case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseState {
    Unprepared,
    Prepared,
    Measuring,
    Completed,
    SetupFailed,
    CorrectnessFailed,
    InfraFailed,
}

impl CaseState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            CaseState::Completed | CaseState::SetupFailed | CaseState::CorrectnessFailed | CaseState::InfraFailed
        )
    }

    /// Whether `self -> next` is an edge of the case state machine
    pub fn can_transition_to(self, next: CaseState) -> bool {
        use CaseState::*;
        matches!(
            (self, next),
            (Unprepared, Prepared)
                | (Unprepared, SetupFailed)
                | (Prepared, Measuring)
                | (Measuring, Completed)
                | (Measuring, CorrectnessFailed)
                | (Measuring, InfraFailed)
                | (Measuring, SetupFailed)
        )
    }
}

/// Terminal result of a case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CaseOutcome {
    /// Every pass agreed with ground truth
    Completed,
    /// The engine could not use the schema
    SetupFailed { message: String },
    /// The engine's verdict disagreed with ground truth
    CorrectnessFailed { index: usize, expected: bool, actual: bool },
    /// The engine could not evaluate an instance
    InfraFailed { index: usize, detail: String },
}

impl CaseOutcome {
    pub fn state(&self) -> CaseState {
        match self {
            CaseOutcome::Completed => CaseState::Completed,
            CaseOutcome::SetupFailed { .. } => CaseState::SetupFailed,
            CaseOutcome::CorrectnessFailed { .. } => CaseState::CorrectnessFailed,
            CaseOutcome::InfraFailed { .. } => CaseState::InfraFailed,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, CaseOutcome::Completed)
    }
}

/// One timed pass over a corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationResult {
    /// 1-based pass number (warmup passes are not recorded)
    pub iteration: usize,
    /// Wall-clock time of checking the whole corpus
    pub duration: Duration,
    /// Time spent in `prepare` before this pass, when measured
    pub prepare_duration: Option<Duration>,
}

/// Summary statistics over pass durations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationStatistics {
    pub mean: Duration,
    pub median: Duration,
    pub std_dev_ms: f64,
    pub min: Duration,
    pub max: Duration,
    pub p95: Duration,
    pub p99: Duration,
    pub sample_count: usize,
}

/// Result of running one suite against one adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseReport {
    /// `<adapter>/<suite>`
    pub case: String,
    pub suite: String,
    pub adapter: String,
    pub adapter_version: String,
    pub instance_count: usize,
    pub valid_count: usize,
    pub outcome: CaseOutcome,
    pub iterations: Vec<IterationResult>,
    pub statistics: Option<DurationStatistics>,
    pub mean_prepare_duration: Option<Duration>,
    pub instances_per_sec: Option<f64>,
}

/// Everything written to `results.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub config: BenchmarkConfig,
    pub cases: Vec<CaseReport>,
}

impl RunReport {
    pub fn new(config: BenchmarkConfig, cases: Vec<CaseReport>) -> Self {
        Self {
            generated_at: Utc::now(),
            config,
            cases,
        }
    }
}
