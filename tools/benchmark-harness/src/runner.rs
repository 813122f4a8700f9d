//! Benchmark runner for executing and collecting results
//!
//! This module drives every (suite, adapter) pair through its case lifecycle:
//! prepare the schema, sweep the corpus in order once per pass, compare each
//! verdict with the generator's ground truth, and time the passes that agree.
//! Cases run strictly one after another.

use crate::adapter::{PreparedValidator, ValidatorAdapter, Verdict, guarded_check, guarded_prepare};
use crate::config::BenchmarkConfig;
use crate::corpus::Corpus;
use crate::fixture::SchemaFixture;
use crate::generator::InstanceGenerator;
use crate::registry::AdapterRegistry;
use crate::types::{CaseOutcome, CaseReport, CaseState, DurationStatistics, IterationResult};
use crate::{Error, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A named schema and corpus, ready to be run against any adapter
#[derive(Debug, Clone)]
pub struct BenchmarkSuite {
    name: String,
    schema: Arc<SchemaFixture>,
    corpus: Corpus,
}

impl BenchmarkSuite {
    pub fn new(name: impl Into<String>, schema: Arc<SchemaFixture>, corpus: Corpus) -> Self {
        Self {
            name: name.into(),
            schema,
            corpus,
        }
    }

    /// "realistic N" suite: `count` generated instances for the built-in schema
    pub fn realistic(schema: Arc<SchemaFixture>, seed: u64, count: usize, max_products: u32) -> Self {
        let corpus = InstanceGenerator::new(seed)
            .with_max_products(max_products)
            .corpus(count);
        Self::new(format!("realistic {count}"), schema, corpus)
    }

    /// One realistic suite per configured corpus size, all sharing one schema
    pub fn realistic_suites(config: &BenchmarkConfig) -> Vec<Self> {
        let schema = Arc::new(SchemaFixture::realistic());
        config
            .corpus_sizes
            .iter()
            .map(|&count| Self::realistic(Arc::clone(&schema), config.seed, count, config.max_products))
            .collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &SchemaFixture {
        &self.schema
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }
}

/// Why a pass over a corpus stopped early
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassFailure {
    /// Verdict disagreed with ground truth
    Mismatch { index: usize, expected: bool, actual: bool },
    /// Engine could not evaluate the instance
    Infra { index: usize, detail: String },
}

impl PassFailure {
    pub fn index(&self) -> usize {
        match self {
            PassFailure::Mismatch { index, .. } | PassFailure::Infra { index, .. } => *index,
        }
    }
}

/// Check every instance of `corpus` in order and time the whole sweep.
///
/// This is the unit of work for external repetition drivers. It stops at the
/// first instance whose verdict is not the recorded ground truth.
pub fn run_pass(handle: &dyn PreparedValidator, corpus: &Corpus) -> std::result::Result<Duration, PassFailure> {
    let start = Instant::now();

    for (index, instance) in corpus.iter().enumerate() {
        match guarded_check(handle, instance) {
            Verdict::InfraError(detail) => return Err(PassFailure::Infra { index, detail }),
            verdict => {
                let actual = verdict.is_valid();
                if actual != instance.is_valid() {
                    return Err(PassFailure::Mismatch {
                        index,
                        expected: instance.is_valid(),
                        actual,
                    });
                }
            }
        }
    }

    Ok(start.elapsed())
}

fn advance(state: &mut CaseState, next: CaseState, case: &str) {
    debug_assert!(
        state.can_transition_to(next),
        "illegal case transition {:?} -> {:?} for {}",
        state,
        next,
        case
    );
    tracing::debug!(case, from = ?state, to = ?next, "case state");
    *state = next;
}

/// Lower-rank percentile (`0.0..=1.0`) of an ascending, non-empty slice
fn percentile(sorted: &[Duration], fraction: f64) -> Duration {
    let rank = ((sorted.len() - 1) as f64 * fraction) as usize;
    sorted[rank.min(sorted.len() - 1)]
}

/// Summarize the timed passes of a case; `None` when there are none
fn calculate_statistics(iterations: &[IterationResult]) -> Option<DurationStatistics> {
    let mut sorted: Vec<Duration> = iterations.iter().map(|i| i.duration).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_unstable();

    let samples = sorted.len() as f64;
    let mean_secs = sorted.iter().map(Duration::as_secs_f64).sum::<f64>() / samples;
    let variance = sorted
        .iter()
        .map(|d| (d.as_secs_f64() - mean_secs).powi(2))
        .sum::<f64>()
        / samples;

    Some(DurationStatistics {
        mean: Duration::from_secs_f64(mean_secs),
        median: percentile(&sorted, 0.50),
        std_dev_ms: variance.sqrt() * 1000.0,
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        p95: percentile(&sorted, 0.95),
        p99: percentile(&sorted, 0.99),
        sample_count: sorted.len(),
    })
}

fn mean_prepare_duration(iterations: &[IterationResult]) -> Option<Duration> {
    let prepares: Vec<Duration> = iterations.iter().filter_map(|i| i.prepare_duration).collect();
    if prepares.is_empty() {
        return None;
    }

    let total_ms: f64 = prepares.iter().map(|d| d.as_secs_f64() * 1000.0).sum();
    Some(Duration::from_secs_f64(total_ms / prepares.len() as f64 / 1000.0))
}

/// Turn a correctness failure among `reports` into an error
///
/// # Errors
///
/// Returns [`Error::CorrectnessMismatch`] for the first case whose outcome is
/// `CorrectnessFailed`.
pub fn ensure_correct(reports: &[CaseReport]) -> Result<()> {
    for report in reports {
        if let CaseOutcome::CorrectnessFailed {
            index,
            expected,
            actual,
        } = report.outcome
        {
            return Err(Error::CorrectnessMismatch {
                case: report.case.clone(),
                index,
                expected,
                actual,
            });
        }
    }
    Ok(())
}

/// Orchestrates benchmark execution across suites and adapters
pub struct BenchmarkRunner {
    config: BenchmarkConfig,
    registry: AdapterRegistry,
}

impl BenchmarkRunner {
    /// Create a new benchmark runner
    pub fn new(config: BenchmarkConfig, registry: AdapterRegistry) -> Self {
        Self { config, registry }
    }

    /// Get reference to benchmark configuration
    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    fn report(
        &self,
        suite: &BenchmarkSuite,
        adapter: &dyn ValidatorAdapter,
        outcome: CaseOutcome,
        iterations: Vec<IterationResult>,
    ) -> CaseReport {
        let statistics = if outcome.is_completed() {
            calculate_statistics(&iterations)
        } else {
            None
        };

        let instances_per_sec = statistics.as_ref().and_then(|stats| {
            let secs = stats.mean.as_secs_f64();
            (secs > 0.0).then(|| suite.corpus().len() as f64 / secs)
        });

        CaseReport {
            case: format!("{}/{}", adapter.name(), suite.name()),
            suite: suite.name().to_string(),
            adapter: adapter.name().to_string(),
            adapter_version: adapter.version(),
            instance_count: suite.corpus().len(),
            valid_count: suite.corpus().valid_count(),
            outcome,
            mean_prepare_duration: mean_prepare_duration(&iterations),
            iterations,
            statistics,
            instances_per_sec,
        }
    }

    /// Run one suite against one adapter
    ///
    /// Warmup passes are checked for correctness like any other pass but are
    /// not recorded. With `measure_prepare`, the handle is rebuilt before every
    /// pass and the rebuild is timed apart from the pass itself.
    pub fn run_case(&self, suite: &BenchmarkSuite, adapter: &dyn ValidatorAdapter) -> CaseReport {
        let case = format!("{}/{}", adapter.name(), suite.name());
        let validator_config = self.config.validator;
        let mut state = CaseState::Unprepared;

        let prepare_start = Instant::now();
        let prepared = guarded_prepare(adapter, suite.schema(), &validator_config);
        let mut last_prepare = prepare_start.elapsed();

        let mut handle = match prepared {
            Ok(handle) => handle,
            Err(e) => {
                advance(&mut state, CaseState::SetupFailed, &case);
                tracing::warn!(case = %case, error = %e, "setup failed");
                return self.report(suite, adapter, CaseOutcome::SetupFailed { message: e.to_string() }, Vec::new());
            }
        };
        advance(&mut state, CaseState::Prepared, &case);
        advance(&mut state, CaseState::Measuring, &case);

        let warmup = self.config.warmup_iterations;
        let total_passes = warmup + self.config.benchmark_iterations;
        let mut iterations = Vec::with_capacity(self.config.benchmark_iterations);

        for pass in 0..total_passes {
            if self.config.measure_prepare && pass > 0 {
                drop(handle);
                let start = Instant::now();
                handle = match guarded_prepare(adapter, suite.schema(), &validator_config) {
                    Ok(handle) => handle,
                    Err(e) => {
                        advance(&mut state, CaseState::SetupFailed, &case);
                        tracing::warn!(case = %case, pass, error = %e, "re-prepare failed");
                        return self.report(
                            suite,
                            adapter,
                            CaseOutcome::SetupFailed { message: e.to_string() },
                            iterations,
                        );
                    }
                };
                last_prepare = start.elapsed();
            }

            match run_pass(handle.as_ref(), suite.corpus()) {
                Ok(duration) => {
                    tracing::debug!(case = %case, pass, duration_us = duration.as_micros() as u64, "pass");
                    if pass >= warmup {
                        iterations.push(IterationResult {
                            iteration: pass - warmup + 1,
                            duration,
                            prepare_duration: self.config.measure_prepare.then_some(last_prepare),
                        });
                    }
                }
                Err(PassFailure::Mismatch {
                    index,
                    expected,
                    actual,
                }) => {
                    advance(&mut state, CaseState::CorrectnessFailed, &case);
                    tracing::error!(case = %case, index, expected, actual, "verdict disagrees with ground truth");
                    return self.report(
                        suite,
                        adapter,
                        CaseOutcome::CorrectnessFailed {
                            index,
                            expected,
                            actual,
                        },
                        iterations,
                    );
                }
                Err(PassFailure::Infra { index, detail }) => {
                    advance(&mut state, CaseState::InfraFailed, &case);
                    tracing::warn!(case = %case, index, detail = %detail, "engine could not evaluate instance");
                    return self.report(suite, adapter, CaseOutcome::InfraFailed { index, detail }, iterations);
                }
            }
        }

        advance(&mut state, CaseState::Completed, &case);
        let report = self.report(suite, adapter, CaseOutcome::Completed, iterations);
        if let Some(stats) = &report.statistics {
            tracing::info!(
                case = %case,
                mean_ms = stats.mean.as_secs_f64() * 1000.0,
                samples = stats.sample_count,
                "case completed"
            );
        }
        report
    }

    /// Run every suite against the named adapters (empty = all registered)
    ///
    /// Setup and infrastructure failures are recorded and the run moves on. A
    /// correctness failure is recorded and ends the run: no further cases are
    /// started. Use [`ensure_correct`] to turn it into an error.
    pub fn run(&self, suites: &[BenchmarkSuite], adapter_names: &[String]) -> Result<Vec<CaseReport>> {
        let adapters = self.registry.select(adapter_names)?;

        if adapters.is_empty() {
            return Err(Error::Benchmark("No adapters available for benchmarking".to_string()));
        }

        let mut reports = Vec::with_capacity(suites.len() * adapters.len());

        'suites: for suite in suites {
            for adapter in &adapters {
                let report = self.run_case(suite, adapter.as_ref());
                let stop = matches!(report.outcome, CaseOutcome::CorrectnessFailed { .. });
                reports.push(report);

                if stop {
                    tracing::error!("stopping run after correctness failure");
                    break 'suites;
                }
            }
        }

        Ok(reports)
    }
}
