//! Benchmark harness for comparing JSON Schema validation engines
//!
//! This crate generates a deterministic corpus of synthetic documents whose
//! validity against a fixed schema is known in advance, runs every registered
//! validation engine over it, and checks each verdict against that ground truth
//! before any timing is trusted.

pub mod adapter;
pub mod adapters;
pub mod config;
pub mod corpus;
pub mod error;
pub mod fixture;
pub mod generator;
pub mod output;
pub mod registry;
pub mod runner;
pub mod types;

pub use adapter::{InputForm, PreparedValidator, SetupError, ValidatorAdapter, Verdict};
pub use adapters::{BoonAdapter, JsonSchemaAdapter, JsonSchemaValidAdapter};
pub use config::{BenchmarkConfig, Draft, ErrorLimit, ValidatorConfig};
pub use corpus::{Corpus, Instance};
pub use error::{Error, Result};
pub use fixture::SchemaFixture;
pub use generator::{InstanceGenerator, generate_corpus};
pub use output::{RunSummary, format_summary, write_json};
pub use registry::AdapterRegistry;
pub use runner::{BenchmarkRunner, BenchmarkSuite, PassFailure, ensure_correct, run_pass};
pub use types::{CaseOutcome, CaseReport, CaseState, DurationStatistics, IterationResult, RunReport};
