//! Benchmark configuration

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Seed used by the reference benchmark suites
pub const DEFAULT_SEED: u64 = 11_664_987_322_298;

/// Upper bound (exclusive) on generated products per instance
pub const DEFAULT_MAX_PRODUCTS: u32 = 1000;

/// How many validation errors an engine is asked to produce per instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorLimit {
    /// Stop at the first violation (boolean fast path where the engine has one)
    #[default]
    First,
    /// Collect every violation the engine reports
    All,
}

/// JSON Schema draft the engines are told to assume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Draft {
    Draft4,
    Draft6,
    #[default]
    Draft7,
    Draft201909,
    Draft202012,
}

impl std::fmt::Display for Draft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Draft::Draft4 => "draft-04",
            Draft::Draft6 => "draft-06",
            Draft::Draft7 => "draft-07",
            Draft::Draft201909 => "2019-09",
            Draft::Draft202012 => "2020-12",
        };
        f.write_str(name)
    }
}

/// Options handed to every adapter's `prepare`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    pub error_limit: ErrorLimit,
    pub draft: Draft,
}

/// Configuration for benchmark runs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Seed for the instance generator
    pub seed: u64,

    /// One "realistic N" suite is generated per entry
    pub corpus_sizes: Vec<usize>,

    /// Exclusive upper bound on products per generated instance
    pub max_products: u32,

    /// Number of warmup passes (discarded from statistics)
    pub warmup_iterations: usize,

    /// Number of timed passes per case
    pub benchmark_iterations: usize,

    /// Re-run `prepare` before every pass and time it separately
    pub measure_prepare: bool,

    /// Engine options passed to `prepare`
    pub validator: ValidatorConfig,

    /// Output directory for results
    pub output_dir: PathBuf,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            corpus_sizes: vec![1, 10, 100, 1000],
            max_products: DEFAULT_MAX_PRODUCTS,
            warmup_iterations: 1,
            benchmark_iterations: 3,
            measure_prepare: false,
            validator: ValidatorConfig::default(),
            output_dir: PathBuf::from("results"),
        }
    }
}

impl BenchmarkConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] if any configuration value is invalid
    pub fn validate(&self) -> Result<()> {
        if self.benchmark_iterations == 0 {
            return Err(Error::Config("benchmark_iterations must be > 0".to_string()));
        }

        if self.corpus_sizes.is_empty() {
            return Err(Error::Config("corpus_sizes cannot be empty".to_string()));
        }

        if self.corpus_sizes.contains(&0) {
            return Err(Error::Config("corpus_sizes entries must be > 0".to_string()));
        }

        if self.max_products == 0 {
            return Err(Error::Config("max_products must be > 0".to_string()));
        }

        Ok(())
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file {}: {}", path.display(), e)))?;

        toml::from_str(&content).map_err(|e| Error::Config(format!("Invalid TOML in {}: {}", path.display(), e)))
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file {}: {}", path.display(), e)))?;

        serde_json::from_str(&content).map_err(|e| Error::Config(format!("Invalid JSON in {}: {}", path.display(), e)))
    }

    /// Load configuration, choosing the format from the file extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            other => Err(Error::Config(format!(
                "Unsupported config format {:?} for {}",
                other.unwrap_or(""),
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = BenchmarkConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.seed, DEFAULT_SEED);
        assert_eq!(config.corpus_sizes, vec![1, 10, 100, 1000]);
        assert_eq!(config.validator.draft, Draft::Draft7);
        assert_eq!(config.validator.error_limit, ErrorLimit::First);
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let config = BenchmarkConfig {
            benchmark_iterations: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("benchmark_iterations"));
    }

    #[test]
    fn test_zero_corpus_size_rejected() {
        let config = BenchmarkConfig {
            corpus_sizes: vec![10, 0],
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = BenchmarkConfig {
            corpus_sizes: vec![],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_max_products_rejected() {
        let config = BenchmarkConfig {
            max_products: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_file_partial() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bench.toml");
        std::fs::write(
            &path,
            r#"
seed = 42
corpus_sizes = [5, 50]
measure_prepare = true

[validator]
error_limit = "all"
draft = "draft4"
"#,
        )
        .unwrap();

        let config = BenchmarkConfig::from_file(&path).unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.corpus_sizes, vec![5, 50]);
        assert!(config.measure_prepare);
        assert_eq!(config.validator.error_limit, ErrorLimit::All);
        assert_eq!(config.validator.draft, Draft::Draft4);
        assert_eq!(config.benchmark_iterations, 3);
    }

    #[test]
    fn test_from_json_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bench.json");
        std::fs::write(&path, r#"{"max_products": 4, "warmup_iterations": 0}"#).unwrap();

        let config = BenchmarkConfig::from_file(&path).unwrap();
        assert_eq!(config.max_products, 4);
        assert_eq!(config.warmup_iterations, 0);
        assert_eq!(config.seed, DEFAULT_SEED);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = BenchmarkConfig::from_file("bench.yaml").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_invalid_toml_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.toml");
        std::fs::write(&path, "seed = [").unwrap();

        let err = BenchmarkConfig::from_toml_file(&path).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }
}
