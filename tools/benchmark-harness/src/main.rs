//! Benchmark harness CLI

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use schemabench_harness::{
    AdapterRegistry, BenchmarkConfig, BenchmarkRunner, BenchmarkSuite, Corpus, Draft, ErrorLimit, InstanceGenerator,
    RunReport, RunSummary, SchemaFixture, ensure_correct, format_summary, write_json,
};
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// CLI enum for the schema draft
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliDraft {
    #[value(name = "4")]
    Draft4,
    #[value(name = "6")]
    Draft6,
    #[value(name = "7")]
    Draft7,
    #[value(name = "2019-09")]
    Draft201909,
    #[value(name = "2020-12")]
    Draft202012,
}

impl From<CliDraft> for Draft {
    fn from(draft: CliDraft) -> Self {
        match draft {
            CliDraft::Draft4 => Draft::Draft4,
            CliDraft::Draft6 => Draft::Draft6,
            CliDraft::Draft7 => Draft::Draft7,
            CliDraft::Draft201909 => Draft::Draft201909,
            CliDraft::Draft202012 => Draft::Draft202012,
        }
    }
}

#[derive(Parser)]
#[command(name = "schemabench")]
#[command(about = "Correctness and performance benchmark for JSON Schema validators", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered validator adapters
    ListAdapters,

    /// Generate a corpus and write it as JSON Lines
    Generate {
        /// Random seed
        #[arg(short, long, default_value_t = schemabench_harness::config::DEFAULT_SEED)]
        seed: u64,

        /// Number of instances
        #[arg(short = 'n', long)]
        count: usize,

        /// Upper bound (exclusive) on products per instance
        #[arg(long, default_value_t = schemabench_harness::config::DEFAULT_MAX_PRODUCTS)]
        max_products: u32,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run benchmarks
    Run {
        /// Configuration file (.toml or .json); flags below override it
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Adapters to benchmark (comma-separated, default: all)
        #[arg(short, long, value_delimiter = ',')]
        adapters: Vec<String>,

        /// Corpus sizes for the realistic suites (comma-separated)
        #[arg(long, value_delimiter = ',')]
        sizes: Vec<usize>,

        /// Random seed for the realistic suites
        #[arg(short, long)]
        seed: Option<u64>,

        /// Upper bound (exclusive) on products per generated instance
        #[arg(long)]
        max_products: Option<u32>,

        /// Schema file to validate against instead of the built-in schema
        #[arg(long, requires = "corpus")]
        schema: Option<PathBuf>,

        /// JSON Lines corpus to run instead of the generated suites
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Number of warmup passes (checked, not timed)
        #[arg(short = 'w', long)]
        warmup: Option<usize>,

        /// Number of timed passes per case
        #[arg(short = 'i', long)]
        iterations: Option<usize>,

        /// Re-prepare the schema before every pass and time it separately
        #[arg(long)]
        measure_prepare: bool,

        /// Ask engines for every error instead of stopping at the first
        #[arg(long)]
        all_errors: bool,

        /// Schema draft the engines should assume
        #[arg(long, value_enum)]
        draft: Option<CliDraft>,

        /// Output directory for results
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn generate(seed: u64, count: usize, max_products: u32, output: Option<PathBuf>) -> anyhow::Result<()> {
    let corpus = InstanceGenerator::new(seed).with_max_products(max_products).corpus(count);

    match output {
        Some(path) => {
            let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
            corpus.write_jsonl(BufWriter::new(file))?;
            tracing::info!(
                instances = corpus.len(),
                valid = corpus.valid_count(),
                path = %path.display(),
                "corpus written"
            );
        }
        None => corpus.write_jsonl(io::stdout().lock())?,
    }

    Ok(())
}

fn load_suites(
    config: &BenchmarkConfig,
    schema: Option<PathBuf>,
    corpus: Option<PathBuf>,
) -> anyhow::Result<Vec<BenchmarkSuite>> {
    let Some(corpus_path) = corpus else {
        return Ok(BenchmarkSuite::realistic_suites(config));
    };

    let fixture = match schema {
        Some(path) => SchemaFixture::from_file(&path)?,
        None => SchemaFixture::realistic(),
    };

    let file = File::open(&corpus_path).with_context(|| format!("opening {}", corpus_path.display()))?;
    let corpus = Corpus::read_jsonl(BufReader::new(file))?;
    let name = corpus_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "corpus".to_string());

    Ok(vec![BenchmarkSuite::new(name, Arc::new(fixture), corpus)])
}

fn main() -> anyhow::Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::ListAdapters => {
            let registry = AdapterRegistry::with_default_adapters();
            for name in registry.adapter_names() {
                if let Some(adapter) = registry.get(&name) {
                    println!("{:<18} {:<8} {:?}", name, adapter.version(), adapter.input());
                }
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Generate {
            seed,
            count,
            max_products,
            output,
        } => {
            generate(seed, count, max_products, output)?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Run {
            config,
            adapters,
            sizes,
            seed,
            max_products,
            schema,
            corpus,
            warmup,
            iterations,
            measure_prepare,
            all_errors,
            draft,
            output,
        } => {
            let mut config = match config {
                Some(path) => BenchmarkConfig::from_file(&path)?,
                None => BenchmarkConfig::default(),
            };

            if !sizes.is_empty() {
                config.corpus_sizes = sizes;
            }
            if let Some(seed) = seed {
                config.seed = seed;
            }
            if let Some(max_products) = max_products {
                config.max_products = max_products;
            }
            if let Some(warmup) = warmup {
                config.warmup_iterations = warmup;
            }
            if let Some(iterations) = iterations {
                config.benchmark_iterations = iterations;
            }
            if measure_prepare {
                config.measure_prepare = true;
            }
            if all_errors {
                config.validator.error_limit = ErrorLimit::All;
            }
            if let Some(draft) = draft {
                config.validator.draft = draft.into();
            }
            if let Some(output) = output {
                config.output_dir = output;
            }

            config.validate()?;

            let suites = load_suites(&config, schema, corpus)?;
            tracing::info!(
                suites = suites.len(),
                seed = config.seed,
                iterations = config.benchmark_iterations,
                "starting run"
            );

            let runner = BenchmarkRunner::new(config.clone(), AdapterRegistry::with_default_adapters());
            let cases = runner.run(&suites, &adapters)?;

            println!("{}", format_summary(&cases));

            let output_file = config.output_dir.join("results.json");
            let summary = RunSummary::from_cases(&cases);
            let correctness = ensure_correct(&cases);
            write_json(&RunReport::new(config, cases), &output_file)?;
            println!("\nResults written to: {}", output_file.display());

            if let Err(e) = correctness {
                tracing::error!(error = %e, "run aborted");
                return Ok(ExitCode::FAILURE);
            }
            if !summary.all_completed() {
                tracing::warn!(
                    setup_failed = summary.setup_failed,
                    infra_failed = summary.infra_failed,
                    "some cases did not complete"
                );
            }

            Ok(ExitCode::SUCCESS)
        }
    }
}
