//! Setup subcommand - frequency files, character check and candidate groups.

use eyre::{Context, Result, bail};
use oov_core::experiment::orchestrator::{ExperimentConfig, ExperimentPaths, GroupOrchestrator};
use oov_core::experiment::report::RunReport;
use oov_core::model::frequency::{FrequencyCounter, load_or_count};
use oov_core::model::threshold::Thresholds;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};

use crate::prompt::confirm_overwrite;

/// CLI arguments for the experiment setup.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Path to the kaldi test text file set e.g. samromur/test/text
    #[arg(long = "test_set")]
    pub test_set: PathBuf,

    /// Path to the text corpus used to train the language models
    #[arg(long = "text_corpus")]
    pub text_corpus: PathBuf,

    /// Path to the root dir where the experiment folders will be located
    #[arg(long = "data_dir")]
    pub data_dir: PathBuf,

    /// The OOV rate for the first group of words in the experiment
    #[arg(long = "starting_oov_rate", default_value_t = 0.005)]
    pub starting_oov_rate: f64,

    /// The amount the OOV rate increases between groups
    #[arg(long, default_value_t = 0.005)]
    pub increase: f64,

    /// The number of groups of OOV candidate words created
    #[arg(long = "num_groups", default_value_t = 5)]
    pub num_groups: usize,

    /// The number of sets of candidate words for each OOV rate
    #[arg(long = "num_sets_in_group", default_value_t = 5)]
    pub num_sets_in_group: usize,

    /// Number of threads used to count word frequencies (0 = one per CPU)
    #[arg(long = "n_jobs", default_value_t = 1)]
    pub n_jobs: usize,

    /// Minimum number of occurrences of a candidate word in the test set
    #[arg(long = "min_occurrence", default_value_t = 5)]
    pub min_occurrence: u64,

    /// Maximum number of occurrences of a candidate word in the test set
    #[arg(long = "max_occurrence", default_value_t = 50)]
    pub max_occurrence: u64,

    /// Minimum length of a candidate word, in characters
    #[arg(long = "min_length", default_value_t = 2)]
    pub min_length: usize,

    /// Seed for reproducible candidate selection
    #[arg(long)]
    pub seed: Option<u64>,

    /// Recompute existing frequency files without asking
    #[arg(long)]
    pub force: bool,
}

impl Args {
    pub fn experiment_config(&self) -> ExperimentConfig {
        ExperimentConfig {
            starting_oov_rate: self.starting_oov_rate,
            increase: self.increase,
            num_groups: self.num_groups,
            num_sets_in_group: self.num_sets_in_group,
            thresholds: Thresholds {
                min_occurrence: self.min_occurrence,
                max_occurrence: self.max_occurrence,
                min_length: self.min_length,
            },
        }
    }
}

/// Resolved configuration for the experiment setup.
#[derive(Debug)]
pub struct Config {
    pub test_set: PathBuf,
    pub text_corpus: PathBuf,
    pub paths: ExperimentPaths,
    pub experiment: ExperimentConfig,
    pub jobs: usize,
    pub seed: Option<u64>,
    pub force: bool,
}

fn require_file(path: &Path, what: &str) -> Result<()> {
    if !path.is_file() {
        bail!("{what} not found or not a file: {}", path.display());
    }
    Ok(())
}

impl TryFrom<Args> for Config {
    type Error = eyre::Error;

    fn try_from(args: Args) -> Result<Self> {
        require_file(&args.test_set, "test set")?;
        require_file(&args.text_corpus, "text corpus")?;
        let experiment = args.experiment_config();
        experiment.validate()?;

        Ok(Self {
            paths: ExperimentPaths::new(&args.data_dir),
            test_set: args.test_set,
            text_corpus: args.text_corpus,
            experiment,
            jobs: args.n_jobs,
            seed: args.seed,
            force: args.force,
        })
    }
}

/// Decides whether an existing frequency file is recomputed.
fn should_recompute(cache: &Path, force: bool) -> Result<bool> {
    if force || !cache.exists() {
        return Ok(true);
    }
    confirm_overwrite(cache)
}

pub fn execute(config: Config) -> Result<RunReport> {
    config
        .paths
        .create()
        .wrap_err("failed to create experiment directories")?;

    let text_cache = config.paths.text_corpus_frequencies();
    let text_freq = load_or_count(
        &FrequencyCounter::new(false).with_jobs(config.jobs),
        &config.text_corpus,
        &text_cache,
        should_recompute(&text_cache, config.force)?,
    )
    .wrap_err_with(|| format!("failed to count words of {}", config.text_corpus.display()))?;

    let test_cache = config.paths.test_corpus_frequencies();
    let test_freq = load_or_count(
        &FrequencyCounter::new(true).with_jobs(config.jobs),
        &config.test_set,
        &test_cache,
        should_recompute(&test_cache, config.force)?,
    )
    .wrap_err_with(|| format!("failed to count words of {}", config.test_set.display()))?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let report = GroupOrchestrator::new(config.experiment)?
        .run(&text_freq, &test_freq, &config.paths, &mut rng)
        .wrap_err("failed to create candidate groups")?;

    log::info!("summary written to {}", config.paths.summary().display());

    let failed = report.failures().count();
    if failed > 0 {
        for (group, failure) in report.failures() {
            log::error!(
                "group {group} set {}: reached {} of {} ({} candidates available)",
                failure.set,
                failure.reached,
                failure.quota,
                failure.available
            );
        }
        bail!("{failed} candidate sets could not reach their quota");
    }

    Ok(report)
}
