//! Corpora subcommand - LM corpora with each set's candidate words held out.

use eyre::{Context, Result, bail};
use oov_core::corpora::{CandidateGroup, CorpusStats, create_lm_corpora, discover_groups};
use oov_core::io::file_size;
use std::path::PathBuf;

/// CLI arguments for LM corpus creation.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Path to the candidate_output folder created by `oov setup`
    #[arg(long = "candidates_dir")]
    pub candidates_dir: PathBuf,

    /// Path to store the corpora
    #[arg(long)]
    pub outdir: PathBuf,

    /// Path to the text corpus used to train the language models
    #[arg(long = "text_corpus")]
    pub text_corpus: PathBuf,

    /// Only create the corpora of this group (default: all groups)
    #[arg(long)]
    pub group: Option<usize>,
}

/// Resolved configuration for corpus creation.
#[derive(Debug)]
pub struct Config {
    pub groups: Vec<CandidateGroup>,
    pub text_corpus: PathBuf,
    pub outdir: PathBuf,
}

impl TryFrom<Args> for Config {
    type Error = eyre::Error;

    fn try_from(args: Args) -> Result<Self> {
        if !args.text_corpus.is_file() {
            bail!("text corpus not found or not a file: {}", args.text_corpus.display());
        }

        let mut groups = discover_groups(&args.candidates_dir)
            .wrap_err_with(|| format!("failed to read {}", args.candidates_dir.display()))?;
        if groups.is_empty() {
            bail!("no candidate groups found in {}", args.candidates_dir.display());
        }

        if let Some(wanted) = args.group {
            let available: Vec<String> = groups.iter().map(|g| g.group.to_string()).collect();
            groups.retain(|g| g.group == wanted);
            if groups.is_empty() {
                bail!("group {wanted} not found, available groups: {}", available.join(", "));
            }
        }

        Ok(Self {
            groups,
            text_corpus: args.text_corpus,
            outdir: args.outdir,
        })
    }
}

pub fn execute(config: Config) -> Result<Vec<CorpusStats>> {
    let rates: Vec<String> = config.groups.iter().map(|g| g.oov_rate.to_string()).collect();
    log::info!("found {} groups with oov rate of: {}", config.groups.len(), rates.join(", "));

    let num_sets: usize = config.groups.iter().map(|g| g.sets.len()).sum();
    let gib = file_size(&config.text_corpus)? as f64 / (1024.0 * 1024.0 * 1024.0);
    log::info!(
        "the text file is {gib:.2}gb, {num_sets} corpora of at most {:.2}gb in total",
        gib * num_sets as f64
    );

    create_lm_corpora(&config.groups, &config.text_corpus, &config.outdir)
        .wrap_err_with(|| format!("failed to write corpora to {}", config.outdir.display()))
}
