//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use eyre::Result;

#[derive(Debug, Parser)]
#[command(name = "oov")]
#[command(about = "OOV experiment setup for language-model robustness tests")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Find candidate words to remove from the text corpus to create OOV settings
    Setup(crate::setup::Args),

    /// Write LM corpora without the candidate words of each set
    Corpora(crate::corpora::Args),
}

/// Execute CLI command - separated for testing.
pub fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("{}", std::env::args().collect::<Vec<_>>().join(" "));
    log::debug!("parsed arguments: {cli:?}");

    match cli.command {
        Commands::Setup(args) => crate::setup::execute(args.try_into()?).map(|_| ()),
        Commands::Corpora(args) => crate::corpora::execute(args.try_into()?).map(|_| ()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oov_core::experiment::orchestrator::ExperimentConfig;

    #[test]
    fn parses_setup_with_defaults() {
        let cli = Cli::parse_from([
            "oov",
            "setup",
            "--test_set",
            "test/text",
            "--text_corpus",
            "corpus.txt",
            "--data_dir",
            "exp",
        ]);

        match &cli.command {
            Commands::Setup(args) => {
                assert_eq!(args.test_set.to_str(), Some("test/text"));
                assert_eq!(args.text_corpus.to_str(), Some("corpus.txt"));
                assert_eq!(args.data_dir.to_str(), Some("exp"));
                assert_eq!(args.experiment_config(), ExperimentConfig::default());
                assert_eq!(args.n_jobs, 1);
                assert_eq!(args.seed, None);
                assert!(!args.force);
            }
            _ => panic!("unexpected command: {:?}", cli.command),
        }
    }

    #[test]
    fn parses_setup_overrides() {
        let cli = Cli::parse_from([
            "oov",
            "setup",
            "--test_set",
            "t",
            "--text_corpus",
            "c",
            "--data_dir",
            "d",
            "--starting_oov_rate",
            "0.01",
            "--increase",
            "0.02",
            "--num_groups",
            "3",
            "--num_sets_in_group",
            "4",
            "--n_jobs",
            "0",
            "--min_occurrence",
            "1",
            "--max_occurrence",
            "9",
            "--min_length",
            "3",
            "--seed",
            "42",
            "--force",
        ]);

        match &cli.command {
            Commands::Setup(args) => {
                let config = args.experiment_config();
                assert_eq!(config.starting_oov_rate, 0.01);
                assert_eq!(config.increase, 0.02);
                assert_eq!((config.num_groups, config.num_sets_in_group), (3, 4));
                assert_eq!(config.thresholds.min_occurrence, 1);
                assert_eq!(config.thresholds.max_occurrence, 9);
                assert_eq!(config.thresholds.min_length, 3);
                assert_eq!(args.n_jobs, 0);
                assert_eq!(args.seed, Some(42));
                assert!(args.force);
            }
            _ => panic!("unexpected command: {:?}", cli.command),
        }
    }

    #[test]
    fn setup_requires_paths() {
        let result = Cli::try_parse_from(["oov", "setup", "--test_set", "t"]);
        assert!(result.is_err());
    }

    #[test]
    fn parses_corpora_command() {
        let cli = Cli::parse_from([
            "oov",
            "corpora",
            "--candidates_dir",
            "exp/candidate_output",
            "--outdir",
            "corpora",
            "--text_corpus",
            "corpus.txt",
            "--group",
            "2",
        ]);

        match &cli.command {
            Commands::Corpora(args) => {
                assert_eq!(args.candidates_dir.to_str(), Some("exp/candidate_output"));
                assert_eq!(args.outdir.to_str(), Some("corpora"));
                assert_eq!(args.group, Some(2));
            }
            _ => panic!("unexpected command: {:?}", cli.command),
        }
    }
}
