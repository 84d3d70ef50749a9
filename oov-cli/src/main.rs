//! OOV CLI - candidate word sets and held-out LM corpora

use clap::Parser;
use env_logger::Env;
use eyre::Result;
use oov_cli::cli::{Cli, run_cli};

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    run_cli(Cli::parse())
}
