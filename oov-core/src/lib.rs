//! Out-of-vocabulary experiment setup for speech recognition corpora.
//!
//! This crate builds the word sets used to simulate increasing OOV rates
//! for language-model robustness experiments:
//! - Word frequency counting of the test and training corpora
//! - Threshold filtering of candidate words
//! - Random partitioning and quota-driven selection of word sets
//! - The sweep over OOV rates and its persisted outputs
//! - Language-model corpora with the selected words held out
//!
//! Every random operation takes a caller-provided `rand::Rng`, so runs
//! are reproducible from a seed.

/// Error type and result alias.
pub mod error;

/// Frequency counting, thresholds, partitioning and quota selection.
pub mod model;

/// The OOV rate sweep, its character check and reports.
pub mod experiment;

/// Held-out language-model corpora built from saved candidate sets.
pub mod corpora;

/// I/O utilities (line reading, writers, directory listing).
///
/// Only `file_size` is exposed
pub mod io;

pub use error::{Error, Result};
