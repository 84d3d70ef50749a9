//! The OOV experiment: the sweep over OOV rates, its pre-flight
//! character check and the statistics it reports.

/// Character coverage of the test corpus by the training text.
pub mod coverage;

/// Experiment configuration, output layout and the group sweep.
pub mod orchestrator;

/// Per-set statistics and the `summary.json` run report.
pub mod report;
