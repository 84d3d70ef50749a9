//! Command line front-end of the OOV experiment tools.

pub mod cli;
pub mod corpora;
pub mod prompt;
pub mod setup;
