//! Building blocks of OOV candidate selection.
//!
//! - Word frequency counting and the frequency file cache (`frequency`)
//! - Candidate eligibility bounds (`threshold`)
//! - Random splitting of candidates into sets (`partition`)
//! - Greedy selection of words up to an occurrence quota (`quota`)

/// Word counting over a corpus, parallel when asked, and the
/// `word count` frequency file format.
pub mod frequency;

/// Occurrence and length bounds deciding which words are candidates.
pub mod threshold;

/// Shuffle-then-chunk split of candidates into disjoint sets.
pub mod partition;

/// Quota-driven word selection with exact-match preference.
pub mod quota;
