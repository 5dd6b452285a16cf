//! PDF merging.

mod merger;

pub use merger::{EntryPages, MergeOutput, MergeStatistics, MergedBytes, Merger};
