//! Command implementations.

pub mod analyze;

pub use analyze::{AnalyzeCommand, Outcome, RunSummary};
