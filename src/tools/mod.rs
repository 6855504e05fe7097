//! The tools module provides several helper functions for chrigizip.
//!
//! The tools are:
//! - cli: Command line interface and run options.
//! - freq_count: Byte frequency count and the sorted histogram the tree is built from.
//! - report: Sink for user facing progress and statistics.
//!
pub mod cli;
pub mod freq_count;
pub mod report;
