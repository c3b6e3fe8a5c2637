//! The tools module provides several helper functions for huffzip.
//!
//! The tools are:
//! - cli: Command line interface for huffzip.
//! - files: Per-file compress / decompress / test / list drivers used by the command line.
//! - freq_count: Frequency count of the input, in first-occurrence order.
//!
pub mod cli;
pub mod files;
pub mod freq_count;
