//! # SweepLib
//!
//! SweepLib drives an external cache simulator across a grid of cache configurations and keeps
//! the results
//!
//! A sweep runs the simulator once per configuration point, parses the text report it prints into
//! a fixed set of metrics, and appends the metrics to a CSV result table. Result tables can later
//! be rendered into an HTML document of comparison charts
//!
//! The simulator is treated as an opaque process; only its report layout is relied upon, and that
//! knowledge lives entirely in the report module

/// Contains definitions for the JSON sweep and render configuration files
pub mod config;

/// Error types for every stage
pub mod error;

/// Contains the trait for running the simulator, and the child process implementation
pub mod invoker;

/// Contains the metric record and the parser for simulator reports
pub mod report;

/// Contains the sweep driver which combines axis values and collects records
pub mod sweep;

/// Contains the append-only result table
pub mod store;

/// Renders result tables into charts and an HTML document
pub mod render;

#[cfg(test)]
mod test;

/// Contains utilities for running tests and benchmarks.
pub mod util;
