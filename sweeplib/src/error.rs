use std::path::PathBuf;
use thiserror::Error;

/// The external simulator could not produce a report for a configuration point
#[derive(Debug, Error)]
pub enum InvocationFailure {
    #[error("couldn't start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("simulator exited with {}: {}", describe_status(.status), .stderr.trim())]
    Exit { status: Option<i32>, stderr: String },
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {code}"),
        None => String::from("no status (terminated by signal)"),
    }
}

/// Structural failures while reading a simulator report. Line numbers are zero based, counted
/// after leading blank lines are discarded
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed report at line {line}: {reason}")]
    MalformedReport { line: usize, reason: String },
    #[error("missing field `{field}` on line {line}")]
    MissingField { field: &'static str, line: usize },
    #[error("malformed miss breakdown on line {line}: expected 5 counts, found {found:?}")]
    MalformedBreakdown { line: usize, found: Vec<String> },
}

/// The miss breakdown of a record doesn't add up to its total
#[derive(Debug, Error, PartialEq, Eq)]
#[error("total misses {total} != cold + capacity + mapping + replacement ({sum})")]
pub struct BreakdownMismatch {
    pub total: u64,
    pub sum: u64,
}

/// Failure to persist records to a result table
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("couldn't access result table {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("couldn't write result table {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("no configuration point produced a record, nothing to store")]
    NothingCollected,
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("input table {} does not exist", .0.display())]
    MissingInputFile(PathBuf),
    #[error("couldn't read table {}: {source}", .path.display())]
    Table {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("table {} has no column `{column}`", .path.display())]
    MissingColumn { path: PathBuf, column: String },
    #[error("table {} row {row}: `{value}` in column `{column}` is not a number", .path.display())]
    InvalidValue {
        path: PathBuf,
        row: usize,
        column: String,
        value: String,
    },
    #[error("couldn't draw chart: {0}")]
    Chart(String),
    #[error("none of the input tables could be rendered")]
    NothingRendered,
    #[error("couldn't write document {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("couldn't open the config file at path {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("couldn't parse the config file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
