use std::fmt;
use std::path::Path;
use tracing::{info, warn};
use crate::config::{ConfigurationPoint, SweepAxes};
use crate::error::{InvocationFailure, ParseError, SweepError};
use crate::invoker::Invoke;
use crate::report::{parse_report, MetricRecord};
use crate::store::append_records;

impl SweepAxes {
    /// Every combination of axis values, cache size outermost and associativity innermost, each
    /// axis in the order it was given
    pub fn points(&self) -> impl Iterator<Item = ConfigurationPoint> + '_ {
        self.cache_sizes_kb.iter().flat_map(move |&cache_size_kb| {
            self.block_sizes_b.iter().flat_map(move |&block_size_b| {
                self.associativities.iter().map(move |&associativity| ConfigurationPoint {
                    cache_size_kb,
                    block_size_b,
                    associativity,
                })
            })
        })
    }

    /// The number of points a sweep over these axes visits
    pub fn len(&self) -> usize {
        self.cache_sizes_kb.len() * self.block_sizes_b.len() * self.associativities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Why a configuration point produced no record
#[derive(Debug)]
pub enum SkipReason {
    Invocation(InvocationFailure),
    Parse(ParseError),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Invocation(e) => write!(f, "{e}"),
            SkipReason::Parse(e) => write!(f, "{e}"),
        }
    }
}

#[derive(Debug)]
pub struct PointFailure {
    pub point: ConfigurationPoint,
    pub reason: SkipReason,
}

/// Everything one pass over the axes produced
///
/// Records are in enumeration order. Failed points are kept separately so callers can report them
#[derive(Debug, Default)]
pub struct SweepOutcome {
    pub records: Vec<MetricRecord>,
    pub failures: Vec<PointFailure>,
}

impl SweepOutcome {
    pub fn attempted(&self) -> usize {
        self.records.len() + self.failures.len()
    }
}

/// Runs the simulator once for every point of the axes, one after another
///
/// A point that fails to run or whose report can't be parsed is logged and skipped, the sweep
/// carries on with the next point. Nothing is retried
///
/// # Arguments
///
/// * `axes`: The axis values to combine
/// * `invoker`: Runs the simulator for a single point
///
/// returns: SweepOutcome
pub fn run_sweep<I: Invoke>(axes: &SweepAxes, invoker: &mut I) -> SweepOutcome {
    let mut outcome = SweepOutcome::default();
    for point in axes.points() {
        info!("Running simulator with {point}");
        let report = match invoker.invoke(&point) {
            Ok(report) => report,
            Err(e) => {
                warn!(%point, error = %e, "simulator run failed, skipping point");
                outcome.failures.push(PointFailure { point, reason: SkipReason::Invocation(e) });
                continue;
            }
        };
        let record = match parse_report(&report) {
            Ok(record) => record,
            Err(e) => {
                warn!(%point, error = %e, "couldn't parse simulator report, skipping point");
                outcome.failures.push(PointFailure { point, reason: SkipReason::Parse(e) });
                continue;
            }
        };
        if let Err(mismatch) = record.check_breakdown() {
            warn!(%point, %mismatch, "inconsistent miss breakdown, keeping record");
        }
        outcome.records.push(record);
    }
    outcome
}

/// Sweeps the axes and appends whatever was collected to a result table in one batch
///
/// Fails only if no point produced a record or the table can't be written
pub fn sweep_to_table<I: Invoke>(axes: &SweepAxes, invoker: &mut I, table: &Path) -> Result<SweepOutcome, SweepError> {
    let outcome = run_sweep(axes, invoker);
    if outcome.records.is_empty() {
        return Err(SweepError::NothingCollected);
    }
    append_records(table, &outcome.records)?;
    info!(
        rows = outcome.records.len(),
        skipped = outcome.failures.len(),
        table = %table.display(),
        "appended sweep results"
    );
    Ok(outcome)
}
