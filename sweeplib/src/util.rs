use crate::config::ConfigurationPoint;
use crate::report::MetricRecord;

/// A report as printed by the simulator for a 32KB, 64B line, 8 way cache running the matrix
/// multiplication workload
pub const SAMPLE_REPORT: &str = "\
L1 Data (config)         Size: 32(KB)    Line size: 64(B)        Associativity: 8        Num sets: 64
Matrix multiplication complete

L1 Data (hit/miss)       Instructions: 53572514  References: 15264597    Miss rate: 0.0044       MPKI: 1.2592
      Total         Cold     Capacity      Mapping  Replacement
      67456         3170        16022         2057        46207
";

/// The record SAMPLE_REPORT parses to
pub fn sample_record() -> MetricRecord {
    MetricRecord {
        cache_size_kb: 32,
        block_size_b: 64,
        associativity: 8,
        num_sets: 64,
        instructions: 53572514,
        references: 15264597,
        miss_rate: 0.0044,
        mpki: 1.2592,
        total_misses: 67456,
        cold_misses: 3170,
        capacity_misses: 16022,
        mapping_misses: 2057,
        replacement_misses: 46207,
    }
}

/// Prints a record in the simulator's report layout. Used to fake simulator output
pub fn format_report(record: &MetricRecord) -> String {
    format!(
        "L1 Data (config)         Size: {}(KB)    Line size: {}(B)        Associativity: {}        Num sets: {}\n\
         Matrix multiplication complete\n\
         \n\
         L1 Data (hit/miss)       Instructions: {}  References: {}    Miss rate: {:.4}       MPKI: {:.4}\n      \
         Total         Cold     Capacity      Mapping  Replacement\n{:>11}{:>13}{:>13}{:>13}{:>13}\n",
        record.cache_size_kb,
        record.block_size_b,
        record.associativity,
        record.num_sets,
        record.instructions,
        record.references,
        record.miss_rate,
        record.mpki,
        record.total_misses,
        record.cold_misses,
        record.capacity_misses,
        record.mapping_misses,
        record.replacement_misses,
    )
}

/// A plausible record for a configuration point, with a consistent miss breakdown
pub fn synthetic_record(point: &ConfigurationPoint) -> MetricRecord {
    let lines = (point.cache_size_kb as u64 * 1024) / point.block_size_b as u64;
    let num_sets = (lines / point.associativity as u64).max(1) as u32;
    let instructions = 53_572_514;
    let references = 15_264_597;
    let cold_misses = 200_000 / point.block_size_b as u64;
    let capacity_misses = 4_000_000 / point.cache_size_kb as u64;
    let mapping_misses = 8_000 / point.associativity as u64;
    let replacement_misses = 40_000 + point.block_size_b as u64;
    let total_misses = cold_misses + capacity_misses + mapping_misses + replacement_misses;
    MetricRecord {
        cache_size_kb: point.cache_size_kb,
        block_size_b: point.block_size_b,
        associativity: point.associativity,
        num_sets,
        instructions,
        references,
        // Rounded the way the simulator prints them
        miss_rate: (total_misses as f64 / references as f64 * 1e4).round() / 1e4,
        mpki: (total_misses as f64 * 1000.0 / instructions as f64 * 1e4).round() / 1e4,
        total_misses,
        cold_misses,
        capacity_misses,
        mapping_misses,
        replacement_misses,
    }
}
