use std::str::FromStr;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use crate::error::{BreakdownMismatch, ParseError};

/// Column names of a result table, in record order. Consumers rely on both the text and the order
pub const HEADER: [&str; 13] = [
    "Cache Size (KB)", "Block Size (B)", "Associativity", "Num Sets",
    "Instructions", "References", "Miss Rate", "MPKI",
    "Total", "Cold", "Capacity", "Mapping", "Replacement",
];

// Positions within the simulator report, counted after leading blank lines are dropped
const CONFIG_LINE: usize = 0;
const HIT_MISS_LINE: usize = 3;
const BREAKDOWN_LINE: usize = 5;
const MIN_LINES: usize = BREAKDOWN_LINE + 1;

lazy_static! {
    static ref SIZE: Regex = Regex::new(r"Size:\s*(\d+)").unwrap();
    static ref LINE_SIZE: Regex = Regex::new(r"Line size:\s*(\d+)").unwrap();
    static ref ASSOCIATIVITY: Regex = Regex::new(r"Associativity:\s*(\d+)").unwrap();
    static ref NUM_SETS: Regex = Regex::new(r"Num sets:\s*(\d+)").unwrap();
    static ref INSTRUCTIONS: Regex = Regex::new(r"Instructions:\s*(\d+)").unwrap();
    static ref REFERENCES: Regex = Regex::new(r"References:\s*(\d+)").unwrap();
    static ref MISS_RATE: Regex = Regex::new(r"Miss rate:\s*(\d+(?:\.\d+)?)(?:\s|$)").unwrap();
    static ref MPKI: Regex = Regex::new(r"MPKI:\s*(\d+(?:\.\d+)?)(?:\s|$)").unwrap();
}

/// The metrics of one simulator run, in result table column order
///
/// Field names serialise to the table header, so a record written by the store reads back with
/// the same values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    #[serde(rename = "Cache Size (KB)")]
    pub cache_size_kb: u32,
    #[serde(rename = "Block Size (B)")]
    pub block_size_b: u32,
    #[serde(rename = "Associativity")]
    pub associativity: u32,
    #[serde(rename = "Num Sets")]
    pub num_sets: u32,
    #[serde(rename = "Instructions")]
    pub instructions: u64,
    #[serde(rename = "References")]
    pub references: u64,
    #[serde(rename = "Miss Rate")]
    pub miss_rate: f64,
    #[serde(rename = "MPKI")]
    pub mpki: f64,
    #[serde(rename = "Total")]
    pub total_misses: u64,
    #[serde(rename = "Cold")]
    pub cold_misses: u64,
    #[serde(rename = "Capacity")]
    pub capacity_misses: u64,
    #[serde(rename = "Mapping")]
    pub mapping_misses: u64,
    #[serde(rename = "Replacement")]
    pub replacement_misses: u64,
}

impl MetricRecord {
    /// Checks that the miss breakdown adds up to the total. The simulator is expected to uphold
    /// this but nothing in the report format guarantees it
    pub fn check_breakdown(&self) -> Result<(), BreakdownMismatch> {
        let sum = self.cold_misses
            .saturating_add(self.capacity_misses)
            .saturating_add(self.mapping_misses)
            .saturating_add(self.replacement_misses);
        if sum == self.total_misses {
            Ok(())
        } else {
            Err(BreakdownMismatch { total: self.total_misses, sum })
        }
    }
}

/// Parses the text a simulator run printed into a metric record
///
/// The report layout is positional: the configuration line comes first, the hit/miss line is the
/// fourth line and the unlabelled miss breakdown is the sixth. Lines in between are ignored, as is
/// anything after the breakdown
///
/// ```text
/// L1 Data (config)    Size: 32(KB)    Line size: 64(B)    Associativity: 8    Num sets: 64
/// Matrix multiplication complete
///
/// L1 Data (hit/miss)    Instructions: 53572514    References: 15264597    Miss rate: 0.0044    MPKI: 1.2592
///       Total         Cold     Capacity      Mapping  Replacement
///       67456         3170        16022         2057        46207
/// ```
///
/// # Arguments
///
/// * `report`: The combined output of one simulator invocation
///
/// returns: Result<MetricRecord, ParseError>
pub fn parse_report(report: &str) -> Result<MetricRecord, ParseError> {
    let lines: Vec<&str> = report.trim().lines().collect();
    if lines.len() < MIN_LINES {
        return Err(ParseError::MalformedReport {
            line: lines.len(),
            reason: format!("report has {} lines, at least {MIN_LINES} are needed", lines.len()),
        });
    }
    let config = lines[CONFIG_LINE];
    let hit_miss = lines[HIT_MISS_LINE];

    let cache_size_kb = labelled(&SIZE, "Size", config, CONFIG_LINE)?;
    let block_size_b = labelled(&LINE_SIZE, "Line size", config, CONFIG_LINE)?;
    let associativity = labelled(&ASSOCIATIVITY, "Associativity", config, CONFIG_LINE)?;
    let num_sets = labelled(&NUM_SETS, "Num sets", config, CONFIG_LINE)?;

    let instructions = labelled(&INSTRUCTIONS, "Instructions", hit_miss, HIT_MISS_LINE)?;
    let references = labelled(&REFERENCES, "References", hit_miss, HIT_MISS_LINE)?;
    let miss_rate = labelled(&MISS_RATE, "Miss rate", hit_miss, HIT_MISS_LINE)?;
    let mpki = labelled(&MPKI, "MPKI", hit_miss, HIT_MISS_LINE)?;

    let [total_misses, cold_misses, capacity_misses, mapping_misses, replacement_misses] =
        parse_breakdown(lines[BREAKDOWN_LINE], BREAKDOWN_LINE)?;

    Ok(MetricRecord {
        cache_size_kb,
        block_size_b,
        associativity,
        num_sets,
        instructions,
        references,
        miss_rate,
        mpki,
        total_misses,
        cold_misses,
        capacity_misses,
        mapping_misses,
        replacement_misses,
    })
}

/// Finds `label:` followed by a number on a line and converts the number
fn labelled<T: FromStr>(pattern: &Regex, field: &'static str, text: &str, line: usize) -> Result<T, ParseError> {
    let value = pattern
        .captures(text)
        .and_then(|c| c.get(1))
        .ok_or(ParseError::MissingField { field, line })?
        .as_str();
    value.parse().map_err(|_| ParseError::MalformedReport {
        line,
        reason: format!("value `{value}` for `{field}` is out of range"),
    })
}

/// The breakdown line is five whitespace separated counts with no labels:
/// total, cold, capacity, mapping, replacement
fn parse_breakdown(text: &str, line: usize) -> Result<[u64; 5], ParseError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let malformed = || ParseError::MalformedBreakdown {
        line,
        found: tokens.iter().map(|t| t.to_string()).collect(),
    };
    if tokens.len() != 5 {
        return Err(malformed());
    }
    let mut counts = [0u64; 5];
    for (count, token) in counts.iter_mut().zip(&tokens) {
        *count = token.parse().map_err(|_| malformed())?;
    }
    Ok(counts)
}
