use crate::error::ParseError;
use crate::report::parse_report;
use crate::util::{format_report, sample_record, SAMPLE_REPORT};

#[test]
fn parses_sample_report() {
    assert_eq!(parse_report(SAMPLE_REPORT), Ok(sample_record()));
}

#[test]
fn parses_report_given_as_lines() {
    let lines = [
        "L1 Data (config) Size: 32(KB) Line size: 64(B) Associativity: 8 Num sets: 64",
        "Matrix multiplication complete",
        "",
        "L1 Data (hit/miss) Instructions: 53572514 References: 15264597 Miss rate: 0.0044 MPKI: 1.2592",
        "Total Cold Capacity Mapping Replacement",
        "67456 3170 16022 2057 46207",
    ];
    assert_eq!(parse_report(&lines.join("\n")), Ok(sample_record()));
}

#[test]
fn ignores_surrounding_blank_lines_and_trailing_output() {
    let report = format!("\n\n\r\n{SAMPLE_REPORT}\nDone.\n\n");
    assert_eq!(parse_report(&report), Ok(sample_record()));
}

#[test]
fn sample_breakdown_is_consistent() {
    assert!(sample_record().check_breakdown().is_ok());
}

#[test]
fn flags_inconsistent_breakdown() {
    let mut record = sample_record();
    record.total_misses += 1;
    let mismatch = record.check_breakdown().unwrap_err();
    assert_eq!(mismatch.total, 67457);
    assert_eq!(mismatch.sum, 67456);
}

#[test]
fn rejects_short_report() {
    let report: String = SAMPLE_REPORT.lines().take(5).collect::<Vec<_>>().join("\n");
    assert!(matches!(parse_report(&report), Err(ParseError::MalformedReport { .. })));
    assert!(matches!(parse_report(""), Err(ParseError::MalformedReport { line: 0, .. })));
}

#[test]
fn names_missing_config_field() {
    let report = SAMPLE_REPORT.replace("Num sets:", "Sets");
    assert_eq!(parse_report(&report), Err(ParseError::MissingField { field: "Num sets", line: 0 }));
}

#[test]
fn names_missing_hit_miss_field() {
    let report = SAMPLE_REPORT.replace("MPKI: 1.2592", "MPKI: n/a");
    assert_eq!(parse_report(&report), Err(ParseError::MissingField { field: "MPKI", line: 3 }));
}

#[test]
fn size_label_is_case_sensitive() {
    // "Line size:" must not stand in for the cache size
    let report = SAMPLE_REPORT.replace("Size: 32(KB)", "Capacity 32(KB)");
    assert_eq!(parse_report(&report), Err(ParseError::MissingField { field: "Size", line: 0 }));
}

#[test]
fn trusts_line_positions() {
    // The hit/miss line moved down by one, so line 3 no longer has the labels
    let report = SAMPLE_REPORT.replacen("\n\n", "\n\n\n", 1);
    assert_eq!(parse_report(&report), Err(ParseError::MissingField { field: "Instructions", line: 3 }));
}

#[test]
fn rejects_breakdown_with_wrong_token_count() {
    let short = SAMPLE_REPORT.replace("2057        46207", "2057");
    match parse_report(&short) {
        Err(ParseError::MalformedBreakdown { line, found }) => {
            assert_eq!(line, 5);
            assert_eq!(found, vec!["67456", "3170", "16022", "2057"]);
        }
        other => panic!("expected a breakdown failure, got {other:?}"),
    }
    let long = SAMPLE_REPORT.replace("46207", "46207 12");
    assert!(matches!(parse_report(&long), Err(ParseError::MalformedBreakdown { .. })));
}

#[test]
fn rejects_non_numeric_breakdown() {
    let report = SAMPLE_REPORT.replace("3170", "cold");
    assert!(matches!(parse_report(&report), Err(ParseError::MalformedBreakdown { line: 5, .. })));
}

#[test]
fn rejects_out_of_range_values() {
    let report = SAMPLE_REPORT.replace("Associativity: 8", "Associativity: 99999999999");
    assert!(matches!(parse_report(&report), Err(ParseError::MalformedReport { line: 0, .. })));
}

#[test]
fn integer_rates_are_accepted() {
    let report = SAMPLE_REPORT.replace("Miss rate: 0.0044", "Miss rate: 1");
    assert_eq!(parse_report(&report).map(|r| r.miss_rate), Ok(1.0));
}

#[test]
fn rejects_rates_in_exponent_notation() {
    let report = SAMPLE_REPORT.replace("Miss rate: 0.0044", "Miss rate: 1e-3");
    assert_eq!(parse_report(&report), Err(ParseError::MissingField { field: "Miss rate", line: 3 }));
    let report = SAMPLE_REPORT.replace("MPKI: 1.2592", "MPKI: 1.2592e2");
    assert_eq!(parse_report(&report), Err(ParseError::MissingField { field: "MPKI", line: 3 }));
}

#[test]
fn formatted_reports_parse_back() {
    let mut record = sample_record();
    record.cache_size_kb = 1024;
    record.associativity = 1;
    record.num_sets = 16384;
    assert_eq!(parse_report(&format_report(&record)), Ok(record));
}
