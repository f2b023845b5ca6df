//! End-to-end analysis over a list of day logs.
//!
//! Coordinates:
//! - Loading each day log from disk
//! - Parsing it into access records
//! - Feeding the records to the loyalty analyzer

use anyhow::Context;
use std::path::PathBuf;

use super::log_loader::{DayLog, load_day_log};
use super::log_parser::{LogParseError, parse_log};
use super::loyalty::LoyaltyAnalyzer;
use super::types::{DayIndex, LoyaltyCriteria, LoyaltyReport};

/// Parse one day's text and feed it to the analyzer.
///
/// Nothing from the day is observed if any line has a malformed field.
fn observe_text(analyzer: &mut LoyaltyAnalyzer, day: DayIndex, text: &str) -> Result<(), LogParseError> {
    let mut records = parse_log(text);
    let mut parsed = Vec::new();
    for record in records.by_ref() {
        parsed.push(record?);
    }

    log::debug!("Day {}: {} records, {} lines skipped", day, parsed.len(), records.skipped_lines());
    analyzer.observe_day(day, parsed);
    Ok(())
}

/// Analyze day logs that are already in memory.
///
/// # Parameters
///
/// * `days` - Text of each day log, in day order
/// * `criteria` - Loyalty thresholds
///
/// # Returns
///
/// The loyalty report, or the first parse error with the day it occurred on.
pub fn analyze_texts<S: AsRef<str>>(days: &[S], criteria: LoyaltyCriteria) -> anyhow::Result<LoyaltyReport> {
    let mut analyzer = LoyaltyAnalyzer::new(criteria);
    for (day, text) in days.iter().enumerate() {
        observe_text(&mut analyzer, day, text.as_ref()).with_context(|| format!("Failed to parse log for day {}", day))?;
    }
    Ok(analyzer.report())
}

fn log_loyal_users(analyzer: &LoyaltyAnalyzer) {
    for activity in analyzer.loyal_activities() {
        log::debug!(
            "Loyal user {}: days {:?}, {} pages, {} visits, {} to {}",
            activity.user_id,
            activity.days,
            activity.distinct_page_count(),
            activity.visits,
            activity.first_seen.to_rfc3339(),
            activity.last_seen.to_rfc3339()
        );
    }
}

/// Load, parse and analyze the given day log files.
///
/// Any unreadable file or malformed field aborts the whole run.
pub fn run_analysis(paths: &[PathBuf], criteria: LoyaltyCriteria) -> anyhow::Result<LoyaltyReport> {
    log::info!(
        "Analyzing {} day logs (min days: {}, min distinct pages: {})",
        paths.len(),
        criteria.min_days,
        criteria.min_distinct_pages
    );

    let logs = paths
        .iter()
        .enumerate()
        .map(|(day, path)| load_day_log(day, path))
        .collect::<anyhow::Result<Vec<DayLog>>>()?;

    let mut analyzer = LoyaltyAnalyzer::new(criteria);
    for day_log in &logs {
        observe_text(&mut analyzer, day_log.day, &day_log.contents)
            .with_context(|| format!("Failed to parse log for day {} ({})", day_log.day, day_log.path.display()))?;
    }

    log_loyal_users(&analyzer);
    let report = analyzer.report();
    log::info!(
        "Found {} loyal users among {} users in {} records",
        report.loyal_users.len(),
        report.users_seen,
        report.total_records()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use uuid::Uuid;

    const SAMPLE_DAY1: &str = include_str!("../../testdata/day1.log");
    const SAMPLE_DAY2: &str = include_str!("../../testdata/day2.log");

    fn sample_loyal_users() -> Vec<Uuid> {
        vec![
            Uuid::parse_str("fd826e47-ece0-4a50-82b0-c758401212f7").unwrap(),
            Uuid::parse_str("aa3b5214-a3f7-4e7e-a0a6-c061edf61f90").unwrap(),
        ]
    }

    #[test]
    fn test_analyze_sample_texts() {
        let report = analyze_texts(&[SAMPLE_DAY1, SAMPLE_DAY2], LoyaltyCriteria::default()).unwrap();

        assert_eq!(report.loyal_users, sample_loyal_users());
        assert_eq!(report.records_per_day, vec![50, 50]);
    }

    #[test]
    fn test_analyze_empty_texts() {
        let report = analyze_texts(&["", ""], LoyaltyCriteria::default()).unwrap();
        assert!(report.loyal_users.is_empty());
        assert_eq!(report.records_per_day, vec![0, 0]);
    }

    #[test]
    fn test_malformed_identifier_fails_run() {
        let bad_day2 = "2024-03-27T19:47:47Z,not-a-page,fd826e47-ece0-4a50-82b0-c758401212f7\n";
        let err = analyze_texts(&[SAMPLE_DAY1, bad_day2], LoyaltyCriteria::default()).unwrap_err();

        assert!(err.to_string().contains("day 1"));
        let parse_err = err.downcast_ref::<LogParseError>().unwrap();
        assert_eq!(parse_err.line(), 1);
    }

    #[test]
    fn test_analyze_texts_with_bom() {
        let with_bom = format!("\u{feff}{}", SAMPLE_DAY1);
        let report = analyze_texts(&[with_bom.as_str(), SAMPLE_DAY2], LoyaltyCriteria::default()).unwrap();

        assert_eq!(report.loyal_users, sample_loyal_users());
        assert_eq!(report.records_per_day, vec![50, 50]);
    }

    #[test]
    fn test_run_analysis_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let day1 = dir.path().join("day1.log");
        let day2 = dir.path().join("day2.log");
        fs::write(&day1, SAMPLE_DAY1).unwrap();
        fs::write(&day2, SAMPLE_DAY2).unwrap();

        let report = run_analysis(&[day1, day2], LoyaltyCriteria::default()).unwrap();
        assert_eq!(report.loyal_users, sample_loyal_users());
        assert_eq!(report.users_seen, 96);
    }

    #[test]
    fn test_run_analysis_reports_file_and_line() {
        let dir = tempfile::tempdir().unwrap();
        let day1 = dir.path().join("day1.log");
        let day2 = dir.path().join("broken.log");
        fs::write(&day1, SAMPLE_DAY1).unwrap();
        fs::write(&day2, format!("{}2024-13-45T00:00:00Z,{},{}\n", SAMPLE_DAY2, Uuid::nil(), Uuid::nil())).unwrap();

        let err = run_analysis(&[day1, day2], LoyaltyCriteria::default()).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("day 1"));
        assert!(message.contains("broken.log"));
        assert!(message.contains("line 51"));
    }
}
