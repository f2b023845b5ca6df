//! Parse day log text into structured `AccessRecord` data.
//!
//! Every line has the form:
//!
//! ```text
//! Timestamp,PageId,UserId
//! 2024-03-26T19:49:36.8532130Z,f2f32ee5-3c2e-4135-915a-1c89c227ad6f,8a2561c4-ee85-4929-a28d-418c9bc7a55b
//! ```
//!
//! Lines with any other number of fields are skipped. A field that cannot be
//! parsed is an error for the whole day log.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::fmt;
use std::iter::Enumerate;
use std::str::Lines;
use uuid::Uuid;

use super::types::AccessRecord;

/// Number of comma separated fields in a well-formed line.
const FIELD_COUNT: usize = 3;

/// ISO-8601 layouts with an offset that RFC 3339 rejects: `+0200`, `+02`, or
/// no seconds. `%#z` also takes `Z`.
const OFFSET_TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M%#z",
];

/// Layouts tried for timestamps without an offset; those are taken as UTC.
const NAIVE_TIMESTAMP_FORMATS: [&str; 4] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

/// Byte order mark some editors put at the start of UTF-8 text.
const UTF8_BOM: char = '\u{feff}';

/// Which identifier column failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdField {
    Page,
    User,
}

impl fmt::Display for IdField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdField::Page => write!(f, "page id"),
            IdField::User => write!(f, "user id"),
        }
    }
}

/// Fatal problems found while parsing a day log.
///
/// `line` is 1-based.
#[derive(Debug, thiserror::Error)]
pub enum LogParseError {
    #[error("line {line}: malformed timestamp {value:?}")]
    MalformedTimestamp {
        line: usize,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("line {line}: malformed {field} {value:?}")]
    MalformedIdentifier {
        line: usize,
        field: IdField,
        value: String,
        #[source]
        source: uuid::Error,
    },
}

impl LogParseError {
    pub fn line(&self) -> usize {
        match self {
            LogParseError::MalformedTimestamp { line, .. } | LogParseError::MalformedIdentifier { line, .. } => *line,
        }
    }
}

/// Parse a single log line.
///
/// # Parameters
///
/// * `line_number` - 1-based position of the line, used in errors
/// * `line` - The line without its terminator
///
/// # Returns
///
/// `Ok(Some(record))` for a well-formed line, `Ok(None)` when the line does not
/// have exactly three fields, `Err` when a field is malformed.
pub fn parse_log_line(line_number: usize, line: &str) -> Result<Option<AccessRecord>, LogParseError> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != FIELD_COUNT {
        return Ok(None);
    }

    let timestamp = parse_timestamp(fields[0]).map_err(|source| LogParseError::MalformedTimestamp {
        line: line_number,
        value: fields[0].to_string(),
        source,
    })?;
    let page_id = parse_identifier(line_number, IdField::Page, fields[1])?;
    let user_id = parse_identifier(line_number, IdField::User, fields[2])?;

    Ok(Some(AccessRecord {
        timestamp,
        page_id,
        user_id,
    }))
}

/// Parse a timestamp and shift it to UTC.
///
/// Offsets are applied rather than dropped, so `10:00:00+02:00` becomes
/// `08:00:00Z`.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let text = text.trim();
    match DateTime::parse_from_rfc3339(text) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(rfc_err) => OFFSET_TIMESTAMP_FORMATS
            .iter()
            .find_map(|format| DateTime::parse_from_str(text, format).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|| {
                NAIVE_TIMESTAMP_FORMATS
                    .iter()
                    .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
                    .map(|naive| naive.and_utc())
            })
            .ok_or(rfc_err),
    }
}

fn parse_identifier(line_number: usize, field: IdField, text: &str) -> Result<Uuid, LogParseError> {
    Uuid::parse_str(text.trim()).map_err(|source| LogParseError::MalformedIdentifier {
        line: line_number,
        field,
        value: text.to_string(),
        source,
    })
}

/// Lazy record sequence over one day log.
///
/// Created by [`parse_log`]. Ends after the first error.
pub struct LogRecords<'a> {
    lines: Enumerate<Lines<'a>>,
    skipped: usize,
    failed: bool,
}

impl LogRecords<'_> {
    /// Lines skipped so far because of a wrong field count.
    pub fn skipped_lines(&self) -> usize {
        self.skipped
    }
}

impl Iterator for LogRecords<'_> {
    type Item = Result<AccessRecord, LogParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        for (index, line) in self.lines.by_ref() {
            match parse_log_line(index + 1, line) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => {
                    self.skipped += 1;
                    log::trace!("Skipping line {}: expected {} fields: {:?}", index + 1, FIELD_COUNT, line);
                }
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

/// Start parsing a day log.
///
/// Nothing is parsed until the returned iterator is advanced; calling this
/// again on the same text starts over. A leading byte order mark is ignored.
pub fn parse_log(text: &str) -> LogRecords<'_> {
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);
    LogRecords {
        lines: text.lines().enumerate(),
        skipped: 0,
        failed: false,
    }
}

/// Parse a whole day log, stopping at the first malformed field.
pub fn collect_day(text: &str) -> Result<Vec<AccessRecord>, LogParseError> {
    parse_log(text).collect()
}
