//! Analyzer module for access log parsing and loyalty detection.
//!
//! Provides functionality for:
//! - Reading day logs from disk
//! - Parsing `Timestamp,PageId,UserId` lines into access records
//! - Finding users that came back on several days and browsed several pages

pub mod log_loader;
pub mod log_parser;
pub mod loyalty;
pub mod task;
pub mod types;

pub use log_parser::{LogParseError, parse_log};
pub use loyalty::{LoyaltyAnalyzer, find_loyal_users};
pub use task::{analyze_texts, run_analysis};
pub use types::{AccessRecord, DayIndex, LoyaltyCriteria, LoyaltyReport, UserActivity};
