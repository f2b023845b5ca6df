//! Loyal customer detection from daily website access logs.
//!
//! Each day log holds `Timestamp,PageId,UserId` lines. A user is loyal when
//! they show up on at least two days and visit at least two distinct pages.

pub mod analyzer;
pub mod config;

pub use analyzer::{AccessRecord, LoyaltyAnalyzer, LoyaltyCriteria, LoyaltyReport, find_loyal_users, parse_log};
pub use config::AnalyzerConfig;
