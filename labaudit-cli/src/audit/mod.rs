//! Audit runs: fetch, rebuild sessions, render, write.
//!
//! Every record is fetched before anything is written, so a failed query
//! leaves no report files behind.

pub mod daily;
pub mod weekly;

use labaudit_core::{Filter, RecordSource, Result, Session, Settings};

pub use daily::{run_daily, DailyAudit};
pub use weekly::{run_weekly, WeeklyAudit};

/// Pull every record matching `filter` and rebuild sessions, keeping fetch
/// order. Records without a usable entry time are dropped.
pub fn fetch_sessions(
    source: &dyn RecordSource,
    filter: &Filter,
    settings: &Settings,
) -> Result<Vec<Session>> {
    let mut sessions = Vec::new();
    let mut dropped = 0usize;

    for record in source.query(filter) {
        let record = record?;
        match Session::from_record(&record, &settings.properties, &settings.timezone) {
            Some(session) => sessions.push(session),
            None => dropped += 1,
        }
    }

    tracing::info!(
        sessions = sessions.len(),
        dropped,
        "Rebuilt sessions from attendance records"
    );
    Ok(sessions)
}
