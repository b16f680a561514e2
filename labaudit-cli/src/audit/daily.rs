use chrono::NaiveDate;
use labaudit_core::{DailySummary, Filter, RecordSource, Result, Session, Settings};

use crate::output::{write_report, ReportPaths};
use crate::render::render_daily;

#[derive(Debug)]
pub struct DailyAudit {
    pub date: NaiveDate,
    pub sessions: Vec<Session>,
    pub summary: DailySummary,
    pub paths: ReportPaths,
}

/// Audit the sessions entered on `date`.
pub fn run_daily(source: &dyn RecordSource, settings: &Settings, date: NaiveDate) -> Result<DailyAudit> {
    tracing::info!(%date, "Starting daily audit");

    let filter = Filter::on_day(&settings.properties.entry, date);
    let sessions = super::fetch_sessions(source, &filter, settings)?;
    let summary = DailySummary::from_sessions(&sessions);

    let report = render_daily(date, &sessions)?;
    let paths = ReportPaths::daily(&settings.output_dir, date);
    write_report(&paths, &report)?;

    tracing::info!(
        sessions = summary.sessions,
        open = summary.open,
        over_threshold = summary.over_threshold,
        "Daily audit complete"
    );

    Ok(DailyAudit {
        date,
        sessions,
        summary,
        paths,
    })
}
