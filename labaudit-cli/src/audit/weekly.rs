use labaudit_core::{aggregate_by_day, DateRange, DayAggregate, Filter, RecordSource, Result, Settings};

use crate::output::{write_report, ReportPaths};
use crate::render::render_weekly;

#[derive(Debug)]
pub struct WeeklyAudit {
    pub range: DateRange,
    pub days: Vec<DayAggregate>,
    pub paths: ReportPaths,
}

/// Audit every day of `range`, one row per day.
pub fn run_weekly(source: &dyn RecordSource, settings: &Settings, range: DateRange) -> Result<WeeklyAudit> {
    tracing::info!(start = %range.start(), end = %range.end(), "Starting weekly audit");

    let filter = Filter::within(&settings.properties.entry, &range);
    let sessions = super::fetch_sessions(source, &filter, settings)?;
    let days = aggregate_by_day(&range, &sessions);

    let report = render_weekly(&range, &days)?;
    let paths = ReportPaths::weekly(&settings.output_dir, &range);
    write_report(&paths, &report)?;

    tracing::info!(
        days = days.len(),
        sessions = days.iter().map(|d| d.sessions).sum::<u64>(),
        "Weekly audit complete"
    );

    Ok(WeeklyAudit { range, days, paths })
}
