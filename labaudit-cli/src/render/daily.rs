use chrono::NaiveDate;
use labaudit_core::{DailySummary, Result, Session};

use super::{Column, Page, Report, Table};

pub const DAILY_HEADERS: [&str; 6] = [
    "First Name",
    "Last Name",
    "Console #",
    "Time In",
    "Time Out",
    "Minutes",
];

pub fn daily_table(sessions: &[Session]) -> Table<'_, Session> {
    Table::new(
        vec![
            Column::text(DAILY_HEADERS[0], |s: &Session| s.first_name.clone()),
            Column::text(DAILY_HEADERS[1], |s: &Session| s.last_name.clone()),
            Column::text(DAILY_HEADERS[2], |s: &Session| s.console.clone()),
            Column::text(DAILY_HEADERS[3], Session::time_in),
            Column::text(DAILY_HEADERS[4], Session::time_out),
            Column::numeric(DAILY_HEADERS[5], |s: &Session| {
                s.duration_minutes.map(|m| m.to_string()).unwrap_or_default()
            }),
        ],
        sessions,
    )
}

/// Render one day's sessions, in fetch order.
pub fn render_daily(date: NaiveDate, sessions: &[Session]) -> Result<Report> {
    let table = daily_table(sessions);
    let summary = DailySummary::from_sessions(sessions);

    let title = format!("Daily Audit — {date}");
    let subtitle = format!(
        "Sessions: {} | Open sessions: {} | Over 30 min: {}",
        summary.sessions, summary.open, summary.over_threshold
    );
    let page = Page {
        title: &title,
        subtitle: &subtitle,
        style: "",
        preamble: "",
    };

    Ok(Report {
        csv: table.to_csv()?,
        html: page.render(&table.to_html()),
    })
}
