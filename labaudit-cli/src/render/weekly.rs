use labaudit_core::{DateRange, DayAggregate, Result};

use super::{Column, Page, Report, Table};

pub const WEEKLY_HEADERS: [&str; 6] = [
    "Date",
    "Sessions",
    "Completed",
    "Open",
    "Over 30 min",
    "Total Minutes",
];

const WEEKLY_STYLE: &str = "\
  .bar { background:#0d1320; border:1px solid #1a2432; height:10px; border-radius:999px; overflow:hidden; display:inline-block; width:160px; margin-right:8px; vertical-align:middle; }
  .bar>span { display:block; height:10px; background:linear-gradient(90deg,#19b3ff,#8b5cf6); }
  .bar>span.min { background:linear-gradient(90deg,#22c55e,#16a34a); }
  svg { margin-top:16px; }
";

const SPARK_HEIGHT: u64 = 40;
const SPARK_PITCH: usize = 12;
const SPARK_BAR_WIDTH: usize = 10;

/// `value` as a whole share of `max`, scaled to `scale`. A zero max counts as 1.
fn scaled(value: u64, max: u64, scale: u64) -> u64 {
    value * scale / max.max(1)
}

fn bar(value: u64, max: u64, class: &str) -> String {
    let class_attr = if class.is_empty() {
        String::new()
    } else {
        format!(" class=\"{class}\"")
    };
    format!(
        "<div class=\"bar\"><span{class_attr} style=\"width:{}%\"></span></div> {value}",
        scaled(value, max, 100)
    )
}

fn sparkline(days: &[DayAggregate], max_minutes: u64) -> String {
    let rects: String = days
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let height = scaled(d.total_minutes, max_minutes, SPARK_HEIGHT);
            format!(
                "<rect x=\"{}\" y=\"{}\" width=\"{SPARK_BAR_WIDTH}\" height=\"{height}\" fill=\"#19b3ff\" />",
                i * SPARK_PITCH,
                SPARK_HEIGHT - height
            )
        })
        .collect();

    format!(
        "  <svg width=\"{}\" height=\"50\">{rects}</svg>\n",
        days.len() * SPARK_PITCH
    )
}

pub fn weekly_table(days: &[DayAggregate]) -> Table<'_, DayAggregate> {
    let max_sessions = days.iter().map(|d| d.sessions).max().unwrap_or(0);
    let max_minutes = days.iter().map(|d| d.total_minutes).max().unwrap_or(0);

    Table::new(
        vec![
            Column::text(WEEKLY_HEADERS[0], |d: &DayAggregate| {
                d.date.format("%Y-%m-%d").to_string()
            }),
            Column::text(WEEKLY_HEADERS[1], |d: &DayAggregate| d.sessions.to_string())
                .with_html(move |d: &DayAggregate| bar(d.sessions, max_sessions, "")),
            Column::numeric(WEEKLY_HEADERS[2], |d: &DayAggregate| d.completed.to_string()),
            Column::numeric(WEEKLY_HEADERS[3], |d: &DayAggregate| d.open.to_string()),
            Column::numeric(WEEKLY_HEADERS[4], |d: &DayAggregate| {
                d.over_threshold.to_string()
            }),
            Column::text(WEEKLY_HEADERS[5], |d: &DayAggregate| d.total_minutes.to_string())
                .with_html(move |d: &DayAggregate| bar(d.total_minutes, max_minutes, "min")),
        ],
        days,
    )
}

/// Render per-day aggregates, ascending by date.
pub fn render_weekly(range: &DateRange, days: &[DayAggregate]) -> Result<Report> {
    let table = weekly_table(days);
    let max_minutes = days.iter().map(|d| d.total_minutes).max().unwrap_or(0);

    let title = format!("Weekly Audit — {} to {}", range.start(), range.end());
    let preamble = sparkline(days, max_minutes);
    let page = Page {
        title: &title,
        subtitle: "Per-day totals (sessions, completions, opens, over-30s, minutes).",
        style: WEEKLY_STYLE,
        preamble: &preamble,
    };

    Ok(Report {
        csv: table.to_csv()?,
        html: page.render(&table.to_html()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn week() -> (DateRange, Vec<DayAggregate>) {
        let range = DateRange::week_from(date("2024-01-08")).unwrap();
        let mut days: Vec<DayAggregate> = range.days().map(DayAggregate::empty).collect();
        days[2] = DayAggregate {
            date: date("2024-01-10"),
            sessions: 4,
            completed: 3,
            open: 1,
            over_threshold: 1,
            total_minutes: 80,
        };
        days[4] = DayAggregate {
            date: date("2024-01-12"),
            sessions: 2,
            completed: 2,
            open: 0,
            over_threshold: 0,
            total_minutes: 20,
        };
        (range, days)
    }

    #[test]
    fn test_csv_has_one_row_per_day() {
        let (range, days) = week();
        let report = render_weekly(&range, &days).unwrap();

        let mut reader = csv::Reader::from_reader(report.csv.as_bytes());
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, WEEKLY_HEADERS);

        let rows: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect();
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[0], vec!["2024-01-08", "0", "0", "0", "0", "0"]);
        assert_eq!(rows[2], vec!["2024-01-10", "4", "3", "1", "1", "80"]);
        assert_eq!(rows[4], vec!["2024-01-12", "2", "2", "0", "0", "20"]);
    }

    #[test]
    fn test_bars_scale_against_window_max() {
        let (range, days) = week();
        let html = render_weekly(&range, &days).unwrap().html;

        assert!(html.contains("<h1>Weekly Audit — 2024-01-08 to 2024-01-14</h1>"));
        // busiest day fills the bar, the 2-session day gets half
        assert!(html.contains("<span style=\"width:100%\"></span></div> 4"));
        assert!(html.contains("<span style=\"width:50%\"></span></div> 2"));
        assert!(html.contains("<span class=\"min\" style=\"width:25%\"></span></div> 20"));
        assert!(html.contains("<td class=\"num\">3</td>"));
    }

    #[test]
    fn test_sparkline_geometry() {
        let (range, days) = week();
        let html = render_weekly(&range, &days).unwrap().html;

        assert!(html.contains("<svg width=\"84\" height=\"50\">"));
        assert!(html.contains("<rect x=\"24\" y=\"0\" width=\"10\" height=\"40\" fill=\"#19b3ff\" />"));
        assert!(html.contains("<rect x=\"48\" y=\"30\" width=\"10\" height=\"10\" fill=\"#19b3ff\" />"));
        assert!(html.contains("<rect x=\"0\" y=\"40\" width=\"10\" height=\"0\" fill=\"#19b3ff\" />"));
    }

    #[test]
    fn test_all_zero_week_does_not_divide_by_zero() {
        let range = DateRange::week_from(date("2024-01-08")).unwrap();
        let days: Vec<DayAggregate> = range.days().map(DayAggregate::empty).collect();
        let html = render_weekly(&range, &days).unwrap().html;
        assert!(html.contains("<span style=\"width:0%\"></span></div> 0"));
    }
}
