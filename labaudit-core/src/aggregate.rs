//! Per-day and per-run roll-ups of reconstructed sessions.

use chrono::NaiveDate;

use crate::models::Session;
use crate::time::DateRange;

/// Counters for one calendar day of a weekly audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayAggregate {
    pub date: NaiveDate,
    pub sessions: u64,
    pub completed: u64,
    pub open: u64,
    pub over_threshold: u64,
    pub total_minutes: u64,
}

impl DayAggregate {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            sessions: 0,
            completed: 0,
            open: 0,
            over_threshold: 0,
            total_minutes: 0,
        }
    }

    fn record(&mut self, session: &Session) {
        self.sessions += 1;
        match session.duration_minutes {
            None => self.open += 1,
            Some(minutes) => {
                self.completed += 1;
                self.total_minutes += minutes.max(0) as u64;
                if session.is_over_threshold() {
                    self.over_threshold += 1;
                }
            }
        }
    }
}

/// Bucket sessions by the local date of their entry time.
///
/// Returns exactly one entry per day of `range`, ascending, zero-filled for
/// days without sessions. Sessions dated outside the range are skipped.
pub fn aggregate_by_day<'a, I>(range: &DateRange, sessions: I) -> Vec<DayAggregate>
where
    I: IntoIterator<Item = &'a Session>,
{
    let mut days: Vec<DayAggregate> = range.days().map(DayAggregate::empty).collect();

    for session in sessions {
        let day = session.entry_time.date_naive();
        if !range.contains(day) {
            tracing::debug!(%day, "Ignoring session outside the audit window");
            continue;
        }
        let index = (day - range.start()).num_days() as usize;
        days[index].record(session);
    }

    days
}

/// Headline counts for a daily audit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DailySummary {
    pub sessions: usize,
    pub open: usize,
    pub over_threshold: usize,
}

impl DailySummary {
    pub fn from_sessions(sessions: &[Session]) -> Self {
        Self {
            sessions: sessions.len(),
            open: sessions.iter().filter(|s| s.is_open()).count(),
            over_threshold: sessions.iter().filter(|s| s.is_over_threshold()).count(),
        }
    }
}
