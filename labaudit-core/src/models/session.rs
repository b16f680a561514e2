use chrono::DateTime;
use chrono_tz::Tz;

use crate::config::PropertyNames;
use crate::extract;
use crate::models::RawRecord;
use crate::time;

/// Sessions longer than this many minutes are flagged for review.
pub const OVER_THRESHOLD_MINUTES: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No usable exit time yet.
    Open,
    Completed,
    /// Completed and longer than [`OVER_THRESHOLD_MINUTES`].
    OverThreshold,
}

/// One visit to the lab, rebuilt from an attendance record.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub first_name: String,
    pub last_name: String,
    pub console: String,
    pub entry_time: DateTime<Tz>,
    pub exit_time: Option<DateTime<Tz>>,
    pub duration_minutes: Option<i64>,
}

impl Session {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        console: impl Into<String>,
        entry_time: DateTime<Tz>,
        exit_time: Option<DateTime<Tz>>,
    ) -> Self {
        let duration_minutes = exit_time
            .as_ref()
            .map(|exit| time::minutes_between(&entry_time, exit));

        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            console: console.into(),
            entry_time,
            exit_time,
            duration_minutes,
        }
    }

    /// Rebuild a session from a raw record, viewed in `tz`.
    ///
    /// Returns `None` when the entry time is missing or unparseable; such rows
    /// are test entries or half-filled forms and are left out of every report.
    pub fn from_record(record: &RawRecord, names: &PropertyNames, tz: &Tz) -> Option<Self> {
        let props = &record.properties;

        let Some(entry_raw) = extract::date_start(props, &names.entry) else {
            tracing::debug!(record = %record.id, "Skipping record without entry time");
            return None;
        };
        let Some(entry_time) = time::parse_timestamp(entry_raw, tz) else {
            tracing::debug!(record = %record.id, value = entry_raw, "Skipping record with unparseable entry time");
            return None;
        };

        let exit_time = extract::date_start(props, &names.exit)
            .and_then(|raw| time::parse_timestamp(raw, tz));

        Some(Self::new(
            extract::any_text(props, &names.first_name),
            extract::any_text(props, &names.last_name),
            extract::console_value(props, &names.console),
            entry_time,
            exit_time,
        ))
    }

    pub fn status(&self) -> SessionStatus {
        match self.duration_minutes {
            None => SessionStatus::Open,
            Some(m) if m > OVER_THRESHOLD_MINUTES => SessionStatus::OverThreshold,
            Some(_) => SessionStatus::Completed,
        }
    }

    pub fn is_open(&self) -> bool {
        self.duration_minutes.is_none()
    }

    /// True for both plain completed and over-threshold sessions.
    pub fn is_completed(&self) -> bool {
        self.duration_minutes.is_some()
    }

    pub fn is_over_threshold(&self) -> bool {
        self.status() == SessionStatus::OverThreshold
    }

    pub fn time_in(&self) -> String {
        time::pretty_time(&self.entry_time)
    }

    /// Empty for open sessions.
    pub fn time_out(&self) -> String {
        self.exit_time
            .as_ref()
            .map(time::pretty_time)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::UTC;
    use serde_json::{json, Value};

    fn record(props: Value) -> RawRecord {
        RawRecord::from_value(json!({ "id": "page-1", "properties": props }))
    }

    fn date_prop(start: &str) -> Value {
        json!({ "type": "date", "date": { "start": start } })
    }

    fn full_record(entry: Option<&str>, exit: Option<&str>) -> RawRecord {
        let mut props = json!({
            "FIRST NAME": { "type": "title", "title": [{ "plain_text": "Grace" }] },
            "LAST NAME": { "type": "rich_text", "rich_text": [{ "plain_text": "Hopper" }] },
            "CONSOLE #": { "type": "select", "select": { "name": "PC-4" } }
        });
        if let Some(entry) = entry {
            props["DATE OF ENTRY"] = date_prop(entry);
        }
        if let Some(exit) = exit {
            props["DATE OF EXIT"] = date_prop(exit);
        }
        record(props)
    }

    fn reconstruct(rec: &RawRecord) -> Option<Session> {
        Session::from_record(rec, &PropertyNames::default(), &UTC)
    }

    #[test]
    fn test_completed_over_threshold_session() {
        let rec = full_record(Some("2024-01-10T14:00:00Z"), Some("2024-01-10T14:45:00Z"));
        let session = reconstruct(&rec).expect("session");

        assert_eq!(session.first_name, "Grace");
        assert_eq!(session.last_name, "Hopper");
        assert_eq!(session.console, "PC-4");
        assert_eq!(session.duration_minutes, Some(45));
        assert!(session.is_completed());
        assert!(!session.is_open());
        assert!(session.is_over_threshold());
        assert_eq!(session.status(), SessionStatus::OverThreshold);
        assert_eq!(session.time_in(), "2:00 PM");
        assert_eq!(session.time_out(), "2:45 PM");
    }

    #[test]
    fn test_open_session_without_exit() {
        let rec = full_record(Some("2024-01-10T14:00:00Z"), None);
        let session = reconstruct(&rec).expect("session");

        assert!(session.is_open());
        assert!(!session.is_completed());
        assert!(!session.is_over_threshold());
        assert_eq!(session.duration_minutes, None);
        assert_eq!(session.time_out(), "");
    }

    #[test]
    fn test_unparseable_exit_is_open() {
        let rec = full_record(Some("2024-01-10T14:00:00Z"), Some("later"));
        let session = reconstruct(&rec).expect("session");
        assert_eq!(session.status(), SessionStatus::Open);
        assert!(session.exit_time.is_none());
    }

    #[test]
    fn test_missing_or_bad_entry_drops_record() {
        assert!(reconstruct(&full_record(None, Some("2024-01-10T14:45:00Z"))).is_none());
        assert!(reconstruct(&full_record(Some("garbage"), None)).is_none());
        assert!(reconstruct(&RawRecord::default()).is_none());
    }

    #[test]
    fn test_exit_before_entry_clamps_to_zero() {
        let rec = full_record(Some("2024-01-10T14:00:00Z"), Some("2024-01-10T13:00:00Z"));
        let session = reconstruct(&rec).expect("session");
        assert_eq!(session.duration_minutes, Some(0));
        assert_eq!(session.status(), SessionStatus::Completed);
    }

    #[test]
    fn test_threshold_boundary() {
        let at = full_record(Some("2024-01-10T14:00:00Z"), Some("2024-01-10T14:30:59Z"));
        let over = full_record(Some("2024-01-10T14:00:00Z"), Some("2024-01-10T14:31:00Z"));
        assert_eq!(reconstruct(&at).unwrap().status(), SessionStatus::Completed);
        assert_eq!(reconstruct(&over).unwrap().status(), SessionStatus::OverThreshold);
    }

    #[test]
    fn test_missing_names_default_to_empty() {
        let rec = record(json!({ "DATE OF ENTRY": date_prop("2024-01-10T14:00:00Z") }));
        let session = reconstruct(&rec).expect("session");
        assert_eq!(session.first_name, "");
        assert_eq!(session.last_name, "");
        assert_eq!(session.console, "");
    }

    #[test]
    fn test_custom_property_names() {
        let names = PropertyNames {
            entry: "IN".to_string(),
            exit: "OUT".to_string(),
            ..PropertyNames::default()
        };
        let rec = record(json!({
            "IN": date_prop("2024-01-10T14:00:00Z"),
            "OUT": date_prop("2024-01-10T14:20:00Z")
        }));
        let session = Session::from_record(&rec, &names, &UTC).expect("session");
        assert_eq!(session.duration_minutes, Some(20));
    }

    #[test]
    fn test_exactly_one_of_open_or_completed() {
        let cases = [
            full_record(Some("2024-01-10T14:00:00Z"), None),
            full_record(Some("2024-01-10T14:00:00Z"), Some("2024-01-10T14:10:00Z")),
            full_record(Some("2024-01-10T14:00:00Z"), Some("2024-01-10T16:00:00Z")),
        ];
        for rec in &cases {
            let s = reconstruct(rec).unwrap();
            assert!(s.is_open() ^ s.is_completed());
            if s.is_over_threshold() {
                assert!(s.is_completed());
            }
        }
    }
}
