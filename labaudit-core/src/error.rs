use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Missing {0}")]
    MissingSetting(&'static str),

    #[error("Unknown time zone '{0}' (expected an IANA name such as America/New_York)")]
    InvalidTimezone(String),

    #[error("Invalid date range: {start} is after {end}")]
    InvalidRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("Date {0} is at the edge of the supported calendar")]
    DateOutOfRange(chrono::NaiveDate),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Notion error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, AuditError>;
