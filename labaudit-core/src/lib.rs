pub mod aggregate;
pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod notion;
pub mod time;

pub use aggregate::{aggregate_by_day, DailySummary, DayAggregate};
pub use config::{AuditConfig, PropertyNames, Settings};
pub use error::{AuditError, Result};
pub use models::{RawRecord, Session, SessionStatus, OVER_THRESHOLD_MINUTES};
pub use notion::{Filter, NotionClient, RecordPages, RecordSource};
pub use time::DateRange;
