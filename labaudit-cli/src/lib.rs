//! Daily and weekly Tech Lab attendance audits.
//!
//! Each run queries the attendance database, rebuilds sessions, and writes a
//! CSV export plus a standalone HTML dashboard.

pub mod audit;
pub mod output;
pub mod render;

pub use audit::{run_daily, run_weekly, DailyAudit, WeeklyAudit};
pub use output::ReportPaths;
pub use render::Report;
