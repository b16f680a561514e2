//! labaudit: Tech Lab attendance audit
//!
//! Reads attendance records from a Notion database and writes a CSV export
//! plus an HTML dashboard.
//!
//! # Subcommands
//! - `daily [--date YYYY-MM-DD]`                          one day, one row per session
//! - `weekly [--start YYYY-MM-DD] [--end YYYY-MM-DD]`     one row per day
//!
//! `NOTION_TOKEN` and `NOTION_DB` are required (environment, `.env`, or the
//! config file).

use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use labaudit_core::{time, AuditConfig, DateRange, NotionClient};
use tracing_subscriber::{fmt, EnvFilter};

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "labaudit",
    version,
    about = "Tech Lab attendance audit: CSV + HTML dashboard reports from Notion"
)]
struct Cli {
    /// Optional TOML config file; environment variables override it
    #[arg(short, long, default_value = "labaudit.toml")]
    config: String,

    /// Export root (overrides OUTPUT_DIR); reports go to <dir>/daily or <dir>/weekly
    #[arg(long)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// A date argument that may be left blank (`AUDIT_DATE=` in `.env`) to mean
/// "use the default". Aliased so clap treats it as one value, not an
/// optional-value flag.
type OptionalDate = Option<NaiveDate>;

fn parse_optional_date(value: &str) -> Result<OptionalDate, chrono::ParseError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map(Some)
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Audit a single day's sessions
    Daily {
        /// Day to audit (defaults to today in the lab time zone)
        #[arg(long, env = "AUDIT_DATE", value_parser = parse_optional_date)]
        date: Option<OptionalDate>,
    },

    /// Audit a range of days, one row per day
    Weekly {
        /// First day (defaults to this week's Monday)
        #[arg(long, env = "WEEK_START", value_parser = parse_optional_date)]
        start: Option<OptionalDate>,

        /// Last day, inclusive (defaults to start + 6 days)
        #[arg(long, env = "WEEK_END", value_parser = parse_optional_date)]
        end: Option<OptionalDate>,
    },
}

// ============================================================================
// Main
// ============================================================================

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut settings = AuditConfig::load(&cli.config)
        .and_then(AuditConfig::validate)
        .with_context(|| format!("loading configuration ({})", cli.config))?;
    if let Some(dir) = cli.output_dir {
        settings.output_dir = dir;
    }

    let client = NotionClient::new(&settings)?;

    match cli.command {
        Commands::Daily { date } => {
            let date = date
                .flatten()
                .unwrap_or_else(|| time::today(&settings.timezone));
            println!("📅 Daily audit for {date}");

            let audit = labaudit_cli::run_daily(&client, &settings, date)?;
            println!(
                "✅ Wrote {} with {} rows",
                audit.paths.csv.display(),
                audit.sessions.len()
            );
            println!("✅ Wrote {}", audit.paths.html.display());
        }
        Commands::Weekly { start, end } => {
            let start = match start.flatten() {
                Some(start) => start,
                None => time::monday_of(time::today(&settings.timezone))?,
            };
            let range = match end.flatten() {
                Some(end) => DateRange::new(start, end)?,
                None => DateRange::week_from(start)?,
            };
            println!("🗓️ Weekly audit {} → {}", range.start(), range.end());

            let audit = labaudit_cli::run_weekly(&client, &settings, range)?;
            println!("✅ Wrote {}", audit.paths.csv.display());
            println!("✅ Wrote {}", audit.paths.html.display());
        }
    }

    Ok(())
}

/// `RUST_LOG` when set and valid, otherwise `info`.
fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn main() {
    // Load .env file if present (dev convenience, production uses real env vars)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the result lines
    fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        println!("❌ {e:#}");
        std::process::exit(1);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_weekly_dates_parse() {
        let cli = Cli::try_parse_from([
            "labaudit",
            "weekly",
            "--start",
            "2024-01-08",
            "--end",
            "2024-01-14",
        ])
        .unwrap();
        match cli.command {
            Commands::Weekly { start, end } => {
                assert_eq!(start.flatten(), NaiveDate::from_ymd_opt(2024, 1, 8));
                assert_eq!(end.flatten(), NaiveDate::from_ymd_opt(2024, 1, 14));
            }
            other => panic!("Expected weekly, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let result = Cli::try_parse_from(["labaudit", "daily", "--date", "01/10/2024"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_date_falls_back_to_default() {
        let cli = Cli::try_parse_from(["labaudit", "weekly", "--start", "  ", "--end", ""]).unwrap();
        match cli.command {
            Commands::Weekly { start, end } => {
                assert_eq!(start.flatten(), None);
                assert_eq!(end.flatten(), None);
            }
            other => panic!("Expected weekly, got {:?}", other),
        }
    }

    #[test]
    fn test_rust_log_drives_the_filter() {
        use tracing::level_filters::LevelFilter;

        // Only this test touches RUST_LOG
        std::env::set_var("RUST_LOG", "debug");
        let verbose = log_filter().max_level_hint();
        std::env::remove_var("RUST_LOG");
        let fallback = log_filter().max_level_hint();

        assert_eq!(verbose, Some(LevelFilter::DEBUG));
        assert_eq!(fallback, Some(LevelFilter::INFO));
    }

    #[test]
    fn test_empty_audit_date_env_is_ignored() {
        // Only this test touches AUDIT_DATE
        std::env::set_var("AUDIT_DATE", "");
        let result = Cli::try_parse_from(["labaudit", "daily"]);
        std::env::remove_var("AUDIT_DATE");

        match result.unwrap().command {
            Commands::Daily { date } => assert_eq!(date.flatten(), None),
            other => panic!("Expected daily, got {:?}", other),
        }
    }
}
