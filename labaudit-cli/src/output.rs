use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use labaudit_core::{DateRange, Result};

use crate::render::Report;

/// Where one run's CSV and dashboard land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub csv: PathBuf,
    pub html: PathBuf,
}

impl ReportPaths {
    /// `{root}/daily/daily_{date}.csv` and `..._dashboard.html`
    pub fn daily(root: &Path, date: NaiveDate) -> Self {
        Self::named(&root.join("daily"), &format!("daily_{date}"))
    }

    /// `{root}/weekly/weekly_{start}_to_{end}.csv` and `..._dashboard.html`
    pub fn weekly(root: &Path, range: &DateRange) -> Self {
        Self::named(
            &root.join("weekly"),
            &format!("weekly_{}_to_{}", range.start(), range.end()),
        )
    }

    fn named(dir: &Path, stem: &str) -> Self {
        Self {
            csv: dir.join(format!("{stem}.csv")),
            html: dir.join(format!("{stem}_dashboard.html")),
        }
    }
}

/// Write both artifacts, creating the directory if needed. Existing files
/// from an earlier run are replaced.
pub fn write_report(paths: &ReportPaths, report: &Report) -> Result<()> {
    write_whole(&paths.csv, report.csv.as_bytes())?;
    write_whole(&paths.html, report.html.as_bytes())?;
    Ok(())
}

/// Write to a sibling temp file, then rename over the target.
fn write_whole(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "report path has no file name"))?;
    let tmp = dir.join(format!(".{}.tmp", file_name.to_string_lossy()));

    fs::write(&tmp, contents)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    tracing::debug!(path = %path.display(), bytes = contents.len(), "Wrote report file");
    Ok(())
}
