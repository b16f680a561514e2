//! Report rendering.
//!
//! Both reports are a list of rows shown as a CSV export and as a table on a
//! standalone HTML page. [`Table`] holds the column definitions once and
//! produces both outputs, so the daily and weekly reports only declare their
//! columns and page chrome.

pub mod daily;
pub mod weekly;

use std::io;

use labaudit_core::Result;

pub use daily::render_daily;
pub use weekly::render_weekly;

/// The two artifacts of one audit run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub csv: String,
    pub html: String,
}

type Cell<'a, T> = Box<dyn Fn(&T) -> String + 'a>;

/// One column: a header, a plain-text cell for CSV and HTML, and an optional
/// raw-HTML cell used instead of the escaped text on the page.
pub struct Column<'a, T> {
    header: &'static str,
    numeric: bool,
    text: Cell<'a, T>,
    html: Option<Cell<'a, T>>,
}

impl<'a, T> Column<'a, T> {
    pub fn text(header: &'static str, cell: impl Fn(&T) -> String + 'a) -> Self {
        Self {
            header,
            numeric: false,
            text: Box::new(cell),
            html: None,
        }
    }

    /// Right-aligned on the page.
    pub fn numeric(header: &'static str, cell: impl Fn(&T) -> String + 'a) -> Self {
        Self {
            numeric: true,
            ..Self::text(header, cell)
        }
    }

    /// Replace the page cell with pre-built markup. The closure is responsible
    /// for escaping anything it interpolates.
    pub fn with_html(mut self, cell: impl Fn(&T) -> String + 'a) -> Self {
        self.html = Some(Box::new(cell));
        self
    }

    fn html_cell(&self, row: &T) -> String {
        let content = match &self.html {
            Some(html) => html(row),
            None => escape_html(&(self.text)(row)),
        };
        if self.numeric {
            format!("<td class=\"num\">{content}</td>")
        } else {
            format!("<td>{content}</td>")
        }
    }
}

pub struct Table<'a, T> {
    columns: Vec<Column<'a, T>>,
    rows: &'a [T],
}

impl<'a, T> Table<'a, T> {
    pub fn new(columns: Vec<Column<'a, T>>, rows: &'a [T]) -> Self {
        Self { columns, rows }
    }

    pub fn headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.header).collect()
    }

    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(self.headers())?;
        for row in self.rows {
            csv.write_record(self.columns.iter().map(|c| (c.text)(row)))?;
        }
        csv.flush()?;
        Ok(())
    }

    pub fn to_csv(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        String::from_utf8(buf)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
    }

    pub fn to_html(&self) -> String {
        let head: String = self
            .columns
            .iter()
            .map(|c| format!("<th>{}</th>", escape_html(c.header)))
            .collect();

        let body: Vec<String> = self
            .rows
            .iter()
            .map(|row| {
                let cells: String = self.columns.iter().map(|c| c.html_cell(row)).collect();
                format!("      <tr>{cells}</tr>")
            })
            .collect();

        format!(
            "<table>\n    <thead><tr>{head}</tr></thead>\n    <tbody>\n{}\n    </tbody>\n  </table>",
            body.join("\n")
        )
    }
}

/// Escape text for element content.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

const BASE_STYLE: &str = "\
  body { font:14px/1.45 -apple-system,BlinkMacSystemFont,Segoe UI,Roboto,sans-serif; margin:24px; background:#0b0f14; color:#e8eef6; }
  h1 { margin:0 0 6px; font-size:22px; }
  .sub { color:#9fb3c8; margin:0 0 18px; }
  table { width:100%; border-collapse:collapse; }
  th,td { padding:10px; border-bottom:1px solid #1b2533; text-align:left; vertical-align:middle; }
  th { color:#9fb3c8; font-weight:600; font-size:12px; letter-spacing:.2px; }
  td.num { text-align:right; }
";

/// Page chrome around a rendered table.
pub struct Page<'a> {
    pub title: &'a str,
    pub subtitle: &'a str,
    /// Extra CSS rules appended to the shared style sheet.
    pub style: &'a str,
    /// Raw markup placed between the subtitle and the table.
    pub preamble: &'a str,
}

impl Page<'_> {
    pub fn render(&self, table_html: &str) -> String {
        let title = escape_html(self.title);
        let subtitle = escape_html(self.subtitle);
        format!(
            "<!doctype html>
<html lang=\"en\">
<meta charset=\"utf-8\">
<title>{title}</title>
<style>
{BASE_STYLE}{style}</style>
<body>
  <h1>{title}</h1>
  <div class=\"sub\">{subtitle}</div>
{preamble}  {table_html}
</body>
</html>
",
            style = self.style,
            preamble = self.preamble,
        )
    }
}
