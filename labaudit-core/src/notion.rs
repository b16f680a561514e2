//! Notion database query client.
//!
//! Results come back a page at a time with a continuation cursor. The client
//! hides that behind [`RecordPages`], an iterator that fetches the next page
//! only when the caller has drained the current one.

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::Settings;
use crate::error::{AuditError, Result};
use crate::models::RawRecord;
use crate::time::DateRange;

pub const NOTION_VERSION: &str = "2022-06-28";
pub const PAGE_SIZE: u32 = 100;

// ============================================================================
// Filters
// ============================================================================

/// A query filter over date properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    DateEquals { property: String, date: NaiveDate },
    DateOnOrAfter { property: String, date: NaiveDate },
    DateOnOrBefore { property: String, date: NaiveDate },
    And(Vec<Filter>),
}

impl Filter {
    pub fn on_day(property: &str, date: NaiveDate) -> Self {
        Filter::DateEquals {
            property: property.to_string(),
            date,
        }
    }

    /// Both ends inclusive.
    pub fn within(property: &str, range: &DateRange) -> Self {
        Filter::And(vec![
            Filter::DateOnOrAfter {
                property: property.to_string(),
                date: range.start(),
            },
            Filter::DateOnOrBefore {
                property: property.to_string(),
                date: range.end(),
            },
        ])
    }

    /// Notion filter object.
    pub fn to_json(&self) -> Value {
        match self {
            Filter::DateEquals { property, date } => date_condition(property, "equals", date),
            Filter::DateOnOrAfter { property, date } => {
                date_condition(property, "on_or_after", date)
            }
            Filter::DateOnOrBefore { property, date } => {
                date_condition(property, "on_or_before", date)
            }
            Filter::And(filters) => {
                json!({ "and": filters.iter().map(Filter::to_json).collect::<Vec<_>>() })
            }
        }
    }
}

fn date_condition(property: &str, op: &str, date: &NaiveDate) -> Value {
    json!({
        "property": property,
        "date": { op: date.format("%Y-%m-%d").to_string() }
    })
}

// ============================================================================
// RecordSource trait
// ============================================================================

/// Anything that can answer a filtered query with a lazy sequence of records.
///
/// An `Err` item ends the run; implementations yield nothing after one.
pub trait RecordSource {
    fn query<'a>(&'a self, filter: &Filter) -> Box<dyn Iterator<Item = Result<RawRecord>> + 'a>;
}

// ============================================================================
// Notion API structs (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<Value>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    next_cursor: Option<String>,
}

// ============================================================================
// NotionClient
// ============================================================================

#[derive(Debug, Clone)]
pub struct NotionClient {
    client: Client,
    token: String,
    database_id: String,
    base_url: String,
}

impl NotionClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        Self::with_base_url(
            settings.token.clone(),
            settings.database_id.clone(),
            settings.base_url.clone(),
        )
    }

    /// Create a client against a custom base URL (for testing / proxies)
    pub fn with_base_url(token: String, database_id: String, base_url: String) -> Result<Self> {
        if token.trim().is_empty() {
            return Err(AuditError::MissingSetting("NOTION_TOKEN"));
        }
        if database_id.trim().is_empty() {
            return Err(AuditError::MissingSetting("NOTION_DB"));
        }

        let client = Client::builder().build()?;

        Ok(Self {
            client,
            token,
            database_id,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Lazily page through every record matching `filter`.
    pub fn query_pages(&self, filter: &Filter) -> RecordPages<'_> {
        RecordPages {
            client: self,
            body: json!({ "page_size": PAGE_SIZE, "filter": filter.to_json() }),
            buffered: Vec::new().into_iter(),
            cursor: Cursor::Start,
            pages_fetched: 0,
        }
    }

    fn fetch_page(&self, body: &Value) -> Result<QueryResponse> {
        let url = format!("{}/databases/{}/query", self.base_url, self.database_id);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "Notion query failed");
            return Err(AuditError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json()?)
    }
}

impl RecordSource for NotionClient {
    fn query<'a>(&'a self, filter: &Filter) -> Box<dyn Iterator<Item = Result<RawRecord>> + 'a> {
        Box::new(self.query_pages(filter))
    }
}

// ============================================================================
// RecordPages iterator
// ============================================================================

#[derive(Debug)]
enum Cursor {
    Start,
    Next(String),
    Done,
}

/// Iterator over query results, one HTTP request per page.
pub struct RecordPages<'a> {
    client: &'a NotionClient,
    body: Value,
    buffered: std::vec::IntoIter<Value>,
    cursor: Cursor,
    pages_fetched: usize,
}

impl RecordPages<'_> {
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }
}

impl Iterator for RecordPages<'_> {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(page) = self.buffered.next() {
                return Some(Ok(RawRecord::from_value(page)));
            }

            match std::mem::replace(&mut self.cursor, Cursor::Done) {
                Cursor::Done => return None,
                Cursor::Start => {}
                Cursor::Next(cursor) => {
                    self.body["start_cursor"] = Value::String(cursor);
                }
            }

            // cursor is Done here, so an error below also ends the iteration
            let response = match self.client.fetch_page(&self.body) {
                Ok(r) => r,
                Err(e) => return Some(Err(e)),
            };
            self.pages_fetched += 1;

            tracing::debug!(
                page = self.pages_fetched,
                results = response.results.len(),
                has_more = response.has_more,
                "Fetched Notion page"
            );

            if response.has_more {
                match response.next_cursor {
                    Some(cursor) => self.cursor = Cursor::Next(cursor),
                    None => tracing::warn!("Notion reported more results without a cursor; stopping"),
                }
            }
            self.buffered = response.results.into_iter();
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
