//! Best-effort readers for Notion property values.
//!
//! The attendance database is edited by hand and its column types have drifted
//! over time (the console column is a select in some rows, free text in
//! others). None of these readers fail: a missing or oddly shaped property
//! reads as an empty string or `None`.

use serde_json::{Map, Value};

pub type Properties = Map<String, Value>;

fn property<'a>(props: &'a Properties, name: &str) -> Option<&'a Value> {
    props.get(name).filter(|p| p.is_object())
}

/// `plain_text` of the first run in a rich-text array.
fn first_plain_text(runs: Option<&Value>) -> String {
    runs.and_then(Value::as_array)
        .and_then(|runs| runs.first())
        .and_then(|run| run.get("plain_text"))
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

pub fn title_text(props: &Properties, name: &str) -> String {
    first_plain_text(property(props, name).and_then(|p| p.get("title")))
}

pub fn rich_text(props: &Properties, name: &str) -> String {
    first_plain_text(property(props, name).and_then(|p| p.get("rich_text")))
}

/// Option name for a select, or the comma-separated option names for a
/// multi-select.
pub fn select_name(props: &Properties, name: &str) -> String {
    let Some(p) = property(props, name) else {
        return String::new();
    };

    match p.get("type").and_then(Value::as_str) {
        Some("select") => p
            .get("select")
            .and_then(|s| s.get("name"))
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string(),
        Some("multi_select") => p
            .get("multi_select")
            .and_then(Value::as_array)
            .map(|options| {
                options
                    .iter()
                    .map(|o| o.get("name").and_then(Value::as_str).unwrap_or(""))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Select name preferred, rich text as a fallback.
pub fn console_value(props: &Properties, name: &str) -> String {
    first_non_empty([select_name, rich_text], props, name)
}

/// Title, then rich text, then select.
pub fn any_text(props: &Properties, name: &str) -> String {
    first_non_empty([title_text, rich_text, select_name], props, name)
}

fn first_non_empty<const N: usize>(
    readers: [fn(&Properties, &str) -> String; N],
    props: &Properties,
    name: &str,
) -> String {
    readers
        .iter()
        .map(|read| read(props, name))
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

/// `date.start` of a date property.
pub fn date_start<'a>(props: &'a Properties, name: &str) -> Option<&'a str> {
    property(props, name)?
        .get("date")?
        .get("start")?
        .as_str()
}
