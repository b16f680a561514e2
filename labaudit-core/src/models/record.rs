use serde_json::Value;

use crate::extract::Properties;

/// One page from the attendance database, as returned by the query endpoint.
///
/// Only the page id and its property map are kept. Pages whose `properties`
/// are missing or not an object still become records, with no properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub id: String,
    pub properties: Properties,
}

impl RawRecord {
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut page) = value else {
            return Self::default();
        };

        let id = page
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let properties = match page.remove("properties") {
            Some(Value::Object(props)) => props,
            _ => Properties::new(),
        };

        Self { id, properties }
    }
}
