use serde::Serialize;
use serde_json::{Map, Value};

/// Plain `{ "message": ... }` body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// One row of a `GROUP BY` count
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FieldCount {
    pub key: String,
    pub count: i64,
}

/// `[{ <label>: key, count }]`, the shape the dashboard charts read
pub fn counts_as_rows(counts: Vec<FieldCount>, label: &str) -> Vec<Value> {
    counts
        .into_iter()
        .map(|c| {
            let mut row = Map::new();
            row.insert(label.to_string(), Value::String(c.key));
            row.insert("count".to_string(), Value::from(c.count));
            Value::Object(row)
        })
        .collect()
}

/// `{ key: count, ... }`
pub fn counts_as_object(counts: Vec<FieldCount>) -> Map<String, Value> {
    counts
        .into_iter()
        .map(|c| (c.key, Value::from(c.count)))
        .collect()
}
