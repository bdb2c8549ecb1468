//! The in-memory fixture store
//!
//! A `Store` is a nested JSON-shaped mapping: top-level keys are table names,
//! each table maps a primary-key string to a record (itself a field-to-value
//! mapping). An external loader builds the value; tools mutate it in call
//! order; the harness reads it back at end of episode.
//!
//! Key allocation is "max numeric suffix + 1". The store keeps a per-table
//! watermark fed by `remove`, so a hard-deleted key is never re-issued within
//! an episode. Not collision-safe under concurrency; the invocation model is
//! single-threaded.

use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

use crate::error::{Result, ToolError};

/// A single row: field name to JSON-compatible value
pub type Record = Map<String, Value>;

/// The shared fixture value every tool reads and mutates
#[derive(Debug, Clone, Default)]
pub struct Store {
    tables: Map<String, Value>,
    watermarks: HashMap<String, u64>,
}

impl Store {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a loaded fixture value
    ///
    /// The value must be a JSON object keyed by table name. Table values are
    /// taken as-is; accessors tolerate tables or rows that are not objects.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(tables) => Ok(Self {
                tables,
                watermarks: HashMap::new(),
            }),
            other => Err(ToolError::validation(format!(
                "fixture root must be a JSON object, got {other}"
            ))),
        }
    }

    /// Get a table by name
    pub fn table(&self, name: &str) -> Option<&Map<String, Value>> {
        self.tables.get(name).and_then(Value::as_object)
    }

    /// Get a table by name, creating it when absent
    pub fn table_mut(&mut self, name: &str) -> &mut Map<String, Value> {
        let entry = self
            .tables
            .entry(name.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        // just ensured the entry is an object
        #[allow(clippy::unwrap_used)]
        entry.as_object_mut().unwrap()
    }

    /// Get a single record
    pub fn row(&self, table: &str, id: &str) -> Option<&Record> {
        self.table(table)?.get(id)?.as_object()
    }

    /// Get a single record mutably
    pub fn row_mut(&mut self, table: &str, id: &str) -> Option<&mut Record> {
        self.tables
            .get_mut(table)?
            .as_object_mut()?
            .get_mut(id)?
            .as_object_mut()
    }

    /// Check whether a key exists in a table
    pub fn contains(&self, table: &str, id: &str) -> bool {
        self.table(table).is_some_and(|t| t.contains_key(id))
    }

    /// Iterate a table's records in key order
    pub fn rows<'a>(&'a self, table: &str) -> impl Iterator<Item = (&'a String, &'a Record)> {
        self.table(table)
            .into_iter()
            .flat_map(|t| t.iter().filter_map(|(k, v)| Some((k, v.as_object()?))))
    }

    /// Insert a record under `id`, forcing `record[id_field] = id`
    ///
    /// Writers must keep the primary key equal to the record's own id field;
    /// routing every insert through here preserves that invariant.
    pub fn insert(&mut self, table: &str, id_field: &str, id: &str, mut record: Record) {
        debug!(table, id, "inserting record");
        record.insert(id_field.to_string(), Value::String(id.to_string()));
        self.table_mut(table)
            .insert(id.to_string(), Value::Object(record));
    }

    /// Remove a key from a table, returning the removed value
    ///
    /// The removed key's numeric suffix feeds the allocation watermark so a
    /// later create does not reuse it.
    pub fn remove(&mut self, table: &str, id: &str) -> Option<Value> {
        let removed = self
            .tables
            .get_mut(table)?
            .as_object_mut()?
            .remove(id)?;
        debug!(table, id, "removed record");
        if let Some(n) = numeric_suffix(id) {
            let mark = self.watermarks.entry(table.to_string()).or_insert(0);
            *mark = (*mark).max(n);
        }
        Some(removed)
    }

    /// Allocate the next primary key for a table
    ///
    /// One greater than the max numeric suffix of existing keys (and of any
    /// watermarked removed key), or 1 when the table is empty. `prefix` is
    /// prepended verbatim; pass `""` for plain numeric tables.
    pub fn next_id(&mut self, table: &str, prefix: &str) -> String {
        let max_existing = self
            .table(table)
            .map(|t| {
                t.keys()
                    .filter_map(|k| numeric_suffix(k))
                    .max()
                    .unwrap_or(0)
            })
            .unwrap_or(0);
        let mark = self.watermarks.get(table).copied().unwrap_or(0);
        let next = max_existing.max(mark) + 1;
        self.watermarks.insert(table.to_string(), next);
        format!("{prefix}{next}")
    }

    /// Clone the current fixture value, e.g. for byte-equality assertions
    pub fn snapshot(&self) -> Value {
        Value::Object(self.tables.clone())
    }

    /// Consume the store, yielding the fixture value
    pub fn into_value(self) -> Value {
        Value::Object(self.tables)
    }
}

/// Numeric suffix of a primary key: the decimal tail after any alphabetic
/// prefix (`"7"` → 7, `"CI12"` → 12, `"draft"` → None)
fn numeric_suffix(key: &str) -> Option<u64> {
    let digits = key.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store_with(value: Value) -> Store {
        Store::from_value(value).unwrap()
    }

    #[test]
    fn test_from_value_rejects_non_object() {
        assert!(Store::from_value(json!([1, 2])).is_err());
        assert!(Store::from_value(json!({})).is_ok());
    }

    #[test]
    fn test_row_accessors() {
        let store = store_with(json!({
            "users": { "1": { "user_id": "1", "status": "active" } }
        }));
        assert!(store.contains("users", "1"));
        assert!(!store.contains("users", "2"));
        assert!(!store.contains("funds", "1"));
        assert_eq!(store.row("users", "1").unwrap()["status"], "active");
        assert!(store.row("users", "2").is_none());
    }

    #[test]
    fn test_insert_forces_id_field() {
        let mut store = Store::new();
        let mut record = Record::new();
        record.insert("name".to_string(), json!("Alpha Fund"));
        record.insert("fund_id".to_string(), json!(99));
        store.insert("funds", "fund_id", "1", record);

        let row = store.row("funds", "1").unwrap();
        assert_eq!(row["fund_id"], "1");
        assert_eq!(row["name"], "Alpha Fund");
    }

    #[test]
    fn test_next_id_plain() {
        let mut store = store_with(json!({
            "funds": { "1": {}, "2": {}, "7": {} }
        }));
        assert_eq!(store.next_id("funds", ""), "8");
        assert_eq!(store.next_id("investors", ""), "1");
    }

    #[test]
    fn test_next_id_prefixed() {
        let mut store = store_with(json!({
            "configuration_items": { "CI3": {}, "CI10": {} }
        }));
        assert_eq!(store.next_id("configuration_items", "CI"), "CI11");
    }

    #[test]
    fn test_next_id_skips_hard_deleted_key() {
        let mut store = store_with(json!({
            "invoices": { "1": {}, "2": {}, "3": {} }
        }));
        store.remove("invoices", "3");
        // 3 was the max key; its suffix must not be re-issued
        assert_eq!(store.next_id("invoices", ""), "4");
    }

    #[test]
    fn test_next_id_monotonic_without_insert() {
        let mut store = Store::new();
        assert_eq!(store.next_id("trades", ""), "1");
        assert_eq!(store.next_id("trades", ""), "2");
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut store = store_with(json!({ "users": {} }));
        let before = store.snapshot();
        store.insert("users", "user_id", "1", Record::new());
        assert_ne!(before, store.snapshot());
    }

    #[test]
    fn test_numeric_suffix() {
        assert_eq!(numeric_suffix("42"), Some(42));
        assert_eq!(numeric_suffix("INC7"), Some(7));
        assert_eq!(numeric_suffix("PRB003"), Some(3));
        assert_eq!(numeric_suffix("draft"), None);
        assert_eq!(numeric_suffix(""), None);
    }
}
