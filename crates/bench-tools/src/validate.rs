//! Store-level validation helpers
//!
//! The checks every tool composes before it writes: foreign keys resolve,
//! referenced rows are in the state the write requires, scans for
//! uniqueness invariants. All helpers are read-only; a tool that fails any
//! of them returns before touching the store.

use bench_core::{Record, Result, Store, ToolError};
use serde_json::Value;

/// Resolve a foreign key, failing with a reference error when absent
pub fn require_row<'a>(
    store: &'a Store,
    table: &str,
    entity: &str,
    id: &str,
) -> Result<&'a Record> {
    store
        .row(table, id)
        .ok_or_else(|| ToolError::not_found(entity, id))
}

/// Resolve a foreign key whose row must carry `status == required`
///
/// e.g. trades require the fund `open` and the instrument `active`.
pub fn require_row_status<'a>(
    store: &'a Store,
    table: &str,
    entity: &str,
    id: &str,
    required: &str,
) -> Result<&'a Record> {
    let record = require_row(store, table, entity, id)?;
    if field_str(record, "status") == Some(required) {
        Ok(record)
    } else {
        Err(ToolError::InvalidReference {
            entity: entity.to_string(),
            id: id.to_string(),
            required: required.to_string(),
        })
    }
}

/// Resolve a `user_id` that must exist and be active
pub fn require_active_user<'a>(store: &'a Store, id: &str) -> Result<&'a Record> {
    require_row_status(store, "users", "user", id, "active")
}

/// String view of a record field
pub fn field_str<'a>(record: &'a Record, name: &str) -> Option<&'a str> {
    record.get(name).and_then(Value::as_str)
}

/// Numeric view of a record field
pub fn field_f64(record: &Record, name: &str) -> Option<f64> {
    record.get(name).and_then(Value::as_f64)
}

/// Canonical string form of an id-valued field (string or number)
pub fn canonical_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Exact-match filter comparison in canonical id form
///
/// Fixtures store reference ids inconsistently as strings or numbers; both
/// compare equal to their canonical string.
pub fn field_matches(record: &Record, field: &str, want: &str) -> bool {
    record
        .get(field)
        .and_then(canonical_id)
        .is_some_and(|have| have == want)
}

/// First record in a table matching a predicate
pub fn find_row<'a, P>(store: &'a Store, table: &str, mut pred: P) -> Option<(&'a String, &'a Record)>
where
    P: FnMut(&Record) -> bool,
{
    store.rows(table).find(|(_, record)| pred(record))
}

/// Round a currency amount to two decimals
pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
