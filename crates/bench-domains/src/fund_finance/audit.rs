//! Audit-trail tool

use bench_core::clock::stamp_new;
use bench_core::{Record, Result, Store, ToolError};
use bench_tools::validate::require_active_user;
use bench_tools::{Args, Parameters, Tool};
use serde_json::{Value, json};

const REFERENCE_TYPES: &[&str] = &[
    "funds",
    "investors",
    "portfolios",
    "trades",
    "invoices",
    "subscriptions",
    "commitments",
    "redemptions",
];

/// Record a user action against an audited entity
///
/// Provenance only: the tool inserts one timestamped `audit_trails` row and
/// performs no cascading mutation.
pub struct RecordAuditTrail;

impl Tool for RecordAuditTrail {
    fn name(&self) -> &str {
        "record_audit_trail"
    }

    fn description(&self) -> &str {
        "Record a create or update action by a user against an audited entity"
    }

    fn parameters(&self) -> Parameters {
        Parameters::new()
            .string("reference_id", "Id of the audited row")
            .string_enum("reference_type", "Table family of the audited row", REFERENCE_TYPES)
            .string_enum("action", "Recorded action", &["create", "update"])
            .string("user_id", "Acting user; must exist and be active")
            .string("field_name", "Changed field; required for update, forbidden for create")
            .any("old_value", "Previous value; forbidden for create")
            .any("new_value", "New value; required for update")
            .required(&["reference_id", "reference_type", "action", "user_id"])
    }

    fn run(&self, store: &mut Store, args: &Args) -> Result<Value> {
        let reference_id = args.require_id("reference_id")?;
        let reference_type = args
            .require_enum("reference_type", REFERENCE_TYPES)?
            .to_string();
        let action = args.require_enum("action", &["create", "update"])?.to_string();
        let user_id = args.require_id("user_id")?;
        require_active_user(store, &user_id)?;

        if !store.contains(&reference_type, &reference_id) {
            return Err(ToolError::not_found(
                reference_type.trim_end_matches('s'),
                reference_id.as_str(),
            ));
        }

        let mut record = Record::new();
        record.insert("reference_id".to_string(), json!(reference_id));
        record.insert("reference_type".to_string(), json!(reference_type));
        record.insert("action".to_string(), json!(action));
        record.insert("user_id".to_string(), json!(user_id));

        if action == "update" {
            let field_name = args.require_str("field_name")?;
            let new_value = args
                .get("new_value")
                .ok_or_else(|| ToolError::MissingArgument("new_value".to_string()))?;
            record.insert("field_name".to_string(), json!(field_name));
            record.insert("new_value".to_string(), new_value.clone());
            if let Some(old_value) = args.get("old_value") {
                record.insert("old_value".to_string(), old_value.clone());
            }
        } else if args.contains("field_name") || args.contains("old_value") {
            return Err(ToolError::validation(
                "field_name and old_value are not allowed for a create action",
            ));
        }

        stamp_new(&mut record);
        let id = store.next_id("audit_trails", "");
        record.insert("audit_trail_id".to_string(), json!(id));
        store.insert("audit_trails", "audit_trail_id", &id, record.clone());

        Ok(json!({ "success": true, "audit_trail_id": id, "audit_trail": record }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Store {
        Store::from_value(json!({
            "users": {
                "1": { "user_id": "1", "status": "active" },
                "2": { "user_id": "2", "status": "inactive" }
            },
            "funds": { "7": { "fund_id": "7" } },
            "audit_trails": {}
        }))
        .unwrap()
    }

    #[test]
    fn test_record_update_action() {
        let mut store = store();
        let out = RecordAuditTrail.invoke(
            &mut store,
            json!({
                "reference_id": "7",
                "reference_type": "funds",
                "action": "update",
                "user_id": "1",
                "field_name": "status",
                "old_value": "open",
                "new_value": "closed"
            }),
        );
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["success"], true);
        let row = store.row("audit_trails", "1").unwrap();
        assert_eq!(row["field_name"], "status");
        assert_eq!(row["new_value"], "closed");
    }

    #[test]
    fn test_update_requires_field_name_and_new_value() {
        let mut store = store();
        let out = RecordAuditTrail.invoke(
            &mut store,
            json!({
                "reference_id": "7",
                "reference_type": "funds",
                "action": "update",
                "user_id": "1"
            }),
        );
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["error"], "Missing required field: field_name");
    }

    #[test]
    fn test_create_forbids_field_name() {
        let mut store = store();
        let out = RecordAuditTrail.invoke(
            &mut store,
            json!({
                "reference_id": "7",
                "reference_type": "funds",
                "action": "create",
                "user_id": "1",
                "field_name": "status"
            }),
        );
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert!(parsed["error"].as_str().unwrap().contains("not allowed"));
    }

    #[test]
    fn test_inactive_user_rejected() {
        let mut store = store();
        let out = RecordAuditTrail.invoke(
            &mut store,
            json!({
                "reference_id": "7",
                "reference_type": "funds",
                "action": "create",
                "user_id": "2"
            }),
        );
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["error"], "user 2 is not active");
    }

    #[test]
    fn test_reference_type_closure() {
        let mut store = store();
        let out = RecordAuditTrail.invoke(
            &mut store,
            json!({
                "reference_id": "7",
                "reference_type": "payments",
                "action": "create",
                "user_id": "1"
            }),
        );
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert!(parsed["error"].as_str().unwrap().contains("reference_type"));
    }
}
