//! Space permission tool

use bench_core::clock::stamp_new;
use bench_core::{Record, Result, Store, ToolError};
use bench_tools::validate::{field_matches, find_row, require_active_user, require_row};
use bench_tools::{Args, Parameters, Tool};
use serde_json::{Value, json};

const ROLES: &[&str] = &["global_admin", "space_admin", "editor", "viewer"];

/// Grant or revoke a user's permission in a space
pub struct ManageSpacePermission;

impl Tool for ManageSpacePermission {
    fn name(&self) -> &str {
        "manage_space_permission"
    }

    fn description(&self) -> &str {
        "Grant a role to a user in a space, or revoke the user's permission"
    }

    fn parameters(&self) -> Parameters {
        Parameters::new()
            .string_enum("action", "Operation to perform", &["grant", "revoke"])
            .string("space_id", "Target space")
            .string("user_id", "Target user; must exist and be active")
            .string_enum("role", "Role to grant (ignored for revoke)", ROLES)
            .required(&["action", "space_id", "user_id"])
    }

    fn run(&self, store: &mut Store, args: &Args) -> Result<Value> {
        let space_id = args.require_id("space_id")?;
        let user_id = args.require_id("user_id")?;
        require_row(store, "spaces", "space", &space_id)?;
        require_active_user(store, &user_id)?;

        match args.require_str("action")? {
            "grant" => grant(store, &space_id, &user_id, args.require_enum("role", ROLES)?),
            "revoke" => revoke(store, &space_id, &user_id),
            other => Err(ToolError::UnknownAction(other.to_string())),
        }
    }
}

fn existing_grant<'a>(store: &'a Store, space_id: &str, user_id: &str) -> Option<&'a String> {
    find_row(store, "space_permissions", |record| {
        field_matches(record, "space_id", space_id) && field_matches(record, "user_id", user_id)
    })
    .map(|(key, _)| key)
}

fn grant(store: &mut Store, space_id: &str, user_id: &str, role: &str) -> Result<Value> {
    if existing_grant(store, space_id, user_id).is_some() {
        return Err(ToolError::validation(format!(
            "user {user_id} already has a permission in space {space_id}"
        )));
    }

    let id = store.next_id("space_permissions", "");
    let mut record = Record::new();
    record.insert("permission_id".to_string(), json!(id));
    record.insert("space_id".to_string(), json!(space_id));
    record.insert("user_id".to_string(), json!(user_id));
    record.insert("role".to_string(), json!(role));
    stamp_new(&mut record);
    store.insert("space_permissions", "permission_id", &id, record.clone());

    Ok(json!({ "success": true, "permission_id": id, "permission": record }))
}

fn revoke(store: &mut Store, space_id: &str, user_id: &str) -> Result<Value> {
    let key = existing_grant(store, space_id, user_id)
        .cloned()
        .ok_or_else(|| {
            ToolError::validation(format!(
                "no permission for user {user_id} in space {space_id}"
            ))
        })?;
    let removed = store
        .remove("space_permissions", &key)
        .ok_or_else(|| ToolError::not_found("permission", key.as_str()))?;
    Ok(json!({ "success": true, "permission_id": key, "revoked": removed }))
}
