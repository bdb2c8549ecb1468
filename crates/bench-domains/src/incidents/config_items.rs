//! Configuration item administration

use bench_core::clock::{stamp_new, stamp_updated};
use bench_core::{Record, Result, Store, ToolError};
use bench_tools::args::check_enum;
use bench_tools::validate::{field_str, find_row, require_row};
use bench_tools::{Args, Parameters, Tool};
use serde_json::{Value, json};

const CI_TYPES: &[&str] = &["server", "database", "application", "network_device", "storage"];
const ENVIRONMENTS: &[&str] = &["production", "staging", "development"];
const STATUSES: &[&str] = &["active", "retired"];

const UPDATABLE: &[&str] = &["name", "ci_type", "environment", "status", "client_id"];

/// Create or update a configuration item (`CI`-prefixed ids)
pub struct ManageConfigurationItem;

impl Tool for ManageConfigurationItem {
    fn name(&self) -> &str {
        "manage_configuration_item"
    }

    fn description(&self) -> &str {
        "Create or update a configuration item in the CI inventory"
    }

    fn parameters(&self) -> Parameters {
        Parameters::new()
            .string_enum("action", "Operation to perform", &["create", "update"])
            .string("ci_id", "Configuration item to update")
            .object(
                "ci_data",
                "CI fields: name (unique), ci_type, environment, status, \
                 and an optional owning client_id",
            )
            .required(&["action", "ci_data"])
    }

    fn run(&self, store: &mut Store, args: &Args) -> Result<Value> {
        match args.require_str("action")? {
            "create" => create(store, &args.require_object("ci_data")?),
            "update" => update(
                store,
                &args.require_id("ci_id")?,
                &args.require_object("ci_data")?,
            ),
            other => Err(ToolError::UnknownAction(other.to_string())),
        }
    }
}

fn check_unique_name(store: &Store, name: &str, skip_id: Option<&str>) -> Result<()> {
    let clash = find_row(store, "configuration_items", |record| {
        field_str(record, "name") == Some(name)
    });
    if let Some((id, _)) = clash {
        if skip_id != Some(id.as_str()) {
            return Err(ToolError::validation(format!(
                "configuration item name '{name}' already exists"
            )));
        }
    }
    Ok(())
}

fn create(store: &mut Store, data: &Args) -> Result<Value> {
    let name = data.require_str("name")?.to_string();
    let ci_type = data.require_enum("ci_type", CI_TYPES)?.to_string();
    let environment = data.require_enum("environment", ENVIRONMENTS)?.to_string();
    let status = data.opt_enum("status", STATUSES)?.unwrap_or("active").to_string();
    check_unique_name(store, &name, None)?;
    let client_id = data.opt_id("client_id");
    if let Some(ref id) = client_id {
        require_row(store, "clients", "client", id)?;
    }

    let id = store.next_id("configuration_items", "CI");
    let mut record = Record::new();
    record.insert("ci_id".to_string(), json!(id));
    record.insert("name".to_string(), json!(name));
    record.insert("ci_type".to_string(), json!(ci_type));
    record.insert("environment".to_string(), json!(environment));
    record.insert("status".to_string(), json!(status));
    if let Some(client_id) = client_id {
        record.insert("client_id".to_string(), json!(client_id));
    }
    stamp_new(&mut record);
    store.insert("configuration_items", "ci_id", &id, record.clone());

    Ok(json!({ "success": true, "ci_id": id, "configuration_item": record }))
}

fn update(store: &mut Store, id: &str, data: &Args) -> Result<Value> {
    for field in data.keys() {
        if !UPDATABLE.contains(&field.as_str()) {
            return Err(ToolError::UnexpectedArgument(field.clone()));
        }
    }
    require_row(store, "configuration_items", "configuration item", id)?;

    // only validated values reach the merge
    let mut updates: Vec<(String, Value)> = Vec::new();
    if data.contains("name") {
        let name = data.require_str("name")?;
        check_unique_name(store, name, Some(id))?;
        updates.push(("name".to_string(), json!(name)));
    }
    for (field, allowed) in [
        ("ci_type", CI_TYPES),
        ("environment", ENVIRONMENTS),
        ("status", STATUSES),
    ] {
        if data.contains(field) {
            let value = data.require_str(field)?;
            check_enum(field, value, allowed)?;
            updates.push((field.to_string(), json!(value)));
        }
    }
    if data.contains("client_id") {
        // reference ids land in their canonical string form
        let client_id = data.require_id("client_id")?;
        require_row(store, "clients", "client", &client_id)?;
        updates.push(("client_id".to_string(), json!(client_id)));
    }
    let Some(record) = store.row_mut("configuration_items", id) else {
        return Err(ToolError::not_found("configuration item", id));
    };
    for (field, value) in updates {
        record.insert(field, value);
    }
    // the merge above cannot change ci_id, it is not in the allowed set
    stamp_updated(record);
    let updated = record.clone();

    Ok(json!({ "success": true, "ci_id": id, "configuration_item": updated }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Store {
        Store::from_value(json!({
            "clients": { "1": { "client_id": "1" } },
            "configuration_items": {
                "CI1": {
                    "ci_id": "CI1", "name": "db-primary", "ci_type": "database",
                    "environment": "production", "status": "active"
                }
            }
        }))
        .unwrap()
    }

    fn create_args(name: &str) -> Value {
        json!({
            "action": "create",
            "ci_data": {
                "name": name,
                "ci_type": "server",
                "environment": "production",
                "client_id": "1"
            }
        })
    }

    #[test]
    fn test_create_allocates_prefixed_id() {
        let mut store = store();
        let out = ManageConfigurationItem.invoke(&mut store, create_args("web-1"));
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["success"], true);
        assert_eq!(parsed["ci_id"], "CI2");
        assert_eq!(store.row("configuration_items", "CI2").unwrap()["status"], "active");
    }

    #[test]
    fn test_unique_name() {
        let mut store = store();
        let out = ManageConfigurationItem.invoke(&mut store, create_args("db-primary"));
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert!(parsed["error"].as_str().unwrap().contains("already exists"));
    }

    #[test]
    fn test_update_keeps_own_name() {
        let mut store = store();
        let out = ManageConfigurationItem.invoke(
            &mut store,
            json!({
                "action": "update",
                "ci_id": "CI1",
                "ci_data": { "name": "db-primary", "status": "retired" }
            }),
        );
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["success"], true);
        assert_eq!(store.row("configuration_items", "CI1").unwrap()["status"], "retired");
    }

    #[test]
    fn test_update_rejects_unknown_field() {
        let mut store = store();
        let out = ManageConfigurationItem.invoke(
            &mut store,
            json!({
                "action": "update",
                "ci_id": "CI1",
                "ci_data": { "serial_number": "X9" }
            }),
        );
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["error"], "Field 'serial_number' cannot be updated");
    }

    #[test]
    fn test_update_rejects_non_string_ci_type() {
        let mut store = store();
        let before = store.snapshot();
        let out = ManageConfigurationItem.invoke(
            &mut store,
            json!({
                "action": "update",
                "ci_id": "CI1",
                "ci_data": { "ci_type": 3 }
            }),
        );
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["success"], false);
        assert_eq!(store.snapshot(), before);
        assert_eq!(store.row("configuration_items", "CI1").unwrap()["ci_type"], "database");
    }

    #[test]
    fn test_unknown_action_reported_without_data() {
        let mut store = store();
        let out = ManageConfigurationItem.invoke(&mut store, json!({ "action": "retire" }));
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["error"], "Invalid action: retire");
    }

    #[test]
    fn test_enum_closure() {
        let mut store = store();
        let mut args = create_args("web-2");
        args["ci_data"]["environment"] = json!("qa");
        let before = store.snapshot();
        let out = ManageConfigurationItem.invoke(&mut store, args);
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert!(parsed["error"].as_str().unwrap().contains("environment"));
        assert_eq!(store.snapshot(), before);
    }
}
