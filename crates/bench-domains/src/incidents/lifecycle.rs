//! Incident intake and lifecycle

use bench_core::clock::{parse_datetime, stamp_new, stamp_updated};
use bench_core::{Record, Result, Store, ToolError};
use bench_tools::args::check_enum;
use bench_tools::validate::{field_str, require_row};
use bench_tools::{Args, Parameters, Tool};
use serde_json::{Value, json};

pub(crate) const SEVERITIES: &[&str] = &["P1", "P2", "P3", "P4"];
const STATUSES: &[&str] = &["open", "in_progress", "resolved", "closed"];

const UPDATABLE: &[&str] = &["status", "severity", "acknowledged_at", "resolved_at"];

/// Position of a status in the forward-only lifecycle
fn status_rank(status: &str) -> usize {
    STATUSES.iter().position(|s| *s == status).unwrap_or(0)
}

/// Create or update an incident (`INC`-prefixed ids)
pub struct ManageIncident;

impl Tool for ManageIncident {
    fn name(&self) -> &str {
        "manage_incident"
    }

    fn description(&self) -> &str {
        "Create or update an incident; status only moves forward through its lifecycle"
    }

    fn parameters(&self) -> Parameters {
        Parameters::new()
            .string_enum("action", "Operation to perform", &["create", "update"])
            .string("incident_id", "Incident to update")
            .object(
                "incident_data",
                "Incident fields: title, severity, detection_time (create-only), \
                 status, acknowledged_at, resolved_at, and ci_ids linking affected \
                 configuration items (create-only)",
            )
            .required(&["action", "incident_data"])
    }

    fn run(&self, store: &mut Store, args: &Args) -> Result<Value> {
        match args.require_str("action")? {
            "create" => create(store, &args.require_object("incident_data")?),
            "update" => update(
                store,
                &args.require_id("incident_id")?,
                &args.require_object("incident_data")?,
            ),
            other => Err(ToolError::UnknownAction(other.to_string())),
        }
    }
}

fn create(store: &mut Store, data: &Args) -> Result<Value> {
    let title = data.require_str("title")?.to_string();
    let severity = data.require_enum("severity", SEVERITIES)?.to_string();
    let detection_time = data.require_str("detection_time")?.to_string();
    parse_datetime(&detection_time)?;
    let status = data.opt_enum("status", STATUSES)?.unwrap_or("open").to_string();

    let mut ci_ids = Vec::new();
    if let Some(raw) = data.get("ci_ids") {
        let list = raw.as_array().ok_or_else(|| {
            ToolError::validation("ci_ids must be an array of configuration item ids")
        })?;
        for entry in list {
            let ci_id = bench_tools::validate::canonical_id(entry).ok_or_else(|| {
                ToolError::validation("ci_ids must be an array of configuration item ids")
            })?;
            require_row(store, "configuration_items", "configuration item", &ci_id)?;
            ci_ids.push(ci_id);
        }
    }

    let id = store.next_id("incidents", "INC");
    let mut record = Record::new();
    record.insert("incident_id".to_string(), json!(id));
    record.insert("title".to_string(), json!(title));
    record.insert("severity".to_string(), json!(severity));
    record.insert("detection_time".to_string(), json!(detection_time));
    record.insert("status".to_string(), json!(status));
    stamp_new(&mut record);
    store.insert("incidents", "incident_id", &id, record.clone());

    // link rows tie the incident to its affected CIs
    for ci_id in &ci_ids {
        let link_id = store.next_id("incident_configuration_items", "");
        let mut link = Record::new();
        link.insert("link_id".to_string(), json!(link_id));
        link.insert("incident_id".to_string(), json!(id));
        link.insert("ci_id".to_string(), json!(ci_id));
        stamp_new(&mut link);
        store.insert("incident_configuration_items", "link_id", &link_id, link);
    }

    Ok(json!({
        "success": true,
        "incident_id": id,
        "incident": record,
        "linked_ci_ids": ci_ids,
    }))
}

fn update(store: &mut Store, id: &str, data: &Args) -> Result<Value> {
    for field in data.keys() {
        if !UPDATABLE.contains(&field.as_str()) {
            return Err(ToolError::UnexpectedArgument(field.clone()));
        }
    }
    let current = require_row(store, "incidents", "incident", id)?;
    let current_status = field_str(current, "status").unwrap_or("open").to_string();

    // every updatable field is a string; only validated values reach the merge
    let mut updates: Vec<(String, Value)> = Vec::new();
    if data.contains("status") {
        let status = data.require_str("status")?;
        check_enum("status", status, STATUSES)?;
        if status_rank(status) < status_rank(&current_status) {
            return Err(ToolError::validation(format!(
                "incident {id} cannot move from {current_status} back to {status}"
            )));
        }
        updates.push(("status".to_string(), json!(status)));
    }
    if data.contains("severity") {
        let severity = data.require_str("severity")?;
        check_enum("severity", severity, SEVERITIES)?;
        updates.push(("severity".to_string(), json!(severity)));
    }
    for field in ["acknowledged_at", "resolved_at"] {
        if data.contains(field) {
            let value = data.require_str(field)?;
            parse_datetime(value)?;
            updates.push((field.to_string(), json!(value)));
        }
    }
    let Some(record) = store.row_mut("incidents", id) else {
        return Err(ToolError::not_found("incident", id));
    };
    for (field, value) in updates {
        record.insert(field, value);
    }
    stamp_updated(record);
    let updated = record.clone();

    Ok(json!({ "success": true, "incident_id": id, "incident": updated }))
}
