//! Incident queries

use bench_core::{Result, Store};
use bench_tools::validate::field_str;
use bench_tools::{Args, Parameters, Tool};
use serde_json::{Value, json};

use super::lifecycle::SEVERITIES;

/// List incidents, each enriched with the client ids it affects
pub struct ListIncidents;

impl Tool for ListIncidents {
    fn name(&self) -> &str {
        "list_incidents"
    }

    fn description(&self) -> &str {
        "List incidents with optional status, severity, and affected-client filters"
    }

    fn parameters(&self) -> Parameters {
        Parameters::new()
            .string_enum(
                "status",
                "Exact incident status",
                &["open", "in_progress", "resolved", "closed"],
            )
            .string_enum("severity", "Exact incident severity", SEVERITIES)
            .string("client_id", "Only incidents affecting this client")
            .required(&[])
    }

    fn run(&self, store: &mut Store, args: &Args) -> Result<Value> {
        let status = args
            .opt_enum("status", &["open", "in_progress", "resolved", "closed"])?
            .map(str::to_string);
        let severity = args.opt_enum("severity", SEVERITIES)?.map(str::to_string);
        let client_id = args.opt_id("client_id");

        let mut matches = Vec::new();
        for (incident_id, record) in store.rows("incidents") {
            if let Some(ref want) = status {
                if field_str(record, "status") != Some(want.as_str()) {
                    continue;
                }
            }
            if let Some(ref want) = severity {
                if field_str(record, "severity") != Some(want.as_str()) {
                    continue;
                }
            }
            let client_ids = super::clients_for_incident(store, incident_id);
            if let Some(ref want) = client_id {
                if !client_ids.contains(want) {
                    continue;
                }
            }
            let mut row = record.clone();
            row.insert("client_ids".to_string(), json!(client_ids));
            matches.push(Value::Object(row));
        }
        Ok(Value::Array(matches))
    }
}
