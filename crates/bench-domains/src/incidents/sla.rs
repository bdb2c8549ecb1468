//! SLA breach scan

use bench_core::clock::{parse_date, parse_datetime};
use bench_core::{Record, Result, Store};
use bench_tools::validate::{field_matches, field_str, find_row};
use bench_tools::{Args, Parameters, Tool};
use chrono::NaiveDate;
use serde_json::{Value, json};
use tracing::debug;

/// Response/resolution targets in minutes for a `(tier, severity)` pair
///
/// Premium is the baseline; each tier step doubles both targets.
fn sla_targets(tier: &str, severity: &str) -> Option<(f64, f64)> {
    let (response, resolution) = match severity {
        "P1" => (30.0, 240.0),
        "P2" => (60.0, 480.0),
        "P3" => (120.0, 1440.0),
        "P4" => (240.0, 2880.0),
        _ => return None,
    };
    let factor = match tier {
        "premium" => 1.0,
        "standard" => 2.0,
        "basic" => 4.0,
        _ => return None,
    };
    Some((response * factor, resolution * factor))
}

/// Minutes between two fixture timestamps, when both parse
fn minutes_between(earlier: &str, later: &str) -> Option<f64> {
    let earlier = parse_datetime(earlier).ok()?;
    let later = parse_datetime(later).ok()?;
    Some((later - earlier).num_seconds() as f64 / 60.0)
}

/// Scan incidents for SLA breaches against each affected client's agreement
pub struct FetchSlaBreachIncidents;

impl Tool for FetchSlaBreachIncidents {
    fn name(&self) -> &str {
        "fetch_sla_breach_incidents"
    }

    fn description(&self) -> &str {
        "List incidents that breached a client's response or resolution SLA, with actual vs target minutes"
    }

    fn parameters(&self) -> Parameters {
        Parameters::new()
            .string("start_date", "Only incidents detected on or after this date, YYYY-MM-DD")
            .string("end_date", "Only incidents detected on or before this date, YYYY-MM-DD")
            .string("client_id", "Only breaches affecting this client")
            .required(&[])
    }

    fn run(&self, store: &mut Store, args: &Args) -> Result<Value> {
        let start_date = match args.opt_str("start_date") {
            Some(raw) => Some(parse_date(raw)?),
            None => None,
        };
        let end_date = match args.opt_str("end_date") {
            Some(raw) => Some(parse_date(raw)?),
            None => None,
        };
        let client_filter = args.opt_id("client_id");

        let mut breaches = Vec::new();
        for (incident_id, incident) in store.rows("incidents") {
            let Some(detection_time) = field_str(incident, "detection_time") else {
                continue;
            };
            let Ok(detected) = parse_datetime(detection_time) else {
                continue;
            };
            if !within_range(detected.date_naive(), start_date, end_date) {
                continue;
            }
            let Some(severity) = field_str(incident, "severity") else {
                continue;
            };

            let client_ids = super::clients_for_incident(store, incident_id);
            debug!(incident = %incident_id, clients = client_ids.len(), "scanning incident");
            for client_id in client_ids {
                if let Some(ref want) = client_filter {
                    if client_id != *want {
                        continue;
                    }
                }
                let Some(entry) =
                    breach_entry(store, incident_id, incident, severity, &client_id)
                else {
                    continue;
                };
                breaches.push(entry);
            }
        }
        Ok(Value::Array(breaches))
    }
}

fn within_range(date: NaiveDate, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    if start.is_some_and(|s| date < s) {
        return false;
    }
    if end.is_some_and(|e| date > e) {
        return false;
    }
    true
}

/// Evaluate one incident against one client's active agreement; `None` when
/// there is no active agreement, no matrix entry, or no breach
fn breach_entry(
    store: &Store,
    incident_id: &str,
    incident: &Record,
    severity: &str,
    client_id: &str,
) -> Option<Value> {
    let (_, agreement) = find_row(store, "sla_agreements", |record| {
        field_matches(record, "client_id", client_id)
            && field_str(record, "status") == Some("active")
    })?;
    let tier = field_str(agreement, "tier")?;
    let (response_target, resolution_target) = sla_targets(tier, severity)?;

    let detection_time = field_str(incident, "detection_time")?;
    let response_actual = field_str(incident, "acknowledged_at")
        .and_then(|ack| minutes_between(detection_time, ack));
    let resolution_actual = field_str(incident, "resolved_at")
        .and_then(|resolved| minutes_between(detection_time, resolved));

    let response_breach = response_actual
        .filter(|actual| *actual > response_target)
        .map(|actual| actual - response_target);
    let resolution_breach = resolution_actual
        .filter(|actual| *actual > resolution_target)
        .map(|actual| actual - resolution_target);

    if response_breach.is_none() && resolution_breach.is_none() {
        return None;
    }

    Some(json!({
        "incident_id": incident_id,
        "title": field_str(incident, "title"),
        "client_id": client_id,
        "tier": tier,
        "severity": severity,
        "response_target_minutes": response_target,
        "response_actual_minutes": response_actual,
        "response_breach_by_minutes": response_breach,
        "resolution_target_minutes": resolution_target,
        "resolution_actual_minutes": resolution_actual,
        "resolution_breach_by_minutes": resolution_breach,
    }))
}
