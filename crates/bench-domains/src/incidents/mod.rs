//! IT incident management tools
//!
//! Tables: `incidents` (prefix `INC`), `configuration_items` (prefix `CI`),
//! `incident_configuration_items`, `ci_client_assignments`, `clients`,
//! `sla_agreements`, `users`. Affected clients are derived per incident via
//! `incident_configuration_items` → `ci_client_assignments`.

pub mod config_items;
pub mod lifecycle;
pub mod queries;
pub mod sla;

use std::sync::Arc;

use bench_core::Result;
use bench_tools::{Interface, TransferToHuman};

pub use config_items::ManageConfigurationItem;
pub use lifecycle::ManageIncident;
pub use queries::ListIncidents;
pub use sla::FetchSlaBreachIncidents;

/// Incident intake, CI administration, and SLA reporting
pub fn interface_1() -> Result<Interface> {
    Interface::new(
        "incidents/interface_1",
        vec![
            Arc::new(ManageConfigurationItem),
            Arc::new(ManageIncident),
            Arc::new(ListIncidents),
            Arc::new(FetchSlaBreachIncidents),
            Arc::new(TransferToHuman),
        ],
    )
}

/// Client ids affected by an incident, via CI links, deduplicated in
/// traversal order
pub(crate) fn clients_for_incident(store: &bench_core::Store, incident_id: &str) -> Vec<String> {
    use bench_tools::validate::{canonical_id, field_matches};

    let mut client_ids = Vec::new();
    for (_, link) in store.rows("incident_configuration_items") {
        if !field_matches(link, "incident_id", incident_id) {
            continue;
        }
        let Some(ci_id) = link.get("ci_id").and_then(canonical_id) else {
            continue;
        };
        for (_, assignment) in store.rows("ci_client_assignments") {
            if !field_matches(assignment, "ci_id", &ci_id) {
                continue;
            }
            if let Some(client_id) = assignment.get("client_id").and_then(canonical_id) {
                if !client_ids.contains(&client_id) {
                    client_ids.push(client_id);
                }
            }
        }
    }
    client_ids
}
