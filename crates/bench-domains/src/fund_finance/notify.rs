//! Notification-intent tool

use bench_core::clock::stamp_new;
use bench_core::{Record, Result, Store};
use bench_tools::{Args, Parameters, Tool};
use serde_json::{Value, json};

const TYPES: &[&str] = &["alert", "report", "reminder", "subscription_update"];

const CLASSES: &[&str] = &[
    "funds",
    "investors",
    "portfolios",
    "trades",
    "invoices",
    "reports",
    "documents",
    "subscriptions",
    "commitments",
];

/// Record an outbound notification intent
///
/// Intent, not delivery: one `notifications` row with status `pending`.
pub struct CreateNotification;

impl Tool for CreateNotification {
    fn name(&self) -> &str {
        "create_notification"
    }

    fn description(&self) -> &str {
        "Record a pending outbound notification for a targeted entity"
    }

    fn parameters(&self) -> Parameters {
        Parameters::new()
            .string("email", "Recipient email address")
            .string_enum("type", "Notification kind", TYPES)
            .string_enum("class", "Targeted entity family", CLASSES)
            .string("reference_id", "Id of the entity the notification is about")
            .required(&["email", "type", "class", "reference_id"])
    }

    fn run(&self, store: &mut Store, args: &Args) -> Result<Value> {
        let email = args.require_str("email")?.to_string();
        let kind = args.require_enum("type", TYPES)?.to_string();
        let class = args.require_enum("class", CLASSES)?.to_string();
        let reference_id = args.require_id("reference_id")?;

        let id = store.next_id("notifications", "");
        let mut record = Record::new();
        record.insert("notification_id".to_string(), json!(id));
        record.insert("email".to_string(), json!(email));
        record.insert("type".to_string(), json!(kind));
        record.insert("class".to_string(), json!(class));
        record.insert("reference_id".to_string(), json!(reference_id));
        record.insert("status".to_string(), json!("pending"));
        stamp_new(&mut record);
        store.insert("notifications", "notification_id", &id, record.clone());

        Ok(json!({ "success": true, "notification_id": id, "notification": record }))
    }
}
