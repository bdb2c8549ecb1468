//! Invoice lifecycle tool

use bench_core::clock::{parse_date, stamp_new, stamp_updated, today};
use bench_core::{Record, Result, Store, ToolError};
use bench_tools::args::check_enum;
use bench_tools::validate::{field_str, require_row};
use bench_tools::{Args, Parameters, Tool};
use serde_json::{Value, json};

const STATUSES: &[&str] = &["issued", "paid", "cancelled"];

/// Fields accepted by `action = "update"`. `invoice_date` is create-only.
const UPDATABLE: &[&str] = &["amount", "due_date", "status", "finance_officer_approval"];

enum InvoiceOp {
    Create,
    Update,
    Delete,
}

impl InvoiceOp {
    fn parse(action: &str) -> Result<Self> {
        match action {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            other => Err(ToolError::UnknownAction(other.to_string())),
        }
    }
}

/// Create, update, or delete an invoice
pub struct ProcessInvoice;

impl Tool for ProcessInvoice {
    fn name(&self) -> &str {
        "process_invoice"
    }

    fn description(&self) -> &str {
        "Create, update, or hard-delete an invoice"
    }

    fn parameters(&self) -> Parameters {
        Parameters::new()
            .string_enum(
                "action",
                "Operation to perform",
                &["create", "update", "delete"],
            )
            .string("invoice_id", "Invoice to update or delete")
            .object(
                "invoice_data",
                "Invoice fields: invoice_date (create-only), due_date, amount, status, \
                 optional investor_id and commitment_id, and finance_officer_approval",
            )
            .required(&["action"])
    }

    fn run(&self, store: &mut Store, args: &Args) -> Result<Value> {
        match InvoiceOp::parse(args.require_str("action")?)? {
            InvoiceOp::Create => create(store, &args.require_object("invoice_data")?),
            InvoiceOp::Update => update(
                store,
                &args.require_id("invoice_id")?,
                &args.require_object("invoice_data")?,
            ),
            InvoiceOp::Delete => delete(store, &args.require_id("invoice_id")?),
        }
    }
}

fn create(store: &mut Store, data: &Args) -> Result<Value> {
    let invoice_date = data.require_str("invoice_date")?.to_string();
    let due_date = data.require_str("due_date")?.to_string();
    let amount = data.require_positive("amount")?;
    data.require_approval("finance_officer_approval", "Finance Officer")?;
    let status = data
        .opt_enum("status", STATUSES)?
        .unwrap_or("issued")
        .to_string();

    let invoice = parse_date(&invoice_date)?;
    let due = parse_date(&due_date)?;
    if due < invoice {
        return Err(ToolError::validation(
            "due date cannot be before invoice date",
        ));
    }
    if invoice > today() {
        return Err(ToolError::validation(
            "invoice date cannot be in the future",
        ));
    }

    let investor_id = data.opt_id("investor_id");
    if let Some(ref id) = investor_id {
        require_row(store, "investors", "investor", id)?;
    }
    let commitment_id = data.opt_id("commitment_id");
    if let Some(ref id) = commitment_id {
        require_row(store, "commitments", "commitment", id)?;
    }

    let id = store.next_id("invoices", "");
    let mut record = Record::new();
    record.insert("invoice_id".to_string(), json!(id));
    record.insert("invoice_date".to_string(), json!(invoice_date));
    record.insert("due_date".to_string(), json!(due_date));
    record.insert("amount".to_string(), json!(amount));
    record.insert("status".to_string(), json!(status));
    if let Some(investor_id) = investor_id {
        record.insert("investor_id".to_string(), json!(investor_id));
    }
    if let Some(commitment_id) = commitment_id {
        record.insert("commitment_id".to_string(), json!(commitment_id));
    }
    stamp_new(&mut record);
    store.insert("invoices", "invoice_id", &id, record.clone());

    Ok(json!({ "success": true, "invoice_id": id, "invoice": record }))
}

fn update(store: &mut Store, id: &str, data: &Args) -> Result<Value> {
    for field in data.keys() {
        if !UPDATABLE.contains(&field.as_str()) {
            return Err(ToolError::UnexpectedArgument(field.clone()));
        }
    }
    data.require_approval("finance_officer_approval", "Finance Officer")?;

    let current = require_row(store, "invoices", "invoice", id)?;
    let current_status = field_str(current, "status").unwrap_or("issued").to_string();
    let invoice_date = field_str(current, "invoice_date").map(str::to_string);

    let new_status = match data.opt_str("status") {
        Some(status) => {
            check_enum("status", status, STATUSES)?;
            if current_status == "paid" && status == "issued" {
                return Err(ToolError::validation(format!(
                    "invoice {id} cannot move from paid back to issued"
                )));
            }
            Some(status.to_string())
        }
        None => None,
    };

    let new_amount = match data.get("amount") {
        Some(_) => Some(data.require_positive("amount")?),
        None => None,
    };

    let new_due = match data.opt_str("due_date") {
        Some(due_date) => {
            let due = parse_date(due_date)?;
            if let Some(ref invoice_date) = invoice_date {
                if due < parse_date(invoice_date)? {
                    return Err(ToolError::validation(
                        "due date cannot be before invoice date",
                    ));
                }
            }
            Some(due_date.to_string())
        }
        None => None,
    };

    let Some(record) = store.row_mut("invoices", id) else {
        return Err(ToolError::not_found("invoice", id));
    };
    if let Some(status) = new_status {
        record.insert("status".to_string(), json!(status));
    }
    if let Some(amount) = new_amount {
        record.insert("amount".to_string(), json!(amount));
    }
    if let Some(due_date) = new_due {
        record.insert("due_date".to_string(), json!(due_date));
    }
    // approval flags never land on the stored record
    stamp_updated(record);
    let updated = record.clone();

    Ok(json!({ "success": true, "invoice_id": id, "invoice": updated }))
}

fn delete(store: &mut Store, id: &str) -> Result<Value> {
    require_row(store, "invoices", "invoice", id)?;
    let deleted = store
        .remove("invoices", id)
        .ok_or_else(|| ToolError::not_found("invoice", id))?;
    Ok(json!({ "success": true, "invoice_id": id, "deleted": deleted }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bench_core::FROZEN_TIMESTAMP;

    fn store() -> Store {
        Store::from_value(json!({ "invoices": {}, "investors": {}, "commitments": {} })).unwrap()
    }

    fn create_args(invoice_date: &str, due_date: &str) -> Value {
        json!({
            "action": "create",
            "invoice_data": {
                "invoice_date": invoice_date,
                "due_date": due_date,
                "amount": 10,
                "finance_officer_approval": true
            }
        })
    }

    #[test]
    fn test_create_invoice() {
        let mut store = store();
        let out = ProcessInvoice.invoke(&mut store, create_args("2025-10-01", "2025-10-31"));
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["success"], true);
        assert_eq!(parsed["invoice"]["status"], "issued");
        assert_eq!(parsed["invoice"]["created_at"], FROZEN_TIMESTAMP);
        // the approval flag is not persisted
        assert!(
            !store.row("invoices", "1").unwrap().contains_key("finance_officer_approval")
        );
    }

    #[test]
    fn test_due_date_before_invoice_date() {
        let mut store = store();
        let before = store.snapshot();
        let out = ProcessInvoice.invoke(&mut store, create_args("2025-10-01", "2025-09-30"));
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["success"], false);
        assert_eq!(parsed["error"], "due date cannot be before invoice date");
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_future_invoice_date() {
        let mut store = store();
        let out = ProcessInvoice.invoke(&mut store, create_args("2026-01-01", "2026-02-01"));
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["error"], "invoice date cannot be in the future");
    }

    #[test]
    fn test_invoice_date_is_create_only() {
        let mut store = store();
        ProcessInvoice.invoke(&mut store, create_args("2025-10-01", "2025-10-31"));
        let out = ProcessInvoice.invoke(
            &mut store,
            json!({
                "action": "update",
                "invoice_id": "1",
                "invoice_data": { "invoice_date": "2025-09-01", "finance_officer_approval": true }
            }),
        );
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["error"], "Field 'invoice_date' cannot be updated");
    }

    #[test]
    fn test_paid_cannot_return_to_issued() {
        let mut store = store();
        ProcessInvoice.invoke(&mut store, create_args("2025-10-01", "2025-10-31"));
        let pay = json!({
            "action": "update",
            "invoice_id": "1",
            "invoice_data": { "status": "paid", "finance_officer_approval": true }
        });
        ProcessInvoice.invoke(&mut store, pay);
        let out = ProcessInvoice.invoke(
            &mut store,
            json!({
                "action": "update",
                "invoice_id": "1",
                "invoice_data": { "status": "issued", "finance_officer_approval": true }
            }),
        );
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            parsed["error"],
            "invoice 1 cannot move from paid back to issued"
        );
    }

    #[test]
    fn test_delete_returns_record_and_id_not_reused() {
        let mut store = store();
        ProcessInvoice.invoke(&mut store, create_args("2025-10-01", "2025-10-31"));
        let out = ProcessInvoice.invoke(
            &mut store,
            json!({ "action": "delete", "invoice_id": "1" }),
        );
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["success"], true);
        assert_eq!(parsed["deleted"]["invoice_id"], "1");

        let out = ProcessInvoice.invoke(&mut store, create_args("2025-10-02", "2025-10-31"));
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["invoice_id"], "2");
    }

    #[test]
    fn test_unknown_action() {
        let mut store = store();
        let out = ProcessInvoice.invoke(&mut store, json!({ "action": "archive" }));
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["error"], "Invalid action: archive");
    }
}
