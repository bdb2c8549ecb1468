//! Capital commitment tools

use bench_core::clock::{stamp_new, stamp_updated};
use bench_core::{Record, Result, Store, ToolError};
use bench_tools::validate::{field_matches, field_str, find_row, require_row};
use bench_tools::{Args, Parameters, Tool};
use serde_json::{Value, json};

/// Create a capital commitment for an investor in a fund
pub struct GenerateCommitment;

impl Tool for GenerateCommitment {
    fn name(&self) -> &str {
        "generate_commitment"
    }

    fn description(&self) -> &str {
        "Create a capital commitment for an investor in a fund"
    }

    fn parameters(&self) -> Parameters {
        Parameters::new()
            .string("fund_id", "Fund receiving the commitment")
            .string("investor_id", "Committing investor")
            .number("amount", "Committed amount; must be positive")
            .string("commitment_date", "Commitment date, YYYY-MM-DD")
            .boolean(
                "compliance_officer_approval",
                "Compliance officer sign-off; must be true",
            )
            .required(&[
                "fund_id",
                "investor_id",
                "amount",
                "commitment_date",
                "compliance_officer_approval",
            ])
    }

    fn run(&self, store: &mut Store, args: &Args) -> Result<Value> {
        let fund_id = args.require_id("fund_id")?;
        let investor_id = args.require_id("investor_id")?;
        let amount = args.require_positive("amount")?;
        let commitment_date = args.require_str("commitment_date")?.to_string();
        bench_core::clock::parse_date(&commitment_date)?;
        args.require_approval("compliance_officer_approval", "Compliance Officer")?;

        require_row(store, "funds", "fund", &fund_id)?;
        require_row(store, "investors", "investor", &investor_id)?;

        let duplicate = find_row(store, "commitments", |record| {
            field_matches(record, "fund_id", &fund_id)
                && field_matches(record, "investor_id", &investor_id)
        });
        if duplicate.is_some() {
            return Err(ToolError::validation(format!(
                "investor {investor_id} already has a commitment for fund {fund_id}; \
                 only one commitment per fund is allowed"
            )));
        }

        let id = store.next_id("commitments", "");
        let mut record = Record::new();
        record.insert("commitment_id".to_string(), json!(id));
        record.insert("fund_id".to_string(), json!(fund_id));
        record.insert("investor_id".to_string(), json!(investor_id));
        record.insert("amount".to_string(), json!(amount));
        record.insert("commitment_date".to_string(), json!(commitment_date));
        record.insert("status".to_string(), json!("pending"));
        stamp_new(&mut record);
        store.insert("commitments", "commitment_id", &id, record.clone());

        Ok(json!({ "success": true, "commitment_id": id, "commitment": record }))
    }
}

/// Mark a pending commitment as fulfilled
pub struct FulfillCommitment;

impl Tool for FulfillCommitment {
    fn name(&self) -> &str {
        "fulfill_commitment"
    }

    fn description(&self) -> &str {
        "Mark a pending capital commitment as fulfilled"
    }

    fn parameters(&self) -> Parameters {
        Parameters::new()
            .string("commitment_id", "Commitment to fulfill")
            .string("payment_date", "Date the commitment was paid, YYYY-MM-DD")
            .number("amount", "Amount paid in; must be positive")
            .boolean(
                "compliance_officer_approval",
                "Compliance officer sign-off; must be true",
            )
            .required(&["commitment_id", "amount", "compliance_officer_approval"])
    }

    fn run(&self, store: &mut Store, args: &Args) -> Result<Value> {
        let id = args.require_id("commitment_id")?;
        let amount = args.require_positive("amount")?;
        args.require_approval("compliance_officer_approval", "Compliance Officer")?;
        let payment_date = match args.opt_str("payment_date") {
            Some(date) => {
                bench_core::clock::parse_date(date)?;
                Some(date.to_string())
            }
            None => None,
        };

        let current = require_row(store, "commitments", "commitment", &id)?;
        if field_str(current, "status") == Some("fulfilled") {
            return Err(ToolError::validation(format!(
                "commitment {id} is already fulfilled"
            )));
        }

        let Some(record) = store.row_mut("commitments", &id) else {
            return Err(ToolError::not_found("commitment", id.as_str()));
        };
        record.insert("status".to_string(), json!("fulfilled"));
        record.insert("fulfilled_amount".to_string(), json!(amount));
        if let Some(date) = payment_date {
            record.insert("payment_date".to_string(), json!(date));
        }
        stamp_updated(record);
        let updated = record.clone();

        Ok(json!({ "success": true, "commitment_id": id, "commitment": updated }))
    }
}
