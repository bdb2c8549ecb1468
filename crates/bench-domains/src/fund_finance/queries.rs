//! Read-only fund-finance tools

use bench_core::{Result, Store, ToolError};
use bench_tools::validate::{field_matches, field_str, find_row, require_row};
use bench_tools::{Args, Parameters, Tool};
use serde_json::{Value, json};

/// Look up an investor's portfolio
///
/// Single-row lookup: absence is an error result, not an empty array.
/// The active portfolio wins when the investor also has closed ones.
pub struct GetInvestorPortfolio;

impl Tool for GetInvestorPortfolio {
    fn name(&self) -> &str {
        "get_investor_portfolio"
    }

    fn description(&self) -> &str {
        "Fetch the portfolio belonging to an investor"
    }

    fn parameters(&self) -> Parameters {
        Parameters::new()
            .string("investor_id", "Investor whose portfolio to fetch")
            .required(&["investor_id"])
    }

    fn run(&self, store: &mut Store, args: &Args) -> Result<Value> {
        let investor_id = args.require_id("investor_id")?;
        let found = find_row(store, "portfolios", |record| {
            field_matches(record, "investor_id", &investor_id)
                && field_str(record, "status") == Some("active")
        })
        .or_else(|| {
            find_row(store, "portfolios", |record| {
                field_matches(record, "investor_id", &investor_id)
            })
        })
        .ok_or_else(|| {
            ToolError::not_found("portfolio for investor", investor_id.as_str())
        })?;
        Ok(Value::Object(found.1.clone()))
    }
}

/// List funds with optional filters
pub struct ListFunds;

impl Tool for ListFunds {
    fn name(&self) -> &str {
        "list_funds"
    }

    fn description(&self) -> &str {
        "List funds, optionally filtered by name, status, or fund type"
    }

    fn parameters(&self) -> Parameters {
        Parameters::new()
            .string("name", "Case-insensitive partial match on the fund name")
            .string_enum("status", "Exact fund status", &["open", "closed"])
            .string("fund_type", "Exact fund type")
            .required(&[])
    }

    fn run(&self, store: &mut Store, args: &Args) -> Result<Value> {
        let name = args.opt_str("name").map(str::to_lowercase);
        let status = args.opt_enum("status", &["open", "closed"])?.map(str::to_string);
        let fund_type = args.opt_str("fund_type").map(str::to_string);

        let mut matches = Vec::new();
        for (_, record) in store.rows("funds") {
            if let Some(ref want) = name {
                let have = field_str(record, "name").unwrap_or_default().to_lowercase();
                if !have.contains(want.as_str()) {
                    continue;
                }
            }
            if let Some(ref want) = status {
                if field_str(record, "status") != Some(want.as_str()) {
                    continue;
                }
            }
            if let Some(ref want) = fund_type {
                if field_str(record, "fund_type") != Some(want.as_str()) {
                    continue;
                }
            }
            matches.push(Value::Object(record.clone()));
        }
        Ok(Value::Array(matches))
    }
}

/// List invoices or payments through one entity-dispatched query
pub struct ListBillingEntities;

impl Tool for ListBillingEntities {
    fn name(&self) -> &str {
        "list_billing_entities"
    }

    fn description(&self) -> &str {
        "List billing records of one entity type with optional exact-match filters"
    }

    fn parameters(&self) -> Parameters {
        Parameters::new()
            .string_enum("entity_type", "Table to query", &["invoices", "payments"])
            .string("investor_id", "Exact match on the investor reference")
            .string("status", "Exact match on the record status")
            .required(&["entity_type"])
    }

    fn run(&self, store: &mut Store, args: &Args) -> Result<Value> {
        let entity_type = args.require_str("entity_type")?;
        let table = match entity_type {
            "invoices" | "payments" => entity_type,
            other => return Err(ToolError::UnknownEntity(other.to_string())),
        };
        let investor_id = args.opt_id("investor_id");
        let status = args.opt_str("status").map(str::to_string);

        let mut matches = Vec::new();
        for (_, record) in store.rows(table) {
            if let Some(ref want) = investor_id {
                if !field_matches(record, "investor_id", want) {
                    continue;
                }
            }
            if let Some(ref want) = status {
                if field_str(record, "status") != Some(want.as_str()) {
                    continue;
                }
            }
            matches.push(Value::Object(record.clone()));
        }
        Ok(Value::Array(matches))
    }
}

/// List an investor's subscriptions, each enriched with its fund name
pub struct GetInvestorSubscriptions;

impl Tool for GetInvestorSubscriptions {
    fn name(&self) -> &str {
        "get_investor_subscriptions"
    }

    fn description(&self) -> &str {
        "List the subscriptions of an investor with the subscribed fund's name spliced in"
    }

    fn parameters(&self) -> Parameters {
        Parameters::new()
            .string("investor_id", "Investor whose subscriptions to list")
            .required(&["investor_id"])
    }

    fn run(&self, store: &mut Store, args: &Args) -> Result<Value> {
        let investor_id = args.require_id("investor_id")?;
        require_row(store, "investors", "investor", &investor_id)?;

        let mut enriched = Vec::new();
        for (_, record) in store.rows("subscriptions") {
            if !field_matches(record, "investor_id", &investor_id) {
                continue;
            }
            let mut row = record.clone();
            let fund_name = record
                .get("fund_id")
                .and_then(bench_tools::validate::canonical_id)
                .and_then(|fund_id| {
                    store
                        .row("funds", &fund_id)
                        .and_then(|fund| field_str(fund, "name").map(str::to_string))
                });
            if let Some(fund_name) = fund_name {
                row.insert("fund_name".to_string(), json!(fund_name));
            }
            enriched.push(Value::Object(row));
        }
        Ok(Value::Array(enriched))
    }
}
