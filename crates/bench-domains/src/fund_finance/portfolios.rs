//! Portfolio administration tool

use bench_core::clock::{stamp_new, stamp_updated};
use bench_core::{Record, Result, Store, ToolError};
use bench_tools::validate::{field_f64, field_matches, field_str, find_row, require_row};
use bench_tools::{Args, Parameters, Tool};
use serde_json::{Value, json};

/// Fields accepted by `action = "update"`. `investor_id` is create-only.
const UPDATABLE: &[&str] = &["base_currency", "fund_manager_approval"];

enum PortfolioOp {
    Create,
    Update,
    Close,
}

impl PortfolioOp {
    fn parse(action: &str) -> Result<Self> {
        match action {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "close" => Ok(Self::Close),
            other => Err(ToolError::UnknownAction(other.to_string())),
        }
    }
}

/// Create, update, or close an investor portfolio
pub struct ProcessPortfolio;

impl Tool for ProcessPortfolio {
    fn name(&self) -> &str {
        "process_portfolio"
    }

    fn description(&self) -> &str {
        "Create, update, or close an investor portfolio; an investor can hold one active portfolio"
    }

    fn parameters(&self) -> Parameters {
        Parameters::new()
            .string_enum(
                "action",
                "Operation to perform",
                &["create", "update", "close"],
            )
            .string("portfolio_id", "Portfolio to update or close")
            .object(
                "portfolio_data",
                "Portfolio fields: investor_id (create-only), base_currency, \
                 and fund_manager_approval",
            )
            .required(&["action", "portfolio_data"])
    }

    fn run(&self, store: &mut Store, args: &Args) -> Result<Value> {
        let op = PortfolioOp::parse(args.require_str("action")?)?;
        let data = args.require_object("portfolio_data")?;
        match op {
            PortfolioOp::Create => create(store, &data),
            PortfolioOp::Update => update(store, &args.require_id("portfolio_id")?, &data),
            PortfolioOp::Close => close(store, &args.require_id("portfolio_id")?, &data),
        }
    }
}

fn create(store: &mut Store, data: &Args) -> Result<Value> {
    let investor_id = data.require_id("investor_id")?;
    data.require_approval("fund_manager_approval", "Fund Manager")?;
    require_row(store, "investors", "investor", &investor_id)?;

    let active = find_row(store, "portfolios", |record| {
        field_matches(record, "investor_id", &investor_id)
            && field_str(record, "status") == Some("active")
    });
    if active.is_some() {
        return Err(ToolError::validation(format!(
            "investor {investor_id} already has an active portfolio"
        )));
    }

    let id = store.next_id("portfolios", "");
    let mut record = Record::new();
    record.insert("portfolio_id".to_string(), json!(id));
    record.insert("investor_id".to_string(), json!(investor_id));
    record.insert("status".to_string(), json!("active"));
    if let Some(currency) = data.opt_str("base_currency") {
        record.insert("base_currency".to_string(), json!(currency));
    }
    stamp_new(&mut record);
    store.insert("portfolios", "portfolio_id", &id, record.clone());

    Ok(json!({ "success": true, "portfolio_id": id, "portfolio": record }))
}

fn update(store: &mut Store, id: &str, data: &Args) -> Result<Value> {
    for field in data.keys() {
        if !UPDATABLE.contains(&field.as_str()) {
            return Err(ToolError::UnexpectedArgument(field.clone()));
        }
    }
    data.require_approval("fund_manager_approval", "Fund Manager")?;
    require_row(store, "portfolios", "portfolio", id)?;
    let currency = data.opt_str("base_currency").map(str::to_string);

    let Some(record) = store.row_mut("portfolios", id) else {
        return Err(ToolError::not_found("portfolio", id));
    };
    if let Some(currency) = currency {
        record.insert("base_currency".to_string(), json!(currency));
    }
    stamp_updated(record);
    let updated = record.clone();

    Ok(json!({ "success": true, "portfolio_id": id, "portfolio": updated }))
}

fn close(store: &mut Store, id: &str, data: &Args) -> Result<Value> {
    data.require_approval("fund_manager_approval", "Fund Manager")?;
    let current = require_row(store, "portfolios", "portfolio", id)?;
    if field_str(current, "status") == Some("closed") {
        return Err(ToolError::validation(format!(
            "portfolio {id} is already closed"
        )));
    }

    let active_holding = find_row(store, "portfolio_holdings", |record| {
        field_matches(record, "portfolio_id", id)
            && field_f64(record, "quantity").unwrap_or(0.0) > 0.0
    });
    if active_holding.is_some() {
        return Err(ToolError::validation(format!(
            "portfolio {id} cannot be closed while it has active holdings"
        )));
    }

    let Some(record) = store.row_mut("portfolios", id) else {
        return Err(ToolError::not_found("portfolio", id));
    };
    record.insert("status".to_string(), json!("closed"));
    stamp_updated(record);
    let updated = record.clone();

    Ok(json!({ "success": true, "portfolio_id": id, "portfolio": updated }))
}
