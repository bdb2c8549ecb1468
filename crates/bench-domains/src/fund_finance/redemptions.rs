//! Redemption and fund-switch tools

use bench_core::clock::{stamp_new, stamp_updated};
use bench_core::{Record, Result, Store, ToolError};
use bench_tools::validate::{
    canonical_id, field_f64, field_matches, field_str, find_row, require_row,
    require_row_status, round_currency,
};
use bench_tools::{Args, Parameters, Tool};
use serde_json::{Value, json};

/// Redemption fee, 1% of the redeemed amount
const FEE_RATE: f64 = 0.01;

fn subscription_refs(subscription: &Record, id: &str) -> Result<(String, String)> {
    let investor_id = subscription
        .get("investor_id")
        .and_then(canonical_id)
        .ok_or_else(|| {
            ToolError::validation(format!("subscription {id} has no investor_id"))
        })?;
    let fund_id = subscription
        .get("fund_id")
        .and_then(canonical_id)
        .ok_or_else(|| ToolError::validation(format!("subscription {id} has no fund_id")))?;
    Ok((investor_id, fund_id))
}

/// Redeem units from an investor's holding against an approved subscription
pub struct ProcessInvestorRedemption;

impl Tool for ProcessInvestorRedemption {
    fn name(&self) -> &str {
        "process_investor_redemption"
    }

    fn description(&self) -> &str {
        "Redeem fund units from an investor's holding; amount is units times cost basis less a 1% fee"
    }

    fn parameters(&self) -> Parameters {
        Parameters::new()
            .string("subscription_id", "Approved subscription being redeemed against")
            .number("holding_units", "Units to redeem; must not exceed the held units")
            .boolean("compliance_approval", "Compliance officer sign-off; must be true")
            .boolean("finance_approval", "Finance officer sign-off; must be true")
            .required(&[
                "subscription_id",
                "holding_units",
                "compliance_approval",
                "finance_approval",
            ])
    }

    fn run(&self, store: &mut Store, args: &Args) -> Result<Value> {
        let subscription_id = args.require_id("subscription_id")?;
        let units = args.require_positive("holding_units")?;
        args.require_approval("compliance_approval", "Compliance Officer")?;
        args.require_approval("finance_approval", "Finance Officer")?;

        // Validation phase: resolve the whole reference chain before any write.
        let (investor_id, fund_id, holding_key, held, cost_basis) = {
            let subscription = require_row_status(
                store,
                "subscriptions",
                "subscription",
                &subscription_id,
                "approved",
            )?;
            let (investor_id, fund_id) = subscription_refs(subscription, &subscription_id)?;
            require_row_status(store, "funds", "fund", &fund_id, "open")?;
            require_row(store, "investors", "investor", &investor_id)?;

            let (portfolio_id, _) = find_row(store, "portfolios", |record| {
                field_matches(record, "investor_id", &investor_id)
                    && field_str(record, "status") == Some("active")
            })
            .ok_or_else(|| {
                ToolError::validation(format!(
                    "investor {investor_id} has no active portfolio"
                ))
            })?;

            let (holding_key, holding) = find_row(store, "portfolio_holdings", |record| {
                field_matches(record, "portfolio_id", portfolio_id)
                    && field_matches(record, "fund_id", &fund_id)
            })
            .ok_or_else(|| {
                ToolError::validation(format!(
                    "investor {investor_id} has no holding for fund {fund_id}"
                ))
            })?;

            let held = field_f64(holding, "quantity").unwrap_or(0.0);
            if units > held {
                return Err(ToolError::validation(format!(
                    "requested units {units} exceed held units {held}"
                )));
            }
            let cost_basis = field_f64(holding, "cost_basis").ok_or_else(|| {
                ToolError::validation(format!("holding {holding_key} has no cost_basis"))
            })?;

            (investor_id, fund_id, holding_key.clone(), held, cost_basis)
        };

        let amount = round_currency(units * cost_basis);
        let fee = round_currency(amount * FEE_RATE);
        let remaining = held - units;

        let Some(holding) = store.row_mut("portfolio_holdings", &holding_key) else {
            return Err(ToolError::not_found("holding", holding_key.as_str()));
        };
        holding.insert("quantity".to_string(), json!(remaining));
        stamp_updated(holding);

        let id = store.next_id("redemptions", "");
        let mut record = Record::new();
        record.insert("redemption_id".to_string(), json!(id));
        record.insert("subscription_id".to_string(), json!(subscription_id));
        record.insert("investor_id".to_string(), json!(investor_id));
        record.insert("fund_id".to_string(), json!(fund_id));
        record.insert("units".to_string(), json!(units));
        record.insert("amount".to_string(), json!(amount));
        record.insert("fee".to_string(), json!(fee));
        record.insert("status".to_string(), json!("processed"));
        stamp_new(&mut record);
        store.insert("redemptions", "redemption_id", &id, record.clone());

        Ok(json!({
            "success": true,
            "redemption_id": id,
            "redemption": record,
            "remaining_units": remaining,
        }))
    }
}

/// Move an investor's subscription money from one fund to another in one call
///
/// Writes three things: a processed redemption from the source fund, the
/// debited source subscription, and an approved subscription in the target
/// fund.
pub struct SwitchFunds;

impl Tool for SwitchFunds {
    fn name(&self) -> &str {
        "switch_funds"
    }

    fn description(&self) -> &str {
        "Switch part of an approved subscription from its fund into a target fund"
    }

    fn parameters(&self) -> Parameters {
        Parameters::new()
            .string("subscription_id", "Source subscription; must be approved")
            .string("target_fund_id", "Fund receiving the switched amount; must be open")
            .number("switch_amount", "Amount to switch; must be positive")
            .boolean("fund_manager_approval", "Fund manager sign-off; must be true")
            .required(&[
                "subscription_id",
                "target_fund_id",
                "switch_amount",
                "fund_manager_approval",
            ])
    }

    fn run(&self, store: &mut Store, args: &Args) -> Result<Value> {
        let subscription_id = args.require_id("subscription_id")?;
        let target_fund_id = args.require_id("target_fund_id")?;
        let amount = args.require_positive("switch_amount")?;
        args.require_approval("fund_manager_approval", "Fund Manager")?;

        let (investor_id, source_fund_id, subscribed) = {
            let subscription = require_row_status(
                store,
                "subscriptions",
                "subscription",
                &subscription_id,
                "approved",
            )?;
            let (investor_id, source_fund_id) =
                subscription_refs(subscription, &subscription_id)?;
            let subscribed = field_f64(subscription, "amount").unwrap_or(0.0);
            (investor_id, source_fund_id, subscribed)
        };

        require_row_status(store, "funds", "fund", &target_fund_id, "open")?;
        if target_fund_id == source_fund_id {
            return Err(ToolError::validation(
                "target fund must differ from the source fund",
            ));
        }
        if amount > subscribed {
            return Err(ToolError::validation(format!(
                "switch amount {amount} exceeds the subscription amount {subscribed}"
            )));
        }

        let redemption_id = store.next_id("redemptions", "");
        let mut redemption = Record::new();
        redemption.insert("redemption_id".to_string(), json!(redemption_id));
        redemption.insert("subscription_id".to_string(), json!(subscription_id));
        redemption.insert("investor_id".to_string(), json!(investor_id));
        redemption.insert("fund_id".to_string(), json!(source_fund_id));
        redemption.insert("amount".to_string(), json!(amount));
        redemption.insert("status".to_string(), json!("processed"));
        stamp_new(&mut redemption);
        store.insert("redemptions", "redemption_id", &redemption_id, redemption.clone());

        let Some(source) = store.row_mut("subscriptions", &subscription_id) else {
            return Err(ToolError::not_found("subscription", subscription_id.as_str()));
        };
        source.insert("amount".to_string(), json!(subscribed - amount));
        stamp_updated(source);

        let new_subscription_id = store.next_id("subscriptions", "");
        let mut target = Record::new();
        target.insert("subscription_id".to_string(), json!(new_subscription_id));
        target.insert("investor_id".to_string(), json!(investor_id));
        target.insert("fund_id".to_string(), json!(target_fund_id));
        target.insert("amount".to_string(), json!(amount));
        target.insert("status".to_string(), json!("approved"));
        stamp_new(&mut target);
        store.insert("subscriptions", "subscription_id", &new_subscription_id, target.clone());

        Ok(json!({
            "success": true,
            "redemption_id": redemption_id,
            "new_subscription_id": new_subscription_id,
            "redemption": redemption,
            "new_subscription": target,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Store {
        Store::from_value(json!({
            "investors": { "42": { "investor_id": "42" } },
            "funds": {
                "7": { "fund_id": "7", "status": "open" },
                "9": { "fund_id": "9", "status": "open" }
            },
            "subscriptions": {
                "1": {
                    "subscription_id": "1", "investor_id": "42", "fund_id": "7",
                    "amount": 1000, "status": "approved"
                }
            },
            "portfolios": {
                "3": { "portfolio_id": "3", "investor_id": "42", "status": "active" }
            },
            "portfolio_holdings": {
                "5": {
                    "holding_id": "5", "portfolio_id": "3", "fund_id": "7",
                    "quantity": 100, "cost_basis": 2.5
                }
            },
            "redemptions": {}
        }))
        .unwrap()
    }

    fn redemption_args(units: f64) -> Value {
        json!({
            "subscription_id": "1",
            "holding_units": units,
            "compliance_approval": true,
            "finance_approval": true
        })
    }

    #[test]
    fn test_redemption_arithmetic() {
        let mut store = store();
        let out = ProcessInvestorRedemption.invoke(&mut store, redemption_args(40.0));
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["success"], true);
        assert_eq!(parsed["redemption"]["amount"].as_f64().unwrap(), 100.0);
        assert_eq!(parsed["redemption"]["fee"].as_f64().unwrap(), 1.0);
        assert_eq!(parsed["remaining_units"].as_f64().unwrap(), 60.0);
        assert_eq!(
            store.row("portfolio_holdings", "5").unwrap()["quantity"]
                .as_f64()
                .unwrap(),
            60.0
        );
        assert_eq!(parsed["redemption"]["status"], "processed");
    }

    #[test]
    fn test_over_redemption_rejected() {
        let mut store = store();
        let before = store.snapshot();
        let out = ProcessInvestorRedemption.invoke(&mut store, redemption_args(150.0));
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert!(parsed["error"].as_str().unwrap().contains("exceed"));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_redemption_needs_both_approvals() {
        let mut store = store();
        let mut args = redemption_args(40.0);
        args["finance_approval"] = json!(false);
        let out = ProcessInvestorRedemption.invoke(&mut store, args);
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["error"], "Finance Officer approval is required");
    }

    #[test]
    fn test_redemption_requires_approved_subscription() {
        let mut store = store();
        store
            .row_mut("subscriptions", "1")
            .unwrap()
            .insert("status".to_string(), json!("pending"));
        let out = ProcessInvestorRedemption.invoke(&mut store, redemption_args(10.0));
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["error"], "subscription 1 is not approved");
    }

    #[test]
    fn test_switch_funds() {
        let mut store = store();
        let out = SwitchFunds.invoke(
            &mut store,
            json!({
                "subscription_id": "1",
                "target_fund_id": "9",
                "switch_amount": 400,
                "fund_manager_approval": true
            }),
        );
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["success"], true);
        // source debited
        assert_eq!(
            store.row("subscriptions", "1").unwrap()["amount"].as_f64().unwrap(),
            600.0
        );
        // redemption from the source fund
        assert_eq!(parsed["redemption"]["fund_id"], "7");
        assert_eq!(parsed["redemption"]["status"], "processed");
        // approved subscription in the target fund
        let new_id = parsed["new_subscription_id"].as_str().unwrap();
        let target = store.row("subscriptions", new_id).unwrap();
        assert_eq!(target["fund_id"], "9");
        assert_eq!(target["status"], "approved");
        assert_eq!(target["amount"].as_f64().unwrap(), 400.0);
    }

    #[test]
    fn test_switch_to_same_fund_rejected() {
        let mut store = store();
        let out = SwitchFunds.invoke(
            &mut store,
            json!({
                "subscription_id": "1",
                "target_fund_id": "7",
                "switch_amount": 100,
                "fund_manager_approval": true
            }),
        );
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            parsed["error"],
            "target fund must differ from the source fund"
        );
    }

    #[test]
    fn test_switch_exceeding_subscription_rejected() {
        let mut store = store();
        let before = store.snapshot();
        let out = SwitchFunds.invoke(
            &mut store,
            json!({
                "subscription_id": "1",
                "target_fund_id": "9",
                "switch_amount": 5000,
                "fund_manager_approval": true
            }),
        );
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert!(parsed["error"].as_str().unwrap().contains("exceeds"));
        assert_eq!(store.snapshot(), before);
    }
}
