//! Trade execution tool

use bench_core::clock::{parse_date, stamp_new};
use bench_core::{Record, Result, Store};
use bench_tools::validate::require_row_status;
use bench_tools::{Args, Parameters, Tool};
use serde_json::{Value, json};

/// Execute a buy or sell trade for a fund
///
/// The fund must be open, the instrument active, and the fund manager must
/// have approved; the inserted trade row is immediately `executed`.
pub struct ProcessTrade;

impl Tool for ProcessTrade {
    fn name(&self) -> &str {
        "process_trade"
    }

    fn description(&self) -> &str {
        "Execute a buy or sell trade of an instrument for an open fund"
    }

    fn parameters(&self) -> Parameters {
        Parameters::new()
            .string("fund_id", "Fund placing the trade; must be open")
            .string("instrument_id", "Instrument traded; must be active")
            .number("quantity", "Units traded; must be positive")
            .string_enum("side", "Trade direction", &["buy", "sell"])
            .string("trade_date", "Trade date, YYYY-MM-DD")
            .number("price", "Execution price per unit; must be positive")
            .boolean(
                "fund_manager_approval",
                "Fund manager sign-off; must be true",
            )
            .required(&[
                "fund_id",
                "instrument_id",
                "quantity",
                "side",
                "trade_date",
                "price",
                "fund_manager_approval",
            ])
    }

    fn run(&self, store: &mut Store, args: &Args) -> Result<Value> {
        let fund_id = args.require_id("fund_id")?;
        let instrument_id = args.require_id("instrument_id")?;
        let quantity = args.require_positive("quantity")?;
        let side = args.require_enum("side", &["buy", "sell"])?.to_string();
        let trade_date = args.require_str("trade_date")?.to_string();
        parse_date(&trade_date)?;
        let price = args.require_positive("price")?;
        args.require_approval("fund_manager_approval", "Fund Manager")?;

        require_row_status(store, "funds", "fund", &fund_id, "open")?;
        require_row_status(store, "instruments", "instrument", &instrument_id, "active")?;

        let id = store.next_id("trades", "");
        let mut record = Record::new();
        record.insert("trade_id".to_string(), json!(id));
        record.insert("fund_id".to_string(), json!(fund_id));
        record.insert("instrument_id".to_string(), json!(instrument_id));
        record.insert("quantity".to_string(), json!(quantity));
        record.insert("side".to_string(), json!(side));
        record.insert("price".to_string(), json!(price));
        record.insert("trade_date".to_string(), json!(trade_date));
        record.insert("status".to_string(), json!("executed"));
        stamp_new(&mut record);
        store.insert("trades", "trade_id", &id, record.clone());

        Ok(json!({ "success": true, "trade_id": id, "trade": record }))
    }
}
