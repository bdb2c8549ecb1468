//! The hand-off-to-human escalation tool
//!
//! Every interface carries one. It records nothing in the store; the
//! `escalated` sentinel in its payload tells the harness the episode has
//! been handed off.

use bench_core::{Result, Store};
use serde_json::{Value, json};

use crate::args::Args;
use crate::schema::Parameters;
use crate::tool::Tool;

/// Escalate the episode to a human operator
pub struct TransferToHuman;

impl Tool for TransferToHuman {
    fn name(&self) -> &str {
        "transfer_to_human"
    }

    fn description(&self) -> &str {
        "Hand the current request off to a human operator when it cannot be completed with the available tools"
    }

    fn parameters(&self) -> Parameters {
        Parameters::new()
            .string("reason", "Short reason the request cannot be handled")
            .string("summary", "Summary of the operation that was attempted")
            .required(&["reason"])
    }

    fn run(&self, _store: &mut Store, args: &Args) -> Result<Value> {
        let reason = args.require_str("reason")?;
        let summary = args.opt_str("summary").unwrap_or_default();
        Ok(json!({
            "success": true,
            "escalated": true,
            "reason": reason,
            "summary": summary,
        }))
    }
}
