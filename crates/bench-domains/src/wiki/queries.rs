//! Page queries

use bench_core::{Result, Store};
use bench_tools::validate::{field_matches, field_str};
use bench_tools::{Args, Parameters, Tool};
use serde_json::Value;

/// List pages with optional filters, excluding trashed pages by default
pub struct ListPages;

impl Tool for ListPages {
    fn name(&self) -> &str {
        "list_pages"
    }

    fn description(&self) -> &str {
        "List wiki pages filtered by space, title, or state; trashed pages are excluded unless requested"
    }

    fn parameters(&self) -> Parameters {
        Parameters::new()
            .string("space_id", "Only pages in this space")
            .string("title", "Case-insensitive partial match on the page title")
            .string_enum("state", "Exact page state", &["draft", "published"])
            .boolean("include_trashed", "Include trashed pages; defaults to false")
            .required(&[])
    }

    fn run(&self, store: &mut Store, args: &Args) -> Result<Value> {
        let space_id = args.opt_id("space_id");
        let title = args.opt_str("title").map(str::to_lowercase);
        let state = args.opt_enum("state", &["draft", "published"])?.map(str::to_string);
        let include_trashed = args.opt_bool("include_trashed").unwrap_or(false);

        let mut matches = Vec::new();
        for (_, record) in store.rows("pages") {
            let trashed = record.get("is_trashed").and_then(Value::as_bool) == Some(true);
            if trashed && !include_trashed {
                continue;
            }
            if let Some(ref want) = space_id {
                if !field_matches(record, "space_id", want) {
                    continue;
                }
            }
            if let Some(ref want) = title {
                let have = field_str(record, "title").unwrap_or_default().to_lowercase();
                if !have.contains(want.as_str()) {
                    continue;
                }
            }
            if let Some(ref want) = state {
                if field_str(record, "state") != Some(want.as_str()) {
                    continue;
                }
            }
            matches.push(Value::Object(record.clone()));
        }
        Ok(Value::Array(matches))
    }
}
