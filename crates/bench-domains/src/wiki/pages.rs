//! Page lifecycle tool

use bench_core::clock::{stamp_new, stamp_updated};
use bench_core::{Record, Result, Store, ToolError};
use bench_tools::validate::{field_str, require_row};
use bench_tools::{Args, Parameters, Tool};
use serde_json::{Value, json};

const UPDATABLE: &[&str] = &["title", "content"];

enum PageOp {
    Create,
    Update,
    Delete,
    Restore,
    Publish,
    Unpublish,
}

impl PageOp {
    fn parse(action: &str) -> Result<Self> {
        match action {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            "restore" => Ok(Self::Restore),
            "publish" => Ok(Self::Publish),
            "unpublish" => Ok(Self::Unpublish),
            other => Err(ToolError::UnknownAction(other.to_string())),
        }
    }
}

fn is_trashed(record: &Record) -> bool {
    record.get("is_trashed").and_then(Value::as_bool) == Some(true)
}

/// Create, edit, trash, restore, publish, or unpublish a wiki page
pub struct ManagePage;

impl Tool for ManagePage {
    fn name(&self) -> &str {
        "manage_page"
    }

    fn description(&self) -> &str {
        "Manage a wiki page through its lifecycle: create, update, delete (to trash), restore, publish, unpublish"
    }

    fn parameters(&self) -> Parameters {
        Parameters::new()
            .string_enum(
                "action",
                "Operation to perform",
                &["create", "update", "delete", "restore", "publish", "unpublish"],
            )
            .string("page_id", "Page to operate on (all actions except create)")
            .object("page_data", "Page fields: title, space_id (create-only), content")
            .required(&["action"])
    }

    fn run(&self, store: &mut Store, args: &Args) -> Result<Value> {
        let op = PageOp::parse(args.require_str("action")?)?;
        match op {
            PageOp::Create => create(store, &args.require_object("page_data")?),
            PageOp::Update => update(
                store,
                &args.require_id("page_id")?,
                &args.require_object("page_data")?,
            ),
            PageOp::Delete => delete(store, &args.require_id("page_id")?),
            PageOp::Restore => restore(store, &args.require_id("page_id")?),
            PageOp::Publish => set_state(store, &args.require_id("page_id")?, true),
            PageOp::Unpublish => set_state(store, &args.require_id("page_id")?, false),
        }
    }
}

fn create(store: &mut Store, data: &Args) -> Result<Value> {
    let title = data.require_str("title")?.to_string();
    let space_id = data.require_id("space_id")?;
    require_row(store, "spaces", "space", &space_id)?;
    let content = data.opt_str("content").unwrap_or_default().to_string();

    let id = store.next_id("pages", "");
    let mut record = Record::new();
    record.insert("page_id".to_string(), json!(id));
    record.insert("space_id".to_string(), json!(space_id));
    record.insert("title".to_string(), json!(title));
    record.insert("content".to_string(), json!(content));
    record.insert("state".to_string(), json!("draft"));
    record.insert("is_published".to_string(), json!(false));
    record.insert("is_trashed".to_string(), json!(false));
    stamp_new(&mut record);
    store.insert("pages", "page_id", &id, record.clone());

    Ok(json!({ "success": true, "page_id": id, "page": record }))
}

fn update(store: &mut Store, id: &str, data: &Args) -> Result<Value> {
    for field in data.keys() {
        if !UPDATABLE.contains(&field.as_str()) {
            return Err(ToolError::UnexpectedArgument(field.clone()));
        }
    }
    let current = require_row(store, "pages", "page", id)?;
    if is_trashed(current) {
        return Err(ToolError::validation(format!("page {id} is trashed")));
    }
    let title = data.opt_str("title").map(str::to_string);
    let content = data.opt_str("content").map(str::to_string);

    let Some(record) = store.row_mut("pages", id) else {
        return Err(ToolError::not_found("page", id));
    };
    if let Some(title) = title {
        record.insert("title".to_string(), json!(title));
    }
    if let Some(content) = content {
        record.insert("content".to_string(), json!(content));
    }
    stamp_updated(record);
    let updated = record.clone();

    Ok(json!({ "success": true, "page_id": id, "page": updated }))
}

fn delete(store: &mut Store, id: &str) -> Result<Value> {
    let current = require_row(store, "pages", "page", id)?;
    if is_trashed(current) {
        return Err(ToolError::validation(format!("page {id} is already trashed")));
    }
    let Some(record) = store.row_mut("pages", id) else {
        return Err(ToolError::not_found("page", id));
    };
    record.insert("is_trashed".to_string(), json!(true));
    stamp_updated(record);
    let updated = record.clone();

    Ok(json!({ "success": true, "page_id": id, "page": updated }))
}

fn restore(store: &mut Store, id: &str) -> Result<Value> {
    let current = require_row(store, "pages", "page", id)?;
    if !is_trashed(current) {
        return Err(ToolError::validation(format!("page {id} is not trashed")));
    }
    let Some(record) = store.row_mut("pages", id) else {
        return Err(ToolError::not_found("page", id));
    };
    record.insert("is_trashed".to_string(), json!(false));
    stamp_updated(record);
    let updated = record.clone();

    Ok(json!({ "success": true, "page_id": id, "page": updated }))
}

fn set_state(store: &mut Store, id: &str, publish: bool) -> Result<Value> {
    let current = require_row(store, "pages", "page", id)?;
    if is_trashed(current) {
        return Err(ToolError::validation(format!("page {id} is trashed")));
    }
    let state = field_str(current, "state").unwrap_or("draft");
    if publish && state != "draft" {
        return Err(ToolError::validation(format!(
            "only draft pages can be published; page {id} is {state}"
        )));
    }
    if !publish && state != "published" {
        return Err(ToolError::validation(format!(
            "only published pages can be unpublished; page {id} is {state}"
        )));
    }

    let Some(record) = store.row_mut("pages", id) else {
        return Err(ToolError::not_found("page", id));
    };
    // the state enum and its boolean mirror move together
    record.insert(
        "state".to_string(),
        json!(if publish { "published" } else { "draft" }),
    );
    record.insert("is_published".to_string(), json!(publish));
    stamp_updated(record);
    let updated = record.clone();

    Ok(json!({ "success": true, "page_id": id, "page": updated }))
}
