//! Device inventory tools

use bench_core::clock::{stamp_new, stamp_updated};
use bench_core::{Record, Result, Store, ToolError};
use bench_tools::args::check_enum;
use bench_tools::validate::{field_matches, field_str, find_row, require_row};
use bench_tools::{Args, Parameters, Tool};
use serde_json::{Value, json};

const DEVICE_TYPES: &[&str] = &["bulb", "thermostat", "camera", "speaker", "plug"];
const STATUSES: &[&str] = &["on", "off"];

const UPDATABLE: &[&str] = &["name", "status", "room_id"];

/// Add, update, or remove a smart-home device
///
/// Adding a `bulb` device is a composite write: the device row and its
/// linked `smart_bulbs` row are inserted in the same call, and removal
/// cascades to the bulb row.
pub struct ManageDevice;

impl Tool for ManageDevice {
    fn name(&self) -> &str {
        "manage_device"
    }

    fn description(&self) -> &str {
        "Add, update, or remove a device; bulb devices get a linked smart_bulbs row"
    }

    fn parameters(&self) -> Parameters {
        Parameters::new()
            .string_enum("action", "Operation to perform", &["add", "update", "remove"])
            .string("device_id", "Device to update or remove")
            .object(
                "device_data",
                "Device fields: name, room_id, device_type (add-only), status, \
                 and for bulbs optional brightness and color",
            )
            .required(&["action"])
    }

    fn run(&self, store: &mut Store, args: &Args) -> Result<Value> {
        match args.require_str("action")? {
            "add" => add(store, &args.require_object("device_data")?),
            "update" => update(
                store,
                &args.require_id("device_id")?,
                &args.require_object("device_data")?,
            ),
            "remove" => remove(store, &args.require_id("device_id")?),
            other => Err(ToolError::UnknownAction(other.to_string())),
        }
    }
}

fn add(store: &mut Store, data: &Args) -> Result<Value> {
    let name = data.require_str("name")?.to_string();
    let room_id = data.require_id("room_id")?;
    require_row(store, "rooms", "room", &room_id)?;
    let device_type = data.require_enum("device_type", DEVICE_TYPES)?.to_string();
    let status = data.opt_enum("status", STATUSES)?.unwrap_or("off").to_string();

    let id = store.next_id("devices", "");
    let mut record = Record::new();
    record.insert("device_id".to_string(), json!(id));
    record.insert("name".to_string(), json!(name));
    record.insert("room_id".to_string(), json!(room_id));
    record.insert("device_type".to_string(), json!(device_type));
    record.insert("status".to_string(), json!(status));
    stamp_new(&mut record);
    store.insert("devices", "device_id", &id, record.clone());

    let mut bulb_payload = Value::Null;
    if device_type == "bulb" {
        let bulb_id = store.next_id("smart_bulbs", "");
        let mut bulb = Record::new();
        bulb.insert("bulb_id".to_string(), json!(bulb_id));
        bulb.insert("device_id".to_string(), json!(id));
        bulb.insert(
            "brightness".to_string(),
            json!(data.opt_f64("brightness").unwrap_or(100.0)),
        );
        bulb.insert(
            "color".to_string(),
            json!(data.opt_str("color").unwrap_or("white")),
        );
        stamp_new(&mut bulb);
        store.insert("smart_bulbs", "bulb_id", &bulb_id, bulb.clone());
        bulb_payload = Value::Object(bulb);
    }

    Ok(json!({
        "success": true,
        "device_id": id,
        "device": record,
        "smart_bulb": bulb_payload,
    }))
}

fn update(store: &mut Store, id: &str, data: &Args) -> Result<Value> {
    for field in data.keys() {
        if !UPDATABLE.contains(&field.as_str()) {
            return Err(ToolError::UnexpectedArgument(field.clone()));
        }
    }
    require_row(store, "devices", "device", id)?;
    if let Some(status) = data.opt_str("status") {
        check_enum("status", status, STATUSES)?;
    }
    let room_id = if data.contains("room_id") {
        let room_id = data.require_id("room_id")?;
        require_row(store, "rooms", "room", &room_id)?;
        Some(room_id)
    } else {
        None
    };
    let name = data.opt_str("name").map(str::to_string);
    let status = data.opt_str("status").map(str::to_string);

    let Some(record) = store.row_mut("devices", id) else {
        return Err(ToolError::not_found("device", id));
    };
    if let Some(name) = name {
        record.insert("name".to_string(), json!(name));
    }
    if let Some(status) = status {
        record.insert("status".to_string(), json!(status));
    }
    if let Some(room_id) = room_id {
        record.insert("room_id".to_string(), json!(room_id));
    }
    stamp_updated(record);
    let updated = record.clone();

    Ok(json!({ "success": true, "device_id": id, "device": updated }))
}

fn remove(store: &mut Store, id: &str) -> Result<Value> {
    require_row(store, "devices", "device", id)?;
    let deleted = store
        .remove("devices", id)
        .ok_or_else(|| ToolError::not_found("device", id))?;

    // cascade the linked bulb row, if any
    let bulb_key = find_row(store, "smart_bulbs", |record| {
        field_matches(record, "device_id", id)
    })
    .map(|(key, _)| key.clone());
    let removed_bulb = bulb_key
        .and_then(|key| store.remove("smart_bulbs", &key))
        .unwrap_or(Value::Null);

    Ok(json!({
        "success": true,
        "device_id": id,
        "deleted": deleted,
        "deleted_bulb": removed_bulb,
    }))
}

/// List devices with optional filters
pub struct ListDevices;

impl Tool for ListDevices {
    fn name(&self) -> &str {
        "list_devices"
    }

    fn description(&self) -> &str {
        "List devices filtered by room, device type, or status"
    }

    fn parameters(&self) -> Parameters {
        Parameters::new()
            .string("room_id", "Only devices in this room")
            .string_enum("device_type", "Exact device type", DEVICE_TYPES)
            .string_enum("status", "Exact device status", STATUSES)
            .required(&[])
    }

    fn run(&self, store: &mut Store, args: &Args) -> Result<Value> {
        let room_id = args.opt_id("room_id");
        let device_type = args.opt_enum("device_type", DEVICE_TYPES)?.map(str::to_string);
        let status = args.opt_enum("status", STATUSES)?.map(str::to_string);

        let mut matches = Vec::new();
        for (_, record) in store.rows("devices") {
            if let Some(ref want) = room_id {
                if !field_matches(record, "room_id", want) {
                    continue;
                }
            }
            if let Some(ref want) = device_type {
                if field_str(record, "device_type") != Some(want.as_str()) {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Store {
        Store::from_value(json!({
            "rooms": { "1": { "room_id": "1", "name": "Living room" } },
            "devices": {},
            "smart_bulbs": {}
        }))
        .unwrap()
    }

    fn add_bulb(store: &mut Store) -> Value {
        let out = ManageDevice.invoke(
            store,
            json!({
                "action": "add",
                "device_data": {
                    "name": "Ceiling light",
                    "room_id": "1",
                    "device_type": "bulb",
                    "brightness": 80,
                    "color": "warm_white"
                }
            }),
        );
        serde_json::from_str(&out).unwrap()
    }

    #[test]
    fn test_add_bulb_is_composite() {
        let mut store = store();
        let parsed = add_bulb(&mut store);
        assert_eq!(parsed["success"], true);
        assert_eq!(parsed["device"]["device_type"], "bulb");
        assert_eq!(parsed["smart_bulb"]["device_id"], "1");
        assert_eq!(parsed["smart_bulb"]["brightness"].as_f64().unwrap(), 80.0);
        assert_eq!(store.row("smart_bulbs", "1").unwrap()["color"], "warm_white");
    }

    #[test]
    fn test_add_non_bulb_skips_bulb_row() {
        let mut store = store();
        let out = ManageDevice.invoke(
            &mut store,
            json!({
                "action": "add",
                "device_data": { "name": "Cam", "room_id": "1", "device_type": "camera" }
            }),
        );
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["smart_bulb"], Value::Null);
        assert!(store.table("smart_bulbs").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_room_rejected() {
        let mut store = store();
        let before = store.snapshot();
        let out = ManageDevice.invoke(
            &mut store,
            json!({
                "action": "add",
                "device_data": { "name": "Cam", "room_id": "9", "device_type": "camera" }
            }),
        );
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["error"], "room 9 not found");
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_remove_cascades_to_bulb() {
        let mut store = store();
        add_bulb(&mut store);
        let out = ManageDevice.invoke(&mut store, json!({ "action": "remove", "device_id": "1" }));
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["success"], true);
        assert_eq!(parsed["deleted"]["name"], "Ceiling light");
        assert_eq!(parsed["deleted_bulb"]["bulb_id"], "1");
        assert!(store.table("devices").unwrap().is_empty());
        assert!(store.table("smart_bulbs").unwrap().is_empty());
    }

    #[test]
    fn test_update_and_list() {
        let mut store = store();
        add_bulb(&mut store);
        ManageDevice.invoke(
            &mut store,
            json!({
                "action": "update",
                "device_id": "1",
                "device_data": { "status": "on" }
            }),
        );
        let out = ListDevices.invoke(&mut store, json!({ "status": "on" }));
        let parsed: Value = serde_json::from_str(&out).unwrap();
        let rows = parsed.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["device_id"], "1");
    }

    #[test]
    fn test_device_type_is_add_only() {
        let mut store = store();
        add_bulb(&mut store);
        let out = ManageDevice.invoke(
            &mut store,
            json!({
                "action": "update",
                "device_id": "1",
                "device_data": { "device_type": "camera" }
            }),
        );
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["error"], "Field 'device_type' cannot be updated");
    }
}
