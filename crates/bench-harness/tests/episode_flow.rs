//! Episode flow against a real domain interface

use bench_core::Store;
use bench_harness::Episode;
use serde_json::{Value, json};

fn wiki_episode() -> Episode {
    let store =
        Store::from_value(json!({ "spaces": { "1": { "space_id": "1" } }, "pages": {} }))
            .unwrap();
    let interface = bench_domains::interface("wiki", 1).unwrap();
    Episode::new(store, interface)
}

#[test]
fn full_episode_create_then_query() {
    let mut episode = wiki_episode();
    assert_eq!(episode.interface_name(), "wiki/interface_1");

    let out = episode.call(
        "manage_page",
        json!({
            "action": "create",
            "page_data": { "title": "Onboarding", "space_id": "1", "content": "hello" }
        }),
    );
    let created: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(created["success"], true);
    let page_id = created["page_id"].as_str().unwrap().to_string();

    let out = episode.call("list_pages", json!({ "title": "onboard" }));
    let listed: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["page_id"], page_id.as_str());

    // bad call mid-episode leaves the created page intact
    let out = episode.call("manage_page", json!({ "action": "publish" }));
    let failed: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(failed["success"], false);

    let store = episode.into_store();
    assert!(store.row("pages", &page_id).is_some());
}

#[test]
fn escalation_via_domain_interface() {
    let mut episode = wiki_episode();
    let out = episode.call(
        "transfer_to_human",
        json!({ "reason": "permission dispute", "summary": "user lacks space role" }),
    );
    let parsed: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["escalated"], true);
    assert!(episode.escalated());
}
