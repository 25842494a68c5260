//! Call lifecycle: concurrency, cancellation, timeouts and failures.

use crate::common::TestContext;
use ariadne_core::Database;
use ariadne_mcp::{CallContext, JsonRpcRequest, QueryError};
use ariadne_ovsdb::notation::map;
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn test_concurrent_calls_are_idempotent() {
    let t = TestContext::new(Database::OvnSouthbound);
    t.store.set_latency(Some(Duration::from_millis(10)));
    for (key, name) in [(1, "sw0"), (2, "sw1")] {
        t.store.insert(
            "Datapath_Binding",
            json!({"tunnel_key": key, "external_ids": map([(json!("name"), json!(name))])}),
        );
    }

    let args = json!({"name_filter": "sw1"});
    let (a, b) = futures::join!(
        t.list("list_datapath_bindings", args.clone()),
        t.list("list_datapath_bindings", args.clone()),
    );
    assert_eq!(a, b);
    assert_eq!(a["count"], 1);
    assert_eq!(t.store.connects(), 2);
    assert_eq!(t.store.open_sessions(), 0);
}

#[tokio::test]
async fn test_cancellation_releases_connection() {
    let t = TestContext::new(Database::Vswitch);
    t.store.set_latency(Some(Duration::from_secs(10)));
    let ctx = CallContext::new(Duration::from_secs(30));

    let args = json!({});
    let call = t.dispatcher.dispatch("list_bridges", &args, &ctx);
    let cancel = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(t.store.open_sessions(), 1);
        ctx.cancel();
    };
    let (result, ()) = futures::join!(call, cancel);

    assert_eq!(result.unwrap_err(), QueryError::Cancelled);
    assert_eq!(t.store.open_sessions(), 0);
}

#[tokio::test]
async fn test_deadline_covers_both_round_trips() {
    let t = TestContext::with_timeout(Database::OvnSouthbound, Duration::from_millis(150));
    t.store.set_latency(Some(Duration::from_millis(100)));
    t.store.insert(
        "Datapath_Binding",
        json!({"tunnel_key": 1, "external_ids": map([(json!("name"), json!("sw0"))])}),
    );

    // Each hop fits the timeout alone; together they do not.
    let result = t.call_tool("list_port_bindings", json!({"datapath_filter": "sw0"})).await;
    assert_eq!(result["isError"], true);
    assert!(result["content"][0]["text"].as_str().unwrap().contains("timed out"));
    assert_eq!(t.store.open_sessions(), 0);
}

#[tokio::test]
async fn test_unreachable_store_fails_call_not_server() {
    let t = TestContext::new(Database::OvnNorthbound);
    t.store.set_unreachable(true);

    let result = t.call_tool("list_logical_switches", json!({})).await;
    assert_eq!(result["isError"], true);

    t.store.set_unreachable(false);
    let envelope = t.list("list_logical_switches", json!({})).await;
    assert_eq!(envelope["count"], 0);
}

#[tokio::test]
async fn test_caller_errors_are_invalid_params() {
    let t = TestContext::new(Database::Vswitch);
    for params in [
        json!({"name": "list_everything"}),
        json!({"name": "list_bridges", "arguments": {"name_filter": 7}}),
        json!({"name": "list_ports", "arguments": {"port_filter": "p0"}}),
    ] {
        let response = t
            .server
            .handle_request(JsonRpcRequest::new(9, "tools/call", Some(params.clone())))
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, -32602, "{params}");
    }
}

#[tokio::test]
async fn test_dispatch_without_server() {
    let t = TestContext::new(Database::OvnIcNorthbound);
    t.store.insert("Transit_Switch", json!({"name": "ts0"}));

    let envelope = t
        .dispatcher
        .dispatch("list_transit_switches", &json!({"name_filter": "ts0"}), &t.ctx())
        .await
        .unwrap();
    assert_eq!(envelope.count, 1);
    assert_eq!(envelope.rows()[0]["name"], "ts0");
}
