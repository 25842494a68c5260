//! Filtered listings, one database at a time.

use crate::common::{TestContext, names};
use ariadne_core::Database;
use ariadne_ovsdb::notation::{map, set, uuid};
use serde_json::json;

#[tokio::test]
async fn test_bridge_name_filter() {
    let t = TestContext::new(Database::Vswitch);
    t.store.insert("Bridge", json!({"name": "br-test"}));
    t.store.insert("Bridge", json!({"name": "br-other"}));

    let envelope = t.list("list_bridges", json!({"name_filter": "br-test"})).await;
    assert_eq!(envelope["count"], 1);
    assert_eq!(names(&envelope, "bridges", "name"), vec!["br-test"]);
}

#[tokio::test]
async fn test_unfiltered_count_matches_store() {
    let t = TestContext::new(Database::Vswitch);
    for name in ["br0", "br1", "br2"] {
        t.store.insert("Bridge", json!({"name": name}));
    }

    let envelope = t.list("list_bridges", json!({})).await;
    assert_eq!(envelope["count"], 3);
    assert_eq!(envelope["data"]["bridges"].as_array().unwrap().len(), 3);

    let envelope = t.list("list_bridges", json!({"name_filter": ""})).await;
    assert_eq!(envelope["count"], 3);
}

#[tokio::test]
async fn test_missing_datapath_is_empty_not_error() {
    let t = TestContext::new(Database::OvnSouthbound);
    t.store.insert(
        "Datapath_Binding",
        json!({"tunnel_key": 1, "external_ids": map([(json!("name"), json!("sw0"))])}),
    );

    let envelope = t.list("list_port_bindings", json!({"datapath_filter": "missing-dp"})).await;
    assert_eq!(
        envelope,
        json!({
            "data": {"port_bindings": []},
            "count": 0,
            "context": "no datapath found with the specified filter"
        })
    );
}

#[tokio::test]
async fn test_port_bindings_scoped_to_datapath() {
    let t = TestContext::new(Database::OvnSouthbound);
    let sw0 = t.store.insert(
        "Datapath_Binding",
        json!({"tunnel_key": 1, "external_ids": map([(json!("name"), json!("sw0"))])}),
    );
    let sw1 = t.store.insert(
        "Datapath_Binding",
        json!({"tunnel_key": 2, "external_ids": map([(json!("name"), json!("sw1"))])}),
    );
    t.store.insert("Port_Binding", json!({"logical_port": "a", "datapath": uuid(&sw0)}));
    t.store.insert("Port_Binding", json!({"logical_port": "b", "datapath": uuid(&sw1)}));
    t.store.insert("Port_Binding", json!({"logical_port": "c", "datapath": uuid(&sw0)}));

    let envelope = t.list("list_port_bindings", json!({"datapath_filter": "sw0"})).await;
    assert_eq!(envelope["count"], 2);
    assert_eq!(names(&envelope, "port_bindings", "logical_port"), vec!["a", "c"]);
    for row in envelope["data"]["port_bindings"].as_array().unwrap() {
        assert_eq!(row["datapath"], json!(sw0));
    }
}

#[tokio::test]
async fn test_duplicate_parent_names_match_any() {
    let t = TestContext::new(Database::OvnSouthbound);
    let a = t.store.insert(
        "Datapath_Binding",
        json!({"tunnel_key": 1, "external_ids": map([(json!("name"), json!("dup"))])}),
    );
    let b = t.store.insert(
        "Datapath_Binding",
        json!({"tunnel_key": 2, "external_ids": map([(json!("name"), json!("dup"))])}),
    );
    t.store.insert("Logical_Flow", json!({"match": "m1", "logical_datapath": uuid(&a)}));
    t.store.insert("Logical_Flow", json!({"match": "m2", "logical_datapath": uuid(&b)}));
    t.store.insert("Logical_Flow", json!({"match": "m3", "logical_datapath": set(vec![])}));

    let envelope = t.list("list_logical_flows", json!({"datapath_filter": "dup"})).await;
    assert_eq!(envelope["count"], 2);
    assert_eq!(names(&envelope, "logical_flows", "match"), vec!["m1", "m2"]);
}

#[tokio::test]
async fn test_chassis_encaps() {
    let t = TestContext::new(Database::OvnSouthbound);
    let geneve = t.store.insert("Encap", json!({"type": "geneve", "ip": "10.0.0.1"}));
    t.store.insert("Encap", json!({"type": "vxlan", "ip": "10.0.0.2"}));
    t.store.insert("Chassis", json!({"name": "hv1", "encaps": set(vec![uuid(&geneve)])}));

    let envelope = t.list("list_encaps", json!({"chassis_filter": "hv1"})).await;
    assert_eq!(names(&envelope, "encaps", "type"), vec!["geneve"]);
}

#[tokio::test]
async fn test_nat_rules_by_router() {
    let t = TestContext::new(Database::OvnNorthbound);
    let snat = t.store.insert("NAT", json!({"type": "snat", "external_ip": "172.16.0.1"}));
    t.store.insert("NAT", json!({"type": "dnat", "external_ip": "172.16.0.2"}));
    t.store.insert("Logical_Router", json!({"name": "lr0", "nat": set(vec![uuid(&snat)])}));

    let envelope = t.list("list_nat_rules", json!({"router_filter": "lr0"})).await;
    assert_eq!(names(&envelope, "nat_rules", "type"), vec!["snat"]);

    let envelope = t.list("list_nat_rules", json!({"router_filter": "lr9"})).await;
    assert_eq!(envelope["context"], "no logical router found with the specified filter");
}

#[tokio::test]
async fn test_ic_gateways_and_routes() {
    let t = TestContext::new(Database::OvnIcSouthbound);
    let az1 = t.store.insert("Availability_Zone", json!({"name": "az1"}));
    let az2 = t.store.insert("Availability_Zone", json!({"name": "az2"}));
    t.store.insert("Gateway", json!({"name": "gw1", "availability_zone": uuid(&az1)}));
    t.store.insert("Gateway", json!({"name": "gw2", "availability_zone": uuid(&az2)}));
    t.store.insert("Route", json!({"ip_prefix": "10.1.0.0/24", "availability_zone": uuid(&az1)}));
    t.store.insert("Route", json!({"ip_prefix": "10.2.0.0/24", "availability_zone": uuid(&az2)}));

    let envelope = t.list("list_gateways", json!({"zone_filter": "az2"})).await;
    assert_eq!(names(&envelope, "gateways", "name"), vec!["gw2"]);

    let envelope = t.list("list_routes", json!({"gateway_filter": "gw1"})).await;
    assert_eq!(names(&envelope, "routes", "ip_prefix"), vec!["10.1.0.0/24"]);
}

#[tokio::test]
async fn test_ic_datapath_named_by_transit_switch() {
    let t = TestContext::new(Database::OvnIcSouthbound);
    t.store.insert("Datapath_Binding", json!({"transit_switch": "ts0", "tunnel_key": 1}));
    t.store.insert("Datapath_Binding", json!({"transit_switch": "ts1", "tunnel_key": 2}));

    let envelope = t.list("list_datapath_bindings", json!({"name_filter": "ts1"})).await;
    assert_eq!(names(&envelope, "datapath_bindings", "transit_switch"), vec!["ts1"]);
}

#[tokio::test]
async fn test_rows_are_plain_json() {
    let t = TestContext::new(Database::OvnNorthbound);
    let p = t.store.insert("Logical_Switch_Port", json!({"name": "p0"}));
    t.store.insert(
        "Logical_Switch",
        json!({
            "name": "sw0",
            "ports": set(vec![uuid(&p)]),
            "other_config": map([(json!("mcast_snoop"), json!("true"))]),
        }),
    );

    let envelope = t.list("list_logical_switches", json!({})).await;
    let row = &envelope["data"]["logical_switches"][0];
    assert_eq!(row["ports"], json!([p]));
    assert_eq!(row["other_config"], json!({"mcast_snoop": "true"}));
    assert!(row["_uuid"].is_string());
}
