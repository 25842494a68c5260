//! Compiled-in table descriptors for the five databases.
//!
//! These cover every table the tool catalog lists or resolves through, plus
//! each database's root table. Column sets follow the upstream
//! `vswitch.ovsschema`, `ovn-nb.ovsschema`, `ovn-sb.ovsschema`,
//! `ovn-ic-nb.ovsschema` and `ovn-ic-sb.ovsschema` files.

use super::{AtomicType, ColumnDescriptor, ColumnType, TableDescriptor};
use crate::database::Database;

const INT: ColumnType = ColumnType::scalar(AtomicType::Integer);
const BOOL: ColumnType = ColumnType::scalar(AtomicType::Boolean);
const STR: ColumnType = ColumnType::scalar(AtomicType::String);
const UUID: ColumnType = ColumnType::scalar(AtomicType::Uuid);

const OPT_INT: ColumnType = ColumnType::optional(AtomicType::Integer);
const OPT_BOOL: ColumnType = ColumnType::optional(AtomicType::Boolean);
const OPT_STR: ColumnType = ColumnType::optional(AtomicType::String);
const OPT_UUID: ColumnType = ColumnType::optional(AtomicType::Uuid);

const SET_INT: ColumnType = ColumnType::set(AtomicType::Integer);
const SET_STR: ColumnType = ColumnType::set(AtomicType::String);
const SET_UUID: ColumnType = ColumnType::set(AtomicType::Uuid);
/// Reference set with at least one member.
const REFS1: ColumnType = ColumnType { min: 1, ..ColumnType::set(AtomicType::Uuid) };

const MAP: ColumnType = ColumnType::map(AtomicType::String, AtomicType::String);
const MAP_INT: ColumnType = ColumnType::map(AtomicType::String, AtomicType::Integer);

type Columns<'a> = &'a [(&'a str, ColumnType)];

fn table(database: Database, name: &str, columns: Columns<'_>) -> TableDescriptor {
    let columns = columns
        .iter()
        .map(|(column, ty)| ColumnDescriptor::new(*column, *ty))
        .collect();
    TableDescriptor::new(database, name, columns)
}

pub(super) fn tables(database: Database) -> Vec<TableDescriptor> {
    let defs: &[(&str, Columns<'_>)] = match database {
        Database::Vswitch => VSWITCH,
        Database::OvnNorthbound => OVN_NB,
        Database::OvnSouthbound => OVN_SB,
        Database::OvnIcNorthbound => OVN_IC_NB,
        Database::OvnIcSouthbound => OVN_IC_SB,
    };
    defs.iter()
        .map(|(name, columns)| table(database, name, columns))
        .collect()
}

const VSWITCH: &[(&str, Columns<'static>)] = &[
    (
        "Open_vSwitch",
        &[
            ("bridges", SET_UUID),
            ("manager_options", SET_UUID),
            ("ssl", OPT_UUID),
            ("other_config", MAP),
            ("external_ids", MAP),
            ("next_cfg", INT),
            ("cur_cfg", INT),
            ("statistics", MAP),
            ("ovs_version", OPT_STR),
            ("db_version", OPT_STR),
            ("system_type", OPT_STR),
            ("system_version", OPT_STR),
            ("datapath_types", SET_STR),
            ("iface_types", SET_STR),
            ("dpdk_initialized", BOOL),
            ("dpdk_version", OPT_STR),
        ],
    ),
    (
        "Bridge",
        &[
            ("name", STR),
            ("datapath_type", STR),
            ("datapath_version", STR),
            ("datapath_id", OPT_STR),
            ("stp_enable", BOOL),
            ("rstp_enable", BOOL),
            ("mcast_snooping_enable", BOOL),
            ("ports", SET_UUID),
            ("mirrors", SET_UUID),
            ("netflow", OPT_UUID),
            ("sflow", OPT_UUID),
            ("ipfix", OPT_UUID),
            ("controller", SET_UUID),
            ("protocols", SET_STR),
            ("fail_mode", OPT_STR),
            ("status", MAP),
            ("rstp_status", MAP),
            ("other_config", MAP),
            ("external_ids", MAP),
            ("flood_vlans", SET_INT),
            ("flow_tables", ColumnType::map(AtomicType::Integer, AtomicType::Uuid)),
            ("auto_attach", OPT_UUID),
        ],
    ),
    (
        "Port",
        &[
            ("name", STR),
            ("interfaces", REFS1),
            ("trunks", SET_INT),
            ("tag", OPT_INT),
            ("vlan_mode", OPT_STR),
            ("qos", OPT_UUID),
            ("mac", OPT_STR),
            ("bond_mode", OPT_STR),
            ("lacp", OPT_STR),
            ("bond_updelay", INT),
            ("bond_downdelay", INT),
            ("bond_active_slave", OPT_STR),
            ("bond_fake_iface", BOOL),
            ("fake_bridge", BOOL),
            ("protected", BOOL),
            ("status", MAP),
            ("rstp_status", MAP),
            ("rstp_statistics", MAP_INT),
            ("statistics", MAP_INT),
            ("other_config", MAP),
            ("external_ids", MAP),
        ],
    ),
    (
        "Interface",
        &[
            ("name", STR),
            ("type", STR),
            ("options", MAP),
            ("ingress_policing_rate", INT),
            ("ingress_policing_burst", INT),
            ("mac_in_use", OPT_STR),
            ("mac", OPT_STR),
            ("ifindex", OPT_INT),
            ("ofport", OPT_INT),
            ("ofport_request", OPT_INT),
            ("bfd", MAP),
            ("bfd_status", MAP),
            ("cfm_mpid", OPT_INT),
            ("lacp_current", OPT_BOOL),
            ("admin_state", OPT_STR),
            ("link_state", OPT_STR),
            ("link_resets", OPT_INT),
            ("link_speed", OPT_INT),
            ("duplex", OPT_STR),
            ("mtu", OPT_INT),
            ("mtu_request", OPT_INT),
            ("error", OPT_STR),
            ("status", MAP),
            ("statistics", MAP_INT),
            ("lldp", MAP),
            ("other_config", MAP),
            ("external_ids", MAP),
        ],
    ),
    (
        "Controller",
        &[
            ("target", STR),
            ("type", OPT_STR),
            ("max_backoff", OPT_INT),
            ("inactivity_probe", OPT_INT),
            ("connection_mode", OPT_STR),
            ("local_ip", OPT_STR),
            ("local_netmask", OPT_STR),
            ("local_gateway", OPT_STR),
            ("enable_async_messages", OPT_BOOL),
            ("controller_queue_size", OPT_INT),
            ("controller_rate_limit", OPT_INT),
            ("controller_burst_limit", OPT_INT),
            ("is_connected", BOOL),
            ("role", OPT_STR),
            ("status", MAP),
            ("other_config", MAP),
            ("external_ids", MAP),
        ],
    ),
    (
        "Manager",
        &[
            ("target", STR),
            ("max_backoff", OPT_INT),
            ("inactivity_probe", OPT_INT),
            ("connection_mode", OPT_STR),
            ("is_connected", BOOL),
            ("status", MAP),
            ("other_config", MAP),
            ("external_ids", MAP),
        ],
    ),
    (
        "Flow_Table",
        &[
            ("name", OPT_STR),
            ("flow_limit", OPT_INT),
            ("overflow_policy", OPT_STR),
            ("groups", SET_STR),
            ("prefixes", SET_STR),
            ("external_ids", MAP),
        ],
    ),
    (
        "SSL",
        &[
            ("private_key", STR),
            ("certificate", STR),
            ("ca_cert", STR),
            ("bootstrap_ca_cert", BOOL),
            ("external_ids", MAP),
        ],
    ),
];

const OVN_NB: &[(&str, Columns<'static>)] = &[
    (
        "NB_Global",
        &[
            ("name", STR),
            ("nb_cfg", INT),
            ("sb_cfg", INT),
            ("hv_cfg", INT),
            ("connections", SET_UUID),
            ("ssl", OPT_UUID),
            ("options", MAP),
            ("ipsec", BOOL),
            ("external_ids", MAP),
        ],
    ),
    (
        "Logical_Switch",
        &[
            ("name", STR),
            ("ports", SET_UUID),
            ("acls", SET_UUID),
            ("qos_rules", SET_UUID),
            ("load_balancer", SET_UUID),
            ("load_balancer_group", SET_UUID),
            ("dns_records", SET_UUID),
            ("forwarding_groups", SET_UUID),
            ("copp", OPT_UUID),
            ("other_config", MAP),
            ("external_ids", MAP),
        ],
    ),
    (
        "Logical_Switch_Port",
        &[
            ("name", STR),
            ("type", STR),
            ("options", MAP),
            ("parent_name", OPT_STR),
            ("tag_request", OPT_INT),
            ("tag", OPT_INT),
            ("addresses", SET_STR),
            ("dynamic_addresses", OPT_STR),
            ("port_security", SET_STR),
            ("up", OPT_BOOL),
            ("enabled", OPT_BOOL),
            ("dhcpv4_options", OPT_UUID),
            ("dhcpv6_options", OPT_UUID),
            ("ha_chassis_group", OPT_UUID),
            ("mirror_rules", SET_UUID),
            ("external_ids", MAP),
        ],
    ),
    (
        "Logical_Router",
        &[
            ("name", STR),
            ("ports", SET_UUID),
            ("static_routes", SET_UUID),
            ("policies", SET_UUID),
            ("enabled", OPT_BOOL),
            ("nat", SET_UUID),
            ("load_balancer", SET_UUID),
            ("load_balancer_group", SET_UUID),
            ("copp", OPT_UUID),
            ("options", MAP),
            ("external_ids", MAP),
        ],
    ),
    (
        "Logical_Router_Port",
        &[
            ("name", STR),
            ("mac", STR),
            ("networks", SET_STR),
            ("peer", OPT_STR),
            ("enabled", OPT_BOOL),
            ("gateway_chassis", SET_UUID),
            ("options", MAP),
            ("external_ids", MAP),
        ],
    ),
    (
        "ACL",
        &[
            ("name", OPT_STR),
            ("priority", INT),
            ("direction", STR),
            ("match", STR),
            ("action", STR),
            ("log", BOOL),
            ("severity", OPT_STR),
            ("meter", OPT_STR),
            ("label", INT),
            ("tier", INT),
            ("options", MAP),
            ("external_ids", MAP),
        ],
    ),
    (
        "Load_Balancer",
        &[
            ("name", STR),
            ("vips", MAP),
            ("protocol", OPT_STR),
            ("health_check", SET_UUID),
            ("ip_port_mappings", MAP),
            ("selection_fields", SET_STR),
            ("options", MAP),
            ("external_ids", MAP),
        ],
    ),
    (
        "NAT",
        &[
            ("type", STR),
            ("external_ip", STR),
            ("external_mac", OPT_STR),
            ("external_port_range", STR),
            ("logical_ip", STR),
            ("logical_port", OPT_STR),
            ("allowed_ext_ips", OPT_UUID),
            ("exempted_ext_ips", OPT_UUID),
            ("gateway_port", OPT_UUID),
            ("options", MAP),
            ("external_ids", MAP),
        ],
    ),
    (
        "Port_Group",
        &[
            ("name", STR),
            ("ports", SET_UUID),
            ("acls", SET_UUID),
            ("external_ids", MAP),
        ],
    ),
    (
        "Address_Set",
        &[("name", STR), ("addresses", SET_STR), ("external_ids", MAP)],
    ),
    (
        "QoS",
        &[
            ("priority", INT),
            ("direction", STR),
            ("match", STR),
            ("action", MAP_INT),
            ("bandwidth", MAP_INT),
            ("external_ids", MAP),
        ],
    ),
    (
        "Meter",
        &[
            ("name", STR),
            ("unit", STR),
            ("bands", REFS1),
            ("fair", OPT_BOOL),
            ("external_ids", MAP),
        ],
    ),
    (
        "Meter_Band",
        &[
            ("action", STR),
            ("rate", INT),
            ("burst_size", INT),
            ("external_ids", MAP),
        ],
    ),
];

const OVN_SB: &[(&str, Columns<'static>)] = &[
    (
        "SB_Global",
        &[
            ("nb_cfg", INT),
            ("connections", SET_UUID),
            ("ssl", OPT_UUID),
            ("options", MAP),
            ("ipsec", BOOL),
            ("external_ids", MAP),
        ],
    ),
    (
        "Chassis",
        &[
            ("name", STR),
            ("hostname", STR),
            ("encaps", REFS1),
            ("vtep_logical_switches", SET_STR),
            ("nb_cfg", INT),
            ("transport_zones", SET_STR),
            ("other_config", MAP),
            ("external_ids", MAP),
        ],
    ),
    (
        "Encap",
        &[
            ("type", STR),
            ("options", MAP),
            ("ip", STR),
            ("chassis_name", STR),
        ],
    ),
    (
        "Datapath_Binding",
        &[
            ("tunnel_key", INT),
            ("load_balancers", SET_UUID),
            ("external_ids", MAP),
        ],
    ),
    (
        "Port_Binding",
        &[
            ("logical_port", STR),
            ("type", STR),
            ("options", MAP),
            ("datapath", UUID),
            ("tunnel_key", INT),
            ("parent_port", OPT_STR),
            ("tag", OPT_INT),
            ("chassis", OPT_UUID),
            ("additional_chassis", SET_UUID),
            ("encap", OPT_UUID),
            ("gateway_chassis", SET_UUID),
            ("ha_chassis_group", OPT_UUID),
            ("requested_chassis", OPT_UUID),
            ("mac", SET_STR),
            ("port_security", SET_STR),
            ("nat_addresses", SET_STR),
            ("up", OPT_BOOL),
            ("virtual_parent", OPT_STR),
            ("external_ids", MAP),
        ],
    ),
    (
        "Logical_Flow",
        &[
            ("logical_datapath", OPT_UUID),
            ("logical_dp_group", OPT_UUID),
            ("pipeline", STR),
            ("table_id", INT),
            ("priority", INT),
            ("match", STR),
            ("actions", STR),
            ("controller_meter", OPT_STR),
            ("tags", MAP),
            ("external_ids", MAP),
        ],
    ),
    (
        "MAC_Binding",
        &[
            ("logical_port", STR),
            ("ip", STR),
            ("mac", STR),
            ("datapath", UUID),
            ("timestamp", INT),
        ],
    ),
    (
        "Meter",
        &[("name", STR), ("unit", STR), ("bands", REFS1)],
    ),
    (
        "Meter_Band",
        &[("action", STR), ("rate", INT), ("burst_size", INT)],
    ),
    (
        "FDB",
        &[
            ("mac", STR),
            ("dp_key", INT),
            ("port_key", INT),
            ("timestamp", INT),
        ],
    ),
];

const OVN_IC_NB: &[(&str, Columns<'static>)] = &[
    (
        "IC_NB_Global",
        &[
            ("connections", SET_UUID),
            ("ssl", OPT_UUID),
            ("options", MAP),
            ("external_ids", MAP),
        ],
    ),
    (
        "Transit_Switch",
        &[("name", STR), ("other_config", MAP), ("external_ids", MAP)],
    ),
    (
        "Connection",
        &[
            ("target", STR),
            ("max_backoff", OPT_INT),
            ("inactivity_probe", OPT_INT),
            ("is_connected", BOOL),
            ("status", MAP),
            ("other_config", MAP),
            ("external_ids", MAP),
        ],
    ),
    (
        "SSL",
        &[
            ("private_key", STR),
            ("certificate", STR),
            ("ca_cert", STR),
            ("bootstrap_ca_cert", BOOL),
            ("ssl_protocols", STR),
            ("ssl_ciphers", STR),
            ("external_ids", MAP),
        ],
    ),
];

const OVN_IC_SB: &[(&str, Columns<'static>)] = &[
    (
        "IC_SB_Global",
        &[
            ("connections", SET_UUID),
            ("ssl", OPT_UUID),
            ("options", MAP),
            ("external_ids", MAP),
        ],
    ),
    ("Availability_Zone", &[("name", STR)]),
    (
        "Gateway",
        &[
            ("name", STR),
            ("availability_zone", UUID),
            ("hostname", STR),
            ("encaps", REFS1),
            ("external_ids", MAP),
        ],
    ),
    (
        "Encap",
        &[
            ("type", STR),
            ("options", MAP),
            ("ip", STR),
            ("gateway_name", STR),
        ],
    ),
    (
        "Datapath_Binding",
        &[
            ("transit_switch", STR),
            ("tunnel_key", INT),
            ("external_ids", MAP),
        ],
    ),
    (
        "Port_Binding",
        &[
            ("logical_port", STR),
            ("transit_switch", STR),
            ("availability_zone", UUID),
            ("encap", OPT_UUID),
            ("gateway", STR),
            ("tunnel_key", INT),
            ("address", STR),
            ("external_ids", MAP),
        ],
    ),
    (
        "Route",
        &[
            ("transit_switch", STR),
            ("availability_zone", UUID),
            ("route_table", STR),
            ("ip_prefix", STR),
            ("nexthop", STR),
            ("origin", STR),
            ("external_ids", MAP),
        ],
    ),
    (
        "Connection",
        &[
            ("target", STR),
            ("max_backoff", OPT_INT),
            ("inactivity_probe", OPT_INT),
            ("is_connected", BOOL),
            ("status", MAP),
            ("other_config", MAP),
            ("external_ids", MAP),
        ],
    ),
    (
        "SSL",
        &[
            ("private_key", STR),
            ("certificate", STR),
            ("ca_cert", STR),
            ("bootstrap_ca_cert", BOOL),
            ("ssl_protocols", STR),
            ("ssl_ciphers", STR),
            ("external_ids", MAP),
        ],
    ),
];
