//! OVN Northbound database.

use super::{Link, ToolSpec, by_parent_name, by_self};

pub(super) const TOOLS: &[ToolSpec] = &[
    ToolSpec {
        name: "list_logical_switches",
        description: "List all logical switches in OVN NB database. Logical switches are the primary networking entities that connect logical ports.",
        table: "Logical_Switch",
        collection: "logical_switches",
        context: "Logical switches are the primary networking entities in OVN that connect logical ports. They represent virtual Layer 2 networks.",
        filter: by_self("name_filter", "logical switch"),
    },
    ToolSpec {
        name: "list_logical_switch_ports",
        description: "List all logical switch ports in OVN NB database. Logical switch ports connect to logical switches and represent network endpoints.",
        table: "Logical_Switch_Port",
        collection: "logical_switch_ports",
        context: "Logical switch ports connect to logical switches and represent network endpoints. Each port belongs to a logical switch and can have various configuration options.",
        filter: by_parent_name("switch_filter", "logical switch", "Logical_Switch", Link::members("ports")),
    },
    ToolSpec {
        name: "list_logical_routers",
        description: "List all logical routers in OVN NB database. Logical routers provide Layer 3 routing between logical switches.",
        table: "Logical_Router",
        collection: "logical_routers",
        context: "Logical routers provide Layer 3 routing between logical switches. They handle routing decisions and can have multiple logical router ports.",
        filter: by_self("name_filter", "logical router"),
    },
    ToolSpec {
        name: "list_acls",
        description: "List all ACLs in OVN NB database. ACLs define security policies for logical switches.",
        table: "ACL",
        collection: "acls",
        context: "ACLs (Access Control Lists) define security policies for logical switches. They control which traffic is allowed or denied based on various criteria.",
        filter: by_parent_name("switch_filter", "logical switch", "Logical_Switch", Link::members("acls")),
    },
    ToolSpec {
        name: "list_load_balancers",
        description: "List all load balancers in OVN NB database. Load balancers distribute incoming traffic across multiple backend servers.",
        table: "Load_Balancer",
        collection: "load_balancers",
        context: "Load balancers distribute incoming traffic across multiple backend servers. They provide high availability and scalability for services.",
        filter: by_parent_name(
            "switch_filter",
            "logical switch",
            "Logical_Switch",
            Link::members("load_balancer"),
        ),
    },
    ToolSpec {
        name: "list_nat_rules",
        description: "List all NAT rules in OVN NB database. NAT rules modify packet headers to change source or destination addresses.",
        table: "NAT",
        collection: "nat_rules",
        context: "NAT (Network Address Translation) rules modify packet headers to change source or destination addresses. They are used for network address translation.",
        filter: by_parent_name("router_filter", "logical router", "Logical_Router", Link::members("nat")),
    },
    ToolSpec {
        name: "list_port_groups",
        description: "List all port groups in OVN NB database. Port groups are collections of logical switch ports.",
        table: "Port_Group",
        collection: "port_groups",
        context: "Port groups are collections of logical switch ports that can be referenced together for ACLs and other policies.",
        filter: by_self("name_filter", "port group"),
    },
    ToolSpec {
        name: "list_address_sets",
        description: "List all address sets in OVN NB database. Address sets are collections of IP addresses.",
        table: "Address_Set",
        collection: "address_sets",
        context: "Address sets are collections of IP addresses that can be referenced together in ACLs and other policies.",
        filter: by_self("name_filter", "address set"),
    },
    ToolSpec {
        name: "list_qos_rules",
        description: "List all QoS rules in OVN NB database. QoS rules define bandwidth and traffic shaping policies.",
        table: "QoS",
        collection: "qos_rules",
        context: "QoS (Quality of Service) rules define bandwidth and traffic shaping policies for logical switch ports.",
        filter: by_parent_name("switch_filter", "logical switch", "Logical_Switch", Link::members("qos_rules")),
    },
    ToolSpec {
        name: "list_meters",
        description: "List all meters in OVN NB database. Meters provide rate limiting and policing capabilities.",
        table: "Meter",
        collection: "meters",
        context: "Meters provide rate limiting and policing capabilities for traffic flows. They can be used to enforce bandwidth limits.",
        filter: by_self("name_filter", "meter"),
    },
];
