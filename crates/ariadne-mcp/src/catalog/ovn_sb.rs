//! OVN Southbound database.
//!
//! Southbound datapaths carry no name column; the northbound switch or
//! router name is copied into `external_ids:name`, so datapath filters look
//! there.

use super::{Link, ToolSpec, by_parent_external_id, by_parent_name, by_self};

const DATAPATH: &str = "Datapath_Binding";

pub(super) const TOOLS: &[ToolSpec] = &[
    ToolSpec {
        name: "list_datapath_bindings",
        description: "List all datapath bindings in OVN SB database. Datapath bindings represent physical or virtual switches.",
        table: DATAPATH,
        collection: "datapath_bindings",
        context: "Datapath bindings represent the physical or virtual switches that implement logical switches and routers.",
        filter: by_self("name_filter", "datapath"),
    },
    ToolSpec {
        name: "list_port_bindings",
        description: "List all port bindings in OVN SB database. Port bindings map logical ports to physical ports.",
        table: "Port_Binding",
        collection: "port_bindings",
        context: "Port bindings map logical ports to physical ports on datapaths. They represent the actual network connections.",
        filter: by_parent_external_id("datapath_filter", "datapath", DATAPATH, Link::reference("datapath")),
    },
    ToolSpec {
        name: "list_chassis",
        description: "List all chassis in OVN SB database. Chassis represent physical or virtual machines that host OVN components.",
        table: "Chassis",
        collection: "chassis",
        context: "Chassis represent physical or virtual machines that host OVN components and can run datapaths.",
        filter: by_self("name_filter", "chassis"),
    },
    ToolSpec {
        name: "list_logical_flows",
        description: "List all logical flows in OVN SB database. Logical flows represent forwarding rules translated to OpenFlow flows.",
        table: "Logical_Flow",
        collection: "logical_flows",
        context: "Logical flows represent the forwarding rules that are translated into OpenFlow flows on datapaths.",
        filter: by_parent_external_id(
            "datapath_filter",
            "datapath",
            DATAPATH,
            Link::reference("logical_datapath"),
        ),
    },
    ToolSpec {
        name: "list_mac_bindings",
        description: "List all MAC bindings in OVN SB database. MAC bindings map MAC addresses to logical ports and IP addresses.",
        table: "MAC_Binding",
        collection: "mac_bindings",
        context: "MAC bindings map MAC addresses to logical ports and IP addresses. They are used for ARP resolution.",
        filter: by_parent_external_id("datapath_filter", "datapath", DATAPATH, Link::reference("datapath")),
    },
    ToolSpec {
        name: "list_encaps",
        description: "List all encapsulations in OVN SB database. Encapsulations define tunneling protocols for chassis connections.",
        table: "Encap",
        collection: "encaps",
        context: "Encapsulations define the tunneling protocols used to connect chassis in an OVN deployment.",
        filter: by_parent_name("chassis_filter", "chassis", "Chassis", Link::members("encaps")),
    },
    ToolSpec {
        name: "list_meters",
        description: "List all meters in OVN SB database. Meters provide rate limiting and policing capabilities.",
        table: "Meter",
        collection: "meters",
        context: "Meters provide rate limiting and policing capabilities for traffic flows on datapaths.",
        filter: by_self("name_filter", "meter"),
    },
    ToolSpec {
        name: "list_fdb_entries",
        description: "List all FDB entries in OVN SB database. FDB entries map MAC addresses to ports for Layer 2 forwarding.",
        table: "FDB",
        collection: "fdb_entries",
        context: "FDB (Forwarding Database) entries map MAC addresses to ports on datapaths for Layer 2 forwarding.",
        // FDB rows key their datapath by tunnel key, not by row reference.
        filter: by_parent_external_id(
            "datapath_filter",
            "datapath",
            DATAPATH,
            Link::reference_by("dp_key", "tunnel_key"),
        ),
    },
];
