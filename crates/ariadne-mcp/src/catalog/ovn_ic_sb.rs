//! OVN Interconnection Southbound database.

use super::{Link, ToolSpec, by_parent_name, by_self};

pub(super) const TOOLS: &[ToolSpec] = &[
    ToolSpec {
        name: "list_availability_zones",
        description: "List all availability zones in OVN IC SB database. Availability zones represent different regions.",
        table: "Availability_Zone",
        collection: "availability_zones",
        context: "Availability zones represent different geographical or logical regions in OVN Interconnection.",
        filter: by_self("name_filter", "availability zone"),
    },
    ToolSpec {
        name: "list_datapath_bindings",
        description: "List all datapath bindings in OVN IC SB database. Datapath bindings represent physical or virtual switches.",
        table: "Datapath_Binding",
        collection: "datapath_bindings",
        context: "Datapath bindings represent the physical or virtual switches that implement transit switches in OVN Interconnection.",
        // A datapath is named after the transit switch it implements.
        filter: by_self("name_filter", "datapath"),
    },
    ToolSpec {
        name: "list_port_bindings",
        description: "List all port bindings in OVN IC SB database. Port bindings map logical ports to physical ports.",
        table: "Port_Binding",
        collection: "port_bindings",
        context: "Port bindings map logical ports to physical ports on datapaths in OVN Interconnection.",
        filter: by_parent_name(
            "datapath_filter",
            "datapath",
            "Datapath_Binding",
            Link::reference_by("transit_switch", "transit_switch"),
        ),
    },
    ToolSpec {
        name: "list_gateways",
        description: "List all gateways in OVN IC SB database. Gateways provide routing between availability zones.",
        table: "Gateway",
        collection: "gateways",
        context: "Gateways provide routing and connectivity between availability zones in OVN Interconnection.",
        filter: by_parent_name(
            "zone_filter",
            "availability zone",
            "Availability_Zone",
            Link::reference("availability_zone"),
        ),
    },
    ToolSpec {
        name: "list_routes",
        description: "List all routes in OVN IC SB database. Routes define network paths between availability zones.",
        table: "Route",
        collection: "routes",
        context: "Routes define the network paths between availability zones in OVN Interconnection.",
        filter: by_parent_name(
            "gateway_filter",
            "gateway",
            "Gateway",
            Link::reference_by("availability_zone", "availability_zone"),
        ),
    },
    ToolSpec {
        name: "list_encaps",
        description: "List all encapsulations in OVN IC SB database. Encapsulations define tunneling protocols for gateways.",
        table: "Encap",
        collection: "encaps",
        context: "Encapsulations define the tunneling protocols used to connect gateways in OVN Interconnection.",
        filter: by_parent_name("gateway_filter", "gateway", "Gateway", Link::members("encaps")),
    },
    ToolSpec {
        name: "list_ic_sb_globals",
        description: "List all IC SB globals in OVN IC SB database. IC SB globals contain global configuration settings.",
        table: "IC_SB_Global",
        collection: "ic_sb_globals",
        context: "IC SB Globals contain global configuration settings for OVN Interconnection Southbound database.",
        filter: None,
    },
];
