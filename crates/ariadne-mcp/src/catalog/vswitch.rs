//! Open vSwitch configuration database.

use super::{Link, ToolSpec, by_parent_name, by_self};

pub(super) const TOOLS: &[ToolSpec] = &[
    ToolSpec {
        name: "list_bridges",
        description: "List all Open vSwitch bridges. Bridges are the main configuration entities in Open vSwitch that contain ports and interfaces.",
        table: "Bridge",
        collection: "bridges",
        context: "Bridges are the main configuration entities in Open vSwitch that contain ports and interfaces. Each bridge represents a virtual switch that can have multiple ports.",
        filter: by_self("name_filter", "bridge"),
    },
    ToolSpec {
        name: "list_ports",
        description: "List all ports in Open vSwitch bridges. Ports are logical entities that group interfaces together within a bridge.",
        table: "Port",
        collection: "ports",
        context: "Ports are logical entities that group interfaces together within a bridge. Each port can have multiple interfaces and belongs to a specific bridge.",
        filter: None,
    },
    ToolSpec {
        name: "list_interfaces",
        description: "List all interfaces in Open vSwitch. Interfaces represent the actual network connections and can be physical or virtual.",
        table: "Interface",
        collection: "interfaces",
        context: "Interfaces represent the actual network connections and can be physical or virtual. Each interface belongs to a port and can have various configuration options.",
        filter: by_parent_name("port_filter", "port", "Port", Link::members("interfaces")),
    },
    ToolSpec {
        name: "list_managers",
        description: "List all OpenFlow managers in Open vSwitch. Managers define connections to OpenFlow controllers.",
        table: "Manager",
        collection: "managers",
        context: "Managers define connections to OpenFlow controllers. Each manager specifies how Open vSwitch connects to external OpenFlow controllers for network control.",
        filter: None,
    },
    ToolSpec {
        name: "list_controllers",
        description: "List all OpenFlow controllers in Open vSwitch. Controllers define connections to OpenFlow controllers.",
        table: "Controller",
        collection: "controllers",
        context: "Controllers define connections to OpenFlow controllers. Each controller specifies how Open vSwitch connects to external OpenFlow controllers for network control.",
        filter: None,
    },
    ToolSpec {
        name: "list_flow_tables",
        description: "List all flow tables in Open vSwitch. Flow tables contain the forwarding rules for network traffic.",
        table: "Flow_Table",
        collection: "flow_tables",
        context: "Flow tables contain the forwarding rules for network traffic. Each flow table belongs to a bridge and contains multiple flow entries that define how packets should be processed.",
        // Bridge.flow_tables maps table ids to Flow_Table rows.
        filter: by_parent_name("bridge_filter", "bridge", "Bridge", Link::members("flow_tables")),
    },
    ToolSpec {
        name: "list_ssl_configs",
        description: "List all SSL configurations in Open vSwitch. SSL configurations define TLS settings for secure connections.",
        table: "SSL",
        collection: "ssl_configs",
        context: "SSL configurations define TLS settings for secure connections. These configurations are used for secure communication with OpenFlow controllers and other external services.",
        filter: None,
    },
];
