//! OVN Interconnection Northbound database.

use super::{ToolSpec, by_self};

pub(super) const TOOLS: &[ToolSpec] = &[
    ToolSpec {
        name: "list_transit_switches",
        description: "List all transit switches in OVN IC NB database. Transit switches connect different availability zones.",
        table: "Transit_Switch",
        collection: "transit_switches",
        context: "Transit switches are logical switches that connect different availability zones in OVN Interconnection.",
        filter: by_self("name_filter", "transit switch"),
    },
    ToolSpec {
        name: "list_ic_nb_globals",
        description: "List all IC NB globals in OVN IC NB database. IC NB globals contain global configuration settings.",
        table: "IC_NB_Global",
        collection: "ic_nb_globals",
        context: "IC NB Globals contain global configuration settings for OVN Interconnection Northbound database.",
        filter: None,
    },
    ToolSpec {
        name: "list_connections",
        description: "List all connections in OVN IC NB database. Connections define network links between availability zones.",
        table: "Connection",
        collection: "connections",
        context: "Connections define the network connections between different availability zones in OVN Interconnection.",
        filter: None,
    },
    ToolSpec {
        name: "list_ssl_configs",
        description: "List all SSL configurations in OVN IC NB database. SSL configs define TLS settings for secure connections.",
        table: "SSL",
        collection: "ssl_configs",
        context: "SSL configurations define TLS settings for secure connections in OVN Interconnection.",
        filter: None,
    },
];
