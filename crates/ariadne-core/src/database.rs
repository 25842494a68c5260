//! The OVSDB databases Ariadne can serve.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the five OVSDB databases. Each server process fronts exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Database {
    /// Open vSwitch configuration database (`Open_vSwitch`).
    #[serde(rename = "vswitch")]
    Vswitch,
    /// OVN Northbound database.
    #[serde(rename = "ovn-nb")]
    OvnNorthbound,
    /// OVN Southbound database.
    #[serde(rename = "ovn-sb")]
    OvnSouthbound,
    /// OVN Interconnection Northbound database.
    #[serde(rename = "ovn-ic-nb")]
    OvnIcNorthbound,
    /// OVN Interconnection Southbound database.
    #[serde(rename = "ovn-ic-sb")]
    OvnIcSouthbound,
}

impl Database {
    pub const ALL: [Database; 5] = [
        Database::Vswitch,
        Database::OvnNorthbound,
        Database::OvnSouthbound,
        Database::OvnIcNorthbound,
        Database::OvnIcSouthbound,
    ];

    /// Short identifier used in config files and on the command line.
    pub fn slug(&self) -> &'static str {
        match self {
            Database::Vswitch => "vswitch",
            Database::OvnNorthbound => "ovn-nb",
            Database::OvnSouthbound => "ovn-sb",
            Database::OvnIcNorthbound => "ovn-ic-nb",
            Database::OvnIcSouthbound => "ovn-ic-sb",
        }
    }

    /// Database name as it appears on the OVSDB wire.
    pub fn db_name(&self) -> &'static str {
        match self {
            Database::Vswitch => "Open_vSwitch",
            Database::OvnNorthbound => "OVN_Northbound",
            Database::OvnSouthbound => "OVN_Southbound",
            Database::OvnIcNorthbound => "OVN_IC_Northbound",
            Database::OvnIcSouthbound => "OVN_IC_Southbound",
        }
    }

    /// Socket the database server listens on in a stock installation.
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Database::Vswitch => "unix:/var/run/openvswitch/db.sock",
            Database::OvnNorthbound => "unix:/var/run/ovn/ovnnb_db.sock",
            Database::OvnSouthbound => "unix:/var/run/ovn/ovnsb_db.sock",
            Database::OvnIcNorthbound => "unix:/var/run/ovn/ovn_ic_nb_db.sock",
            Database::OvnIcSouthbound => "unix:/var/run/ovn/ovn_ic_sb_db.sock",
        }
    }

    /// HTTP port used when none is configured.
    pub fn default_port(&self) -> u16 {
        match self {
            Database::Vswitch => 8080,
            Database::OvnNorthbound => 8081,
            Database::OvnSouthbound => 8082,
            Database::OvnIcNorthbound => 8083,
            Database::OvnIcSouthbound => 8084,
        }
    }

    /// MCP server name advertised during `initialize`.
    pub fn server_name(&self) -> &'static str {
        match self {
            Database::Vswitch => "ovs-vswitch-mcp",
            Database::OvnNorthbound => "ovn-nb-mcp",
            Database::OvnSouthbound => "ovn-sb-mcp",
            Database::OvnIcNorthbound => "ovn-ic-nb-mcp",
            Database::OvnIcSouthbound => "ovn-ic-sb-mcp",
        }
    }

    /// Human-readable server title.
    pub fn server_title(&self) -> &'static str {
        match self {
            Database::Vswitch => "OVS vSwitch MCP Server",
            Database::OvnNorthbound => "OVN Northbound MCP Server",
            Database::OvnSouthbound => "OVN Southbound MCP Server",
            Database::OvnIcNorthbound => "OVN IC Northbound MCP Server",
            Database::OvnIcSouthbound => "OVN IC Southbound MCP Server",
        }
    }

    /// Column used as a table's human-facing name when it is not called `name`.
    pub fn name_column_override(&self, table: &str) -> Option<&'static str> {
        match (self, table) {
            (Database::OvnIcSouthbound, "Datapath_Binding") => Some("transit_switch"),
            _ => None,
        }
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Returned when a database identifier is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown database '{0}' (expected one of: vswitch, ovn-nb, ovn-sb, ovn-ic-nb, ovn-ic-sb)")]
pub struct UnknownDatabase(pub String);

impl FromStr for Database {
    type Err = UnknownDatabase;

    /// Accepts either the slug or the wire name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Database::ALL
            .into_iter()
            .find(|db| db.slug().eq_ignore_ascii_case(s) || db.db_name() == s)
            .ok_or_else(|| UnknownDatabase(s.to_string()))
    }
}
