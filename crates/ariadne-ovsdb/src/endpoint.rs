//! OVSDB endpoint addresses.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Where an OVSDB server listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `unix:<path>`
    Unix(PathBuf),
    /// `tcp:<host>:<port>`
    Tcp { host: String, port: u16 },
}

/// Errors raised while parsing an endpoint string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EndpointError {
    #[error("endpoint '{0}' has no scheme (expected unix:<path> or tcp:<host>:<port>)")]
    MissingScheme(String),

    #[error("unsupported endpoint scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("invalid endpoint '{endpoint}': {reason}")]
    Invalid { endpoint: String, reason: String },
}

impl FromStr for Endpoint {
    type Err = EndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (scheme, rest) = s
            .split_once(':')
            .ok_or_else(|| EndpointError::MissingScheme(s.to_string()))?;

        match scheme {
            "unix" => {
                if rest.is_empty() {
                    return Err(EndpointError::Invalid {
                        endpoint: s.to_string(),
                        reason: "empty socket path".to_string(),
                    });
                }
                Ok(Endpoint::Unix(PathBuf::from(rest)))
            }
            "tcp" => {
                // rsplit so bracketed IPv6 hosts keep their colons
                let (host, port) = rest.rsplit_once(':').ok_or_else(|| EndpointError::Invalid {
                    endpoint: s.to_string(),
                    reason: "missing port".to_string(),
                })?;
                let port = port.parse::<u16>().map_err(|e| EndpointError::Invalid {
                    endpoint: s.to_string(),
                    reason: format!("bad port: {e}"),
                })?;
                let host = host.trim_start_matches('[').trim_end_matches(']');
                if host.is_empty() {
                    return Err(EndpointError::Invalid {
                        endpoint: s.to_string(),
                        reason: "empty host".to_string(),
                    });
                }
                Ok(Endpoint::Tcp {
                    host: host.to_string(),
                    port,
                })
            }
            other => Err(EndpointError::UnsupportedScheme(other.to_string())),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Unix(path) => write!(f, "unix:{}", path.display()),
            Endpoint::Tcp { host, port } if host.contains(':') => write!(f, "tcp:[{host}]:{port}"),
            Endpoint::Tcp { host, port } => write!(f, "tcp:{host}:{port}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unix() {
        let ep: Endpoint = "unix:/var/run/ovn/ovnsb_db.sock".parse().unwrap();
        assert_eq!(ep, Endpoint::Unix(PathBuf::from("/var/run/ovn/ovnsb_db.sock")));
        assert_eq!(ep.to_string(), "unix:/var/run/ovn/ovnsb_db.sock");
    }

    #[test]
    fn test_parse_tcp() {
        let ep: Endpoint = "tcp:192.0.2.10:6641".parse().unwrap();
        assert_eq!(
            ep,
            Endpoint::Tcp {
                host: "192.0.2.10".to_string(),
                port: 6641
            }
        );

        let v6: Endpoint = "tcp:[::1]:6642".parse().unwrap();
        assert_eq!(v6.to_string(), "tcp:[::1]:6642");
    }

    #[test]
    fn test_rejects_ssl_and_garbage() {
        assert_eq!(
            "ssl:10.0.0.1:6642".parse::<Endpoint>(),
            Err(EndpointError::UnsupportedScheme("ssl".to_string()))
        );
        assert!(matches!(
            "/var/run/db.sock".parse::<Endpoint>(),
            Err(EndpointError::MissingScheme(_))
        ));
        assert!(matches!(
            "tcp:localhost".parse::<Endpoint>(),
            Err(EndpointError::Invalid { .. })
        ));
        assert!(matches!(
            "tcp:localhost:99999".parse::<Endpoint>(),
            Err(EndpointError::Invalid { .. })
        ));
    }
}
