//! `[serve]` section configuration.
//!
//! Contains settings for the stripping HTTP server.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! interface = "127.0.0.1"        # Network interface (127.0.0.1 = localhost only)
//! port = 5288                    # HTTP port number
//! root = "public"                # Served directory (default: build.input)
//! admin_prefixes = ["/wp-admin"] # URL prefixes never rewritten
//! ```
//!
//! Use `interface = "0.0.0.0"` to make the server accessible from LAN.

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

/// Server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind.
    /// - `127.0.0.1` (default): localhost only
    /// - `0.0.0.0`: all interfaces (LAN accessible)
    pub interface: IpAddr,

    /// HTTP port number.
    pub port: u16,

    /// Directory to serve. Falls back to `build.input`.
    pub root: Option<PathBuf>,

    /// URL path prefixes treated as admin screens.
    pub admin_prefixes: Vec<String>,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 5288,
            root: None,
            admin_prefixes: vec!["/wp-admin".into()],
        }
    }
}

impl ServeConfig {
    pub const FIELD_ADMIN_PREFIXES: FieldPath = FieldPath::new("serve.admin_prefixes");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for prefix in &self.admin_prefixes {
            if !prefix.starts_with('/') {
                diag.error(
                    Self::FIELD_ADMIN_PREFIXES,
                    format!("`{prefix}` is not an absolute URL path"),
                )
                .with_hint(format!("use \"/{}\"", prefix.trim_start_matches('/')));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use std::net::Ipv6Addr;

    #[test]
    fn test_serve_config() {
        let config = test_parse_config(
            "[serve]\ninterface = \"0.0.0.0\"\nport = 8080\nroot = \"www\"",
        );

        assert_eq!(
            config.serve.interface,
            IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0))
        );
        assert_eq!(config.serve.port, 8080);
        assert_eq!(config.serve.root, Some(PathBuf::from("www")));
    }

    #[test]
    fn test_serve_config_defaults() {
        let config = test_parse_config("");

        assert_eq!(
            config.serve.interface,
            IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
        );
        assert_eq!(config.serve.port, 5288);
        assert!(config.serve.root.is_none());
        assert_eq!(config.serve.admin_prefixes, ["/wp-admin"]);
    }

    #[test]
    fn test_serve_config_ipv6() {
        let config = test_parse_config("[serve]\ninterface = \"::1\"");
        assert_eq!(
            config.serve.interface,
            IpAddr::V6(Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 1))
        );
    }

    #[test]
    fn test_serve_config_partial_override() {
        let config = test_parse_config("[serve]\nport = 3000");

        // port is overridden
        assert_eq!(config.serve.port, 3000);
        // interface uses default
        assert_eq!(
            config.serve.interface,
            IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
        );
    }

    #[test]
    fn test_validate_admin_prefix() {
        let serve = ServeConfig {
            admin_prefixes: vec!["/wp-admin".into(), "dashboard".into()],
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        serve.validate(&mut diag);
        assert_eq!(diag.len(), 1);
        assert_eq!(diag.errors()[0].hint.as_deref(), Some("use \"/dashboard\""));
    }
}
