// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Driver Configuration Types
//
// Settings for one node plugin instance:
// - CSI driver name reported through the Identity service
// - gRPC endpoint (Unix domain socket or TCP)
// - Optional node id override (defaults to the hostname)
// - Binaries used to mount and unmount shares

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_DRIVER_NAME: &str = "org.cloudfoundry.smb";
pub const DEFAULT_ENDPOINT: &str = "unix:///csi/csi.sock";

pub const CONFIG_PATH_ENV: &str = "SMB_CSI_CONFIG_PATH";
pub const ENDPOINT_ENV: &str = "SMB_CSI_ENDPOINT";
pub const NODE_ID_ENV: &str = "SMB_CSI_NODE_ID";
pub const DRIVER_NAME_ENV: &str = "SMB_CSI_DRIVER_NAME";

#[cfg(unix)]
const SYSTEM_CONFIG_PATH: &str = "/etc/smb-csi/config.yaml";

/// Node plugin configuration (YAML)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Name reported by `GetPluginInfo`; must match the CSIDriver object
    pub driver_name: String,

    /// `unix:///path/to/socket` or `tcp://host:port`
    pub endpoint: String,

    /// Overrides the hostname as the CSI node id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,

    pub mount_binary: String,

    pub umount_binary: String,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            driver_name: DEFAULT_DRIVER_NAME.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            node_id: None,
            mount_binary: "mount".to_string(),
            umount_binary: "umount".to_string(),
        }
    }
}

impl DriverConfig {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Discover configuration file using precedence order
    /// 1. SMB_CSI_CONFIG_PATH environment variable
    /// 2. /etc/smb-csi/config.yaml
    ///
    /// A path that does not exist is skipped, not an error.
    pub fn discover_config() -> Option<PathBuf> {
        Self::discover_config_from(std::env::var(CONFIG_PATH_ENV).ok())
    }

    fn discover_config_from(env_path: Option<String>) -> Option<PathBuf> {
        if let Some(path) = env_path.filter(|p| !p.is_empty()) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
            tracing::debug!("{} points at missing file {:?}, skipping", CONFIG_PATH_ENV, path);
        }

        #[cfg(unix)]
        {
            let system_config = PathBuf::from(SYSTEM_CONFIG_PATH);
            if system_config.exists() {
                return Some(system_config);
            }
        }

        None
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit path must exist and parse
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path).map_err(|e| {
                anyhow::anyhow!("Failed to load config at {:?}: {}", path, e)
            })?;
            config.apply_env_overrides();
            return Ok(config);
        }

        let mut config = match Self::discover_config() {
            Some(config_path) => {
                tracing::info!("Loading configuration from discovered path: {:?}", config_path);
                Self::from_yaml_file(config_path)?
            }
            None => {
                tracing::info!("No configuration file found, using defaults");
                Self::default()
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup; empty values are ignored
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(endpoint) = lookup(ENDPOINT_ENV) {
            tracing::info!("Environment override: {}={}", ENDPOINT_ENV, endpoint);
            self.endpoint = endpoint;
        }
        if let Some(node_id) = lookup(NODE_ID_ENV) {
            tracing::info!("Environment override: {}={}", NODE_ID_ENV, node_id);
            self.node_id = Some(node_id);
        }
        if let Some(driver_name) = lookup(DRIVER_NAME_ENV) {
            tracing::info!("Environment override: {}={}", DRIVER_NAME_ENV, driver_name);
            self.driver_name = driver_name;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.driver_name.is_empty() {
            anyhow::bail!("driver_name cannot be empty");
        }

        if self.mount_binary.is_empty() || self.umount_binary.is_empty() {
            anyhow::bail!("mount_binary and umount_binary cannot be empty");
        }

        if let Some(node_id) = &self.node_id {
            if node_id.is_empty() {
                anyhow::bail!("node_id cannot be empty when set");
            }
        }

        self.endpoint()?;

        Ok(())
    }

    /// Parsed form of [`DriverConfig::endpoint`]
    pub fn endpoint(&self) -> Result<Endpoint, EndpointError> {
        self.endpoint.parse()
    }
}

// ============================================================================
// Endpoint
// ============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EndpointError {
    #[error("Unsupported endpoint scheme in '{0}', expected unix:// or tcp://")]
    UnsupportedScheme(String),

    #[error("Endpoint '{0}' has an empty path")]
    EmptyPath(String),

    #[error("Invalid TCP address in endpoint '{0}'")]
    InvalidAddress(String),
}

/// Where the gRPC server listens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Unix(PathBuf),
    Tcp(SocketAddr),
}

impl FromStr for Endpoint {
    type Err = EndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(path) = s.strip_prefix("unix://") {
            if path.is_empty() {
                return Err(EndpointError::EmptyPath(s.to_string()));
            }
            return Ok(Endpoint::Unix(PathBuf::from(path)));
        }

        if let Some(addr) = s.strip_prefix("tcp://") {
            return addr
                .parse()
                .map(Endpoint::Tcp)
                .map_err(|_| EndpointError::InvalidAddress(s.to_string()));
        }

        Err(EndpointError::UnsupportedScheme(s.to_string()))
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Unix(path) => write!(f, "unix://{}", path.display()),
            Endpoint::Tcp(addr) => write!(f, "tcp://{}", addr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = DriverConfig::default();
        assert_eq!(config.driver_name, "org.cloudfoundry.smb");
        assert_eq!(
            config.endpoint().unwrap(),
            Endpoint::Unix(PathBuf::from("/csi/csi.sock"))
        );
        assert!(config.node_id.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = DriverConfig::from_yaml_str("node_id: worker-1\n").unwrap();
        assert_eq!(config.node_id.as_deref(), Some("worker-1"));
        assert_eq!(config.driver_name, DEFAULT_DRIVER_NAME);
        assert_eq!(config.mount_binary, "mount");
    }

    #[test]
    fn test_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "driver_name: smb.example.com\nendpoint: tcp://127.0.0.1:10000\n",
        )
        .unwrap();

        let config = DriverConfig::load_or_default(Some(path)).unwrap();
        assert_eq!(config.driver_name, "smb.example.com");
        assert_eq!(
            config.endpoint().unwrap(),
            Endpoint::Tcp("127.0.0.1:10000".parse().unwrap())
        );
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let result = DriverConfig::load_or_default(Some(PathBuf::from(
            "/nonexistent/smb-csi/config.yaml",
        )));
        assert!(result.is_err());
    }

    #[test]
    fn test_discovery_skips_missing_env_path() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.yaml");

        let discovered =
            DriverConfig::discover_config_from(Some(missing.to_string_lossy().into_owned()));
        assert_ne!(discovered, Some(missing));
    }

    #[test]
    fn test_discovery_uses_existing_env_path() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, "driver_name: from.env\n").unwrap();

        let discovered =
            DriverConfig::discover_config_from(Some(path.to_string_lossy().into_owned()));
        assert_eq!(discovered, Some(path));
    }

    #[test]
    fn test_overrides() {
        let env = HashMap::from([
            (ENDPOINT_ENV, "tcp://0.0.0.0:9000"),
            (NODE_ID_ENV, "node-a"),
            (DRIVER_NAME_ENV, ""),
        ]);
        let mut config = DriverConfig::default();
        config.apply_overrides_from(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.endpoint, "tcp://0.0.0.0:9000");
        assert_eq!(config.node_id.as_deref(), Some("node-a"));
        assert_eq!(config.driver_name, DEFAULT_DRIVER_NAME);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = DriverConfig::default();
        config.driver_name.clear();
        assert!(config.validate().is_err());

        let mut config = DriverConfig::default();
        config.endpoint = "http://localhost".to_string();
        assert!(config.validate().is_err());

        let mut config = DriverConfig::default();
        config.node_id = Some(String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_endpoint_parsing() {
        assert_eq!(
            "unix:///var/lib/kubelet/plugins/smb/csi.sock".parse::<Endpoint>(),
            Ok(Endpoint::Unix(PathBuf::from("/var/lib/kubelet/plugins/smb/csi.sock")))
        );
        assert_eq!(
            "unix://".parse::<Endpoint>(),
            Err(EndpointError::EmptyPath("unix://".to_string()))
        );
        assert!(matches!(
            "tcp://nope".parse::<Endpoint>(),
            Err(EndpointError::InvalidAddress(_))
        ));
        assert!(matches!(
            "/csi/csi.sock".parse::<Endpoint>(),
            Err(EndpointError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_endpoint_display() {
        let endpoint: Endpoint = "tcp://127.0.0.1:10000".parse().unwrap();
        assert_eq!(endpoint.to_string(), "tcp://127.0.0.1:10000");
    }
}
