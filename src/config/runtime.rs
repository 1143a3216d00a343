//! Runtime configuration read from a configuration tree.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::info;

use super::error::ConfigError;
use super::tree::ConfigTree;
use crate::net::is_valid_ip;

const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0";
const DEFAULT_LISTEN_PORT: u16 = 8765;
const DEFAULT_HEALTHZ_ENDPOINT: &str = "/healthz";
const DEFAULT_SSL_CERTIFICATE: &str = "/etc/bootconf/server.pem";

/// Severity threshold for log output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogLevel {
    Emergency,
    Alert,
    Critical,
    Error,
    Warning,
    Notice,
    #[default]
    Info,
    Debug,
}

impl LogLevel {
    /// Equivalent `tracing_subscriber::EnvFilter` directive.
    pub fn as_filter(self) -> &'static str {
        match self {
            Self::Emergency | Self::Alert | Self::Critical | Self::Error => "error",
            Self::Warning => "warn",
            Self::Notice | Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "emergency" => Self::Emergency,
            "alert" => Self::Alert,
            "critical" => Self::Critical,
            "error" => Self::Error,
            "warning" => Self::Warning,
            "notice" => Self::Notice,
            "info" => Self::Info,
            "debug" => Self::Debug,
            _ => return Err(()),
        })
    }
}

/// Logging settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Minimum level (default: info)
    pub level: LogLevel,
    /// Log to stderr instead of stdout (default: true)
    pub stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            stderr: true,
        }
    }
}

/// Embedded webserver settings.
///
/// Read from the `webserver` section:
///
/// | Key | Default | Description |
/// |-----|---------|-------------|
/// | `enabled` | `false` | Start the webserver |
/// | `threadiness` | `0` | Worker threads, `0` for one per CPU |
/// | `listen_address` | `0.0.0.0` | Bind address, IPv4 or IPv6 |
/// | `listen_port` | `8765` | Bind port |
/// | `k8s_healthz_endpoint` | `/healthz` | Health check path |
/// | `ssl_enabled` | `false` | Serve over TLS |
/// | `ssl_certificate` | `/etc/bootconf/server.pem` | TLS certificate bundle |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WebserverConfig {
    pub enabled: bool,
    /// Worker threads, already resolved to a non-zero count.
    pub threadiness: usize,
    pub listen_address: String,
    pub listen_port: u16,
    pub k8s_healthz_endpoint: String,
    pub ssl_enabled: bool,
    pub ssl_certificate: PathBuf,
}

impl WebserverConfig {
    /// Get the socket address for binding.
    ///
    /// IPv6 addresses are bracketed.
    pub fn socket_addr(&self) -> String {
        if self.listen_address.contains(':') {
            format!("[{}]:{}", self.listen_address, self.listen_port)
        } else {
            format!("{}:{}", self.listen_address, self.listen_port)
        }
    }
}

impl Default for WebserverConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            threadiness: default_threadiness(),
            listen_address: DEFAULT_LISTEN_ADDRESS.to_string(),
            listen_port: DEFAULT_LISTEN_PORT,
            k8s_healthz_endpoint: DEFAULT_HEALTHZ_ENDPOINT.to_string(),
            ssl_enabled: false,
            ssl_certificate: PathBuf::from(DEFAULT_SSL_CERTIFICATE),
        }
    }
}

fn default_threadiness() -> usize {
    std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
}

/// Settings the runtime needs at startup, read from a [`ConfigTree`].
///
/// # Example
///
/// ```rust
/// use bootconf::RuntimeConfig;
///
/// let config = RuntimeConfig::from_overrides(["webserver.listen_address=::1"]).unwrap();
/// assert_eq!(config.webserver.socket_addr(), "[::1]:8765");
///
/// assert!(RuntimeConfig::from_overrides(["webserver.listen_address=327.0.0.1"]).is_err());
/// ```
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub logging: LoggingConfig,
    pub webserver: WebserverConfig,
    tree: ConfigTree,
}

impl RuntimeConfig {
    /// Initialize from command-line `path=value` overrides alone.
    pub fn from_overrides<I, S>(overrides: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = ConfigTree::new();
        tree.apply_overrides(overrides)?;
        Self::from_tree(tree)
    }

    /// Initialize from a configuration file, then apply `path=value` overrides.
    pub fn from_file<I, S>(path: impl AsRef<Path>, overrides: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = ConfigTree::new();
        tree.load_from_file(path)?;
        tree.apply_overrides(overrides)?;
        Self::from_tree(tree)
    }

    /// Read the typed settings from an already populated tree.
    ///
    /// Fails if `log_level` is not a known level or
    /// `webserver.listen_address` is not a valid IP address.
    pub fn from_tree(tree: ConfigTree) -> Result<Self, ConfigError> {
        let logging = read_logging(&tree)?;
        let webserver = read_webserver(&tree)?;
        info!(
            log_level = logging.level.as_filter(),
            webserver = webserver.enabled,
            listen = %webserver.socket_addr(),
            "runtime configuration initialized"
        );
        Ok(Self {
            logging,
            webserver,
            tree,
        })
    }

    /// The tree the settings were read from.
    pub fn tree(&self) -> &ConfigTree {
        &self.tree
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            webserver: WebserverConfig::default(),
            tree: ConfigTree::new(),
        }
    }
}

fn read_logging(tree: &ConfigTree) -> Result<LoggingConfig, ConfigError> {
    let raw_level = tree.get_scalar("log_level", "info".to_string());
    let level = raw_level
        .parse::<LogLevel>()
        .map_err(|()| ConfigError::InvalidValue {
            key: "log_level".to_string(),
            value: raw_level.clone(),
            expected: "one of emergency, alert, critical, error, warning, notice, info, debug",
        })?;
    Ok(LoggingConfig {
        level,
        stderr: tree.get_scalar("log_stderr", true),
    })
}

fn read_webserver(tree: &ConfigTree) -> Result<WebserverConfig, ConfigError> {
    let listen_address =
        tree.get_scalar("webserver.listen_address", DEFAULT_LISTEN_ADDRESS.to_string());
    if !is_valid_ip(&listen_address) {
        return Err(ConfigError::InvalidAddress {
            key: "webserver.listen_address".to_string(),
            value: listen_address,
        });
    }

    let threadiness = match tree.get_scalar::<usize>("webserver.threadiness", 0) {
        0 => default_threadiness(),
        n => n,
    };

    Ok(WebserverConfig {
        enabled: tree.get_scalar("webserver.enabled", false),
        threadiness,
        listen_address,
        listen_port: tree.get_scalar("webserver.listen_port", DEFAULT_LISTEN_PORT),
        k8s_healthz_endpoint: tree.get_scalar(
            "webserver.k8s_healthz_endpoint",
            DEFAULT_HEALTHZ_ENDPOINT.to_string(),
        ),
        ssl_enabled: tree.get_scalar("webserver.ssl_enabled", false),
        ssl_certificate: PathBuf::from(tree.get_scalar(
            "webserver.ssl_certificate",
            DEFAULT_SSL_CERTIFICATE.to_string(),
        )),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_env;
    use crate::net::{INVALID_ADDRESSES, VALID_ADDRESSES};

    #[test]
    fn test_default_values() {
        let config = RuntimeConfig::from_overrides(Vec::<String>::new()).unwrap();
        assert_eq!(config.logging, LoggingConfig::default());
        assert!(!config.webserver.enabled);
        assert_eq!(config.webserver.listen_address, "0.0.0.0");
        assert_eq!(config.webserver.listen_port, 8765);
        assert_eq!(config.webserver.k8s_healthz_endpoint, "/healthz");
        assert!(!config.webserver.ssl_enabled);
        assert_eq!(
            config.webserver.ssl_certificate,
            PathBuf::from("/etc/bootconf/server.pem")
        );
        assert!(config.webserver.threadiness >= 1);
        assert!(config.tree().is_empty());
    }

    #[test]
    fn test_listen_address_override_accepts_valid_addresses() {
        for address in VALID_ADDRESSES {
            let option = format!("webserver.listen_address={address}");
            let config = RuntimeConfig::from_overrides([option]).unwrap();
            assert_eq!(config.webserver.listen_address, *address);
        }
    }

    #[test]
    fn test_listen_address_override_rejects_invalid_addresses() {
        for address in INVALID_ADDRESSES {
            let option = format!("webserver.listen_address={address}");
            let err = RuntimeConfig::from_overrides([option]).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidAddress { ref value, .. } if value == address),
                "address {address:?} gave {err}"
            );
        }
    }

    #[test]
    fn test_socket_addr() {
        let mut webserver = WebserverConfig {
            listen_address: "0.0.0.0".to_string(),
            listen_port: 8080,
            ..WebserverConfig::default()
        };
        assert_eq!(webserver.socket_addr(), "0.0.0.0:8080");
        webserver.listen_address = "fe80::1".to_string();
        assert_eq!(webserver.socket_addr(), "[fe80::1]:8080");
    }

    #[test]
    fn test_from_file_with_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runtime.yaml");
        std::fs::write(
            &path,
            "log_level: debug\nlog_stderr: false\nwebserver:\n  enabled: true\n  threadiness: 3\n  listen_port: 9000\n  listen_address: 127.0.0.1\n",
        )
        .unwrap();

        let config = RuntimeConfig::from_file(&path, ["webserver.listen_port=9100"]).unwrap();
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert!(!config.logging.stderr);
        assert!(config.webserver.enabled);
        assert_eq!(config.webserver.threadiness, 3);
        assert_eq!(config.webserver.listen_port, 9100);
        assert_eq!(config.webserver.socket_addr(), "127.0.0.1:9100");
    }

    #[test]
    fn test_listen_address_from_environment() {
        let _env = test_env::lock();
        std::env::set_var("BOOTCONF_RUNTIME_LISTEN", "10.0.0.7");
        let config =
            RuntimeConfig::from_overrides(["webserver.listen_address=${BOOTCONF_RUNTIME_LISTEN}"])
                .unwrap();
        assert_eq!(config.webserver.listen_address, "10.0.0.7");

        std::env::set_var("BOOTCONF_RUNTIME_LISTEN", "10.0.0.700");
        assert!(matches!(
            RuntimeConfig::from_overrides(["webserver.listen_address=${BOOTCONF_RUNTIME_LISTEN}"]),
            Err(ConfigError::InvalidAddress { .. })
        ));
        std::env::remove_var("BOOTCONF_RUNTIME_LISTEN");
    }

    #[test]
    fn test_invalid_log_level() {
        let err = RuntimeConfig::from_overrides(["log_level=verbose"]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "log_level"));
    }

    #[test]
    fn test_log_level_filters() {
        assert_eq!("critical".parse::<LogLevel>().unwrap().as_filter(), "error");
        assert_eq!("warning".parse::<LogLevel>().unwrap().as_filter(), "warn");
        assert_eq!("notice".parse::<LogLevel>().unwrap().as_filter(), "info");
        assert_eq!("debug".parse::<LogLevel>().unwrap().as_filter(), "debug");
        assert!("WARNING".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_malformed_override_fails_initialization() {
        assert!(matches!(
            RuntimeConfig::from_overrides(["webserver.listen_address"]),
            Err(ConfigError::InvalidOverride(_))
        ));
    }
}
