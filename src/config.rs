//! Startup configuration.
//!
//! Settings come from an optional YAML file (`HELLO_CONFIG`), then from
//! environment overrides. The listening port itself is supplied by a
//! [`PortSource`], by default the `port.txt` file next to the binary.

use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_PORT_FILE: &str = "port.txt";
pub const DEFAULT_BACKLOG: u32 = 3;
pub const DEFAULT_MAX_REQUEST_BYTES: usize = 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} does not contain a port number")]
    Empty { path: PathBuf },

    #[error("invalid port {value:?} in {path}")]
    InvalidPort { path: PathBuf, value: String },

    #[error("invalid config file {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid {key} value {value:?}")]
    InvalidEnv { key: &'static str, value: String },

    #[error("max_request_bytes must be at least 2, got {0}")]
    BufferTooSmall(usize),
}

/// Anything that can hand the server its TCP port.
pub trait PortSource {
    fn port(&self) -> Result<u16, ConfigError>;
}

/// Reads the port from the first whitespace-delimited token of a text file.
#[derive(Debug, Clone)]
pub struct PortFile {
    path: PathBuf,
}

impl PortFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PortSource for PortFile {
    fn port(&self) -> Result<u16, ConfigError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|source| ConfigError::Read {
            path: self.path.clone(),
            source,
        })?;
        parse_port(&contents, &self.path)
    }
}

/// A port known up front. Used by tests and embedders.
#[derive(Debug, Clone, Copy)]
pub struct FixedPort(pub u16);

impl PortSource for FixedPort {
    fn port(&self) -> Result<u16, ConfigError> {
        Ok(self.0)
    }
}

fn parse_port(contents: &str, path: &Path) -> Result<u16, ConfigError> {
    let token = contents
        .split_whitespace()
        .next()
        .ok_or_else(|| ConfigError::Empty {
            path: path.to_path_buf(),
        })?;

    token.parse::<u16>().map_err(|_| ConfigError::InvalidPort {
        path: path.to_path_buf(),
        value: token.to_string(),
    })
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub port_file: PathBuf,
    pub bind_host: IpAddr,
    pub backlog: u32,
    pub max_request_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port_file: PathBuf::from(DEFAULT_PORT_FILE),
            bind_host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            backlog: DEFAULT_BACKLOG,
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
        }
    }
}

impl Config {
    /// Loads configuration from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::load`], with environment lookups routed through `env`.
    pub fn load_with<F>(env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = match env("HELLO_CONFIG") {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };

        if let Some(port_file) = env("PORT_FILE") {
            cfg.port_file = PathBuf::from(port_file);
        }

        if let Some(host) = env("BIND_HOST") {
            cfg.bind_host = host
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidEnv {
                    key: "BIND_HOST",
                    value: host.clone(),
                })?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        // one byte of the buffer is held back, so at least one must remain for data
        if self.max_request_bytes < 2 {
            return Err(ConfigError::BufferTooSmall(self.max_request_bytes));
        }
        Ok(())
    }

    pub fn port_source(&self) -> PortFile {
        PortFile::new(&self.port_file)
    }

    /// Combines this config with a port, producing what the listener needs.
    pub fn settings(&self, source: &impl PortSource) -> Result<ServerSettings, ConfigError> {
        let port = source.port()?;
        Ok(ServerSettings {
            addr: SocketAddr::new(self.bind_host, port),
            backlog: self.backlog,
            max_request_bytes: self.max_request_bytes,
        })
    }
}

/// Fully resolved listener settings.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
    pub backlog: u32,
    pub max_request_bytes: usize,
}

impl ServerSettings {
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            backlog: DEFAULT_BACKLOG,
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
        }
    }
}
