use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

/// Top-level server configuration.
///
/// Loaded from a YAML file (path in `HAVEN_CONFIG`, default `haven.yaml`);
/// a missing file falls back to defaults. The `LISTEN` environment variable
/// overrides the configured bind address.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
    pub uploads: UploadsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the listener binds to.
    pub listen_addr: String,
    /// Upper bound on concurrently handled connections.
    pub max_connections: usize,
    /// Socket read/write timeout in seconds.
    pub io_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Document root for static content.
    pub root: PathBuf,
    /// Document served for `GET /`.
    pub welcome_page: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadsConfig {
    /// Upload destination directory. Defaults to `<root>/uploads`.
    pub dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            static_files: StaticFilesConfig::default(),
            uploads: UploadsConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            max_connections: 1000,
            io_timeout_secs: 10,
        }
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("public"),
            welcome_page: "start.html".to_string(),
        }
    }
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self { dir: None }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("HAVEN_CONFIG").unwrap_or_else(|_| "haven.yaml".to_string());

        let mut cfg = if std::path::Path::new(&path).exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config file {path}"))?;
            serde_yaml::from_str(&raw)
                .with_context(|| format!("failed to parse config file {path}"))?
        } else {
            Self::default()
        };

        if let Ok(addr) = std::env::var("LISTEN") {
            cfg.server.listen_addr = addr;
        }

        Ok(cfg)
    }

    /// Resolved uploads directory.
    pub fn uploads_dir(&self) -> PathBuf {
        self.uploads
            .dir
            .clone()
            .unwrap_or_else(|| self.static_files.root.join("uploads"))
    }

    pub fn io_timeout(&self) -> Duration {
        Duration::from_secs(self.server.io_timeout_secs)
    }
}
