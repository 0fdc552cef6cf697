// src/config.rs

use crate::error::{DashboardError, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::debug;
use url::Url;

pub const DEFAULT_URL: &str = "https://www.worldometers.info/coronavirus/#countries";
pub const DEFAULT_TABLE_ID: &str = "main_table_countries_today";
pub const DEFAULT_BIND: &str = "0.0.0.0:8050";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Command line flags. Every flag can also come from the environment, and
/// anything left unset falls through to the YAML file, then the defaults.
#[derive(Parser, Debug, Default)]
#[command(name = "covid_dashboard", version, about = "Serve a pandemic statistics dashboard")]
pub struct Cli {
    /// YAML file with any of the settings below
    #[arg(long, env = "DASHBOARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Page holding the statistics table
    #[arg(long, env = "DASHBOARD_URL")]
    pub url: Option<Url>,

    /// `id` attribute of the statistics table
    #[arg(long, env = "DASHBOARD_TABLE_ID")]
    pub table_id: Option<String>,

    /// HTTP timeout for the upstream fetch, in seconds
    #[arg(long, env = "DASHBOARD_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    #[arg(long, env = "DASHBOARD_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Address the dashboard listens on
    #[arg(long, env = "DASHBOARD_BIND")]
    pub bind: Option<SocketAddr>,

    /// Rebuild the snapshot on this interval; manual refresh only when unset
    #[arg(long, env = "DASHBOARD_REFRESH_SECS")]
    pub refresh_interval_secs: Option<u64>,

    /// PNG shown in the page header
    #[arg(long, env = "DASHBOARD_LOGO")]
    pub logo_path: Option<PathBuf>,
}

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub url: Url,
    pub table_id: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub bind: SocketAddr,
    pub refresh_interval_secs: Option<u64>,
    pub logo_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: Url::parse(DEFAULT_URL).expect("default URL should parse"),
            table_id: DEFAULT_TABLE_ID.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: format!("covid_dashboard/{}", env!("CARGO_PKG_VERSION")),
            bind: DEFAULT_BIND.parse().expect("default bind address should parse"),
            refresh_interval_secs: None,
            logo_path: None,
        }
    }
}

impl Config {
    /// Layer CLI/env over the optional YAML file over defaults.
    pub fn load(cli: Cli) -> Result<Self> {
        let mut cfg = match &cli.config {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };

        if let Some(url) = cli.url {
            cfg.url = url;
        }
        if let Some(table_id) = cli.table_id {
            cfg.table_id = table_id;
        }
        if let Some(timeout) = cli.timeout_secs {
            cfg.timeout_secs = timeout;
        }
        if let Some(ua) = cli.user_agent {
            cfg.user_agent = ua;
        }
        if let Some(bind) = cli.bind {
            cfg.bind = bind;
        }
        if cli.refresh_interval_secs.is_some() {
            cfg.refresh_interval_secs = cli.refresh_interval_secs;
        }
        if cli.logo_path.is_some() {
            cfg.logo_path = cli.logo_path;
        }

        cfg.validate()?;
        debug!(?cfg, "resolved configuration");
        Ok(cfg)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            DashboardError::Config(format!("reading {}: {}", path.display(), e))
        })?;
        serde_yaml::from_str(&text)
            .map_err(|e| DashboardError::Config(format!("parsing {}: {}", path.display(), e)))
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(DashboardError::Config("timeout_secs must be > 0".into()));
        }
        if self.table_id.trim().is_empty() {
            return Err(DashboardError::Config("table_id must not be empty".into()));
        }
        if self.refresh_interval_secs == Some(0) {
            return Err(DashboardError::Config(
                "refresh_interval_secs must be > 0 when set".into(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn refresh_interval(&self) -> Option<Duration> {
        self.refresh_interval_secs.map(Duration::from_secs)
    }
}
