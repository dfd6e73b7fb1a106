use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::Error;

/// Process settings, read from the environment (and `.env`, once loaded).
///
/// | variable           | default           |
/// |--------------------|-------------------|
/// | `APP_HOST`         | `0.0.0.0`         |
/// | `APP_PORT`         | `5000`            |
/// | `ALLOWED_ORIGINS`  | none              |
/// | `NODES_CSV`        | `data/nodes.csv`  |
/// | `EDGES_CSV`        | `data/edges.csv`  |
/// | `FLOW_MODEL`       | baseline model    |
/// | `ROUTE_TIMEOUT_MS` | `10000`           |
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub nodes_csv: PathBuf,
    pub edges_csv: PathBuf,
    pub flow_model: Option<PathBuf>,
    pub route_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "0.0.0.0".to_string(),
            port: 5000,
            allowed_origins: vec![],
            nodes_csv: PathBuf::from("data/nodes.csv"),
            edges_csv: PathBuf::from("data/edges.csv"),
            flow_model: None,
            route_timeout: Duration::from_millis(10_000),
        }
    }
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        Config::from_lookup(|name| env::var(name).ok())
    }

    /// Reads every setting through `lookup`. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Config::default();

        let port = match get("APP_PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| Error::Config(format!("APP_PORT must be a port number, given {value}")))?,
            None => defaults.port,
        };

        let route_timeout = match get("ROUTE_TIMEOUT_MS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| {
                    Error::Config(format!("ROUTE_TIMEOUT_MS must be milliseconds, given {value}"))
                })?,
            None => defaults.route_timeout,
        };

        let allowed_origins = get("ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Config {
            host: get("APP_HOST").unwrap_or(defaults.host),
            port,
            allowed_origins,
            nodes_csv: get("NODES_CSV").map_or(defaults.nodes_csv, PathBuf::from),
            edges_csv: get("EDGES_CSV").map_or(defaults.edges_csv, PathBuf::from),
            flow_model: get("FLOW_MODEL").map(PathBuf::from),
            route_timeout,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
