use std::{env, num::NonZeroUsize, path::PathBuf};

use machine_learning::FitConfig;

use crate::error::{Result, ServerErr};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

/// Immutable startup configuration of a prediction node.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    host: String,
    port: u16,
    dataset: Option<PathBuf>,
    chunk_size: Option<NonZeroUsize>,
    peer: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            dataset: None,
            chunk_size: None,
            peer: None,
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    ///
    /// See `from_lookup` for the recognized variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from a key lookup.
    ///
    /// Recognized keys, all optional:
    /// * `HOST` - The address to listen at, `127.0.0.1` by default.
    /// * `PORT` - The port to listen at, `8000` by default.
    /// * `DATASET` - Path to the CSV file to train with.
    /// * `CHUNK_SIZE` - Samples per fit work unit, sized from the thread pool by default.
    /// * `PEER` - A remote node to relay stdin to, `host` or `host:port`.
    ///
    /// Empty values count as unset.
    ///
    /// # Returns
    /// The configuration or an `InvalidConfig` error naming the offending key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut cfg = Self::default();

        if let Some(host) = get("HOST") {
            cfg.host = host.trim().to_string();
        }

        if let Some(port) = get("PORT") {
            cfg.port = parse("PORT", &port)?;
        }

        if let Some(chunk_size) = get("CHUNK_SIZE") {
            cfg.chunk_size = Some(parse("CHUNK_SIZE", &chunk_size)?);
        }

        cfg.dataset = get("DATASET").map(PathBuf::from);
        cfg.peer = get("PEER").map(|peer| peer.trim().to_string());

        Ok(cfg)
    }

    /// Returns the `host:port` pair to listen at.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the `host:port` of the peer, borrowing this node's port when the
    /// peer was given as a bare host.
    pub fn peer_addr(&self) -> Option<String> {
        let peer = self.peer.as_deref()?;
        if peer.contains(':') {
            Some(peer.to_string())
        } else {
            Some(format!("{peer}:{}", self.port))
        }
    }

    pub fn dataset(&self) -> Option<&PathBuf> {
        self.dataset.as_ref()
    }

    pub fn fit_config(&self) -> FitConfig {
        match self.chunk_size {
            Some(size) => FitConfig::new().with_chunk_size(size),
            None => FitConfig::new(),
        }
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| ServerErr::InvalidConfig {
        key,
        value: value.to_string(),
    })
}
