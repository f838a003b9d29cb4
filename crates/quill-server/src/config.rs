use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_DB_PATH: &str = "quill.db";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Reads `QUILL_DB_PATH`, `QUILL_HOST` and `QUILL_PORT`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup("QUILL_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.into());
        let host = lookup("QUILL_HOST").unwrap_or_else(|| DEFAULT_HOST.into());
        let port = match lookup("QUILL_PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("QUILL_PORT is not a valid port: '{}'", raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            db_path: db_path.into(),
            host,
            port,
        })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .with_context(|| format!("invalid listen address '{}'", addr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.db_path, PathBuf::from("quill.db"));
        assert_eq!(cfg.addr().unwrap(), "0.0.0.0:3000".parse().unwrap());
    }

    #[test]
    fn overrides() {
        let cfg = config(&[
            ("QUILL_DB_PATH", "/tmp/q.db"),
            ("QUILL_HOST", "127.0.0.1"),
            ("QUILL_PORT", "8080"),
        ])
        .unwrap();
        assert_eq!(cfg.db_path, PathBuf::from("/tmp/q.db"));
        assert_eq!(cfg.addr().unwrap(), "127.0.0.1:8080".parse().unwrap());
    }

    #[test]
    fn bad_port_is_an_error() {
        assert!(config(&[("QUILL_PORT", "eighty")]).is_err());
        assert!(config(&[("QUILL_HOST", "not a host")]).unwrap().addr().is_err());
    }
}
