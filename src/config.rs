use std::env;
use std::path::PathBuf;

use dotenv::dotenv;

use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3333";
pub const DEFAULT_STORAGE_PATH: &str = "payday.db";
pub const DEFAULT_PORT: u16 = 3333;

/// Settings shared by the command line client and the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Root of the remote weekly-entries service.
    pub base_url: String,
    /// SQLite file backing the on-device store.
    pub storage_path: PathBuf,
    /// Backend database; only the server needs it.
    pub database_url: Option<String>,
    pub port: u16,
}

impl Settings {
    /// Reads a `.env` file if present, then the process environment.
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Settings::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(port) => port
                .parse::<u16>()
                .map_err(|_| Error::Config(format!("PORT must be a port number, got {:?}", port)))?,
            None => DEFAULT_PORT,
        };

        Ok(Settings {
            base_url: lookup("BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            storage_path: lookup("STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_PATH)),
            database_url: lookup("DATABASE_URL"),
            port,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings(&[]).unwrap();
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.storage_path, PathBuf::from(DEFAULT_STORAGE_PATH));
        assert_eq!(settings.database_url, None);
        assert_eq!(settings.port, DEFAULT_PORT);
    }

    #[test]
    fn test_overrides() {
        let settings = settings(&[
            ("BASE_URL", "http://10.0.0.2:8080/"),
            ("STORAGE_PATH", "/tmp/week.db"),
            ("DATABASE_URL", "sqlite://backend.db"),
            ("PORT", "8080"),
        ])
        .unwrap();
        assert_eq!(settings.base_url, "http://10.0.0.2:8080");
        assert_eq!(settings.storage_path, PathBuf::from("/tmp/week.db"));
        assert_eq!(settings.database_url.as_deref(), Some("sqlite://backend.db"));
        assert_eq!(settings.port, 8080);
    }

    #[test]
    fn test_bad_port() {
        assert!(matches!(settings(&[("PORT", "eighty")]), Err(Error::Config(_))));
    }
}
