//! Server configuration from environment.

use std::env;
use std::time::Duration;

/// Where estates and trees are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Sqlite,
    Memory,
}

impl StorageBackend {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "sqlite" | "sql" | "db" => Some(Self::Sqlite),
            "memory" | "mem" | "inmemory" => Some(Self::Memory),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "pretty" | "text" | "plain" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub storage: StorageBackend,
    pub database_path: String,
    pub database_max_connections: u32,
    /// Deadline handed to every request's store calls
    pub request_timeout: Duration,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("PLANTATION_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3000),
            storage: env::var("PLANTATION_STORAGE")
                .ok()
                .and_then(|s| StorageBackend::parse(&s))
                .unwrap_or(StorageBackend::Sqlite),
            database_path: env::var("PLANTATION_DATABASE_PATH")
                .unwrap_or_else(|_| "data/plantation.db".to_string()),
            database_max_connections: env::var("PLANTATION_DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(5),
            request_timeout: Duration::from_millis(
                env::var("PLANTATION_REQUEST_TIMEOUT_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5_000),
            ),
            log_format: env::var("PLANTATION_LOG_FORMAT")
                .ok()
                .and_then(|s| LogFormat::parse(&s))
                .unwrap_or(LogFormat::Pretty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_backend_parses_aliases() {
        assert_eq!(StorageBackend::parse("SQLite"), Some(StorageBackend::Sqlite));
        assert_eq!(StorageBackend::parse(" memory "), Some(StorageBackend::Memory));
        assert_eq!(StorageBackend::parse("postgres"), None);
    }

    #[test]
    fn log_format_parses() {
        assert_eq!(LogFormat::parse("JSON"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse("pretty"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse("xml"), None);
    }
}
