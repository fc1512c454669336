use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::application::todo_service::DEFAULT_DEADLINE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

/// Runtime settings, read from the environment after `.env` is loaded.
#[derive(Debug, Clone)]
pub struct Config {
    pub backend: StoreBackend,
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Origin allowed by the CORS policy
    pub cors_origin: String,
    /// Upper bound on a single store operation
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Sqlite,
            database_url: "sqlite://todos.db".into(),
            host: "127.0.0.1".into(),
            port: 5000,
            cors_origin: "http://localhost:5173".into(),
            request_timeout: DEFAULT_DEADLINE,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(backend) = lookup("TODO_STORE") {
            config.backend = match backend.trim().to_ascii_lowercase().as_str() {
                "sqlite" => StoreBackend::Sqlite,
                "memory" => StoreBackend::Memory,
                other => bail!("TODO_STORE must be `sqlite` or `memory`, got `{other}`"),
            };
        }
        if let Some(url) = lookup("DATABASE_URL") {
            config.database_url = url;
        }
        if let Some(host) = lookup("HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("PORT") {
            config.port = port.trim().parse().with_context(|| format!("invalid PORT `{port}`"))?;
        }
        if let Some(origin) = lookup("CORS_ORIGIN") {
            config.cors_origin = origin;
        }
        if let Some(ms) = lookup("REQUEST_TIMEOUT_MS") {
            let ms: u64 = ms.trim().parse().with_context(|| format!("invalid REQUEST_TIMEOUT_MS `{ms}`"))?;
            if ms == 0 {
                bail!("REQUEST_TIMEOUT_MS must be positive");
            }
            config.request_timeout = Duration::from_millis(ms);
        }

        Ok(config)
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}
