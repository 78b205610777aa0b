use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use backend_domain::{DbConfig, RuntimeConfig};

pub const IN_MEMORY_DATABASE: &str = ":memory:";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub database_path: String,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub seed_scooters: u32,
    pub log_dir: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            database_path: "./scooters.db".to_string(),
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 15,
            seed_scooters: 0,
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Reads `SCOOTER_CONFIG` (default `./config.toml`), falling back to
    /// defaults when the file is absent. `explicit_path` wins over the env.
    pub async fn load(explicit_path: Option<&str>) -> Result<Self> {
        let path = match explicit_path {
            Some(path) => path.to_string(),
            None => env::var("SCOOTER_CONFIG").unwrap_or_else(|_| "./config.toml".to_string()),
        };
        let file_path = Path::new(&path);
        let base_dir = file_path.parent();
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            Self::from_toml(&content)?
        } else {
            warn!("{} not found, using defaults", path);
            AppConfig::default()
        };
        config.apply_env_overrides();
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|err| anyhow!("invalid config: {}", err))
    }

    pub fn normalize(&mut self) {
        self.database_path = self.database_path.trim().to_string();
        if let Some(dir) = &self.log_dir {
            if dir.trim().is_empty() {
                self.log_dir = None;
            }
        }
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        if self.database_path != IN_MEMORY_DATABASE {
            self.database_path = resolve_path(base, &self.database_path);
        }
        if let Some(dir) = &self.log_dir {
            self.log_dir = Some(resolve_path(base, dir));
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        if self.database_path.is_empty() {
            return Err(anyhow!("database_path must not be empty"));
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(anyhow!("request_timeout_seconds must be greater than 0"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
            seed_scooters: self.seed_scooters,
            log_dir: self.log_dir.clone(),
        }
    }

    pub fn to_db_config(&self) -> DbConfig {
        DbConfig {
            database_path: self.database_path.clone(),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("SCOOTER_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("SCOOTER_DATABASE_PATH") {
            self.database_path = value;
        }
        if let Ok(value) = env::var("SCOOTER_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Ok(value) = env::var("SCOOTER_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Ok(value) = env::var("SCOOTER_SEED_SCOOTERS") {
            self.seed_scooters = value.parse().unwrap_or(self.seed_scooters);
        }
        if let Ok(value) = env::var("SCOOTER_LOG_DIR") {
            self.log_dir = Some(value);
        }
    }
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}
