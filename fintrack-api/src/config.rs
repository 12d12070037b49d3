use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub server: Option<ServerConfig>,
    pub cors: Option<CorsConfig>,
    pub database: Option<DatabaseConfig>,
    pub sync: Option<SyncConfig>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            server: Some(ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            }),
            cors: Some(CorsConfig {
                allowed_origins: vec!["http://localhost:3000".to_string()],
            }),
            database: None,
            sync: Some(SyncConfig::default()),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub path: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SyncConfig {
    pub poll_interval_secs: u64,
    pub cache_ttl_secs: i64,
    pub visibility_window_secs: i64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 30,
            cache_ttl_secs: 10,
            visibility_window_secs: 120,
        }
    }
}

impl ApiConfig {
    pub fn load() -> Result<(Self, PathBuf), ConfigError> {
        let config_path = get_config_path();

        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        // Create default config file if it doesn't exist
        if !config_path.exists() {
            let default_config = r#"
[server]
host = "127.0.0.1"
port = 8080

[cors]
allowed_origins = ["http://localhost:3000"]

[database]
# Absolute path to the ledger database; defaults to the platform data dir
# path = "/var/lib/fintrack/ledger.sqlite3"

[sync]
# Seconds between background refreshes of visible dashboard periods
poll_interval_secs = 30
# Seconds a cached read stays fresh before the next request refetches it
cache_ttl_secs = 10
# Seconds since the last dashboard request during which a period counts as visible
visibility_window_secs = 120
"#;
            std::fs::write(&config_path, default_config).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let builder = Config::builder()
            .add_source(File::from(config_path.clone()))
            .build()?;

        let config: ApiConfig = builder.try_deserialize()?;

        Ok((config, config_path))
    }

    pub fn sync(&self) -> SyncConfig {
        self.sync.clone().unwrap_or_default()
    }
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("fintrack").join("api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}
