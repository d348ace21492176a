//! Configuration loader with layered sources.

use crate::{AppConfig, DaoBackend};
use config::{Config, ConfigError, Environment, File};
use soa_core::SoaError;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Configuration loader with runtime refresh support.
#[derive(Clone)]
pub struct ConfigLoader {
    config: Arc<RwLock<AppConfig>>,
    config_dir: String,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `{config_dir}/default.toml` - Default values
    /// 2. `{config_dir}/{environment}.toml` - Environment-specific overrides
    /// 3. `{config_dir}/local.toml` - Local overrides
    /// 4. Environment variables with `SOA_` prefix (`__` separates sections)
    pub fn new(config_dir: impl Into<String>) -> Result<Self, SoaError> {
        let config_dir = config_dir.into();
        let config = Self::load_config(&config_dir)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_dir,
        })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, SoaError> {
        Self::new("./config")
    }

    /// Returns the current configuration.
    pub async fn get(&self) -> AppConfig {
        self.config.read().await.clone()
    }

    /// Reloads the configuration from disk.
    pub async fn reload(&self) -> Result<(), SoaError> {
        let new_config = Self::load_config(&self.config_dir)?;
        let mut config = self.config.write().await;
        *config = new_config;
        info!("Configuration reloaded successfully");
        Ok(())
    }

    fn load_config(config_dir: &str) -> Result<AppConfig, SoaError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment = std::env::var("SOA_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        for name in ["default", environment.as_str(), "local"] {
            let path = format!("{}/{}.toml", config_dir, name);
            if Path::new(&path).exists() {
                debug!("Loading config from: {}", path);
                builder = builder.add_source(File::with_name(&path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("SOA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_error_to_soa_error)?;

        let app_config: AppConfig = config
            .try_deserialize()
            .map_err(config_error_to_soa_error)?;

        Self::validate_config(&app_config)?;

        Ok(app_config)
    }

    fn validate_config(config: &AppConfig) -> Result<(), SoaError> {
        if config.dao.backend == DaoBackend::MySql && config.database.url.is_empty() {
            return Err(SoaError::Configuration(
                "Database URL is required for the mysql DAO backend".to_string(),
            ));
        }

        if config.database.max_connections < config.database.min_connections {
            return Err(SoaError::Configuration(format!(
                "database.max_connections ({}) is below database.min_connections ({})",
                config.database.max_connections, config.database.min_connections
            )));
        }

        Ok(())
    }

    /// Gets a specific configuration value by dotted key path.
    pub async fn get_value<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let config = self.config.read().await;
        let json = serde_json::to_value(&*config).ok()?;

        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }

        serde_json::from_value(current.clone()).ok()
    }
}

impl std::fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigLoader")
            .field("config_dir", &self.config_dir)
            .finish_non_exhaustive()
    }
}

fn config_error_to_soa_error(err: ConfigError) -> SoaError {
    SoaError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use soa_core::UserId;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) {
        fs::write(dir.path().join(name), contents).unwrap();
    }

    fn loader_for(dir: &TempDir) -> Result<ConfigLoader, SoaError> {
        ConfigLoader::new(dir.path().to_string_lossy().to_string())
    }

    #[tokio::test]
    async fn test_missing_directory_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let loader = loader_for(&dir).unwrap();

        let config = loader.get().await;
        assert_eq!(config.app.name, "soa-user-service");
        assert_eq!(config.dao.backend, DaoBackend::Memory);
    }

    #[tokio::test]
    async fn test_loads_seed_users_in_order() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "default.toml",
            r#"
            [dao]
            backend = "memory"

            [[dao.seed_users]]
            id = 1
            first_name = "Alan"
            last_name = "Turing"

            [[dao.seed_users]]
            id = 2
            first_name = "Barbara"
            last_name = "Liskov"
            "#,
        );

        let config = loader_for(&dir).unwrap().get().await;
        let ids: Vec<UserId> = config.dao.seed_users.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![UserId::new(1), UserId::new(2)]);
        assert_eq!(config.dao.seed_users[1].first_name, "Barbara");
    }

    #[tokio::test]
    async fn test_local_overrides_default() {
        let dir = TempDir::new().unwrap();
        write(&dir, "default.toml", "[transaction]\ntimeout_secs = 30\n");
        write(&dir, "local.toml", "[transaction]\ntimeout_secs = 5\n");

        let config = loader_for(&dir).unwrap().get().await;
        assert_eq!(config.transaction.timeout_secs, Some(5));
    }

    #[tokio::test]
    async fn test_mysql_backend_requires_url() {
        let dir = TempDir::new().unwrap();
        write(&dir, "default.toml", "[dao]\nbackend = \"mysql\"\n\n[database]\nurl = \"\"\n");

        match loader_for(&dir).unwrap_err() {
            SoaError::Configuration(msg) => assert!(msg.contains("Database URL")),
            other => panic!("Expected Configuration error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_pool_bounds_validated() {
        let dir = TempDir::new().unwrap();
        write(&dir, "default.toml", "[database]\nmin_connections = 8\nmax_connections = 2\n");

        assert!(matches!(loader_for(&dir), Err(SoaError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_reload_picks_up_changes() {
        let dir = TempDir::new().unwrap();
        write(&dir, "default.toml", "[app]\nname = \"before\"\n");
        let loader = loader_for(&dir).unwrap();
        assert_eq!(loader.get().await.app.name, "before");

        write(&dir, "default.toml", "[app]\nname = \"after\"\n");
        loader.reload().await.unwrap();
        assert_eq!(loader.get().await.app.name, "after");
    }

    #[tokio::test]
    async fn test_env_var_overrides_file() {
        let dir = TempDir::new().unwrap();
        write(&dir, "default.toml", "[app]\nenvironment = \"from-file\"\n");

        // Only this test touches SOA_APP__ENVIRONMENT.
        std::env::set_var("SOA_APP__ENVIRONMENT", "from-env");
        let result = loader_for(&dir);
        std::env::remove_var("SOA_APP__ENVIRONMENT");

        let config = result.unwrap().get().await;
        assert_eq!(config.app.environment, "from-env");
    }

    #[tokio::test]
    async fn test_get_value_by_path() {
        let dir = TempDir::new().unwrap();
        write(&dir, "default.toml", "[database]\nmax_connections = 4\n");
        let loader = loader_for(&dir).unwrap();

        assert_eq!(loader.get_value::<u32>("database.max_connections").await, Some(4));
        assert_eq!(loader.get_value::<String>("dao.backend").await, Some("memory".to_string()));
        assert_eq!(loader.get_value::<u32>("database.missing").await, None);
    }
}
